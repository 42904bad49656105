//! [`Platform`] — a per-dialect value object with no global mutable state
//! (spec.md §4.B). Everything the transformer and renderer need to know
//! about "how does this dialect spell things" lives here.

use dbswap_model::LogicalType;

use crate::capability::Capabilities;
use crate::dialect::Dialect;
use crate::reserved;
use crate::spelling::{self, TypeShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    dialect: Dialect,
}

impl Platform {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub const fn dialect(self) -> Dialect {
        self.dialect
    }

    pub const fn capabilities(self) -> Capabilities {
        match self.dialect {
            Dialect::MySql => Capabilities::mysql(),
            Dialect::PostgreSql => Capabilities::postgresql(),
            Dialect::Sqlite => Capabilities::sqlite(),
        }
    }

    /// Quote an identifier per this dialect's quoting character, doubling
    /// any embedded quote character (spec.md §4.B / §5 render rules).
    pub fn quote_identifier(self, name: &str) -> String {
        match self.dialect {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            Dialect::PostgreSql | Dialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    pub fn spell_type(self, ty: &LogicalType, shape: TypeShape) -> String {
        spelling::spell(self.dialect, ty, shape)
    }

    pub fn is_reserved_word(self, word: &str) -> bool {
        reserved::is_reserved(word)
    }
}
