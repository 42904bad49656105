//! Scalar runtime values shared by column defaults and row data.

use serde::{Deserialize, Serialize};

/// A scalar database value.
///
/// This is intentionally small: the core does not need the full breadth of
/// wire-level types a driver would (see spec.md §1's non-goals) — only
/// enough to represent a column default or a row's cell during the data
/// migrator's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render this value as a SQL literal, for use in synthesized DDL (e.g.
    /// an enum `CHECK` constraint's value list or a literal default).
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Blob(bytes) => {
                format!("X'{}'", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
            }
        }
    }
}

/// The sum type a column default is stored as: never rely on string
/// inspection outside the renderer (spec.md §9 design note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDefault {
    Null,
    Literal(Value),
    /// A raw SQL expression, including the sentinel expressions
    /// `CURRENT_TIMESTAMP` / `CURRENT_DATE` / `CURRENT_TIME`.
    Expr(String),
}

impl ColumnDefault {
    pub fn current_timestamp() -> Self {
        ColumnDefault::Expr("CURRENT_TIMESTAMP".to_string())
    }

    pub fn current_date() -> Self {
        ColumnDefault::Expr("CURRENT_DATE".to_string())
    }

    pub fn current_time() -> Self {
        ColumnDefault::Expr("CURRENT_TIME".to_string())
    }

    /// Whether this default is one of the three recognized sentinel
    /// expressions (as opposed to an arbitrary expression the system does
    /// not interpret).
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            ColumnDefault::Expr(e)
                if matches!(e.as_str(), "CURRENT_TIMESTAMP" | "CURRENT_DATE" | "CURRENT_TIME")
        )
    }
}
