//! Column metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::LogicalType;
use crate::value::ColumnDefault;

/// Storage kind for a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratedStorage {
    Stored,
    Virtual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedColumn {
    pub expression: String,
    pub storage: GeneratedStorage,
}

/// A single column in a [`crate::Table`].
///
/// `table` is a weak back-reference: the owning name, not an owned pointer
/// (spec.md §9 — back-pointers are lookups, never cyclic ownership). It is
/// set by `Table::add_column` and rewired by `Table::clone_with_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub logical_type: LogicalType,
    pub length: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub nullable: bool,
    pub auto_increment: bool,
    pub unsigned: bool,
    pub default: Option<ColumnDefault>,
    pub comment: Option<String>,
    pub enum_values: Vec<String>,
    pub generated: Option<GeneratedColumn>,
    pub options: IndexMap<String, String>,
    pub(crate) table: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            auto_increment: false,
            unsigned: false,
            default: None,
            comment: None,
            enum_values: Vec::new(),
            generated: None,
            options: IndexMap::new(),
            table: None,
        }
    }

    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub const fn with_precision_scale(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_values = values;
        self
    }

    /// Set the generated-column expression. Per spec.md §3, setting this
    /// implies `generated = true` — there is no separate boolean to forget
    /// to set.
    pub fn with_generated(mut self, expression: impl Into<String>, storage: GeneratedStorage) -> Self {
        self.generated = Some(GeneratedColumn {
            expression: expression.into(),
            storage,
        });
        self
    }

    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    /// The table this column belongs to, if it has been attached via
    /// `Table::add_column`.
    pub fn owning_table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Whether this column's `extra`/options carry the `ON UPDATE
    /// CURRENT_TIMESTAMP` auto-touch behavior (spec.md §4.E.4).
    pub fn has_on_update_current_timestamp(&self) -> bool {
        self.option("on_update")
            .map(|v| v.eq_ignore_ascii_case("CURRENT_TIMESTAMP"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_generated_expression_implies_generated_true() {
        let col = Column::new("total", LogicalType::Int)
            .with_generated("a + b", GeneratedStorage::Stored);
        assert!(col.is_generated());
        assert_eq!(col.generated.as_ref().unwrap().expression, "a + b");
    }

    #[test]
    fn plain_column_is_not_generated() {
        let col = Column::new("id", LogicalType::BigInt);
        assert!(!col.is_generated());
    }

    #[test]
    fn on_update_detection_is_case_insensitive() {
        let mut col = Column::new("updated_at", LogicalType::Timestamp);
        col.set_option("on_update", "current_timestamp");
        assert!(col.has_on_update_current_timestamp());
    }

    #[test]
    fn on_update_absent_by_default() {
        let col = Column::new("updated_at", LogicalType::Timestamp);
        assert!(!col.has_on_update_current_timestamp());
    }

    #[test]
    fn new_column_has_no_owning_table_until_attached() {
        let col = Column::new("id", LogicalType::Int);
        assert_eq!(col.owning_table(), None);
    }
}
