//! Error types for the schema model crate.

use std::fmt;

/// Errors raised while building or mutating a [`crate::Table`].
#[derive(Debug)]
pub enum ModelError {
    /// A column, index or constraint name collided with one already present.
    DuplicateName(DuplicateNameError),
    /// An index or constraint referenced a column that does not exist.
    UnknownColumn(UnknownColumnError),
    /// A second `primary` index or constraint was added to a table.
    DuplicatePrimaryKey { table: String },
}

#[derive(Debug)]
pub struct DuplicateNameError {
    pub table: String,
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug)]
pub struct UnknownColumnError {
    pub table: String,
    pub referent: String,
    pub column: String,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::DuplicateName(e) => write!(
                f,
                "table '{}' already has a {} named '{}'",
                e.table, e.kind, e.name
            ),
            ModelError::UnknownColumn(e) => write!(
                f,
                "table '{}': {} references unknown column '{}'",
                e.table, e.referent, e.column
            ),
            ModelError::DuplicatePrimaryKey { table } => {
                write!(f, "table '{table}' already has a primary index")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
