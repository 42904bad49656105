//! Errors raised when a source construct has no target-dialect equivalent.

use std::fmt;

#[derive(Debug)]
pub struct TransformError {
    pub table: String,
    pub column: Option<String>,
    pub message: String,
}

impl TransformError {
    pub fn unrepresentable(table: impl Into<String>, column: Option<String>, message: impl Into<String>) -> Self {
        Self { table: table.into(), column, message: message.into() }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(col) => write!(
                f,
                "table '{}' column '{}' cannot be represented on the target dialect: {}",
                self.table, col, self.message
            ),
            None => write!(
                f,
                "table '{}' cannot be represented on the target dialect: {}",
                self.table, self.message
            ),
        }
    }
}

impl std::error::Error for TransformError {}

pub type Result<T> = std::result::Result<T, TransformError>;
