//! Errors raised by pre- and post-migration validation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateErrorKind {
    UnsupportedPair,
    Connection,
    Permission,
    MissingTable,
    MissingColumn,
    RowCountMismatch,
}

#[derive(Debug)]
pub struct ValidateError {
    pub kind: ValidateErrorKind,
    pub table: Option<String>,
    pub message: String,
}

impl ValidateError {
    pub fn unsupported_pair(message: impl Into<String>) -> Self {
        Self { kind: ValidateErrorKind::UnsupportedPair, table: None, message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self { kind: ValidateErrorKind::Connection, table: None, message: message.into() }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self { kind: ValidateErrorKind::Permission, table: None, message: message.into() }
    }

    pub fn missing_table(table: impl Into<String>) -> Self {
        Self { kind: ValidateErrorKind::MissingTable, table: Some(table.into()), message: "table is missing on the target".to_string() }
    }

    pub fn missing_column(table: impl Into<String>, column: &str) -> Self {
        Self {
            kind: ValidateErrorKind::MissingColumn,
            table: Some(table.into()),
            message: format!("column '{column}' is missing on the target"),
        }
    }

    pub fn row_count_mismatch(table: impl Into<String>, source: u64, target: u64) -> Self {
        Self {
            kind: ValidateErrorKind::RowCountMismatch,
            table: Some(table.into()),
            message: format!("row count mismatch: source has {source}, target has {target}"),
        }
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{:?} error on table '{}': {}", self.kind, table, self.message),
            None => write!(f, "{:?} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ValidateError {}

impl From<dbswap_connector::ConnectorError> for ValidateError {
    fn from(e: dbswap_connector::ConnectorError) -> Self {
        ValidateError::connection(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;
