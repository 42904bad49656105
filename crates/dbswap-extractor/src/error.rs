//! Errors raised while reading a source schema.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    Connection,
    Permission,
    Parse,
}

#[derive(Debug)]
pub struct ExtractError {
    pub kind: ExtractErrorKind,
    pub table: Option<String>,
    pub message: String,
}

impl ExtractError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self { kind: ExtractErrorKind::Connection, table: None, message: message.into() }
    }

    pub fn permission(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: ExtractErrorKind::Permission, table: Some(table.into()), message: message.into() }
    }

    pub fn parse(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: ExtractErrorKind::Parse, table: Some(table.into()), message: message.into() }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{:?} error extracting table '{}': {}", self.kind, table, self.message),
            None => write!(f, "{:?} error during extraction: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<dbswap_connector::ConnectorError> for ExtractError {
    fn from(e: dbswap_connector::ConnectorError) -> Self {
        ExtractError::connection(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
