//! Errors raised during the data-copy phase (spec.md §7 `DataError`).

use std::fmt;

use dbswap_connector::ConnectorError;

#[derive(Debug)]
pub enum MigrateErrorKind {
    /// A `column_mapping` entry named a column that does not exist on the
    /// target table.
    Mapping,
    /// A chunk's transaction failed and was rolled back.
    Chunk,
    /// The source or target connection returned an error outside of a
    /// chunk boundary (e.g. the initial row-count probe).
    Connection,
    /// The caller's cancellation signal fired between chunks.
    Cancelled,
}

#[derive(Debug)]
pub struct MigrateError {
    pub kind: MigrateErrorKind,
    pub table: String,
    pub chunk_index: Option<usize>,
    pub offset: Option<u64>,
    pub message: String,
}

impl MigrateError {
    pub fn mapping(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: MigrateErrorKind::Mapping, table: table.into(), chunk_index: None, offset: None, message: message.into() }
    }

    pub fn chunk(table: impl Into<String>, chunk_index: usize, offset: u64, message: impl Into<String>) -> Self {
        Self {
            kind: MigrateErrorKind::Chunk,
            table: table.into(),
            chunk_index: Some(chunk_index),
            offset: Some(offset),
            message: message.into(),
        }
    }

    pub fn cancelled(table: impl Into<String>, chunk_index: usize, offset: u64) -> Self {
        Self {
            kind: MigrateErrorKind::Cancelled,
            table: table.into(),
            chunk_index: Some(chunk_index),
            offset: Some(offset),
            message: "migration cancelled".to_string(),
        }
    }
}

impl fmt::Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.chunk_index, self.offset) {
            (Some(idx), Some(off)) => write!(
                f,
                "table '{}' chunk {} (offset {}): {}",
                self.table, idx, off, self.message
            ),
            _ => write!(f, "table '{}': {}", self.table, self.message),
        }
    }
}

impl std::error::Error for MigrateError {}

impl From<ConnectorError> for MigrateError {
    fn from(err: ConnectorError) -> Self {
        Self { kind: MigrateErrorKind::Connection, table: String::new(), chunk_index: None, offset: None, message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
