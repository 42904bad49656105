//! Errors raised by a connector implementation.

use std::fmt;

#[derive(Debug)]
pub enum ConnectorError {
    /// The connection could not be established or was dropped mid-operation.
    Connection { message: String },
    /// A statement was rejected by the server.
    Statement { sql: String, message: String },
    /// A transaction could not be started, committed or rolled back.
    Transaction { message: String },
    /// A capability the orchestrator needs was not available on this
    /// connection (e.g. no privilege to create a scratch table).
    Unsupported { capability: String },
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Connection { message } => write!(f, "connection error: {message}"),
            ConnectorError::Statement { sql, message } => {
                write!(f, "statement failed: {message} (sql: {sql})")
            }
            ConnectorError::Transaction { message } => write!(f, "transaction error: {message}"),
            ConnectorError::Unsupported { capability } => {
                write!(f, "connector does not support required capability: {capability}")
            }
        }
    }
}

impl std::error::Error for ConnectorError {}

pub type Result<T> = std::result::Result<T, ConnectorError>;
