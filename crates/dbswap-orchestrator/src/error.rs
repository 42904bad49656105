//! The aggregate error type covering every phase of a migration run.

use std::fmt;

use dbswap_connector::ConnectorError;
use dbswap_extractor::ExtractError;
use dbswap_migrate::MigrateError;
use dbswap_transform::TransformError;
use dbswap_validate::ValidateError;

#[derive(Debug)]
pub enum OrchestratorErrorKind {
    /// Bad or self-contradictory `OrchestratorOptions` (spec.md §7 `ConfigError`).
    Config,
    Validation,
    Extraction,
    Transform,
    /// The target refused a DDL statement during the schema phase
    /// (spec.md §7 `DDLExecError`).
    DdlExec,
    DataCopy,
    Connector,
    RollbackUnavailable,
    /// The caller's cancellation signal fired at a phase boundary.
    Cancelled,
}

#[derive(Debug)]
pub struct OrchestratorError {
    pub kind: OrchestratorErrorKind,
    pub table: Option<String>,
    pub message: String,
}

impl OrchestratorError {
    pub fn rollback_unavailable(message: impl Into<String>) -> Self {
        Self { kind: OrchestratorErrorKind::RollbackUnavailable, table: None, message: message.into() }
    }

    pub fn ddl_exec(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: OrchestratorErrorKind::DdlExec, table: Some(table.into()), message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self { kind: OrchestratorErrorKind::Config, table: None, message: message.into() }
    }

    pub fn cancelled(phase: impl Into<String>) -> Self {
        Self { kind: OrchestratorErrorKind::Cancelled, table: None, message: format!("migration cancelled before phase '{}'", phase.into()) }
    }
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{:?} error on table '{}': {}", self.kind, table, self.message),
            None => write!(f, "{:?} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl From<ValidateError> for OrchestratorError {
    fn from(err: ValidateError) -> Self {
        Self { kind: OrchestratorErrorKind::Validation, table: err.table.clone(), message: err.to_string() }
    }
}

impl From<ExtractError> for OrchestratorError {
    fn from(err: ExtractError) -> Self {
        Self { kind: OrchestratorErrorKind::Extraction, table: err.table.clone(), message: err.to_string() }
    }
}

impl From<TransformError> for OrchestratorError {
    fn from(err: TransformError) -> Self {
        Self { kind: OrchestratorErrorKind::Transform, table: Some(err.table.clone()), message: err.to_string() }
    }
}

impl From<MigrateError> for OrchestratorError {
    fn from(err: MigrateError) -> Self {
        Self { kind: OrchestratorErrorKind::DataCopy, table: Some(err.table.clone()), message: err.to_string() }
    }
}

impl From<ConnectorError> for OrchestratorError {
    fn from(err: ConnectorError) -> Self {
        Self { kind: OrchestratorErrorKind::Connector, table: None, message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
