//! The workspace-wide error type returned at the facade boundary.
//!
//! Every phase crate keeps its own `{kind, table, message}` error type
//! (`dbswap_extractor::ExtractError`, `dbswap_validate::ValidateError`, and
//! so on); `dbswap_orchestrator::OrchestratorError` already aggregates those
//! for a full `migrate`/`migrate_schema` run. `Error` widens that one step
//! further to also cover the standalone `create_rollback_point`/`rollback`
//! entry points, which talk to a `RollbackCollaborator` directly rather than
//! through the orchestrator.

use std::fmt;

use dbswap_connector::ConnectorError;
use dbswap_orchestrator::OrchestratorError;

#[derive(Debug)]
pub enum Error {
    Migration(OrchestratorError),
    Rollback(ConnectorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Migration(err) => write!(f, "{err}"),
            Error::Rollback(err) => write!(f, "rollback collaborator error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<OrchestratorError> for Error {
    fn from(err: OrchestratorError) -> Self {
        Error::Migration(err)
    }
}

impl From<ConnectorError> for Error {
    fn from(err: ConnectorError) -> Self {
        Error::Rollback(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
