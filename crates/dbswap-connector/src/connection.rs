//! The connector boundary: the minimal surface the orchestrator needs from
//! a concrete database driver.
//!
//! Per spec.md §9, the only suspension point in this system is I/O, and a
//! blocking connector is sufficient — unlike the teacher crate's
//! `asupersync`-based async `Connection` trait, these are plain blocking
//! methods returning `Result`. An async driver can still be adapted behind
//! this trait by blocking on its own runtime at the call site.

use dbswap_model::Value;

use crate::error::Result;
use crate::row::Row;

/// Which wire protocol / SQL dialect a connection speaks. Distinct from
/// `dbswap_dialect::Dialect`, which is the schema/DDL-level concept — this
/// is purely "what does the connector say it is".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverName {
    MySql,
    PgSql,
    Sqlite,
}

impl DriverName {
    pub const fn as_str(self) -> &'static str {
        match self {
            DriverName::MySql => "mysql",
            DriverName::PgSql => "pgsql",
            DriverName::Sqlite => "sqlite",
        }
    }
}

/// A prepared statement, reusable across parameter bindings within one
/// `Connection`.
pub trait PreparedStatement {
    fn execute(&mut self, params: &[Value]) -> Result<u64>;
}

/// A database connection, owned exclusively by the orchestrator for the
/// duration of one migration run (spec.md §9 shared-resource policy).
pub trait Connection {
    type Statement<'a>: PreparedStatement
    where
        Self: 'a;

    fn driver_name(&self) -> DriverName;

    fn exec(&mut self, sql: &str) -> Result<u64>;

    fn query(&mut self, sql: &str) -> Result<Vec<Row>>;

    fn prepare<'a>(&'a mut self, sql: &str) -> Result<Self::Statement<'a>>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}

/// The external backup/rollback collaborator (spec.md §6 "Consumed").
///
/// The core never stores credentials and treats the returned handle as an
/// opaque string it round-trips back to `restore`.
pub trait RollbackCollaborator {
    fn create(&mut self, target_driver: DriverName) -> Result<RollbackHandle>;

    fn restore(&mut self, handle: &RollbackHandle) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackHandle(pub String);

impl RollbackHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
