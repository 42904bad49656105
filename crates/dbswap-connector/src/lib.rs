//! The connector boundary crate.
//!
//! Defines the traits other `dbswap` crates use to talk to a concrete
//! database driver and to an external backup/rollback collaborator
//! (spec.md §6 "Consumed"), without depending on any specific driver crate.
//!
//! The third "consumed" collaborator in spec.md §6, a structured logger
//! sink, is not modeled as a trait here: every crate in this workspace logs
//! through `tracing`, and a caller supplies the sink by installing a
//! `tracing_subscriber::Subscriber` — the same pattern the teacher crate
//! uses for its own logging. That keeps one logging seam for the whole
//! workspace instead of a second, bespoke one.

pub mod connection;
pub mod error;
pub mod row;

pub use connection::{Connection, DriverName, PreparedStatement, RollbackCollaborator, RollbackHandle};
pub use error::{ConnectorError, Result};
pub use row::Row;
