//! dbswap - cross-dialect schema and data migration between MySQL,
//! PostgreSQL and SQLite.
//!
//! A thin facade over the phase crates that do the actual work: extraction,
//! dependency sorting, schema transformation, DDL rendering, chunked data
//! copy, pre/post validation, and the SQL-dump splitter. Most callers only
//! need this crate; the sub-crates are public for callers who want one
//! phase in isolation (e.g. just the splitter, or just the validator).
//!
//! # Quick start
//!
//! ```ignore
//! use dbswap::{migrate, MigrationOptions};
//! use dbswap_dialect::Dialect;
//!
//! let result = migrate(
//!     &mut source_conn,
//!     &mut target_conn,
//!     Dialect::MySql,
//!     Dialect::PostgreSql,
//!     Some(&mut rollback_collaborator),
//!     &MigrationOptions::default(),
//! )?;
//! println!("migrated {} rows across {} tables", result.total_rows_migrated(), result.tables.len());
//! # Ok::<(), dbswap::Error>(())
//! ```

pub mod error;

pub use error::Error;
pub use error::Result;

// Re-export every sub-crate's public surface, the same thin-facade shape
// the teacher crate uses for its own sub-crates.
pub use dbswap_connector::{Connection, ConnectorError, DriverName, PreparedStatement, Row, RollbackCollaborator, RollbackHandle};
pub use dbswap_dialect::{Dialect, Platform};
pub use dbswap_extractor::{extract, ExtractError};
pub use dbswap_migrate::{migrate_table, ConflictPolicy, MigrateError, MigrateErrorKind, MigrateOptions, RowError, TableMigrationOutcome};
pub use dbswap_model::{Column, ColumnDefault, Constraint, ConstraintKind, ForeignKeyRef, Index, IndexColumn, IndexKind, LogicalType, ModelError, PostActionType, PostTransformAction, ReferentialAction, SortDirection, Table, Value};
pub use dbswap_orchestrator::{MigrationResult, OrchestratorError, OrchestratorOptions as MigrationOptions, RollbackOutcome, TableOutcome};
pub use dbswap_render::{render, RenderOptions};
pub use dbswap_sorter::{sort_for_create, sort_for_drop, CycleWarning, SortResult};
pub use dbswap_splitter::{classify, split, Statement, StatementKind, SplitOutcome};
pub use dbswap_transform::{transform, EnumConversion, FulltextStrategy, TransformError, TransformOptions, TransformOutput};
pub use dbswap_validate::{validate_compatibility as check_dialect_pair, PostValidationReport, PreValidationReport, SampleProbe, ValidateError, LARGE_TABLE_ROW_THRESHOLD};

/// Full schema-and-data migration (spec.md §4.I). Runs every phase the
/// supplied `options` enables, including the data-copy phase when
/// `options.include_data` is set (the default).
pub fn migrate<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    options: &MigrationOptions,
) -> Result<MigrationResult> {
    dbswap_orchestrator::migrate_schema(source_conn, target_conn, source_dialect, target_dialect, rollback_collaborator, options)
        .map_err(Error::from)
}

/// Same as [`migrate`], polling `cancellation` at phase boundaries and
/// between data chunks (spec.md §5). `cancellation` returning `true` aborts
/// the run at the next check point.
pub fn migrate_with_cancellation<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    options: &MigrationOptions,
    cancellation: &dyn Fn() -> bool,
) -> Result<MigrationResult> {
    dbswap_orchestrator::migrate_schema_with_cancellation(source_conn, target_conn, source_dialect, target_dialect, rollback_collaborator, options, Some(cancellation))
        .map_err(Error::from)
}

/// Schema-only migration: the same phase sequence as [`migrate`], with data
/// copy forced off regardless of what `options.include_data` says.
pub fn migrate_schema<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    options: &MigrationOptions,
) -> Result<MigrationResult> {
    let schema_only = MigrationOptions { include_data: false, ..options.clone() };
    dbswap_orchestrator::migrate_schema(source_conn, target_conn, source_dialect, target_dialect, rollback_collaborator, &schema_only)
        .map_err(Error::from)
}

/// Whether a source/target dialect pair is supported (spec.md §4.H), without
/// touching either connection.
pub fn validate_compatibility(source_dialect: Dialect, target_dialect: Dialect) -> Result<()> {
    dbswap_validate::validate_compatibility(source_dialect, target_dialect).map_err(OrchestratorError::from).map_err(Error::from)
}

/// Delegates rollback-point creation to the external backup collaborator and
/// returns its handle, for callers who want a snapshot outside of a full
/// `migrate` run.
pub fn create_rollback_point(collaborator: &mut dyn RollbackCollaborator, target_driver: DriverName) -> Result<RollbackHandle> {
    collaborator.create(target_driver).map_err(Error::from)
}

/// Restores a previously created rollback point.
pub fn rollback(collaborator: &mut dyn RollbackCollaborator, handle: &RollbackHandle) -> Result<()> {
    collaborator.restore(handle).map_err(Error::from)
}
