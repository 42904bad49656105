//! Aggregated outcome of one migration run.

use dbswap_migrate::RowError;
use dbswap_sorter::CycleWarning;

#[derive(Debug, Clone, Default)]
pub struct TableOutcome {
    pub table: String,
    pub rows_migrated: u64,
    pub row_errors: Vec<RowError>,
    pub warnings: Vec<String>,
    /// Full-text indexes that received a target-dialect equivalent
    /// (a GIN index or an FTS5 shadow table), out of everything this
    /// table's source schema declared as `FULLTEXT`.
    pub indexes_converted: u32,
    pub pg_gin_indexes: u32,
    pub pg_generated_columns: u32,
    pub sqlite_fts_tables: u32,
}

#[derive(Debug, Clone)]
pub struct RollbackOutcome {
    pub handle: String,
    pub restored: bool,
}

/// Elapsed wall-clock time for one orchestrator phase (spec.md §5).
#[derive(Debug, Clone)]
pub struct PhaseTiming {
    pub phase: String,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub run_id: String,
    pub tables: Vec<TableOutcome>,
    pub pre_validation_warnings: Vec<String>,
    pub post_validation_warnings: Vec<String>,
    pub cycle_warning: Option<CycleWarning>,
    pub rollback: Option<RollbackOutcome>,
    pub phase_timings: Vec<PhaseTiming>,
}

impl MigrationResult {
    pub fn total_rows_migrated(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_migrated).sum()
    }

    pub fn has_row_errors(&self) -> bool {
        self.tables.iter().any(|t| !t.row_errors.is_empty())
    }
}
