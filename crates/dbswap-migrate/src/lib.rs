//! Chunked, per-table data copy from a source connection to a target
//! connection (spec.md §4.G).
//!
//! Streams rows in `chunk_size` batches via `LIMIT`/`OFFSET`, ordered by
//! primary key when one is known, normalizing each cell for the target
//! dialect and executing a prepared INSERT with a dialect-appropriate
//! conflict clause. A chunk runs inside one transaction when
//! `use_transaction` is set; per-row failures are recorded but do not abort
//! the chunk unless `handle_conflicts = error`.

pub mod conflict;
pub mod error;
pub mod mapping;
pub mod normalize;
pub mod options;

use dbswap_connector::{Connection, ConnectorError, PreparedStatement};
use dbswap_dialect::Platform;
use dbswap_model::{Table, Value};
use indexmap::IndexMap;

pub use error::{MigrateError, MigrateErrorKind, Result};
pub use options::{ConflictPolicy, MigrateOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub chunk_index: usize,
    pub offset: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct TableMigrationOutcome {
    pub rows_migrated: u64,
    pub row_errors: Vec<RowError>,
    pub warnings: Vec<String>,
}

pub fn migrate_table<C: Connection>(
    conn: &mut C,
    source: &Table,
    target: &Table,
    platform: Platform,
    column_mapping: &IndexMap<String, String>,
    row_transform: Option<&dyn Fn(&mut Vec<Value>)>,
    options: &MigrateOptions,
) -> Result<TableMigrationOutcome> {
    let row_count = source.row_count.unwrap_or(0);
    if row_count == 0 {
        tracing::debug!(table = %source.name, "zero source rows; skipping data copy");
        return Ok(TableMigrationOutcome::default());
    }

    let pairs = mapping::resolve_columns(source, target, column_mapping)?;
    if pairs.is_empty() {
        return Ok(TableMigrationOutcome::default());
    }

    let src_cols: Vec<String> = pairs.iter().map(|(s, _)| s.clone()).collect();
    let dst_cols: Vec<String> = pairs.iter().map(|(_, d)| d.clone()).collect();
    let pk_cols: Vec<String> = target.primary_key_columns().into_iter().map(String::from).collect();
    let order_cols: Vec<String> = source
        .primary_key_columns()
        .into_iter()
        .filter(|c| src_cols.iter().any(|s| s.as_str() == *c))
        .map(String::from)
        .collect();

    let template = conflict::build_insert(platform, &target.name, &dst_cols, &pk_cols, options.handle_conflicts);
    let mut warnings = Vec::new();
    if template.conflict_handling_disabled {
        warnings.push(format!(
            "table '{}': no primary key known; conflict handling for handle_conflicts={:?} disabled",
            target.name, options.handle_conflicts
        ));
    }

    let mut outcome = TableMigrationOutcome { warnings, ..Default::default() };
    let mut offset: u64 = 0;
    let mut chunk_index = 0usize;

    loop {
        let select_sql = build_select(platform, &source.name, &src_cols, &order_cols, options.chunk_size, offset);
        let rows = conn.query(&select_sql).map_err(|e| chunk_err(&source.name, chunk_index, offset, e))?;
        if rows.is_empty() {
            break;
        }
        let fetched = rows.len() as u64;

        if options.use_transaction {
            conn.begin().map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;
        }

        // Re-prepared per chunk: the connector's `Statement<'a>` borrows
        // `conn` for its own lifetime, which would otherwise overlap with
        // the `begin`/`commit` calls bracketing this chunk.
        let mut stmt = conn.prepare(&template.sql).map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;

        let mut chunk_failed = None;
        for (row_idx, row) in rows.into_iter().enumerate() {
            let mut values = row.into_values();
            if let Some(transform) = row_transform {
                transform(&mut values);
            }
            let normalized: Vec<Value> = values.iter().map(|v| normalize::normalize(v, platform.dialect())).collect();

            match stmt.execute(&normalized) {
                Ok(_) => outcome.rows_migrated += 1,
                Err(e) if options.handle_conflicts == ConflictPolicy::Error => {
                    chunk_failed = Some(format!("row {row_idx} in chunk: {e}"));
                    break;
                }
                Err(e) => outcome.row_errors.push(RowError {
                    chunk_index,
                    offset: offset + row_idx as u64,
                    message: e.to_string(),
                }),
            }
        }
        drop(stmt);

        if let Some(message) = chunk_failed {
            if options.use_transaction {
                let _ = conn.rollback();
            }
            return Err(MigrateError::chunk(&target.name, chunk_index, offset, message));
        }

        if options.use_transaction {
            conn.commit().map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;
        }

        tracing::debug!(table = %target.name, chunk_index, rows = fetched, "migrated chunk");

        offset += fetched;
        chunk_index += 1;
        if fetched < options.chunk_size as u64 {
            break;
        }
    }

    Ok(outcome)
}

fn chunk_err(table: &str, chunk_index: usize, offset: u64, err: ConnectorError) -> MigrateError {
    MigrateError::chunk(table, chunk_index, offset, err.to_string())
}

fn build_select(platform: Platform, table_name: &str, cols: &[String], order_cols: &[String], chunk_size: usize, offset: u64) -> String {
    let quoted_table = platform.quote_identifier(table_name);
    let quoted_cols = cols.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
    let order_by = if order_cols.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", order_cols.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", "))
    };
    format!("SELECT {quoted_cols} FROM {quoted_table}{order_by} LIMIT {chunk_size} OFFSET {offset}")
}
