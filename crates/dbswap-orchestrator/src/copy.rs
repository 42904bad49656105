//! Cross-connection chunked data copy.
//!
//! `dbswap_migrate::migrate_table` reads and writes through a single shared
//! connection (spec.md §4.G as built): fine when source and target happen
//! to be reachable through the same connector, but a genuine cross-dialect
//! migration has a distinct physical connection on each side. This module
//! runs the same per-chunk select/normalize/insert sequence across two
//! connections, reusing `dbswap_migrate`'s column-mapping, conflict-clause
//! and value-normalization logic rather than duplicating it.

use dbswap_connector::{Connection, ConnectorError, PreparedStatement};
use dbswap_dialect::Platform;
use dbswap_migrate::{conflict, mapping, normalize, ConflictPolicy, MigrateError, MigrateOptions, RowError, TableMigrationOutcome};
use dbswap_model::Table;
use indexmap::IndexMap;

pub fn copy_table<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source: &Table,
    target: &Table,
    source_platform: Platform,
    target_platform: Platform,
    column_mapping: &IndexMap<String, String>,
    options: &MigrateOptions,
    cancellation: Option<&dyn Fn() -> bool>,
) -> dbswap_migrate::Result<TableMigrationOutcome> {
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

    let template = conflict::build_insert(target_platform, &target.name, &dst_cols, &pk_cols, options.handle_conflicts);
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
        if cancellation.is_some_and(|is_cancelled| is_cancelled()) {
            tracing::warn!(table = %target.name, chunk_index, "data copy cancelled between chunks; no transaction was in flight");
            return Err(MigrateError::cancelled(&target.name, chunk_index, offset));
        }

        let select_sql = build_select(source_platform, &source.name, &src_cols, &order_cols, options.chunk_size, offset);
        let rows = source_conn.query(&select_sql).map_err(|e| chunk_err(&source.name, chunk_index, offset, e))?;
        if rows.is_empty() {
            break;
        }
        let fetched = rows.len() as u64;

        if options.use_transaction {
            target_conn.begin().map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;
        }

        // Re-prepared per chunk, same reasoning as the single-connection
        // implementation this is adapted from: the statement borrows
        // `target_conn` for its own lifetime, which would otherwise overlap
        // the surrounding `begin`/`commit` calls.
        let mut stmt = target_conn.prepare(&template.sql).map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;

        let mut chunk_failed = None;
        for (row_idx, row) in rows.into_iter().enumerate() {
            let values = row.into_values();
            let normalized: Vec<_> = values.iter().map(|v| normalize::normalize(v, target_platform.dialect())).collect();

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
                let _ = target_conn.rollback();
            }
            return Err(MigrateError::chunk(&target.name, chunk_index, offset, message));
        }

        if options.use_transaction {
            target_conn.commit().map_err(|e| chunk_err(&target.name, chunk_index, offset, e))?;
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
