//! Post-migration validation (spec.md §4.H).

use dbswap_connector::Connection;
use dbswap_dialect::Platform;
use dbswap_model::{Table, Value};
use indexmap::IndexMap;

use crate::error::{Result, ValidateError};

#[derive(Debug, Clone, Default)]
pub struct PostValidationReport {
    pub warnings: Vec<String>,
}

/// Optional sample-data probe configuration: pull `sample_size` live rows
/// per table from the source connection and assert each exists in the
/// target by equality on every column (spec.md §4.H).
#[derive(Debug, Clone, Copy)]
pub struct SampleProbe {
    pub sample_size: usize,
}

pub fn post_validate<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_schema: &IndexMap<String, Table>,
    target_schema: &IndexMap<String, Table>,
    source_platform: Platform,
    target_platform: Platform,
    sample_probe: Option<SampleProbe>,
) -> Result<PostValidationReport> {
    let mut report = PostValidationReport::default();

    for (name, source_table) in source_schema {
        let Some(target_table) = target_schema.get(name) else {
            return Err(ValidateError::missing_table(name.clone()));
        };

        if target_table.columns.len() != source_table.columns.len() {
            report.warnings.push(format!(
                "table '{name}': column count mismatch (source has {}, target has {})",
                source_table.columns.len(),
                target_table.columns.len()
            ));
        }

        for column in source_table.columns.keys() {
            if !target_table.columns.contains_key(column) {
                return Err(ValidateError::missing_column(name.clone(), column));
            }
        }

        let source_count = source_table.row_count.unwrap_or(0);
        let target_count = query_row_count(target_conn, target_platform, name)?;
        if source_count != target_count {
            return Err(ValidateError::row_count_mismatch(name.clone(), source_count, target_count));
        }

        if let Some(probe) = sample_probe {
            sample_check(source_conn, target_conn, source_platform, target_platform, name, source_table, probe, &mut report)?;
        }
    }

    Ok(report)
}

fn query_row_count<C: Connection>(conn: &mut C, platform: Platform, table_name: &str) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", platform.quote_identifier(table_name));
    let rows = conn.query(&sql)?;
    Ok(rows
        .first()
        .and_then(|r| r.get(0))
        .and_then(|v| match v {
            Value::Int(i) => Some(*i as u64),
            _ => None,
        })
        .unwrap_or(0))
}

fn sample_check<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_platform: Platform,
    target_platform: Platform,
    table_name: &str,
    source_table: &Table,
    probe: SampleProbe,
    report: &mut PostValidationReport,
) -> Result<()> {
    let column_names: Vec<&str> = source_table.columns.keys().map(String::as_str).collect();
    if column_names.is_empty() {
        return Ok(());
    }

    let quoted_cols = column_names.iter().map(|c| source_platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
    let quoted_source_table = source_platform.quote_identifier(table_name);
    let sample_sql = format!("SELECT {quoted_cols} FROM {quoted_source_table} LIMIT {}", probe.sample_size);
    let rows = source_conn.query(&sample_sql)?;

    for row in rows {
        let values = row.into_values();
        let predicate = column_names
            .iter()
            .zip(values.iter())
            .map(|(col, value)| match value {
                Value::Null => format!("{} IS NULL", target_platform.quote_identifier(col)),
                other => format!("{} = {}", target_platform.quote_identifier(col), other.to_sql_literal()),
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        let sql = format!("SELECT 1 FROM {} WHERE {predicate} LIMIT 1", target_platform.quote_identifier(table_name));
        let target_rows = target_conn.query(&sql)?;
        if target_rows.is_empty() {
            report.warnings.push(format!("table '{table_name}': a sampled source row was not found in the target"));
        }
    }

    Ok(())
}
