//! Pre-migration validation (spec.md §4.H).

use dbswap_connector::Connection;
use dbswap_dialect::{Dialect, Platform};
use dbswap_model::Table;
use indexmap::IndexMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{Result, ValidateError};
use crate::{incompatibility, pairs};

/// Row counts above this threshold are flagged as "very large" (spec.md
/// §4.H); large does not block migration, only adds a warning so an
/// operator can plan around chunk throughput.
pub const LARGE_TABLE_ROW_THRESHOLD: u64 = 1_000_000;

#[derive(Debug, Clone, Default)]
pub struct PreValidationReport {
    pub warnings: Vec<String>,
}

pub fn pre_validate<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    source_schema: &IndexMap<String, Table>,
) -> Result<PreValidationReport> {
    pairs::check_pair(source_dialect, target_dialect)?;

    probe_connectivity(source_conn, "source")?;
    probe_connectivity(target_conn, "target")?;

    let mut report = PreValidationReport::default();
    let source_platform = Platform::new(source_dialect);
    let target_platform = Platform::new(target_dialect);

    for table in source_schema.values() {
        scan_table(table, source_platform, target_dialect, &mut report);
    }

    probe_create_table_permission(target_conn, target_platform)?;

    Ok(report)
}

fn probe_connectivity<C: Connection>(conn: &mut C, label: &str) -> Result<()> {
    conn.query("SELECT 1")
        .map(|_| ())
        .map_err(|e| ValidateError::connection(format!("{label} connection probe failed: {e}")))
}

fn scan_table(table: &Table, source_platform: Platform, target_dialect: Dialect, report: &mut PreValidationReport) {
    let pk_cols = table.primary_key_columns();
    for column in table.columns.values() {
        if source_platform.is_reserved_word(&column.name) {
            report.warnings.push(format!(
                "table '{}': column '{}' is a reserved word in the source dialect",
                table.name, column.name
            ));
        }
        if let Some(message) = incompatibility::incompatibility(&column.logical_type, target_dialect) {
            report.warnings.push(format!("table '{}': column '{}': {message}", table.name, column.name));
        }
        if column.auto_increment && source_platform.dialect() == Dialect::Sqlite && pk_cols != [column.name.as_str()] {
            report.warnings.push(format!(
                "error: table '{}': column '{}' is auto-increment but is not the table's sole primary key column on SQLite",
                table.name, column.name
            ));
        }
    }

    match table.row_count {
        Some(0) => report.warnings.push(format!("table '{}' is empty", table.name)),
        Some(n) if n > LARGE_TABLE_ROW_THRESHOLD => {
            report.warnings.push(format!("table '{}' has {n} rows; data migration may take a while", table.name));
        }
        _ => {}
    }
}

fn probe_create_table_permission<C: Connection>(conn: &mut C, platform: Platform) -> Result<()> {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    let scratch_name = format!("__dbswap_probe_{}", suffix.to_lowercase());
    let quoted = platform.quote_identifier(&scratch_name);

    conn.exec(&format!("CREATE TABLE {quoted} (probe_col INTEGER)"))
        .map_err(|e| ValidateError::permission(format!("target lacks CREATE TABLE permission: {e}")))?;

    if let Err(e) = conn.exec(&format!("DROP TABLE {quoted}")) {
        tracing::warn!(table = %scratch_name, error = %e, "failed to drop scratch permission-probe table");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbswap_connector::{ConnectorError, DriverName, PreparedStatement, Row};
    use dbswap_model::{Column, LogicalType, Value};

    struct FakeStatement;
    impl PreparedStatement for FakeStatement {
        fn execute(&mut self, _params: &[Value]) -> dbswap_connector::Result<u64> {
            Ok(0)
        }
    }

    struct FakeConnection {
        fail_probe: bool,
        fail_create: bool,
        exec_log: Vec<String>,
    }

    impl Connection for FakeConnection {
        type Statement<'a> = FakeStatement;

        fn driver_name(&self) -> DriverName {
            DriverName::Sqlite
        }

        fn exec(&mut self, sql: &str) -> dbswap_connector::Result<u64> {
            self.exec_log.push(sql.to_string());
            if self.fail_create && sql.starts_with("CREATE TABLE") {
                return Err(ConnectorError::Statement { sql: sql.to_string(), message: "permission denied".into() });
            }
            Ok(0)
        }

        fn query(&mut self, _sql: &str) -> dbswap_connector::Result<Vec<Row>> {
            if self.fail_probe {
                return Err(ConnectorError::Connection { message: "refused".into() });
            }
            Ok(vec![Row::new(vec!["1".to_string()], vec![Value::Int(1)])])
        }

        fn prepare<'a>(&'a mut self, _sql: &str) -> dbswap_connector::Result<Self::Statement<'a>> {
            Ok(FakeStatement)
        }

        fn begin(&mut self) -> dbswap_connector::Result<()> {
            Ok(())
        }

        fn commit(&mut self) -> dbswap_connector::Result<()> {
            Ok(())
        }

        fn rollback(&mut self) -> dbswap_connector::Result<()> {
            Ok(())
        }
    }

    fn schema_with_one_table() -> IndexMap<String, Table> {
        let mut t = Table::new("widgets");
        t.add_column(Column::new("select", LogicalType::Int)).unwrap();
        t.row_count = Some(0);
        let mut schema = IndexMap::new();
        schema.insert("widgets".to_string(), t);
        schema
    }

    #[test]
    fn same_dialect_pair_is_rejected_before_any_connection_use() {
        let mut source = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let mut target = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let err = pre_validate(&mut source, &mut target, Dialect::MySql, Dialect::MySql, &schema_with_one_table()).unwrap_err();
        assert_eq!(err.kind, crate::error::ValidateErrorKind::UnsupportedPair);
        assert!(target.exec_log.is_empty());
    }

    #[test]
    fn unreachable_source_connection_is_a_connection_error() {
        let mut source = FakeConnection { fail_probe: true, fail_create: false, exec_log: vec![] };
        let mut target = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let err = pre_validate(&mut source, &mut target, Dialect::MySql, Dialect::PostgreSql, &schema_with_one_table()).unwrap_err();
        assert_eq!(err.kind, crate::error::ValidateErrorKind::Connection);
    }

    #[test]
    fn reserved_word_column_and_empty_table_produce_warnings() {
        let mut source = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let mut target = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let report = pre_validate(&mut source, &mut target, Dialect::MySql, Dialect::PostgreSql, &schema_with_one_table()).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("reserved word")));
        assert!(report.warnings.iter().any(|w| w.contains("is empty")));
    }

    #[test]
    fn sqlite_auto_increment_column_without_a_sole_matching_primary_key_is_flagged() {
        let mut source = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let mut target = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let mut t = Table::new("widgets");
        t.add_column(Column::new("id", LogicalType::BigInt).not_null().auto_increment()).unwrap();
        t.add_column(Column::new("tag", LogicalType::Text).not_null().auto_increment()).unwrap();
        t.add_index(dbswap_model::Index::new(
            "pk_widgets",
            dbswap_model::IndexKind::Primary,
            vec![dbswap_model::IndexColumn::new("id"), dbswap_model::IndexColumn::new("tag")],
        ))
        .unwrap();
        let mut schema = IndexMap::new();
        schema.insert("widgets".to_string(), t);

        let report = pre_validate(&mut source, &mut target, Dialect::Sqlite, Dialect::PostgreSql, &schema).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("is auto-increment but is not the table's sole primary key column")));
    }

    #[test]
    fn target_without_create_permission_is_a_permission_error() {
        let mut source = FakeConnection { fail_probe: false, fail_create: false, exec_log: vec![] };
        let mut target = FakeConnection { fail_probe: false, fail_create: true, exec_log: vec![] };
        let err = pre_validate(&mut source, &mut target, Dialect::MySql, Dialect::PostgreSql, &schema_with_one_table()).unwrap_err();
        assert_eq!(err.kind, crate::error::ValidateErrorKind::Permission);
    }
}
