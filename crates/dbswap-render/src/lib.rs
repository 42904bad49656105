//! Turns a transformed [`Table`] into an ordered list of DDL strings for one
//! dialect [`Platform`] (spec.md §4.F).
//!
//! Order is load-bearing: `CREATE TABLE` first (inline columns, inline
//! primary key, inline checks), then `CREATE INDEX`, then
//! `ALTER TABLE … ADD CONSTRAINT`, then post-transform action SQL. A
//! `PgEnumType` post-action is the one exception — it must run before the
//! `CREATE TABLE` that references the enum type, so it is hoisted ahead.

pub mod options;

use dbswap_dialect::{Dialect, Platform, TypeShape};
use dbswap_model::{Column, ColumnDefault, ConstraintKind, Index, LogicalType, PostActionType, PostTransformAction, Table, Value};

pub use options::RenderOptions;

pub fn render(table: &Table, platform: Platform, post_actions: &[PostTransformAction], options: &RenderOptions) -> Vec<String> {
    let mut statements = Vec::new();
    let quoted_table = platform.quote_identifier(&table.name);

    if options.include_drop_statements {
        statements.push(format!("DROP TABLE IF EXISTS {quoted_table}"));
    }

    if options.execute_post_transform_actions {
        for action in post_actions.iter().filter(|a| a.action_type == PostActionType::PgEnumType) {
            statements.push(action.sql.clone());
        }
    }

    statements.push(create_table_statement(table, platform));

    if options.include_indexes {
        statements.extend(create_index_statements(table, platform));
    }

    if options.include_constraints {
        statements.extend(add_constraint_statements(table, platform));
    }

    if options.execute_post_transform_actions {
        for action in post_actions.iter().filter(|a| a.action_type != PostActionType::PgEnumType) {
            statements.push(action.sql.clone());
        }
    }

    tracing::debug!(table = %table.name, dialect = %platform.dialect(), statements = statements.len(), "rendered table DDL");
    statements
}

fn is_sqlite_integer_pk_column(table: &Table, col: &Column, platform: Platform) -> bool {
    platform.dialect() == Dialect::Sqlite
        && col.auto_increment
        && table.primary_key_columns() == [col.name.as_str()]
}

fn create_table_statement(table: &Table, platform: Platform) -> String {
    let quoted_table = platform.quote_identifier(&table.name);
    let mut pieces: Vec<String> = table
        .columns
        .values()
        .map(|col| column_definition(table, col, platform))
        .collect();

    let pk_columns = table.primary_key_columns();
    let pk_is_inline_sqlite_rowid = pk_columns.len() == 1
        && table
            .column(pk_columns[0])
            .is_some_and(|c| is_sqlite_integer_pk_column(table, c, platform));
    if !pk_columns.is_empty() && !pk_is_inline_sqlite_rowid {
        let quoted_cols = pk_columns.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
        pieces.push(format!("PRIMARY KEY ({quoted_cols})"));
    }

    for constraint in table.constraints.values() {
        if let ConstraintKind::Check(predicate) = &constraint.kind {
            let quoted_name = platform.quote_identifier(&constraint.name);
            pieces.push(format!("CONSTRAINT {quoted_name} CHECK ({predicate})"));
        }
    }

    format!("CREATE TABLE {quoted_table} ({})", pieces.join(", "))
}

fn column_definition(table: &Table, col: &Column, platform: Platform) -> String {
    let quoted_name = platform.quote_identifier(&col.name);
    let ty = spell_column_type(col, platform);
    let inline_pk = is_sqlite_integer_pk_column(table, col, platform);

    let mut parts = vec![format!("{quoted_name} {ty}")];

    if inline_pk {
        parts.push("PRIMARY KEY".to_string());
        if col.auto_increment {
            parts.push("AUTOINCREMENT".to_string());
        }
    } else if !col.nullable {
        parts.push("NOT NULL".to_string());
    }

    if let Some(default) = &col.default {
        parts.push(format!("DEFAULT {}", render_default(default, platform)));
    }

    if col.auto_increment && platform.dialect() == Dialect::MySql {
        parts.push("AUTO_INCREMENT".to_string());
    }

    if platform.dialect() == Dialect::MySql {
        if let Some(comment) = &col.comment {
            parts.push(format!("COMMENT '{}'", comment.replace('\'', "''")));
        }
    }

    parts.join(" ")
}

fn spell_column_type(col: &Column, platform: Platform) -> String {
    if platform.dialect() == Dialect::PostgreSql && col.logical_type == LogicalType::Enum {
        if let Some(type_name) = col.option("pg_enum_type") {
            return platform.quote_identifier(type_name);
        }
    }

    let shape = TypeShape {
        length: col.length,
        precision: col.precision,
        scale: col.scale,
        unsigned: col.unsigned,
    };
    let logical_type = if col.auto_increment && platform.dialect() == Dialect::PostgreSql {
        match col.logical_type {
            LogicalType::SmallInt => LogicalType::SmallSerial,
            LogicalType::BigInt => LogicalType::BigSerial,
            _ => LogicalType::Serial,
        }
    } else {
        col.logical_type.clone()
    };
    platform.spell_type(&logical_type, shape)
}

fn render_default(default: &ColumnDefault, platform: Platform) -> String {
    match default {
        ColumnDefault::Null => "NULL".to_string(),
        ColumnDefault::Literal(Value::Bool(b)) if platform.capabilities().native_boolean => {
            if *b { "TRUE" } else { "FALSE" }.to_string()
        }
        ColumnDefault::Literal(Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
        ColumnDefault::Literal(v) => v.to_sql_literal(),
        ColumnDefault::Expr(e) => e.clone(),
    }
}

fn create_index_statements(table: &Table, platform: Platform) -> Vec<String> {
    table
        .indexes
        .values()
        .filter(|idx| !idx.is_primary())
        .map(|idx| create_index_statement(table, idx, platform))
        .collect()
}

fn create_index_statement(table: &Table, index: &Index, platform: Platform) -> String {
    let quoted_name = platform.quote_identifier(&index.name);
    let quoted_table = platform.quote_identifier(&table.name);
    let cols = index.columns.iter().map(|c| platform.quote_identifier(&c.name)).collect::<Vec<_>>().join(", ");
    let unique = if index.is_unique() { "UNIQUE " } else { "" };

    let using_clause = if platform.capabilities().per_index_methods {
        index.method.as_deref().map(|m| format!(" USING {m}")).unwrap_or_default()
    } else {
        String::new()
    };

    let where_clause = index.predicate.as_deref().map(|p| format!(" WHERE {p}")).unwrap_or_default();

    format!("CREATE {unique}INDEX {quoted_name} ON {quoted_table}{using_clause} ({cols}){where_clause}")
}

fn add_constraint_statements(table: &Table, platform: Platform) -> Vec<String> {
    let quoted_table = platform.quote_identifier(&table.name);
    table
        .constraints
        .values()
        .filter_map(|constraint| {
            let quoted_name = platform.quote_identifier(&constraint.name);
            match &constraint.kind {
                ConstraintKind::Foreign(fk) => {
                    let cols = constraint.columns.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
                    let ref_table = platform.quote_identifier(&fk.table);
                    let ref_cols = fk.columns.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
                    let mut sql = format!(
                        "ALTER TABLE {quoted_table} ADD CONSTRAINT {quoted_name} FOREIGN KEY ({cols}) REFERENCES {ref_table} ({ref_cols})"
                    );
                    if let Some(action) = fk.on_delete {
                        sql.push_str(&format!(" ON DELETE {}", action.as_sql()));
                    }
                    if let Some(action) = fk.on_update {
                        sql.push_str(&format!(" ON UPDATE {}", action.as_sql()));
                    }
                    Some(sql)
                }
                ConstraintKind::Unique => {
                    let cols = constraint.columns.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
                    Some(format!("ALTER TABLE {quoted_table} ADD CONSTRAINT {quoted_name} UNIQUE ({cols})"))
                }
                // Primary keys and checks are rendered inline in the CREATE TABLE statement.
                ConstraintKind::Primary | ConstraintKind::Check(_) => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbswap_model::{Column, Constraint, ForeignKeyRef, Index, IndexColumn, IndexKind, ReferentialAction};

    fn widgets() -> Table {
        let mut t = Table::new("widgets");
        t.add_column(Column::new("id", LogicalType::BigInt).not_null().auto_increment()).unwrap();
        t.add_column(Column::new("sku", LogicalType::VarChar).with_length(32).not_null()).unwrap();
        t.add_column(Column::new("active", LogicalType::Boolean).with_default(ColumnDefault::Literal(Value::Bool(true)))).unwrap();
        t.add_index(Index::new("pk_widgets", IndexKind::Primary, vec![IndexColumn::new("id")])).unwrap();
        t.add_index(Index::new("idx_widgets_sku", IndexKind::Unique, vec![IndexColumn::new("sku")])).unwrap();
        t
    }

    #[test]
    fn quotes_identifiers_per_platform() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("\"widgets\""));
        assert!(stmts[0].contains("\"sku\""));
    }

    #[test]
    fn mysql_boolean_default_renders_as_zero_or_one() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::MySql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("DEFAULT 1"));
    }

    #[test]
    fn postgres_boolean_default_renders_as_true() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("DEFAULT TRUE"));
    }

    #[test]
    fn sqlite_single_column_autoincrement_pk_is_inlined_on_the_column() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::Sqlite), &[], &RenderOptions::default());
        assert!(stmts[0].contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(!stmts[0].contains("PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn postgres_autoincrement_non_sqlite_column_becomes_serial() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("\"id\" BIGSERIAL"));
        assert!(stmts[0].contains("PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn non_primary_indexes_are_rendered_as_separate_statements() {
        let table = widgets();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        assert!(stmts.iter().any(|s| s.starts_with("CREATE UNIQUE INDEX \"idx_widgets_sku\"")));
    }

    #[test]
    fn foreign_key_constraints_render_as_alter_table_statements() {
        let mut table = widgets();
        table.add_column(Column::new("category_id", LogicalType::BigInt)).unwrap();
        let fk = ForeignKeyRef { on_delete: Some(ReferentialAction::Cascade), ..ForeignKeyRef::new("categories", vec!["id".to_string()]) };
        table
            .add_constraint(Constraint::foreign_key("fk_widgets_category", vec!["category_id".to_string()], fk))
            .unwrap();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        let fk_stmt = stmts.iter().find(|s| s.contains("FOREIGN KEY")).unwrap();
        assert!(fk_stmt.contains("ADD CONSTRAINT \"fk_widgets_category\""));
        assert!(fk_stmt.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn check_constraints_are_inlined_in_create_table() {
        let mut table = widgets();
        table.add_constraint(Constraint::check("ck_widgets_sku_len", "length(sku) > 0")).unwrap();
        let stmts = render(&table, Platform::new(Dialect::MySql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("CONSTRAINT `ck_widgets_sku_len` CHECK (length(sku) > 0)"));
    }

    #[test]
    fn pg_enum_type_post_action_is_hoisted_before_create_table() {
        let table = widgets();
        let actions = vec![PostTransformAction::new(
            PostActionType::PgEnumType,
            "CREATE TYPE widget_status AS ENUM ('a','b')",
            "native enum type",
            "widgets",
        )];
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &actions, &RenderOptions::default());
        assert!(stmts[0].starts_with("CREATE TYPE"));
        assert!(stmts[1].starts_with("CREATE TABLE"));
    }

    #[test]
    fn native_pg_enum_column_is_spelled_with_its_type_name() {
        let mut table = widgets();
        let mut status = Column::new("status", LogicalType::Enum);
        status.set_option("pg_enum_type", "widgets_status_enum");
        table.add_column(status).unwrap();
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &[], &RenderOptions::default());
        assert!(stmts[0].contains("\"status\" \"widgets_status_enum\""));
    }

    #[test]
    fn drop_statement_is_only_emitted_when_requested() {
        let table = widgets();
        let mut options = RenderOptions::default();
        options.include_drop_statements = true;
        let stmts = render(&table, Platform::new(Dialect::MySql), &[], &options);
        assert_eq!(stmts[0], "DROP TABLE IF EXISTS `widgets`");
    }

    #[test]
    fn post_transform_actions_are_appended_after_constraints_by_default() {
        let table = widgets();
        let actions = vec![PostTransformAction::new(PostActionType::PgGinIndex, "CREATE INDEX x USING GIN (y)", "d", "widgets")];
        let stmts = render(&table, Platform::new(Dialect::PostgreSql), &actions, &RenderOptions::default());
        assert_eq!(stmts.last().unwrap(), "CREATE INDEX x USING GIN (y)");
    }
}
