//! Rewrites a [`Table`] for a target dialect (spec.md §4.E — "the hard
//! part"). Never mutates its input: everything runs against a deep clone,
//! producing a transformed table, a queue of [`PostTransformAction`]s, and a
//! list of warning strings. Soft capability gaps become warnings; only a
//! genuinely unrepresentable construct raises [`TransformError`].

pub mod error;
pub mod fulltext;
pub mod options;
pub mod sqlite_names;

use dbswap_dialect::Dialect;
use dbswap_model::{
    Column, ColumnDefault, Constraint, ConstraintKind, Index, IndexKind, LogicalType,
    PostTransformAction, ReferentialAction, Table,
};
use indexmap::IndexMap;

pub use error::{Result, TransformError};
pub use options::{EnumConversion, FulltextStrategy, TransformOptions};

pub struct TransformOutput {
    pub table: Table,
    pub post_actions: Vec<PostTransformAction>,
    pub warnings: Vec<String>,
}

pub fn transform(table: &Table, src: Dialect, dst: Dialect, options: &TransformOptions) -> Result<TransformOutput> {
    let mut out = table.clone_with_name(table.name.clone());
    let mut warnings = Vec::new();
    let mut post_actions = Vec::new();

    if src == dst {
        tracing::debug!(table = %table.name, "source and target dialect match; returning a structural clone");
        return Ok(TransformOutput { table: out, post_actions, warnings });
    }

    tracing::debug!(table = %table.name, src = %src, dst = %dst, "transforming table");

    let mut synthesized_constraints = Vec::new();
    let mut trigger_actions = Vec::new();
    let mut enum_type_actions = Vec::new();
    let pk_is_composite = out.primary_key_columns().len() > 1;
    let column_names: Vec<String> = out.columns.keys().cloned().collect();
    for col_name in &column_names {
        let col = out.columns.get_mut(col_name).expect("column present");
        rewrite_column_type(col, &table.name, dst, pk_is_composite, options, &mut synthesized_constraints, &mut enum_type_actions, &mut warnings)?;
        rewrite_default(col, dst);
        rewrite_on_update(col, &table.name, dst, &mut trigger_actions);
    }
    for constraint in synthesized_constraints {
        out.constraints.insert(constraint.name.clone(), constraint);
    }
    post_actions.extend(enum_type_actions);
    post_actions.extend(trigger_actions);

    rewrite_constraints(&mut out, dst, &mut warnings);

    rewrite_indexes(&mut out, dst, options, &mut post_actions, &mut warnings);

    tracing::debug!(
        table = %table.name,
        warnings = warnings.len(),
        post_actions = post_actions.len(),
        "transform complete"
    );

    Ok(TransformOutput { table: out, post_actions, warnings })
}

// ---------------------------------------------------------------------
// Step 2: column type rewrite
// ---------------------------------------------------------------------

fn rewrite_column_type(
    col: &mut Column,
    table_name: &str,
    dst: Dialect,
    pk_is_composite: bool,
    options: &TransformOptions,
    synthesized_constraints: &mut Vec<Constraint>,
    enum_type_actions: &mut Vec<PostTransformAction>,
    warnings: &mut Vec<String>,
) -> Result<()> {
    match col.logical_type {
        LogicalType::Enum if dst != Dialect::MySql => {
            rewrite_enum(col, table_name, dst, options, synthesized_constraints, enum_type_actions);
        }
        LogicalType::Boolean => rewrite_boolean(col, table_name, dst, synthesized_constraints),
        LogicalType::Json | LogicalType::JsonB => rewrite_json(col, table_name, dst, synthesized_constraints),
        _ => {}
    }

    if col.unsigned && dst != Dialect::MySql {
        widen_unsigned(col, table_name, dst, synthesized_constraints, warnings);
    }

    if dst != Dialect::MySql && col.logical_type.is_mysql_text_ladder() {
        col.logical_type = LogicalType::Text;
    }

    if col.auto_increment && dst == Dialect::Sqlite {
        if pk_is_composite {
            warnings.push(format!(
                "error: table '{table_name}' column '{}' is auto-increment but the primary key is composite; SQLite has no composite-key rowid alias, so auto-increment is dropped",
                col.name
            ));
            col.auto_increment = false;
        } else {
            // SQLite's `INTEGER PRIMARY KEY` rowid aliasing requires the
            // type to be exactly `INTEGER`.
            col.logical_type = LogicalType::BigInt;
        }
    }

    Ok(())
}

fn rewrite_enum(
    col: &mut Column,
    table_name: &str,
    dst: Dialect,
    options: &TransformOptions,
    synthesized_constraints: &mut Vec<Constraint>,
    enum_type_actions: &mut Vec<PostTransformAction>,
) {
    match options.enum_conversion {
        EnumConversion::NativePgEnum if dst == Dialect::PostgreSql => {
            // Logical type tag stays `Enum`; the renderer looks at
            // `pg_enum_type` to spell the column with this type's name
            // instead of falling back to `TEXT`.
            let type_name = format!("{table_name}_{}_enum", col.name);
            col.set_option("pg_enum_type", type_name.clone());
            let values = col
                .enum_values
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(", ");
            enum_type_actions.push(PostTransformAction::new(
                dbswap_model::PostActionType::PgEnumType,
                format!("CREATE TYPE {type_name} AS ENUM ({values})"),
                format!("native enum type backing column '{}'", col.name),
                table_name.to_string(),
            ));
        }
        _ => {
            let max_len = col.enum_values.iter().map(String::len).max().unwrap_or(1).max(1) as u32;
            col.logical_type = LogicalType::VarChar;
            col.length = Some(max_len);
            let values = col
                .enum_values
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(",");
            synthesized_constraints.push(Constraint::check(
                format!("ck_{table_name}_{}_enum", col.name),
                format!("{} IN ({})", col.name, values),
            ));
        }
    }
}

fn rewrite_boolean(col: &mut Column, table_name: &str, dst: Dialect, synthesized_constraints: &mut Vec<Constraint>) {
    match dst {
        Dialect::MySql => col.logical_type = LogicalType::TinyInt,
        Dialect::PostgreSql => col.logical_type = LogicalType::Boolean,
        Dialect::Sqlite => {
            col.logical_type = LogicalType::Int;
            synthesized_constraints.push(Constraint::check(
                format!("ck_{table_name}_{}_bool", col.name),
                format!("{} IN (0,1)", col.name),
            ));
        }
    }
}

fn rewrite_json(col: &mut Column, table_name: &str, dst: Dialect, synthesized_constraints: &mut Vec<Constraint>) {
    match dst {
        Dialect::MySql => col.logical_type = LogicalType::Json,
        Dialect::PostgreSql => col.logical_type = LogicalType::JsonB,
        Dialect::Sqlite => {
            col.logical_type = LogicalType::Text;
            synthesized_constraints.push(Constraint::check(
                format!("ck_{table_name}_{}_json", col.name),
                format!("json_valid({})", col.name),
            ));
        }
    }
}

fn widen_unsigned(
    col: &mut Column,
    table_name: &str,
    dst: Dialect,
    synthesized_constraints: &mut Vec<Constraint>,
    warnings: &mut Vec<String>,
) {
    if !col.logical_type.is_integer() {
        return;
    }
    col.unsigned = false;
    if dst == Dialect::PostgreSql && matches!(col.logical_type, LogicalType::Int | LogicalType::MediumInt) {
        col.logical_type = LogicalType::BigInt;
    }
    synthesized_constraints.push(Constraint::check(
        format!("ck_{table_name}_{}_nonneg", col.name),
        format!("{} >= 0", col.name),
    ));
    warnings.push(format!(
        "column '{}' was unsigned on the source; widened and guarded with a >= 0 check on the target",
        col.name
    ));
}

// ---------------------------------------------------------------------
// Step 3: default value rewrite
// ---------------------------------------------------------------------

fn rewrite_default(col: &mut Column, dst: Dialect) {
    let Some(default) = col.default.clone() else { return };
    col.default = Some(match default {
        ColumnDefault::Expr(expr) if dst == Dialect::Sqlite && !is_sentinel_expr(&expr) => {
            if expr.starts_with('(') {
                ColumnDefault::Expr(expr)
            } else {
                ColumnDefault::Expr(format!("({expr})"))
            }
        }
        other => other,
    });
}

fn is_sentinel_expr(expr: &str) -> bool {
    matches!(expr, "CURRENT_TIMESTAMP" | "CURRENT_DATE" | "CURRENT_TIME")
}

// ---------------------------------------------------------------------
// Step 4: ON UPDATE CURRENT_TIMESTAMP
// ---------------------------------------------------------------------

fn rewrite_on_update(col: &mut Column, table_name: &str, dst: Dialect, trigger_actions: &mut Vec<PostTransformAction>) {
    if !col.has_on_update_current_timestamp() {
        return;
    }
    if dst == Dialect::MySql {
        return;
    }

    col.options.shift_remove("on_update");
    let column_name = col.name.clone();
    let trigger_name = format!("trg_{table_name}_{column_name}_touch");

    let sql = match dst {
        Dialect::PostgreSql => format!(
            "CREATE OR REPLACE FUNCTION {trigger_name}_fn() RETURNS trigger AS $$\n\
             BEGIN NEW.{column_name} = CURRENT_TIMESTAMP; RETURN NEW; END;\n$$ LANGUAGE plpgsql;\n\
             CREATE TRIGGER {trigger_name} BEFORE UPDATE ON {table_name} \
             FOR EACH ROW EXECUTE FUNCTION {trigger_name}_fn();"
        ),
        Dialect::Sqlite => format!(
            "CREATE TRIGGER {trigger_name} AFTER UPDATE ON {table_name} \
             WHEN NEW.{column_name} = OLD.{column_name} \
             BEGIN UPDATE {table_name} SET {column_name} = CURRENT_TIMESTAMP WHERE rowid = NEW.rowid; END;"
        ),
        Dialect::MySql => unreachable!("returned above"),
    };

    trigger_actions.push(PostTransformAction::new(
        dbswap_model::PostActionType::Trigger,
        sql,
        format!("row-touch trigger replacing ON UPDATE CURRENT_TIMESTAMP for '{column_name}'"),
        table_name.to_string(),
    ));
}

// ---------------------------------------------------------------------
// Step 5: constraint rewrite
// ---------------------------------------------------------------------

fn rewrite_constraints(table: &mut Table, dst: Dialect, warnings: &mut Vec<String>) {
    if dst != Dialect::Sqlite {
        return;
    }
    for constraint in table.constraints.values_mut() {
        if let ConstraintKind::Foreign(fk) = &mut constraint.kind {
            for action in [&mut fk.on_delete, &mut fk.on_update] {
                if *action == Some(ReferentialAction::SetDefault) {
                    *action = Some(ReferentialAction::NoAction);
                    warnings.push(format!(
                        "constraint '{}': SET DEFAULT is not supported on sqlite; downgraded to NO ACTION",
                        constraint.name
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------
// Step 6 + 7: index transformation and full-text strategy
// ---------------------------------------------------------------------

fn rewrite_indexes(
    table: &mut Table,
    dst: Dialect,
    options: &TransformOptions,
    post_actions: &mut Vec<PostTransformAction>,
    warnings: &mut Vec<String>,
) {
    let dst_caps = dbswap_dialect::Platform::new(dst).capabilities();
    let old_indexes: IndexMap<String, Index> = std::mem::take(&mut table.indexes);
    let mut new_indexes = IndexMap::new();
    let mut generated_columns = Vec::new();

    for (_, mut index) in old_indexes {
        if index.kind == IndexKind::FullText {
            if options.fulltext_strategy == FulltextStrategy::Remove {
                warnings.push(format!("fulltext index '{}' dropped per fulltext_strategy=remove", index.name));
                continue;
            }
            let outcome = fulltext::convert(table, &index, dst, options);
            post_actions.extend(outcome.post_actions);
            warnings.extend(outcome.warnings);
            if let Some((col_name, expr)) = outcome.generated_search_vector {
                generated_columns.push((col_name, expr));
            }
            continue;
        }

        if !dst_caps.per_index_methods {
            index.method = None;
        }
        if dst == Dialect::Sqlite {
            index.name = sqlite_names::sqlite_index_name(&table.name, &index.name);
        }
        new_indexes.insert(index.name.clone(), index);
    }

    table.indexes = new_indexes;

    for (col_name, _expr) in generated_columns {
        if !table.columns.contains_key(&col_name) {
            let mut col = Column::new(&col_name, LogicalType::Text);
            col.table = Some(table.name.clone());
            table.columns.insert(col_name, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbswap_model::{Column, Index, IndexColumn, IndexKind, LogicalType};

    fn table_with(col: Column) -> Table {
        let mut t = Table::new("widgets");
        t.add_column(col).unwrap();
        t
    }

    #[test]
    fn same_dialect_transform_is_a_structural_clone_with_no_actions() {
        let table = table_with(Column::new("id", LogicalType::BigInt));
        let out = transform(&table, Dialect::MySql, Dialect::MySql, &TransformOptions::default()).unwrap();
        assert_eq!(out.table.columns.len(), table.columns.len());
        assert!(out.post_actions.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn enum_becomes_varchar_with_check_constraint_by_default() {
        let col = Column::new("status", LogicalType::Enum).with_enum_values(vec!["a".into(), "bb".into()]);
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &TransformOptions::default()).unwrap();
        let status = out.table.column("status").unwrap();
        assert_eq!(status.logical_type, LogicalType::VarChar);
        assert!(out.table.constraints.values().any(|c| matches!(&c.kind, ConstraintKind::Check(p) if p.contains("IN ('a','bb')"))));
    }

    #[test]
    fn native_pg_enum_keeps_the_enum_tag_and_emits_a_create_type_action() {
        let col = Column::new("status", LogicalType::Enum).with_enum_values(vec!["a".into(), "b".into()]);
        let table = table_with(col);
        let mut options = TransformOptions::default();
        options.enum_conversion = EnumConversion::NativePgEnum;
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &options).unwrap();
        let status = out.table.column("status").unwrap();
        assert_eq!(status.logical_type, LogicalType::Enum);
        assert_eq!(status.option("pg_enum_type"), Some("widgets_status_enum"));
        assert!(out.post_actions.iter().any(|a| a.action_type == dbswap_model::PostActionType::PgEnumType
            && a.sql.contains("CREATE TYPE widgets_status_enum AS ENUM ('a', 'b')")));
    }

    #[test]
    fn boolean_round_trips_through_mysql_postgres_sqlite() {
        let col = Column::new("active", LogicalType::Boolean);
        let table = table_with(col);
        let pg = transform(&table, Dialect::MySql, Dialect::PostgreSql, &TransformOptions::default()).unwrap();
        assert_eq!(pg.table.column("active").unwrap().logical_type, LogicalType::Boolean);

        let sqlite = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        assert_eq!(sqlite.table.column("active").unwrap().logical_type, LogicalType::Int);
        assert!(sqlite.table.constraints.values().any(|c| c.name.ends_with("_bool")));
    }

    #[test]
    fn unsigned_int_targeting_postgres_is_widened_and_guarded() {
        let col = Column::new("amount", LogicalType::Int).unsigned();
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &TransformOptions::default()).unwrap();
        let amount = out.table.column("amount").unwrap();
        assert_eq!(amount.logical_type, LogicalType::BigInt);
        assert!(!amount.unsigned);
        assert!(out.warnings.iter().any(|w| w.contains("unsigned")));
        assert!(out.table.constraints.values().any(|c| c.name.ends_with("_nonneg")));
    }

    #[test]
    fn mysql_text_ladder_collapses_to_text_on_postgres() {
        let col = Column::new("body", LogicalType::MediumText);
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &TransformOptions::default()).unwrap();
        assert_eq!(out.table.column("body").unwrap().logical_type, LogicalType::Text);
    }

    #[test]
    fn sqlite_expression_default_gets_parenthesized() {
        let col = Column::new("score", LogicalType::Int).with_default(ColumnDefault::Expr("1 + 1".to_string()));
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        match out.table.column("score").unwrap().default.as_ref().unwrap() {
            ColumnDefault::Expr(e) => assert_eq!(e, "(1 + 1)"),
            other => panic!("expected Expr, got {other:?}"),
        }
    }

    #[test]
    fn sentinel_defaults_are_never_wrapped_in_parens() {
        let col = Column::new("created_at", LogicalType::Timestamp).with_default(ColumnDefault::current_timestamp());
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        match out.table.column("created_at").unwrap().default.as_ref().unwrap() {
            ColumnDefault::Expr(e) => assert_eq!(e, "CURRENT_TIMESTAMP"),
            other => panic!("expected Expr, got {other:?}"),
        }
    }

    #[test]
    fn single_column_auto_increment_becomes_sqlite_bigint() {
        let mut table = table_with(Column::new("id", LogicalType::Int).auto_increment());
        table.add_index(Index::new("pk_widgets", IndexKind::Primary, vec![IndexColumn::new("id")])).unwrap();
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        let id = out.table.column("id").unwrap();
        assert_eq!(id.logical_type, LogicalType::BigInt);
        assert!(id.auto_increment);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn composite_primary_key_drops_auto_increment_on_sqlite_with_a_warning() {
        let mut table = table_with(Column::new("id", LogicalType::Int).auto_increment());
        table.add_column(Column::new("tag", LogicalType::Text)).unwrap();
        table
            .add_index(Index::new(
                "pk_widgets",
                IndexKind::Primary,
                vec![IndexColumn::new("id"), IndexColumn::new("tag")],
            ))
            .unwrap();
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        let id = out.table.column("id").unwrap();
        assert!(!id.auto_increment);
        assert!(out.warnings.iter().any(|w| w.contains("composite")));
    }

    #[test]
    fn on_update_current_timestamp_drops_the_option_and_emits_a_trigger_on_sqlite() {
        let mut col = Column::new("updated_at", LogicalType::Timestamp);
        col.set_option("on_update", "CURRENT_TIMESTAMP");
        let table = table_with(col);
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        assert!(!out.table.column("updated_at").unwrap().has_on_update_current_timestamp());
        assert_eq!(out.post_actions.len(), 1);
        assert!(out.post_actions[0].sql.contains("AFTER UPDATE"));
    }

    #[test]
    fn set_default_fk_action_downgrades_to_no_action_on_sqlite() {
        use dbswap_model::ForeignKeyRef;
        let mut table = table_with(Column::new("id", LogicalType::BigInt));
        table.add_column(Column::new("parent_id", LogicalType::BigInt)).unwrap();
        let mut fk = ForeignKeyRef::new("parents", vec!["id".to_string()]);
        fk.on_delete = Some(ReferentialAction::SetDefault);
        table
            .add_constraint(Constraint::foreign_key("fk_widgets_parent", vec!["parent_id".to_string()], fk))
            .unwrap();

        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        let fk = out.table.constraints.get("fk_widgets_parent").unwrap();
        match &fk.kind {
            ConstraintKind::Foreign(f) => assert_eq!(f.on_delete, Some(ReferentialAction::NoAction)),
            _ => panic!("expected foreign key"),
        }
        assert!(out.warnings.iter().any(|w| w.contains("SET DEFAULT")));
    }

    #[test]
    fn index_names_are_rewritten_for_sqlite_targets() {
        let mut table = table_with(Column::new("id", LogicalType::BigInt));
        table.add_column(Column::new("email", LogicalType::VarChar)).unwrap();
        table
            .add_index(Index::new("idx_email", IndexKind::BTree, vec![IndexColumn::new("email")]))
            .unwrap();
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        assert!(out.table.indexes.contains_key("idx_widgets_email"));
    }

    #[test]
    fn single_column_fulltext_becomes_a_gin_index_on_postgres() {
        let mut table = table_with(Column::new("id", LogicalType::BigInt));
        table.add_column(Column::new("body", LogicalType::Text)).unwrap();
        table
            .add_index(Index::new("ft_body", IndexKind::FullText, vec![IndexColumn::new("body")]))
            .unwrap();
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &TransformOptions::default()).unwrap();
        assert!(!out.table.indexes.contains_key("ft_body"));
        assert_eq!(out.post_actions.len(), 1);
        assert!(out.post_actions[0].sql.contains("USING GIN"));
    }

    #[test]
    fn fulltext_strategy_remove_drops_the_index_with_a_warning_and_no_post_actions() {
        let mut table = table_with(Column::new("id", LogicalType::BigInt));
        table.add_column(Column::new("body", LogicalType::Text)).unwrap();
        table
            .add_index(Index::new("ft_body", IndexKind::FullText, vec![IndexColumn::new("body")]))
            .unwrap();
        let mut options = TransformOptions::default();
        options.fulltext_strategy = FulltextStrategy::Remove;
        let out = transform(&table, Dialect::MySql, Dialect::PostgreSql, &options).unwrap();
        assert!(out.post_actions.is_empty());
        assert!(out.warnings.iter().any(|w| w.contains("dropped")));
    }

    #[test]
    fn fulltext_to_sqlite_emits_table_populate_and_trigger_actions() {
        let mut table = table_with(Column::new("id", LogicalType::BigInt));
        table.add_index(Index::new("pk", IndexKind::Primary, vec![IndexColumn::new("id")])).unwrap();
        table.add_column(Column::new("body", LogicalType::Text)).unwrap();
        table
            .add_index(Index::new("ft_body", IndexKind::FullText, vec![IndexColumn::new("body")]))
            .unwrap();
        let out = transform(&table, Dialect::MySql, Dialect::Sqlite, &TransformOptions::default()).unwrap();
        assert_eq!(out.post_actions.len(), 3);
        assert!(out.post_actions[0].sql.contains("CREATE VIRTUAL TABLE"));
        assert!(out.post_actions[1].sql.to_ascii_uppercase().contains("INSERT INTO"));
        assert!(out.post_actions[2].sql.contains("CREATE TRIGGER"));
    }
}
