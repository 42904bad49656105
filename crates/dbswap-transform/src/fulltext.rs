//! Full-text index conversion (spec.md §4.E.7).
//!
//! A MySQL `FULLTEXT` index has no direct equivalent on PostgreSQL or
//! SQLite. `convert` replaces it with the idiomatic mechanism on each
//! target, expressed entirely as [`PostTransformAction`]s so the main
//! `CREATE TABLE` stays representable on its own.

use dbswap_dialect::Dialect;
use dbswap_model::{Index, PostActionType, PostTransformAction, Table};

use crate::options::TransformOptions;

pub struct FulltextOutcome {
    pub post_actions: Vec<PostTransformAction>,
    pub warnings: Vec<String>,
    /// Generated columns the renderer needs to know about (PostgreSQL
    /// multi-column case), to be added to the transformed table's schema.
    pub generated_search_vector: Option<(String, String)>,
}

pub fn convert(table: &Table, index: &Index, dst: Dialect, options: &TransformOptions) -> FulltextOutcome {
    match dst {
        Dialect::PostgreSql => convert_postgresql(table, index, options),
        Dialect::Sqlite => convert_sqlite(table, index, options),
        Dialect::MySql => FulltextOutcome {
            post_actions: Vec::new(),
            warnings: vec![format!(
                "fulltext index '{}' retargeted to mysql unexpectedly; left untouched",
                index.name
            )],
            generated_search_vector: None,
        },
    }
}

fn convert_postgresql(table: &Table, index: &Index, options: &TransformOptions) -> FulltextOutcome {
    let lang = &options.postgresql_language;
    let mut warnings = Vec::new();

    if index.columns.len() == 1 {
        let col = &index.columns[0].name;
        let gin_name = format!("{}{}", index.name, options.postgresql_gin_index_suffix);
        let sql = format!(
            "CREATE INDEX {} ON {} USING GIN (to_tsvector('{}', {}))",
            gin_name, table.name, lang, col
        );
        return FulltextOutcome {
            post_actions: vec![PostTransformAction::new(
                PostActionType::PgGinIndex,
                sql,
                format!("fulltext index '{}' converted to a single-column GIN index", index.name),
                table.name.clone(),
            )],
            warnings,
            generated_search_vector: None,
        };
    }

    let weights = &options.postgresql_weights;
    if index.columns.len() > weights.len() {
        warnings.push(format!(
            "fulltext index '{}' has more columns ({}) than configured weights ({}); trailing columns share the last weight",
            index.name,
            index.columns.len(),
            weights.len()
        ));
    }

    let vector_col = format!("{}{}", table.name, options.generated_column_suffix);
    let expression = index
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let weight = weights.get(i).or_else(|| weights.last()).copied().unwrap_or('D');
            format!(
                "setweight(to_tsvector('{}', coalesce({}, '')), '{}')",
                lang, col.name, weight
            )
        })
        .collect::<Vec<_>>()
        .join(" || ");

    let gin_name = format!("{}{}", index.name, options.postgresql_gin_index_suffix);
    let gin_sql = format!("CREATE INDEX {} ON {} USING GIN ({})", gin_name, table.name, vector_col);

    FulltextOutcome {
        post_actions: vec![
            PostTransformAction::new(
                PostActionType::PgGeneratedColumn,
                format!(
                    "ALTER TABLE {} ADD COLUMN {} tsvector GENERATED ALWAYS AS ({}) STORED",
                    table.name, vector_col, expression
                ),
                format!("fulltext index '{}' backed by generated tsvector column '{}'", index.name, vector_col),
                table.name.clone(),
            ),
            PostTransformAction::new(PostActionType::PgGinIndex, gin_sql, format!("GIN index over '{vector_col}'"), table.name.clone()),
        ],
        warnings,
        generated_search_vector: Some((vector_col, expression)),
    }
}

fn convert_sqlite(table: &Table, index: &Index, options: &TransformOptions) -> FulltextOutcome {
    let fts_table = format!("{}{}", table.name, options.sqlite_fts_table_suffix);
    let cols: Vec<&str> = index.columns.iter().map(|c| c.name.as_str()).collect();
    let pk = table.primary_key_columns();
    let pk_col = pk.first().copied().unwrap_or("rowid");

    let create_sql = format!(
        "CREATE VIRTUAL TABLE {} USING {}({}, content='{}', content_rowid='{}')",
        fts_table,
        options.sqlite_fts_version,
        cols.join(", "),
        table.name,
        pk_col
    );
    let populate_sql = format!(
        "INSERT INTO {}(rowid, {}) SELECT {}, {} FROM {}",
        fts_table,
        cols.join(", "),
        pk_col,
        cols.join(", "),
        table.name
    );

    let col_assignments_new = cols.iter().map(|c| format!("new.{c}")).collect::<Vec<_>>().join(", ");
    let col_assignments_old = cols.iter().map(|c| format!("old.{c}")).collect::<Vec<_>>().join(", ");
    let triggers_sql = format!(
        "CREATE TRIGGER trg_{table}_ai AFTER INSERT ON {table} BEGIN\n  \
         INSERT INTO {fts}(rowid, {cols}) VALUES (new.{pk}, {new_cols});\nEND;\n\
         CREATE TRIGGER trg_{table}_ad AFTER DELETE ON {table} BEGIN\n  \
         INSERT INTO {fts}({fts}, rowid, {cols}) VALUES ('delete', old.{pk}, {old_cols});\nEND;\n\
         CREATE TRIGGER trg_{table}_au AFTER UPDATE ON {table} BEGIN\n  \
         INSERT INTO {fts}({fts}, rowid, {cols}) VALUES ('delete', old.{pk}, {old_cols});\n  \
         INSERT INTO {fts}(rowid, {cols}) VALUES (new.{pk}, {new_cols});\nEND;",
        table = table.name,
        fts = fts_table,
        cols = cols.join(", "),
        pk = pk_col,
        new_cols = col_assignments_new,
        old_cols = col_assignments_old,
    );

    let mut warnings = Vec::new();
    if pk.is_empty() {
        warnings.push(format!(
            "table '{}' has no primary key; fulltext sync triggers for '{}' use rowid instead",
            table.name, index.name
        ));
    }

    FulltextOutcome {
        post_actions: vec![
            PostTransformAction::new(
                PostActionType::SqliteFtsTable,
                create_sql,
                format!("fulltext index '{}' converted to an FTS shadow table '{}'", index.name, fts_table),
                table.name.clone(),
            ),
            PostTransformAction::new(
                PostActionType::SqliteFtsPopulate,
                populate_sql,
                format!("initial population of '{fts_table}'"),
                table.name.clone(),
            ),
            PostTransformAction::new(
                PostActionType::SqliteFtsTriggers,
                triggers_sql,
                format!("sync triggers keeping '{fts_table}' up to date"),
                table.name.clone(),
            ),
        ],
        warnings,
        generated_search_vector: None,
    }
}
