//! Follow-up statements a transform produces alongside a transformed table.
//!
//! Some rewrites cannot be expressed purely as a change to the table's own
//! DDL — a MySQL `FULLTEXT` index converted for Postgres needs a `GIN` index
//! built from a generated tsvector column; the same index converted for
//! SQLite needs a companion FTS5 virtual table kept in sync by triggers.
//! These are carried as [`PostTransformAction`]s alongside the transformed
//! [`crate::Table`] rather than folded into it (spec.md §4.E.7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostActionType {
    PgGinIndex,
    PgGeneratedColumn,
    SqliteFtsTable,
    SqliteFtsPopulate,
    SqliteFtsTriggers,
    /// `CREATE TYPE ... AS ENUM (...)`, emitted only when `enum_conversion =
    /// native_pg_enum` targets PostgreSQL. Not in the core five-member tag
    /// set spec.md §3 names for this record, but spec.md §4.E.2 requires it
    /// for that conversion mode — see DESIGN.md's open-question log.
    PgEnumType,
    /// A trigger standing in for MySQL's `ON UPDATE CURRENT_TIMESTAMP`
    /// column option on a dialect that has no column-level equivalent
    /// (spec.md §4.E.4). Same rationale as `PgEnumType`: the core tag set
    /// only names fulltext/enum follow-ups, but this step needs its own.
    Trigger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTransformAction {
    pub action_type: PostActionType,
    pub sql: String,
    pub description: String,
    pub target_table: String,
}

impl PostTransformAction {
    pub fn new(
        action_type: PostActionType,
        sql: impl Into<String>,
        description: impl Into<String>,
        target_table: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            sql: sql.into(),
            description: description.into(),
            target_table: target_table.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_target_table_and_statement_together() {
        let action = PostTransformAction::new(
            PostActionType::SqliteFtsTable,
            "CREATE VIRTUAL TABLE articles_fts USING fts5(body)",
            "full-text index 'ft_articles_body' converted to an FTS5 shadow table",
            "articles",
        );
        assert_eq!(action.target_table, "articles");
        assert_eq!(action.action_type, PostActionType::SqliteFtsTable);
    }
}
