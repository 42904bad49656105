//! Dialect-specific conflict clauses for the chunked INSERT template
//! (spec.md §4.G step 2).

use dbswap_dialect::{Dialect, Platform};

use crate::options::ConflictPolicy;

/// The INSERT template, plus whether conflict handling actually made it
/// into the clause (it is silently disabled, with a caller-issued warning,
/// when no primary key is known).
pub struct InsertTemplate {
    pub sql: String,
    pub conflict_handling_disabled: bool,
}

pub fn build_insert(
    platform: Platform,
    table_name: &str,
    insert_cols: &[String],
    pk_cols: &[String],
    conflict: ConflictPolicy,
) -> InsertTemplate {
    let quoted_table = platform.quote_identifier(table_name);
    let quoted_cols: Vec<String> = insert_cols.iter().map(|c| platform.quote_identifier(c)).collect();
    let placeholders = placeholder_list(platform, insert_cols.len());
    let base = format!("INSERT {ignore}INTO {quoted_table}({cols}) VALUES ({ph})",
        ignore = if matches!(platform.dialect(), Dialect::MySql) && conflict == ConflictPolicy::Skip { "IGNORE " } else { "" },
        cols = quoted_cols.join(", "),
        ph = placeholders,
    );

    if conflict == ConflictPolicy::Skip && platform.dialect() == Dialect::MySql {
        return InsertTemplate { sql: base, conflict_handling_disabled: false };
    }

    let non_pk_cols: Vec<&String> = insert_cols.iter().filter(|c| !pk_cols.contains(c)).collect();

    match (platform.dialect(), conflict) {
        (Dialect::MySql, ConflictPolicy::Update) => {
            let assignments = non_pk_cols.iter().map(|c| {
                let q = platform.quote_identifier(c);
                format!("{q}=VALUES({q})")
            }).collect::<Vec<_>>().join(", ");
            InsertTemplate { sql: format!("{base} ON DUPLICATE KEY UPDATE {assignments}"), conflict_handling_disabled: assignments.is_empty() }
        }
        (Dialect::MySql, ConflictPolicy::Error) => InsertTemplate { sql: base, conflict_handling_disabled: false },
        (Dialect::PostgreSql | Dialect::Sqlite, ConflictPolicy::Skip | ConflictPolicy::Update) => {
            if pk_cols.is_empty() {
                return InsertTemplate { sql: base, conflict_handling_disabled: true };
            }
            let quoted_pk = pk_cols.iter().map(|c| platform.quote_identifier(c)).collect::<Vec<_>>().join(", ");
            if conflict == ConflictPolicy::Skip {
                InsertTemplate { sql: format!("{base} ON CONFLICT ({quoted_pk}) DO NOTHING"), conflict_handling_disabled: false }
            } else {
                let assignments = non_pk_cols.iter().map(|c| {
                    let q = platform.quote_identifier(c);
                    format!("{q}=EXCLUDED.{q}")
                }).collect::<Vec<_>>().join(", ");
                if assignments.is_empty() {
                    InsertTemplate { sql: format!("{base} ON CONFLICT ({quoted_pk}) DO NOTHING"), conflict_handling_disabled: false }
                } else {
                    InsertTemplate { sql: format!("{base} ON CONFLICT ({quoted_pk}) DO UPDATE SET {assignments}"), conflict_handling_disabled: false }
                }
            }
        }
        (Dialect::PostgreSql | Dialect::Sqlite, ConflictPolicy::Error) => InsertTemplate { sql: base, conflict_handling_disabled: false },
    }
}

fn placeholder_list(platform: Platform, count: usize) -> String {
    match platform.dialect() {
        Dialect::PostgreSql => (1..=count).map(|i| format!("${i}")).collect::<Vec<_>>().join(", "),
        Dialect::MySql | Dialect::Sqlite => vec!["?"; count].join(", "),
    }
}
