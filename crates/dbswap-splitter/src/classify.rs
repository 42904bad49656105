//! Optional statement classification by leading keyword (spec.md §4.J).

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateIndex,
    Create,
    Alter,
    Drop,
    Set,
    Other,
}

fn leading_keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(CREATE\s+TABLE|CREATE\s+INDEX|CREATE|SELECT|INSERT|UPDATE|DELETE|ALTER|DROP|SET)")
            .expect("leading keyword pattern is a fixed, valid regex")
    })
}

pub fn classify(sql: &str) -> StatementKind {
    let Some(m) = leading_keyword_regex().captures(sql).and_then(|c| c.get(1)) else {
        return StatementKind::Other;
    };
    let normalized: String = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
    match normalized.as_str() {
        "CREATE TABLE" => StatementKind::CreateTable,
        "CREATE INDEX" => StatementKind::CreateIndex,
        "CREATE" => StatementKind::Create,
        "SELECT" => StatementKind::Select,
        "INSERT" => StatementKind::Insert,
        "UPDATE" => StatementKind::Update,
        "DELETE" => StatementKind::Delete,
        "ALTER" => StatementKind::Alter,
        "DROP" => StatementKind::Drop,
        "SET" => StatementKind::Set,
        _ => StatementKind::Other,
    }
}
