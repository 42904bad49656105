//! Table-level constraints: primary/unique/foreign key/check.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    pub const fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKeyRef {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            on_delete: None,
            on_update: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    Primary,
    Unique,
    Foreign(ForeignKeyRef),
    Check(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
}

impl Constraint {
    pub fn primary(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Primary,
            columns,
        }
    }

    pub fn unique(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Unique,
            columns,
        }
    }

    pub fn foreign_key(name: impl Into<String>, columns: Vec<String>, reference: ForeignKeyRef) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Foreign(reference),
            columns,
        }
    }

    pub fn check(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Check(expression.into()),
            columns: Vec::new(),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.kind, ConstraintKind::Primary)
    }

    /// The table this constraint's foreign key points at, if it is one.
    pub fn references_table(&self) -> Option<&str> {
        match &self.kind {
            ConstraintKind::Foreign(fk) => Some(fk.table.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referential_action_sql_spellings() {
        assert_eq!(ReferentialAction::Cascade.as_sql(), "CASCADE");
        assert_eq!(ReferentialAction::SetNull.as_sql(), "SET NULL");
        assert_eq!(ReferentialAction::NoAction.as_sql(), "NO ACTION");
    }

    #[test]
    fn foreign_key_constraint_reports_referenced_table() {
        let fk = ForeignKeyRef::new("orders", vec!["order_id".to_string()]);
        let c = Constraint::foreign_key("fk_item_order", vec!["order_id".to_string()], fk);
        assert_eq!(c.references_table(), Some("orders"));
        assert!(!c.is_primary());
    }

    #[test]
    fn non_foreign_constraints_have_no_referenced_table() {
        assert_eq!(Constraint::unique("uq_email", vec!["email".into()]).references_table(), None);
        assert_eq!(Constraint::check("chk_positive", "qty > 0").references_table(), None);
    }

    #[test]
    fn primary_constraint_is_flagged() {
        let c = Constraint::primary("pk_users", vec!["id".into()]);
        assert!(c.is_primary());
    }
}
