//! The central schema model: a table and everything attached to it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::constraint::Constraint;
use crate::error::{DuplicateNameError, ModelError, Result, UnknownColumnError};
use crate::index::Index;

/// A dialect-neutral table.
///
/// Columns, indexes and constraints are kept in [`IndexMap`]s so iteration
/// order matches insertion order — extraction order, which for most drivers
/// tracks the source system's own ordinal positions (spec.md §3, §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: IndexMap<String, Column>,
    pub indexes: IndexMap<String, Index>,
    pub constraints: IndexMap<String, Constraint>,
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub comment: Option<String>,
    pub options: IndexMap<String, String>,
    /// The source dialect's verbatim `CREATE TABLE` text, kept for
    /// diagnostics and for the splitter's round-trip tests — never
    /// consulted by the transformer or renderer (spec.md §9).
    pub original_ddl: Option<String>,
    pub row_count: Option<u64>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            indexes: IndexMap::new(),
            constraints: IndexMap::new(),
            engine: None,
            charset: None,
            collation: None,
            comment: None,
            options: IndexMap::new(),
            original_ddl: None,
            row_count: None,
        }
    }

    pub fn add_column(&mut self, mut column: Column) -> Result<()> {
        if self.columns.contains_key(&column.name) {
            return Err(ModelError::DuplicateName(DuplicateNameError {
                table: self.name.clone(),
                kind: "column",
                name: column.name,
            }));
        }
        column.table = Some(self.name.clone());
        self.columns.insert(column.name.clone(), column);
        Ok(())
    }

    pub fn add_index(&mut self, index: Index) -> Result<()> {
        if self.indexes.contains_key(&index.name) {
            return Err(ModelError::DuplicateName(DuplicateNameError {
                table: self.name.clone(),
                kind: "index",
                name: index.name,
            }));
        }
        if index.is_primary() && self.indexes.values().any(Index::is_primary) {
            return Err(ModelError::DuplicatePrimaryKey {
                table: self.name.clone(),
            });
        }
        for col in index.column_names() {
            if !self.columns.contains_key(col) {
                return Err(ModelError::UnknownColumn(UnknownColumnError {
                    table: self.name.clone(),
                    referent: format!("index '{}'", index.name),
                    column: col.to_string(),
                }));
            }
        }
        self.indexes.insert(index.name.clone(), index);
        Ok(())
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        if self.constraints.contains_key(&constraint.name) {
            return Err(ModelError::DuplicateName(DuplicateNameError {
                table: self.name.clone(),
                kind: "constraint",
                name: constraint.name,
            }));
        }
        if constraint.is_primary()
            && self.constraints.values().any(Constraint::is_primary)
        {
            return Err(ModelError::DuplicatePrimaryKey {
                table: self.name.clone(),
            });
        }
        for col in &constraint.columns {
            if !self.columns.contains_key(col) {
                return Err(ModelError::UnknownColumn(UnknownColumnError {
                    table: self.name.clone(),
                    referent: format!("constraint '{}'", constraint.name),
                    column: col.clone(),
                }));
            }
        }
        self.constraints.insert(constraint.name.clone(), constraint);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Case-insensitive column lookup, for dialects (MySQL on
    /// case-insensitive filesystems, SQLite) whose identifiers fold case.
    pub fn column_ci(&self, name: &str) -> Option<&Column> {
        self.columns
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Remove a column and every index/constraint that referenced it.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let removed = self.columns.shift_remove(name)?;
        self.indexes
            .retain(|_, idx| !idx.columns.iter().any(|c| c.name == name));
        self.constraints
            .retain(|_, c| !c.columns.iter().any(|col| col == name));
        Some(removed)
    }

    /// The ordered list of column names making up this table's primary key,
    /// drawn from either a primary index or a primary constraint — whichever
    /// is present (a table should never carry both, but extraction does not
    /// enforce that; the transformer treats the index as authoritative).
    pub fn primary_key_columns(&self) -> Vec<&str> {
        if let Some(idx) = self.indexes.values().find(|i| i.is_primary()) {
            return idx.column_names();
        }
        if let Some(c) = self.constraints.values().find(|c| c.is_primary()) {
            return c.columns.iter().map(String::as_str).collect();
        }
        Vec::new()
    }

    /// Deep-clone this table under a new name, rewiring every column's
    /// back-pointer and every foreign key that targets the old name.
    ///
    /// Used by the SQLite full-text conversion, which must rename a source
    /// table aside before replacing it with a view (spec.md §4.E.7), and is
    /// otherwise a plain structural copy.
    pub fn clone_with_name(&self, new_name: impl Into<String>) -> Self {
        let new_name = new_name.into();
        let mut columns = self.columns.clone();
        for col in columns.values_mut() {
            col.table = Some(new_name.clone());
        }
        let mut constraints = self.constraints.clone();
        for c in constraints.values_mut() {
            if let crate::constraint::ConstraintKind::Foreign(fk) = &mut c.kind {
                if fk.table == self.name {
                    fk.table = new_name.clone();
                }
            }
        }
        Table {
            name: new_name,
            columns,
            indexes: self.indexes.clone(),
            constraints,
            engine: self.engine.clone(),
            charset: self.charset.clone(),
            collation: self.collation.clone(),
            comment: self.comment.clone(),
            options: self.options.clone(),
            original_ddl: None,
            row_count: self.row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::index::{Index, IndexKind};
    use crate::types::LogicalType;

    fn users_table() -> Table {
        let mut t = Table::new("users");
        t.add_column(Column::new("id", LogicalType::BigInt).not_null().auto_increment())
            .unwrap();
        t.add_column(Column::new("email", LogicalType::VarChar).with_length(255))
            .unwrap();
        t.add_index(Index::new("pk_users", IndexKind::Primary, vec!["id".into()]))
            .unwrap();
        t
    }

    #[test]
    fn add_column_sets_the_back_pointer() {
        let t = users_table();
        assert_eq!(t.column("id").unwrap().owning_table(), Some("users"));
    }

    #[test]
    fn duplicate_column_name_is_rejected() {
        let mut t = users_table();
        let err = t.add_column(Column::new("id", LogicalType::Int)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName(_)));
    }

    #[test]
    fn index_on_unknown_column_is_rejected() {
        let mut t = users_table();
        let err = t
            .add_index(Index::new("ix_missing", IndexKind::BTree, vec!["nope".into()]))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownColumn(_)));
    }

    #[test]
    fn second_primary_index_is_rejected() {
        let mut t = users_table();
        let err = t
            .add_index(Index::new("pk_users_2", IndexKind::Primary, vec!["email".into()]))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicatePrimaryKey { .. }));
    }

    #[test]
    fn primary_key_columns_reads_from_the_primary_index() {
        let t = users_table();
        assert_eq!(t.primary_key_columns(), vec!["id"]);
    }

    #[test]
    fn remove_column_drops_referencing_indexes() {
        let mut t = users_table();
        t.add_index(Index::new("ix_email", IndexKind::Unique, vec!["email".into()]))
            .unwrap();
        t.remove_column("email");
        assert!(t.column("email").is_none());
        assert!(!t.indexes.contains_key("ix_email"));
    }

    #[test]
    fn clone_with_name_rewires_column_back_pointers() {
        let t = users_table();
        let clone = t.clone_with_name("users_old");
        assert_eq!(clone.name, "users_old");
        assert_eq!(clone.column("id").unwrap().owning_table(), Some("users_old"));
    }

    #[test]
    fn clone_with_name_rewires_self_referential_foreign_keys() {
        use crate::constraint::{Constraint, ForeignKeyRef};
        let mut categories = Table::new("categories");
        categories
            .add_column(Column::new("id", LogicalType::BigInt))
            .unwrap();
        categories
            .add_column(Column::new("parent_id", LogicalType::BigInt))
            .unwrap();
        categories
            .add_constraint(Constraint::foreign_key(
                "fk_categories_parent",
                vec!["parent_id".to_string()],
                ForeignKeyRef::new("categories", vec!["id".to_string()]),
            ))
            .unwrap();
        let renamed = categories.clone_with_name("categories_old");
        let fk = renamed.constraints.get("fk_categories_parent").unwrap();
        assert_eq!(fk.references_table(), Some("categories_old"));
    }

    #[test]
    fn clone_with_name_leaves_foreign_keys_to_other_tables_untouched() {
        use crate::constraint::{Constraint, ForeignKeyRef};
        let mut orders = Table::new("orders");
        orders
            .add_column(Column::new("user_id", LogicalType::BigInt))
            .unwrap();
        orders
            .add_constraint(Constraint::foreign_key(
                "fk_orders_user",
                vec!["user_id".to_string()],
                ForeignKeyRef::new("users", vec!["id".to_string()]),
            ))
            .unwrap();
        let renamed = orders.clone_with_name("orders_v2");
        let fk = renamed.constraints.get("fk_orders_user").unwrap();
        assert_eq!(fk.references_table(), Some("users"));
    }

    #[test]
    fn column_ci_matches_regardless_of_case() {
        let t = users_table();
        assert!(t.column_ci("EMAIL").is_some());
        assert!(t.column_ci("Id").is_some());
    }
}
