//! Index metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Unique,
    BTree,
    Hash,
    FullText,
    Spatial,
    Gin,
    Gist,
}

impl IndexKind {
    /// Index kinds that SQLite cannot represent verbatim and that the
    /// transformer must rewrite away (spec.md §3 Index invariants).
    pub const fn unsupported_on_sqlite(self) -> bool {
        matches!(
            self,
            IndexKind::FullText | IndexKind::Gin | IndexKind::Gist | IndexKind::Spatial
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub prefix_length: Option<u32>,
    pub direction: Option<SortDirection>,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix_length: None,
            direction: None,
        }
    }
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> Self {
        IndexColumn::new(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub kind: IndexKind,
    pub columns: Vec<IndexColumn>,
    pub method: Option<String>,
    pub predicate: Option<String>,
}

impl Index {
    pub fn new(name: impl Into<String>, kind: IndexKind, columns: Vec<IndexColumn>) -> Self {
        Self {
            name: name.into(),
            kind,
            columns,
            method: None,
            predicate: None,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.kind, IndexKind::Primary | IndexKind::Unique)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulltext_gin_gist_spatial_are_unsupported_on_sqlite() {
        assert!(IndexKind::FullText.unsupported_on_sqlite());
        assert!(IndexKind::Gin.unsupported_on_sqlite());
        assert!(IndexKind::Gist.unsupported_on_sqlite());
        assert!(IndexKind::Spatial.unsupported_on_sqlite());
        assert!(!IndexKind::BTree.unsupported_on_sqlite());
        assert!(!IndexKind::Primary.unsupported_on_sqlite());
    }

    #[test]
    fn primary_and_unique_are_both_unique() {
        let pk = Index::new("pk", IndexKind::Primary, vec!["id".into()]);
        let uq = Index::new("uq", IndexKind::Unique, vec!["email".into()]);
        let bt = Index::new("ix", IndexKind::BTree, vec!["name".into()]);
        assert!(pk.is_unique());
        assert!(uq.is_unique());
        assert!(!bt.is_unique());
    }

    #[test]
    fn column_names_preserves_order() {
        let idx = Index::new(
            "ix_multi",
            IndexKind::BTree,
            vec!["b".into(), "a".into(), "c".into()],
        );
        assert_eq!(idx.column_names(), vec!["b", "a", "c"]);
    }
}
