//! A single row of scalar values returned by a query.

use std::collections::HashMap;

use dbswap_model::Value;

/// A row returned from `Connection::query`, with both positional and
/// name-based access — the data migrator uses positional access for the
/// hot chunked-copy path and name-based access for validation probes.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<Value>,
    columns: HashMap<String, usize>,
}

impl Row {
    pub fn new(column_names: Vec<String>, values: Vec<Value>) -> Self {
        let columns = column_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();
        Self { values, columns }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns.get(name).and_then(|&i| self.values.get(i))
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_by_name_and_by_index_agree() {
        let row = Row::new(
            vec!["id".to_string(), "email".to_string()],
            vec![Value::Int(1), Value::Text("a@b.com".to_string())],
        );
        assert_eq!(row.get(0), row.get_by_name("id"));
        assert_eq!(row.get(1), row.get_by_name("email"));
        assert_eq!(row.get_by_name("missing"), None);
    }

    #[test]
    fn len_and_is_empty() {
        let empty = Row::new(vec![], vec![]);
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }
}
