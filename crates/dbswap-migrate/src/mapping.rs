//! Column-mapping resolution (spec.md §4.G).
//!
//! A mapping entry pointing at a target column that does not exist is an
//! error. A source column with no mapping entry defaults to its own name;
//! if that name isn't present on the target either, it is silently dropped
//! from the copy (the target's transform legitimately may not have kept it).

use indexmap::IndexMap;

use dbswap_model::Table;

use crate::error::{MigrateError, Result};

pub fn resolve_columns(source: &Table, target: &Table, mapping: &IndexMap<String, String>) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for src_col in source.columns.keys() {
        let dst_col = mapping.get(src_col).cloned().unwrap_or_else(|| src_col.clone());
        let mapped_explicitly = mapping.contains_key(src_col);
        if !target.columns.contains_key(&dst_col) {
            if mapped_explicitly {
                return Err(MigrateError::mapping(
                    &target.name,
                    format!("column_mapping entry '{src_col}' -> '{dst_col}' names a column absent from the target"),
                ));
            }
            continue;
        }
        pairs.push((src_col.clone(), dst_col));
    }
    Ok(pairs)
}
