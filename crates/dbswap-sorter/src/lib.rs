//! Dependency-aware ordering of tables for DDL emission (spec.md §4.D).
//!
//! Edges run `child → parent`, one per distinct foreign-key relationship,
//! self-references excluded. `sort_for_create` orders so every referent
//! precedes its dependents (Kahn's algorithm, ties broken by ascending table
//! name for determinism); `sort_for_drop` is the exact reverse. Neither
//! mode mutates its input — this crate has no module analogous to the
//! teacher's diff engine to ground against, since ordering-by-dependency is
//! not something `sqlmodel` itself needs; the algorithm below is standard
//! Kahn's, written in the house style established by the other crates
//! (plain structs, `tracing` at phase boundaries, no hidden global state).

use std::collections::{BTreeSet, HashMap};

use dbswap_model::Table;
use indexmap::IndexMap;

/// The result of a dependency sort: the order itself, plus any cycle that
/// forced a best-effort fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortResult {
    pub order: Vec<String>,
    pub cycle_warning: Option<CycleWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleWarning {
    pub message: String,
    pub tables: Vec<String>,
}

/// The distinct `child → parent` edges implied by a table's foreign-key
/// constraints, self-references excluded.
fn parent_edges(name: &str, table: &Table) -> BTreeSet<String> {
    table
        .constraints
        .values()
        .filter_map(|c| c.references_table())
        .filter(|parent| *parent != name)
        .map(str::to_string)
        .collect()
}

/// Order tables for creation: every FK referent precedes its dependents.
pub fn sort_for_create(tables: &IndexMap<String, Table>) -> SortResult {
    let mut parents_of: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut children_of: HashMap<String, BTreeSet<String>> = HashMap::new();

    for (name, table) in tables {
        let parents = parent_edges(name, table);
        for parent in &parents {
            // A constraint may reference a table not present in this map
            // (extraction scope excluded it); such edges cannot be honored
            // and are dropped rather than blocking the whole sort.
            if tables.contains_key(parent) {
                children_of
                    .entry(parent.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }
        let known_parents: BTreeSet<String> =
            parents.into_iter().filter(|p| tables.contains_key(p)).collect();
        parents_of.insert(name.clone(), known_parents);
    }

    let mut in_degree: HashMap<String, usize> = parents_of
        .iter()
        .map(|(name, parents)| (name.clone(), parents.len()))
        .collect();

    let mut ready: BTreeSet<String> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(name, _)| name.clone())
        .collect();

    let mut order = Vec::with_capacity(tables.len());
    while let Some(name) = ready.iter().next().cloned() {
        ready.remove(&name);
        order.push(name.clone());
        if let Some(children) = children_of.get(&name) {
            for child in children {
                let deg = in_degree.get_mut(child).expect("child tracked in in_degree");
                *deg -= 1;
                if *deg == 0 {
                    ready.insert(child.clone());
                }
            }
        }
    }

    let cycle_warning = if order.len() < tables.len() {
        let remaining: Vec<String> = in_degree
            .iter()
            .filter(|(name, &deg)| deg > 0 && !order.contains(*name))
            .map(|(name, _)| name.clone())
            .collect();
        let mut remaining_sorted = remaining.clone();
        remaining_sorted.sort();
        tracing::warn!(
            tables = ?remaining_sorted,
            "dependency cycle detected; falling back to best-effort order"
        );
        order.extend(remaining_sorted.iter().cloned());
        Some(CycleWarning {
            message: format!(
                "dependency cycle among tables: {}",
                remaining_sorted.join(", ")
            ),
            tables: remaining_sorted,
        })
    } else {
        None
    };

    SortResult { order, cycle_warning }
}

/// Order tables for dropping: the exact reverse of the create order.
pub fn sort_for_drop(tables: &IndexMap<String, Table>) -> SortResult {
    let mut result = sort_for_create(tables);
    result.order.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbswap_model::{Column, Constraint, ForeignKeyRef, LogicalType};

    fn table(name: &str) -> Table {
        let mut t = Table::new(name);
        t.add_column(Column::new("id", LogicalType::BigInt)).unwrap();
        t
    }

    fn with_fk(mut t: Table, constraint_name: &str, column: &str, parent: &str) -> Table {
        t.add_column(Column::new(column, LogicalType::BigInt)).unwrap();
        t.add_constraint(Constraint::foreign_key(
            constraint_name,
            vec![column.to_string()],
            ForeignKeyRef::new(parent, vec!["id".to_string()]),
        ))
        .unwrap();
        t
    }

    #[test]
    fn users_orders_order_items_sorts_parents_first() {
        let mut tables = IndexMap::new();
        tables.insert("order_items".to_string(), with_fk(table("order_items"), "fk_oi_order", "order_id", "orders"));
        tables.insert("users".to_string(), table("users"));
        tables.insert("orders".to_string(), with_fk(table("orders"), "fk_orders_user", "user_id", "users"));

        let result = sort_for_create(&tables);
        assert_eq!(result.order, vec!["users", "orders", "order_items"]);
        assert!(result.cycle_warning.is_none());
    }

    #[test]
    fn sort_for_drop_is_the_exact_reverse() {
        let mut tables = IndexMap::new();
        tables.insert("orders".to_string(), with_fk(table("orders"), "fk_orders_user", "user_id", "users"));
        tables.insert("users".to_string(), table("users"));

        let create = sort_for_create(&tables);
        let drop = sort_for_drop(&tables);
        let mut expected = create.order.clone();
        expected.reverse();
        assert_eq!(drop.order, expected);
    }

    #[test]
    fn self_references_are_ignored_as_edges() {
        let mut tables = IndexMap::new();
        let t = with_fk(table("categories"), "fk_parent", "parent_id", "categories");
        tables.insert("categories".to_string(), t);

        let result = sort_for_create(&tables);
        assert_eq!(result.order, vec!["categories"]);
        assert!(result.cycle_warning.is_none());
    }

    #[test]
    fn independent_tables_are_ordered_by_name_ascending() {
        let mut tables = IndexMap::new();
        tables.insert("zebra".to_string(), table("zebra"));
        tables.insert("alpha".to_string(), table("alpha"));
        tables.insert("mid".to_string(), table("mid"));

        let result = sort_for_create(&tables);
        assert_eq!(result.order, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn a_cycle_is_reported_and_a_best_effort_order_is_still_produced() {
        let mut tables = IndexMap::new();
        tables.insert("a".to_string(), with_fk(table("a"), "fk_a_b", "b_id", "b"));
        tables.insert("b".to_string(), with_fk(table("b"), "fk_b_a", "a_id", "a"));

        let result = sort_for_create(&tables);
        assert_eq!(result.order.len(), 2);
        let warning = result.cycle_warning.expect("cycle should be detected");
        assert_eq!(warning.tables, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn a_foreign_key_to_a_table_outside_the_input_set_does_not_block_the_sort() {
        let mut tables = IndexMap::new();
        tables.insert(
            "orders".to_string(),
            with_fk(table("orders"), "fk_orders_user", "user_id", "users"),
        );

        let result = sort_for_create(&tables);
        assert_eq!(result.order, vec!["orders"]);
        assert!(result.cycle_warning.is_none());
    }
}
