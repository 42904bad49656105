//! Per-column type incompatibility warnings (spec.md §4.H).
//!
//! This is advisory only — it never blocks a migration. The transformer
//! (`dbswap-transform`) already rewrites every logical type into something
//! the target dialect accepts; this table flags the types where that
//! rewrite is lossy enough that a human should know about it up front,
//! mirroring `sqlmodel-schema/src/expected.rs`'s `normalize_sql_type`
//! cross-dialect comparison idiom, but keyed on the closed `LogicalType`
//! tag set instead of raw type-name strings.

use dbswap_dialect::Dialect;
use dbswap_model::LogicalType;

/// Returns a human-readable warning if `logical_type` has no faithful
/// representation on `target`, or `None` if the type round-trips cleanly.
pub fn incompatibility(logical_type: &LogicalType, target: Dialect) -> Option<String> {
    match (logical_type, target) {
        (LogicalType::Enum, Dialect::MySql | Dialect::Sqlite) => Some(
            "enum values will be rewritten to a text column with a CHECK constraint; \
             the enum's own ordering is not preserved"
                .to_string(),
        ),
        (LogicalType::Set, _) => Some(
            "SET has no equivalent in the target dialect; values are rewritten to a \
             comma-joined text column with no membership enforcement"
                .to_string(),
        ),
        (LogicalType::Year, Dialect::PostgreSql | Dialect::Sqlite) => Some(
            "YEAR has no native equivalent; the column is rewritten to a small integer \
             with no 2-digit/4-digit range enforcement".to_string(),
        ),
        (LogicalType::Json | LogicalType::JsonB, Dialect::Sqlite) => Some(
            "SQLite has no native JSON type; the column is stored as text with \
             application-level validation only".to_string(),
        ),
        (LogicalType::Uuid, Dialect::MySql | Dialect::Sqlite) => Some(
            "UUID has no native column type; values are stored as a fixed-length \
             text column with no format enforcement".to_string(),
        ),
        (LogicalType::Serial | LogicalType::BigSerial | LogicalType::SmallSerial, Dialect::MySql | Dialect::Sqlite) => Some(
            "PostgreSQL serial types are rewritten to an auto-increment integer column; \
             the backing sequence itself does not carry over".to_string(),
        ),
        (LogicalType::Other(name), _) => Some(format!(
            "column type '{name}' is not in the known logical type set; it will be \
             carried over as-is and may not render correctly on the target"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_on_mysql_is_flagged() {
        assert!(incompatibility(&LogicalType::Enum, Dialect::MySql).is_some());
    }

    #[test]
    fn native_pg_enum_target_still_flags_by_default() {
        // The warning reflects the default rewrite strategy; `enum_conversion
        // = native_pg_enum` is a transform-time option this table doesn't
        // know about, so PostgreSQL enum columns are not flagged here at all.
        assert!(incompatibility(&LogicalType::Enum, Dialect::PostgreSql).is_none());
    }

    #[test]
    fn plain_int_is_never_flagged() {
        assert!(incompatibility(&LogicalType::Int, Dialect::MySql).is_none());
        assert!(incompatibility(&LogicalType::Int, Dialect::PostgreSql).is_none());
        assert!(incompatibility(&LogicalType::Int, Dialect::Sqlite).is_none());
    }

    #[test]
    fn unknown_other_type_is_flagged_on_every_target() {
        let ty = LogicalType::Other("geometry".to_string());
        assert!(incompatibility(&ty, Dialect::MySql).is_some());
        assert!(incompatibility(&ty, Dialect::PostgreSql).is_some());
        assert!(incompatibility(&ty, Dialect::Sqlite).is_some());
    }
}
