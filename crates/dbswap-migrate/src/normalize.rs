//! Per-target-dialect value normalization (spec.md §4.G step 4).

use dbswap_dialect::Dialect;
use dbswap_model::Value;

/// Normalize one cell for insertion into the target dialect. Nulls and text
/// pass through unchanged; booleans are spelled the way each dialect's
/// native or emulated boolean column expects. The model's `Value` has no
/// non-scalar variant, so the "non-scalars coerced to string" rule from
/// spec.md §4.G is enforced upstream, at extraction — there is nothing left
/// for this step to coerce.
pub fn normalize(value: &Value, target: Dialect) -> Value {
    match (value, target) {
        (Value::Bool(b), Dialect::MySql | Dialect::Sqlite) => Value::Int(i64::from(*b)),
        (other, _) => other.clone(),
    }
}
