//! Pre- and post-migration validation (spec.md §4.H).
//!
//! Pre-migration checks run before any schema work starts: dialect-pair
//! support, connectivity, reserved-word/size scans, and a target
//! CREATE-TABLE permission probe. Post-migration checks run after data
//! migration: schema structure, row counts, and an optional sample-data
//! existence probe. Structural problems (a missing table, a missing column,
//! a row-count mismatch) are errors; everything else is a warning the
//! caller can choose to surface or ignore.

pub mod error;
pub mod incompatibility;
pub mod pairs;
pub mod post;
pub mod pre;

pub use error::{ValidateError, ValidateErrorKind, Result};
pub use pairs::check_pair as validate_compatibility;
pub use post::{post_validate, PostValidationReport, SampleProbe};
pub use pre::{pre_validate, PreValidationReport, LARGE_TABLE_ROW_THRESHOLD};
