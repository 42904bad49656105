//! Dialect-neutral schema model.
//!
//! This crate defines the in-memory representation every other `dbswap`
//! crate reads and writes: [`Table`], its [`Column`]s, [`Index`]es and
//! [`Constraint`]s, the closed [`LogicalType`] tag set, and the [`Value`] /
//! [`ColumnDefault`] sum types used for defaults and row data. Nothing in
//! this crate talks to a database or renders SQL — see `dbswap-extractor`,
//! `dbswap-transform` and `dbswap-render` for those.

pub mod column;
pub mod constraint;
pub mod error;
pub mod index;
pub mod post_action;
pub mod table;
pub mod types;
pub mod value;

pub use column::{Column, GeneratedColumn, GeneratedStorage};
pub use constraint::{Constraint, ConstraintKind, ForeignKeyRef, ReferentialAction};
pub use error::{ModelError, Result};
pub use index::{Index, IndexColumn, IndexKind, SortDirection};
pub use post_action::{PostActionType, PostTransformAction};
pub use table::Table;
pub use types::LogicalType;
pub use value::{ColumnDefault, Value};
