//! Splits a raw SQL dump into individual statements (spec.md §4.J,
//! "distinct core: restore path").
//!
//! A byte-level state machine tracks quoting (`'...'`, `"..."`, MySQL
//! backticks, PostgreSQL `$tag$...$tag$`), comments, MySQL's dynamic
//! `DELIMITER` command, and `BEGIN`/`END` nesting inside
//! `CREATE [OR REPLACE] (TRIGGER|FUNCTION|PROCEDURE)` bodies, so that none
//! of those contexts have their embedded delimiter characters mistaken for
//! a statement boundary. Leading comments and the trailing delimiter are
//! stripped from each recovered statement; empty and comment-only segments
//! are elided.

mod cast_safety;
mod classify;
mod comment;
mod delimiter_cmd;
mod dollar_quote;
mod error;
mod keyword;
mod options;
mod routine;
mod splitter;
mod state;
mod statement;

pub use classify::{classify, StatementKind};
pub use error::{ParseError, ParseErrorKind, Result};
pub use options::{SplitOptions, DEFAULT_MAX_STATEMENT_BYTES};
pub use splitter::{split, SplitOutcome};
pub use statement::Statement;
