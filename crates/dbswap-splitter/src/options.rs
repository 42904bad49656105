//! Splitter tuning knobs.

/// 100 MiB, spec.md §4.J's default hard limit on a single accumulated
/// statement.
pub const DEFAULT_MAX_STATEMENT_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    pub max_statement_bytes: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self { max_statement_bytes: DEFAULT_MAX_STATEMENT_BYTES }
    }
}
