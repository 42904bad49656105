//! The subset of the options map (spec.md §6) that the data migrator reads.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Skip,
    Update,
    Error,
}

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub chunk_size: usize,
    pub handle_conflicts: ConflictPolicy,
    pub use_transaction: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            handle_conflicts: ConflictPolicy::Update,
            use_transaction: true,
        }
    }
}
