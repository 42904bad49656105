//! The full per-run options map (spec.md §6), composed from each phase
//! crate's own narrow options struct rather than re-declaring their fields.

use indexmap::IndexMap;

use dbswap_migrate::MigrateOptions;
use dbswap_render::RenderOptions;
use dbswap_transform::TransformOptions;

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub include_data: bool,
    pub validate_before_migration: bool,
    pub validate_after_migration: bool,
    pub create_rollback_point: bool,
    pub stop_on_error: bool,
    pub exclude_tables: Vec<String>,
    pub include_tables: Vec<String>,
    /// Per-table `source column -> target column` overrides, keyed by
    /// source table name.
    pub column_mapping: IndexMap<String, IndexMap<String, String>>,
    /// Row count sampled per table during post-migration validation's
    /// optional existence probe; `None` skips the probe entirely.
    pub sample_probe_size: Option<usize>,
    pub transform: TransformOptions,
    pub render: RenderOptions,
    pub migrate: MigrateOptions,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            include_data: true,
            validate_before_migration: true,
            validate_after_migration: true,
            create_rollback_point: true,
            stop_on_error: true,
            exclude_tables: Vec::new(),
            include_tables: Vec::new(),
            column_mapping: IndexMap::new(),
            sample_probe_size: None,
            transform: TransformOptions::default(),
            render: RenderOptions::default(),
            migrate: MigrateOptions::default(),
        }
    }
}

impl OrchestratorOptions {
    pub fn column_mapping_for(&self, table: &str) -> IndexMap<String, String> {
        self.column_mapping.get(table).cloned().unwrap_or_default()
    }

    /// Whether a table survives `include_tables`/`exclude_tables` filtering.
    /// An empty `include_tables` means "no allow-list restriction".
    pub fn table_is_selected(&self, table: &str) -> bool {
        if self.exclude_tables.iter().any(|t| t == table) {
            return false;
        }
        self.include_tables.is_empty() || self.include_tables.iter().any(|t| t == table)
    }
}
