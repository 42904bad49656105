//! The subset of the options map (spec.md §6) that the transformer reads.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulltextStrategy {
    Convert,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumConversion {
    TextWithCheck,
    NativePgEnum,
}

#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub fulltext_strategy: FulltextStrategy,
    pub enum_conversion: EnumConversion,
    pub postgresql_language: String,
    pub postgresql_weights: Vec<char>,
    pub sqlite_fts_version: String,
    pub postgresql_gin_index_suffix: String,
    pub sqlite_fts_table_suffix: String,
    pub generated_column_suffix: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            fulltext_strategy: FulltextStrategy::Convert,
            enum_conversion: EnumConversion::TextWithCheck,
            postgresql_language: "english".to_string(),
            postgresql_weights: vec!['A', 'B', 'C', 'D'],
            sqlite_fts_version: "fts5".to_string(),
            postgresql_gin_index_suffix: "_gin".to_string(),
            sqlite_fts_table_suffix: "_fts".to_string(),
            generated_column_suffix: "_search_vector".to_string(),
        }
    }
}
