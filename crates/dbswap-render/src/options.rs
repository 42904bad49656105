//! The subset of the options map (spec.md §6) that the renderer reads.

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub include_indexes: bool,
    pub include_constraints: bool,
    pub include_drop_statements: bool,
    pub execute_post_transform_actions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_indexes: true,
            include_constraints: true,
            include_drop_statements: false,
            execute_post_transform_actions: true,
        }
    }
}
