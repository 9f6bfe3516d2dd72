pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    RenderOutcome, load_field_policy, load_tables, resolve_path, run_maps, run_render, run_table,
};

// Re-export pipeline types from taxigraph-core
pub use taxigraph_core::{FieldPolicy, RenderOptions, TableOptions};
