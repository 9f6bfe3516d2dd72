pub mod error;
pub mod export;
pub mod flatten;
pub mod graph;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod svg;
pub mod table;
pub mod transform;

pub use error::{Result, TaxiError};
pub use graph::{GraphBuilder, GraphView};
pub use normalize::{Cell, FieldPolicy};
pub use pipeline::{
    MapRender, RenderOptions, RenderProgressCallback, TableOptions, execute_render,
    execute_table_export,
};
pub use table::{TableLoader, TableRegistry};
