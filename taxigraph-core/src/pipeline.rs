use crate::error::Result;
use crate::export::{ExportFormat, generate_export};
use crate::flatten::flatten;
use crate::graph::{GraphBuilder, GraphView};
use crate::normalize::FieldPolicy;
use crate::render::{RenderConfig, render_graph};
use crate::svg::to_svg;
use crate::table::TableRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Options for configuring a render run
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render only this map
    pub map: Option<i64>,
    /// One image per map instead of a single image of everything
    pub split_by_map: bool,
    pub waypoints: bool,
    pub direct_edges: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            map: None,
            split_by_map: true,
            waypoints: true,
            direct_edges: true,
        }
    }
}

/// Options for configuring a table export
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub policy: FieldPolicy,
    pub format: ExportFormat,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            policy: FieldPolicy::default(),
            format: ExportFormat::Lua,
        }
    }
}

/// Callback for reporting render progress
pub type RenderProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// One rendered image
#[derive(Debug, Clone)]
pub struct MapRender {
    pub map: Option<i64>,
    pub file_name: String,
    pub nodes: usize,
    pub svg: String,
}

pub fn map_file_name(map: Option<i64>) -> String {
    match map {
        Some(map) => format!("db_{}.svg", map),
        None => "db.svg".to_string(),
    }
}

/// Renders the requested maps. Maps without connected nodes produce no image.
pub fn execute_render(
    tables: &TableRegistry,
    options: &RenderOptions,
    progress_callback: Option<RenderProgressCallback>,
) -> Vec<MapRender> {
    let mut builder = GraphBuilder::new(tables);

    let maps: Vec<Option<i64>> = if let Some(map) = options.map {
        vec![Some(map)]
    } else if options.split_by_map {
        builder.maps().into_iter().map(Some).collect()
    } else {
        vec![None]
    };

    let config = RenderConfig {
        waypoints: options.waypoints,
        direct_edges: options.direct_edges,
        ..RenderConfig::default()
    };

    let mut renders = Vec::new();
    for (idx, map) in maps.iter().enumerate() {
        let file_name = map_file_name(*map);
        if let Some(ref callback) = progress_callback {
            callback(format!("Rendering {}/{}: {}", idx + 1, maps.len(), file_name));
        }

        let view = GraphView {
            map: *map,
            waypoints: options.waypoints,
            direct_edges: options.direct_edges,
        };
        let graph = builder.build(view);

        let Some(drawing) = render_graph(graph, &config) else {
            info!("Skipping {}: no connected nodes", file_name);
            continue;
        };

        renders.push(MapRender {
            map: *map,
            file_name,
            nodes: graph.nodes.len(),
            svg: to_svg(&drawing),
        });
    }

    let unknown = builder.unknown_maps();
    if !unknown.is_empty() {
        warn!("Maps rendered with an unverified orientation: {:?}", unknown);
    }

    renders
}

/// Flattens the tables and renders them in the requested format.
pub fn execute_table_export(tables: &TableRegistry, options: &TableOptions) -> Result<String> {
    let flattened = flatten(tables, &options.policy);
    info!(
        "Flattened {} tables ({} rows retained)",
        flattened.tables.len(),
        flattened.tables.iter().map(|t| t.row_count()).sum::<usize>()
    );
    Ok(generate_export(&flattened, options.format)?)
}
