// Output sinks for the flattened tables and rendered maps

use crate::flatten::Flattened;
use crate::normalize::Cell;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Lua,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lua" => Some(ExportFormat::Lua),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Lua => "lua",
            ExportFormat::Json => "json",
        }
    }
}

/// Renders the addon data file.
///
/// The file receives the addon namespace as its second vararg. Each table
/// gets an upper-case column manifest (`ns.TAXIPATH`) and, when it has
/// rows, a lower-case data table (`ns.taxipath`) filled one chunk per
/// function so no single constructor grows past the runtime's limits.
pub fn generate_lua_export(data: &Flattened) -> String {
    let mut lua: Vec<String> = vec![
        "local _, ns, F = ...\r\n".to_string(),
        "if type(ns) ~= \"table\" then\r\n\tns = {}\r\nend\r\n".to_string(),
    ];

    for table in &data.tables {
        let columns = table
            .columns
            .iter()
            .map(|c| format!("{} = {}", c.name, c.index))
            .collect::<Vec<_>>()
            .join(",\r\n\t");
        // Existing data files carry this exact marker for an empty manifest
        let tail = if columns.is_empty() { "-- TODO" } else { "," };
        lua.push(format!(
            "ns.{} = {{\r\n\t{}{}\r\n}}\r\n",
            table.name.to_uppercase(),
            columns,
            tail
        ));
    }

    for table in data.tables.iter().filter(|t| !t.chunks.is_empty()) {
        lua.push(format!("ns.{} = {{}}", table.name));

        for (i, chunk) in table.chunks.iter().enumerate() {
            let rows = chunk
                .iter()
                .map(|row| lua_row(row))
                .collect::<Vec<_>>()
                .join(",");
            lua.push(format!(
                "F = function() ns.{}[{}] = {{{}}} end F() F = nil",
                table.name,
                i + 1,
                rows
            ));
        }
    }

    lua.join("\r\n") + "\r\n\r\nreturn ns\r\n"
}

fn lua_row(row: &[Cell]) -> String {
    let cells = row.iter().map(Cell::to_lua).collect::<Vec<_>>().join(",");
    format!("{{{}}}", cells)
}

pub fn generate_json_export(data: &Flattened) -> Result<String, serde_json::Error> {
    let json = serde_json::json!({
        "generator": "taxigraph",
        "version": env!("CARGO_PKG_VERSION"),
        "tables": data.tables,
    });

    serde_json::to_string_pretty(&json)
}

pub fn generate_export(data: &Flattened, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Lua => Ok(generate_lua_export(data)),
        ExportFormat::Json => generate_json_export(data),
    }
}

/// Writes an artifact, creating missing parent directories.
pub fn save_artifact(content: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
