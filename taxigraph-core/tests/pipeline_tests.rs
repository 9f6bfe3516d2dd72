// Tests for the end-to-end render and table pipelines

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use taxigraph_core::export::ExportFormat;
use taxigraph_core::pipeline::map_file_name;
use taxigraph_core::{
    FieldPolicy, RenderOptions, RenderProgressCallback, TableLoader, TableOptions,
    TableRegistry, execute_render, execute_table_export,
};
use tempfile::TempDir;

fn write_fixture(dir: &Path) {
    fs::write(
        dir.join("TaxiNodes.csv"),
        "ID,Name_lang,Pos[0],Pos[1],Pos[2],ContinentID,Flags\n\
         1,Stormwind,100,200,10,0,1\n\
         2,Ironforge,-300,50,20,0,3\n\
         3,Orgrimmar,500,-100,5,1,2\n\
         4,Lonely Post,10,10,0,2,0\n\
         5,Thunder Bluff,-200,300,0,1,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("TaxiPath.csv"),
        "ID,FromTaxiNode,ToTaxiNode,Cost\n\
         10,1,2,5\n\
         11,2,1,5\n\
         12,3,5,8\n\
         13,0,4,1\n",
    )
    .unwrap();
    fs::write(
        dir.join("TaxiPathNode.csv"),
        "ID,PathID,NodeIndex,ContinentID,Loc[0],Loc[1],Loc[2]\n\
         101,10,1,0,0,100,10\n\
         100,10,0,0,100,200,10\n\
         200,12,0,1,500,-100,5\n",
    )
    .unwrap();
}

fn load_fixture() -> (TempDir, TableRegistry) {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(temp_dir.path());
    let tables = TableLoader::scan(temp_dir.path()).unwrap().load();
    (temp_dir, tables)
}

// ============================================================================
// Render Pipeline Tests
// ============================================================================

#[test]
fn test_map_file_name() {
    assert_eq!(map_file_name(Some(530)), "db_530.svg");
    assert_eq!(map_file_name(None), "db.svg");
}

#[test]
fn test_render_one_image_per_connected_map() {
    let (_temp_dir, tables) = load_fixture();
    let renders = execute_render(&tables, &RenderOptions::default(), None);

    let files: Vec<&str> = renders.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(files, vec!["db_0.svg", "db_1.svg"]);
    assert_eq!(renders[0].nodes, 2);
    assert!(renders[0].svg.contains("id=\"node1\""));
    assert!(!renders[0].svg.contains("id=\"node3\""));
    assert!(renders[1].svg.contains("id=\"node3\""));
}

#[test]
fn test_render_single_map() {
    let (_temp_dir, tables) = load_fixture();
    let options = RenderOptions {
        map: Some(1),
        ..RenderOptions::default()
    };
    let renders = execute_render(&tables, &options, None);

    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].map, Some(1));
    assert_eq!(renders[0].file_name, "db_1.svg");
}

#[test]
fn test_render_map_without_connected_nodes() {
    let (_temp_dir, tables) = load_fixture();
    let options = RenderOptions {
        map: Some(2),
        ..RenderOptions::default()
    };
    assert!(execute_render(&tables, &options, None).is_empty());
}

#[test]
fn test_render_unsplit() {
    let (_temp_dir, tables) = load_fixture();
    let options = RenderOptions {
        split_by_map: false,
        ..RenderOptions::default()
    };
    let renders = execute_render(&tables, &options, None);

    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].file_name, "db.svg");
    assert_eq!(renders[0].nodes, 4);
}

#[test]
fn test_render_without_waypoints_or_links() {
    let (_temp_dir, tables) = load_fixture();
    let options = RenderOptions {
        map: Some(0),
        waypoints: false,
        direct_edges: false,
        ..RenderOptions::default()
    };
    let renders = execute_render(&tables, &options, None);

    assert!(!renders[0].svg.contains("class=\"edge\""));
    assert!(!renders[0].svg.contains("class=\"link\""));
    assert!(renders[0].svg.contains("class=\"node\""));
}

#[test]
fn test_render_is_idempotent() {
    let (_temp_dir, tables) = load_fixture();
    let first = execute_render(&tables, &RenderOptions::default(), None);
    let second = execute_render(&tables, &RenderOptions::default(), None);

    let first: Vec<&str> = first.iter().map(|r| r.svg.as_str()).collect();
    let second: Vec<&str> = second.iter().map(|r| r.svg.as_str()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_render_reports_progress() {
    let (_temp_dir, tables) = load_fixture();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let callback: RenderProgressCallback = Arc::new(move |msg: String| {
        sink.lock().unwrap().push(msg);
    });

    execute_render(&tables, &RenderOptions::default(), Some(callback));

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], "Rendering 1/2: db_0.svg");
}

#[test]
fn test_render_empty_input() {
    let temp_dir = TempDir::new().unwrap();
    let tables = TableLoader::scan(temp_dir.path()).unwrap().load();
    assert!(execute_render(&tables, &RenderOptions::default(), None).is_empty());
}

// ============================================================================
// Table Pipeline Tests
// ============================================================================

#[test]
fn test_table_export_default_policy() {
    let (_temp_dir, tables) = load_fixture();
    let lua = execute_table_export(&tables, &TableOptions::default()).unwrap();

    assert!(lua.starts_with("local _, ns, F = ...\r\n"));
    assert!(lua.contains("ns.TAXINODES = {\r\n\t-- TODO\r\n}"));
    assert!(lua.contains("ns.taxipath[1] = {{10,1,2},{11,2,1},{12,3,5},{13,0,4}}"));
    assert!(lua.contains("ns.taxipathnode[1] = {{101,10,0,100,10},{100,10,100,200,10},{200,12,500,-100,5}}"));
    assert!(!lua.contains("ns.taxinodes ="));
    assert!(lua.ends_with("\r\n\r\nreturn ns\r\n"));
}

#[test]
fn test_table_export_all_fields() {
    let (_temp_dir, tables) = load_fixture();
    let options = TableOptions {
        policy: FieldPolicy::All,
        format: ExportFormat::Lua,
    };
    let lua = execute_table_export(&tables, &options).unwrap();

    assert!(lua.contains("NAME_LANG = 2"));
    assert!(lua.contains("{1,\"Stormwind\",100,200,10,0,1}"));
}

#[test]
fn test_table_export_json() {
    let (_temp_dir, tables) = load_fixture();
    let options = TableOptions {
        format: ExportFormat::Json,
        ..TableOptions::default()
    };
    let json = execute_table_export(&tables, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["tables"].as_array().unwrap().len(), 3);
    assert_eq!(value["tables"][1]["name"], "taxipath");
}

#[test]
fn test_table_export_is_idempotent() {
    let (_temp_dir, tables) = load_fixture();
    let first = execute_table_export(&tables, &TableOptions::default()).unwrap();
    let second = execute_table_export(&tables, &TableOptions::default()).unwrap();
    assert_eq!(first, second);
}
