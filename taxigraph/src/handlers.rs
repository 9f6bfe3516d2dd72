use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taxigraph_core::export::{ExportFormat, save_artifact};
use taxigraph_core::{
    FieldPolicy, GraphBuilder, RenderOptions, RenderProgressCallback, TableLoader, TableOptions,
    TableRegistry, execute_render, execute_table_export,
};
use tracing::{info, warn};

// Helper functions shared by the subcommands

/// Expands a leading `~` in a user supplied path
pub fn resolve_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Picks the field policy from the `--all-fields` / `--fields` flags
pub fn load_field_policy(
    all_fields: bool,
    fields_file: Option<&PathBuf>,
) -> Result<FieldPolicy, String> {
    if all_fields {
        return Ok(FieldPolicy::All);
    }

    match fields_file {
        Some(path) => FieldPolicy::from_json_file(path)
            .map_err(|e| format!("Failed to read field list {}: {}", path.display(), e)),
        None => Ok(FieldPolicy::default()),
    }
}

/// Loads every CSV file of the input directory
pub fn load_tables(input: &Path) -> Result<TableRegistry> {
    let loader = TableLoader::scan(input)
        .with_context(|| format!("Failed to scan {}", input.display()))?;
    let tables = loader.load();
    info!("Loaded {} tables from {}", tables.len(), input.display());
    Ok(tables)
}

/// Writes the flattened data file, returning its size in bytes
pub fn run_table(input: &Path, output: &Path, options: &TableOptions) -> Result<usize> {
    let tables = load_tables(input)?;
    let content = execute_table_export(&tables, options)?;
    save_artifact(&content, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(content.len())
}

/// Images written by a render run and the ones that could not be saved
#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes one image per rendered map. A map that cannot be saved is
/// recorded in the outcome and the remaining maps are still written.
pub fn run_render(
    input: &Path,
    output_dir: &Path,
    options: &RenderOptions,
    progress_callback: Option<RenderProgressCallback>,
) -> Result<RenderOutcome> {
    let tables = load_tables(input)?;
    let renders = execute_render(&tables, options, progress_callback);

    let mut outcome = RenderOutcome::default();
    for render in renders {
        let path = output_dir.join(&render.file_name);
        match save_artifact(&render.svg, &path) {
            Ok(()) => outcome.written.push(path),
            Err(e) => {
                warn!("Failed to write {}: {}", path.display(), e);
                let error = anyhow::Error::new(e)
                    .context(format!("Failed to write {}", path.display()));
                outcome.failed.push((path, error));
            }
        }
    }
    Ok(outcome)
}

/// Map ids with connected nodes, ascending
pub fn run_maps(input: &Path) -> Result<Vec<i64>> {
    let tables = load_tables(input)?;
    Ok(GraphBuilder::new(&tables).maps())
}

pub fn print_banner() {
    println!(
        "{} {}",
        "taxigraph".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!();
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), e);
    std::process::exit(1);
}

pub fn handle_table(args: &ArgMatches, quiet: bool) {
    let input = resolve_path(args.get_one::<String>("INPUT").expect("INPUT is required"));
    let output = resolve_path(args.get_one::<String>("output").expect("output has a default"));
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ExportFormat::from_str(f))
        .unwrap_or(ExportFormat::Lua);

    let policy = match load_field_policy(
        args.get_flag("all-fields"),
        args.get_one::<PathBuf>("fields"),
    ) {
        Ok(policy) => policy,
        Err(e) => fail(e),
    };

    let options = TableOptions { policy, format };
    match run_table(&input, &output, &options) {
        Ok(bytes) => {
            if !quiet {
                println!(
                    "{} Wrote {} ({} bytes)",
                    "✓".green().bold(),
                    output.display().to_string().bright_white(),
                    bytes.to_string().cyan()
                );
            }
        }
        Err(e) => fail(format!("{:#}", e)),
    }
}

pub fn handle_render(args: &ArgMatches, quiet: bool) {
    let input = resolve_path(args.get_one::<String>("INPUT").expect("INPUT is required"));
    let output_dir = resolve_path(args.get_one::<String>("output").expect("output has a default"));

    let options = RenderOptions {
        map: args.get_one::<i64>("map").copied(),
        split_by_map: !args.get_flag("no-split"),
        waypoints: !args.get_flag("no-waypoints"),
        direct_edges: !args.get_flag("no-direct-edges"),
    };

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Loading tables...");
        Some(Arc::new(pb))
    };

    let progress_callback: Option<RenderProgressCallback> = spinner.clone().map(|pb| {
        let callback: RenderProgressCallback = Arc::new(move |msg: String| pb.set_message(msg));
        callback
    });

    let result = run_render(&input, &output_dir, &options, progress_callback);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => fail(format!("{:#}", e)),
    };

    if !quiet {
        if outcome.written.is_empty() && outcome.is_success() {
            println!("{} No map had connected taxi nodes", "→".yellow().bold());
            return;
        }
        for path in &outcome.written {
            println!(
                "  {} {}",
                "✓".green(),
                path.display().to_string().bright_white()
            );
        }
        if !outcome.written.is_empty() {
            println!(
                "{} Rendered {} map(s)",
                "✓".green().bold(),
                outcome.written.len().to_string().cyan()
            );
        }
    }

    if !outcome.is_success() {
        for (_, error) in &outcome.failed {
            eprintln!("{} {:#}", "✗".red().bold(), error);
        }
        std::process::exit(1);
    }
}

pub fn handle_maps(args: &ArgMatches) {
    let input = resolve_path(args.get_one::<String>("INPUT").expect("INPUT is required"));
    match run_maps(&input) {
        Ok(maps) => {
            for map in maps {
                println!("{}", map);
            }
        }
        Err(e) => fail(format!("{:#}", e)),
    }
}
