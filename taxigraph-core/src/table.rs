// CSV table loading into an in-memory registry

use crate::error::{Result, TaxiError};
use crate::normalize::{Cell, FieldPolicy, normalize_field};
use csv::ReaderBuilder;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TAXI_NODES: &str = "taxinodes";
pub const TAXI_PATH: &str = "taxipath";
pub const TAXI_PATH_NODE: &str = "taxipathnode";

/// One loaded CSV file.
///
/// Every row has exactly one slot per header. A slot is `None` when the
/// cell was empty, missing from a short row, or excluded by the field policy.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Cell>>>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<Option<Cell>>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), i))
            .collect();
        Self {
            name: name.to_string(),
            headers,
            rows,
            index,
        }
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            table: self,
            cells: cells.as_slice(),
        })
    }
}

/// A row of a [`Table`] addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    cells: &'a [Option<Cell>],
}

impl<'a> Record<'a> {
    pub fn get(&self, header: &str) -> Option<&'a Cell> {
        self.table
            .column(header)
            .and_then(|i| self.cells.get(i))
            .and_then(Option::as_ref)
    }

    pub fn i64(&self, header: &str) -> i64 {
        self.get(header).map(Cell::as_i64).unwrap_or(0)
    }

    pub fn f64(&self, header: &str) -> f64 {
        self.get(header).map(Cell::as_f64).unwrap_or(0.0)
    }

    pub fn text(&self, header: &str) -> String {
        self.get(header).map(|c| c.as_str().to_string()).unwrap_or_default()
    }
}

/// Loaded tables keyed by lower-case table name, in load order.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: IndexMap<String, Table>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Records of `name`, empty when the table was never loaded.
    pub fn records(&self, name: &str) -> impl Iterator<Item = Record<'_>> {
        self.get(name).into_iter().flat_map(Table::records)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Discovers CSV files and loads them into a [`TableRegistry`].
pub struct TableLoader {
    files: Vec<PathBuf>,
    policy: FieldPolicy,
}

impl TableLoader {
    /// Collects every `*.csv` file of `dir`, sorted by path.
    pub fn scan(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(TaxiError::MissingInput(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} CSV files in {}", files.len(), dir.display());
        Ok(Self::from_files(files))
    }

    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            policy: FieldPolicy::All,
        }
    }

    pub fn with_field_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Loads every discovered file. A file that cannot be read is left out
    /// of the registry and downstream steps see it as zero rows.
    pub fn load(&self) -> TableRegistry {
        let mut registry = TableRegistry::new();

        for path in &self.files {
            let Some(name) = table_name(path) else {
                warn!("Skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };

            match load_table(path, &name, &self.policy) {
                Ok(table) => {
                    info!("Loaded {} ({} rows)", name, table.rows.len());
                    registry.insert(table);
                }
                Err(e) => warn!("Failed to load {}: {}", path.display(), e),
            }
        }

        registry
    }
}

/// Lower-cased file stem, which names the table.
pub fn table_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_lowercase)
}

/// Reads one CSV file. The first record is the header row.
pub fn load_table(path: &Path, name: &str, policy: &FieldPolicy) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: skipping record {}: {}", name, line + 1, e);
                continue;
            }
        };

        if headers.is_empty() {
            headers = record
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').to_string())
                .collect();
            continue;
        }

        let row: Vec<Option<Cell>> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| normalize_field(policy, name, header, record.get(i).unwrap_or("")))
            .collect();

        if row.iter().any(Option::is_some) {
            rows.push(row);
        }
    }

    Ok(Table::new(name, headers, rows))
}
