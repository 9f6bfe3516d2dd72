// Flattened table structure for the addon runtime

use crate::normalize::{Cell, FieldPolicy};
use crate::table::{Table, TableRegistry};
use serde::Serialize;

/// Rows per chunk; the addon runtime chokes on larger table constructors.
pub const CHUNK_ROWS: usize = 8192;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatColumn {
    pub name: String,
    /// 1-based position of the column in the source file
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatTable {
    pub name: String,
    pub columns: Vec<FlatColumn>,
    pub chunks: Vec<Vec<Vec<Cell>>>,
}

impl FlatTable {
    pub fn row_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.chunks.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flattened {
    pub tables: Vec<FlatTable>,
}

/// `Loc[0]` becomes `LOC_0`.
pub fn manifest_name(header: &str) -> String {
    header.to_uppercase().replace('[', "_").replace(']', "")
}

pub fn flatten(tables: &TableRegistry, policy: &FieldPolicy) -> Flattened {
    Flattened {
        tables: tables.iter().map(|t| flatten_table(t, policy)).collect(),
    }
}

pub fn flatten_table(table: &Table, policy: &FieldPolicy) -> FlatTable {
    let retained: Vec<bool> = table
        .headers
        .iter()
        .map(|header| policy.includes(&table.name, header))
        .collect();

    let columns = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| retained[*i])
        .map(|(i, header)| FlatColumn {
            name: manifest_name(header),
            index: i + 1,
        })
        .collect();

    let rows: Vec<Vec<Cell>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&retained)
                .filter(|(_, keep)| **keep)
                .filter_map(|(cell, _)| cell.clone())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    FlatTable {
        name: table.name.clone(),
        columns,
        chunks: chunk_rows(rows, CHUNK_ROWS),
    }
}

/// Splits rows into consecutive chunks of at most `size` rows.
pub fn chunk_rows<T>(rows: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        chunks.push(rows.by_ref().take(size).collect());
    }
    chunks
}
