pub mod read;
pub mod write;

use std::fmt;

use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::TableError;
use crate::extract::{Extractor, NameSource};

pub use read::read_table;
pub use write::{output_extension, write_table};

pub const DESCRIPTION_COLUMN: &str = "Product Description";
pub const NAME_COLUMN: &str = "Product Name";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates, error cells and anything else that is kept but never parsed.
    Other(String),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Delimited-text fields carry no type; empty means absent.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(t) | CellValue::Other(t) => f.write_str(t),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn remove_column(&mut self, idx: usize) {
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessCounts {
    pub rows: usize,
    pub known_prefix: usize,
    pub candidate: usize,
    pub fallback: usize,
    pub blank: usize,
}

impl ProcessCounts {
    fn record(&mut self, source: NameSource) {
        self.rows += 1;
        match source {
            NameSource::KnownPrefix => self.known_prefix += 1,
            NameSource::Candidate => self.candidate += 1,
            NameSource::Fallback => self.fallback += 1,
            NameSource::Blank => self.blank += 1,
        }
    }

    pub fn print(&self) {
        println!(
            "Named {} rows: {} known prefix, {} candidate, {} fallback, {} blank.",
            self.rows, self.known_prefix, self.candidate, self.fallback, self.blank,
        );
    }
}

/// Insert a `Product Name` column right before `Product Description`.
///
/// Fails with [`TableError::MissingColumn`] before any row is touched when
/// the description column is absent. An existing `Product Name` column is
/// replaced. Rows are handled `chunk_size` at a time and `on_chunk` is told
/// how many rows each finished chunk held; row order is kept.
pub fn augment<F>(
    mut table: Table,
    extractor: &Extractor,
    chunk_size: usize,
    mut on_chunk: F,
) -> Result<(Table, ProcessCounts), TableError>
where
    F: FnMut(usize),
{
    if table.column(DESCRIPTION_COLUMN).is_none() {
        return Err(TableError::MissingColumn(DESCRIPTION_COLUMN.to_string()));
    }
    if let Some(existing) = table.column(NAME_COLUMN) {
        warn!(column = existing, "replacing existing {:?} column", NAME_COLUMN);
        table.remove_column(existing);
    }
    let desc_idx = table
        .column(DESCRIPTION_COLUMN)
        .ok_or_else(|| TableError::MissingColumn(DESCRIPTION_COLUMN.to_string()))?;

    table.headers.insert(desc_idx, NAME_COLUMN.to_string());

    let mut counts = ProcessCounts::default();
    for chunk in table.rows.chunks_mut(chunk_size.max(1)) {
        let names = name_rows(extractor, chunk, desc_idx);
        for (row, (name, source)) in chunk.iter_mut().zip(names) {
            counts.record(source);
            if row.len() < desc_idx {
                row.resize(desc_idx, CellValue::Empty);
            }
            row.insert(desc_idx, CellValue::Text(name));
        }
        on_chunk(chunk.len());
    }

    info!(
        rows = counts.rows,
        fallback = counts.fallback,
        blank = counts.blank,
        "named rows"
    );
    Ok((table, counts))
}

fn name_row(extractor: &Extractor, row: &[CellValue], desc_idx: usize) -> (String, NameSource) {
    let e = extractor.extract_cell(row.get(desc_idx).unwrap_or(&CellValue::Empty));
    (e.name, e.source)
}

#[cfg(feature = "rayon")]
fn name_rows(
    extractor: &Extractor,
    rows: &[Vec<CellValue>],
    desc_idx: usize,
) -> Vec<(String, NameSource)> {
    rows.par_iter()
        .map(|row| name_row(extractor, row, desc_idx))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn name_rows(
    extractor: &Extractor,
    rows: &[Vec<CellValue>],
    desc_idx: usize,
) -> Vec<(String, NameSource)> {
    rows.iter()
        .map(|row| name_row(extractor, row, desc_idx))
        .collect()
}

// ── Tests ──
