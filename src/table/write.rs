use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rust_xlsxwriter::{ColNum, RowNum, Workbook};
use tempfile::NamedTempFile;
use tracing::info;

use super::read::extension_of;
use super::{CellValue, Table};
use crate::error::TableError;

/// Picks the writer from the output extension (`csv` or `xlsx`).
pub fn write_table(path: &Path, table: &Table) -> Result<(), TableError> {
    match extension_of(path).as_str() {
        "csv" => write_csv(path, table),
        "xlsx" => write_xlsx(path, table),
        _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Output extension for a processed copy of `input`: CSV stays CSV, every
/// workbook format is written back as xlsx.
pub fn output_extension(input: &Path) -> &'static str {
    if extension_of(input) == "csv" {
        "csv"
    } else {
        "xlsx"
    }
}

pub fn write_csv(path: &Path, table: &Table) -> Result<(), TableError> {
    replace_file(path, |file| write_csv_to(file, table))?;
    info!(path = %path.display(), rows = table.rows.len(), "wrote sheet");
    Ok(())
}

pub fn write_xlsx(path: &Path, table: &Table) -> Result<(), TableError> {
    replace_file(path, |file| write_xlsx_to(file, table))?;
    info!(path = %path.display(), rows = table.rows.len(), "wrote workbook");
    Ok(())
}

pub fn write_csv_to<W: Write>(output: W, table: &Table) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(output);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Single worksheet; empty cells are left unwritten.
pub fn write_xlsx_to<W: Write>(mut output: W, table: &Table) -> Result<(), TableError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, col_num(c)?, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = row_num(r + 1)?;
        for (c, cell) in row.iter().enumerate() {
            let c = col_num(c)?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) | CellValue::Other(s) => {
                    sheet.write_string(r, c, s)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number(r, c, *n)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
            }
        }
    }

    output.write_all(&workbook.save_to_buffer()?)?;
    output.flush()?;
    Ok(())
}

/// Writes into a temp file next to `path` and renames it over `path`, so a
/// failed write never leaves a partial file behind.
fn replace_file<F>(path: &Path, write: F) -> Result<(), TableError>
where
    F: FnOnce(&mut fs::File) -> Result<(), TableError>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn row_num(r: usize) -> Result<RowNum, TableError> {
    RowNum::try_from(r).map_err(|_| too_large("row", r))
}

fn col_num(c: usize) -> Result<ColNum, TableError> {
    ColNum::try_from(c).map_err(|_| too_large("column", c))
}

fn too_large(what: &str, n: usize) -> TableError {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{what} {n} is beyond the worksheet limit"),
    )
    .into()
}

// ── Tests ──
