use std::fs::File;
use std::io::Read;
use std::iter;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{info, warn};

use super::{CellValue, Table};
use crate::error::TableError;

/// Load a sheet by file extension: delimited text or a workbook.
pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let ext = extension_of(path);
    let table = match ext.as_str() {
        "csv" => read_csv(File::open(path)?)?,
        e if WORKBOOK_EXTENSIONS.contains(&e) => read_workbook(path)?,
        _ => return Err(TableError::UnsupportedFormat(path.display().to_string())),
    };

    if table.rows.is_empty() {
        warn!(path = %path.display(), "sheet has no data rows");
    }
    info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded sheet"
    );
    Ok(table)
}

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Lowercased extension, empty when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// First record is the header row. Short records are padded with
/// `Empty` so every row spans the header.
pub fn read_csv<R: Read>(input: R) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<CellValue> = record.iter().map(CellValue::from_field).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), CellValue::Empty);
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

/// First worksheet only. Row 1 of the sheet is the header even when it is
/// blank, and a blank leading column stays in place: calamine trims the
/// range to the first used cell, so the offset is padded back in.
pub fn read_workbook(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::EmptyWorkbook)??;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let width = start_col as usize + range.width();
    let mut grid = iter::repeat_with(|| vec![CellValue::Empty; width])
        .take(start_row as usize)
        .chain(range.rows().map(|row| {
            iter::repeat(CellValue::Empty)
                .take(start_col as usize)
                .chain(row.iter().map(CellValue::from))
                .collect::<Vec<_>>()
        }));

    let headers: Vec<String> = grid
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<CellValue>> = grid.collect();

    Ok(Table { headers, rows })
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Extractor, Rules};
    use crate::table::{augment, DESCRIPTION_COLUMN, NAME_COLUMN};
    use rust_xlsxwriter::Workbook;

    fn extractor() -> Extractor {
        Extractor::new(&Rules::default()).unwrap()
    }

    #[test]
    fn csv_header_and_padding() {
        let input = "\u{feff}Id,Product Description,Qty\n1,Solar Panel Kit,4\n2,\n";
        let t = read_csv(input.as_bytes()).unwrap();
        assert_eq!(t.headers, vec!["Id", "Product Description", "Qty"]);
        assert_eq!(
            t.rows,
            vec![
                vec![
                    CellValue::Text("1".into()),
                    CellValue::Text("Solar Panel Kit".into()),
                    CellValue::Text("4".into()),
                ],
                vec![CellValue::Text("2".into()), CellValue::Empty, CellValue::Empty],
            ]
        );
    }

    #[test]
    fn empty_csv_has_no_headers() {
        let t = read_csv("".as_bytes()).unwrap();
        assert!(t.headers.is_empty());
        assert!(t.rows.is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_table(Path::new("descriptions.txt")).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(_)));
    }

    #[test]
    fn workbook_cells_map_to_values() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            CellValue::from(&Data::String("Solar".into())),
            CellValue::Text("Solar".into())
        );
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn reads_generated_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filings.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "S.No").unwrap();
        sheet.write_string(0, 1, "Product Description").unwrap();
        sheet.write_string(0, 2, "Verified").unwrap();
        sheet.write_number(1, 0, 1).unwrap();
        sheet
            .write_string(1, 1, "Lithium Ion Battery Pack for Energy Storage CONTENT: 98%")
            .unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_number(2, 0, 2.5).unwrap();
        workbook.save(&path).unwrap();

        let t = read_table(&path).unwrap();
        assert_eq!(t.headers, vec!["S.No", "Product Description", "Verified"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][0], CellValue::Number(1.0));
        assert_eq!(t.rows[0][2], CellValue::Bool(true));
        assert_eq!(
            t.rows[1],
            vec![CellValue::Number(2.5), CellValue::Empty, CellValue::Empty]
        );

        let (t, _) = augment(t, &extractor(), 500, |_| {}).unwrap();
        assert_eq!(
            t.headers,
            vec!["S.No", NAME_COLUMN, DESCRIPTION_COLUMN, "Verified"]
        );
        assert_eq!(
            t.rows[0][1],
            CellValue::Text("Lithium Ion Battery Pack for Energy Storage".into())
        );
    }

    #[test]
    fn blank_first_row_is_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(1, 0, "Product Description").unwrap();
        sheet.write_string(2, 0, "Solar Panel Kit").unwrap();
        workbook.save(&path).unwrap();

        let t = read_workbook(&path).unwrap();
        assert_eq!(t.headers, vec![""]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec![CellValue::Text(DESCRIPTION_COLUMN.into())]);

        let err = augment(t, &extractor(), 500, |_| {}).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(_)));
    }

    #[test]
    fn blank_first_column_keeps_its_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shifted.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Product Description").unwrap();
        sheet.write_string(0, 2, "Quantity").unwrap();
        sheet.write_string(1, 1, "Solar Panel Mounting Kit").unwrap();
        sheet.write_number(1, 2, 4).unwrap();
        workbook.save(&path).unwrap();

        let t = read_workbook(&path).unwrap();
        assert_eq!(t.headers, vec!["", "Product Description", "Quantity"]);
        assert_eq!(
            t.rows,
            vec![vec![
                CellValue::Empty,
                CellValue::Text("Solar Panel Mounting Kit".into()),
                CellValue::Number(4.0),
            ]]
        );
    }
}
