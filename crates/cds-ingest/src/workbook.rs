//! CCDI manifest workbook loading.
//!
//! Every sheet is read as a string-typed table: the first row names the
//! columns, every other cell is kept verbatim as text, and blank cells become
//! nulls. Numeric cells are rendered without a spurious `.0` so identifier
//! columns survive Excel's float coercion.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::polars_utils::format_numeric;

/// One worksheet as raw text cells, before frame conversion.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn cell_to_string(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_numeric(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    };
    if value.is_empty() { None } else { Some(value) }
}

fn range_to_sheet_table(name: &str, range: &calamine::Range<Data>) -> SheetTable {
    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return SheetTable {
            name: name.to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
        };
    };
    // Keep only columns that actually carry a header; trailing unnamed
    // columns are Excel artifacts.
    let mut headers = Vec::new();
    let mut keep = Vec::new();
    for (idx, cell) in header_row.iter().enumerate() {
        let header = normalize_header(&cell_to_string(cell).unwrap_or_default());
        if !header.is_empty() {
            headers.push(header);
            keep.push(idx);
        }
    }
    let mut rows = Vec::new();
    for record in rows_iter {
        let row: Vec<Option<String>> = keep
            .iter()
            .map(|&idx| record.get(idx).and_then(cell_to_string))
            .collect();
        if row.iter().all(Option::is_none) {
            continue;
        }
        rows.push(row);
    }
    SheetTable {
        name: name.to_string(),
        headers,
        rows,
    }
}

/// Convert a raw sheet table into a string-typed DataFrame.
pub fn sheet_table_to_frame(table: &SheetTable) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.headers.len());
    for (col_idx, header) in table.headers.iter().enumerate() {
        let values: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| row.get(col_idx).cloned().flatten())
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into());
    }
    DataFrame::new(columns).map_err(|source| IngestError::Frame {
        sheet: table.name.clone(),
        source,
    })
}

/// Read every sheet of a CCDI manifest workbook into string-typed frames.
pub fn read_manifest(path: &Path) -> Result<BTreeMap<String, DataFrame>> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let sheet_names = workbook.sheet_names().to_owned();
    let mut tables = BTreeMap::new();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| IngestError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;
        let table = range_to_sheet_table(&name, &range);
        let frame = sheet_table_to_frame(&table)?;
        debug!(
            sheet = %name,
            rows = frame.height(),
            columns = frame.width(),
            "loaded manifest sheet"
        );
        tables.insert(name, frame);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_become_nulls() {
        let table = SheetTable {
            name: "study".to_string(),
            headers: vec!["study_id".to_string(), "study_name".to_string()],
            rows: vec![
                vec![Some("S1".to_string()), None],
                vec![Some("S2".to_string()), Some("Trial".to_string())],
            ],
        };
        let frame = sheet_table_to_frame(&table).expect("frame");
        assert_eq!(frame.height(), 2);
        let names = frame.column("study_name").expect("column");
        assert_eq!(names.null_count(), 1);
    }

    #[test]
    fn all_null_sheet_keeps_schema() {
        let table = SheetTable {
            name: "sample".to_string(),
            headers: vec!["sample_id".to_string()],
            rows: Vec::new(),
        };
        let frame = sheet_table_to_frame(&table).expect("frame");
        assert_eq!(frame.height(), 0);
        assert!(frame.column("sample_id").is_ok());
    }
}
