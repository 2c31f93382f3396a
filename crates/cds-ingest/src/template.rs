//! CDS submission template parsing.
//!
//! The template workbook supplies the destination schema: the `Metadata`
//! sheet's header row fixes the output column order, and the `Dictionary`
//! sheet flags which fields are required.

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tracing::debug;

use cds_model::CdsTemplate;

use crate::error::{IngestError, Result};

const METADATA_SHEET: &str = "Metadata";
const DICTIONARY_SHEET: &str = "Dictionary";
const FIELD_COLUMN: &str = "Field";
const REQUIRED_COLUMN: &str = "Required";

fn open_sheet(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    path: &Path,
    sheet: &str,
) -> Result<calamine::Range<Data>> {
    workbook
        .worksheet_range(sheet)
        .map_err(|_| IngestError::SheetMissing {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        })
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell {
        Some(Data::Empty) | None => None,
        Some(other) => {
            let text = other.to_string().trim().to_string();
            if text.is_empty() { None } else { Some(text) }
        }
    }
}

/// Load the destination column order and required-field set from a CDS
/// template workbook.
pub fn read_template(path: &Path) -> Result<CdsTemplate> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = open_sheet(&mut workbook, path, METADATA_SHEET)?;
    let columns: Vec<String> = metadata
        .rows()
        .next()
        .map(|row| row.iter().filter_map(|cell| cell_text(Some(cell))).collect())
        .unwrap_or_default();

    let dictionary = open_sheet(&mut workbook, path, DICTIONARY_SHEET)?;
    let mut rows = dictionary.rows();
    let header = rows.next().unwrap_or(&[]);
    let field_idx = header
        .iter()
        .position(|cell| cell_text(Some(cell)).as_deref() == Some(FIELD_COLUMN))
        .ok_or_else(|| IngestError::ColumnMissing {
            sheet: DICTIONARY_SHEET.to_string(),
            column: FIELD_COLUMN.to_string(),
        })?;
    let required_idx = header
        .iter()
        .position(|cell| cell_text(Some(cell)).as_deref() == Some(REQUIRED_COLUMN))
        .ok_or_else(|| IngestError::ColumnMissing {
            sheet: DICTIONARY_SHEET.to_string(),
            column: REQUIRED_COLUMN.to_string(),
        })?;

    let mut required = BTreeSet::new();
    for row in rows {
        if cell_text(row.get(required_idx)).is_none() {
            continue;
        }
        if let Some(field) = cell_text(row.get(field_idx)) {
            required.insert(field);
        }
    }
    debug!(
        columns = columns.len(),
        required = required.len(),
        "loaded CDS template"
    );
    Ok(CdsTemplate { columns, required })
}
