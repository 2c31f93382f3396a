//! CDS workbook writing.
//!
//! The output is the template workbook itself: any data rows below the
//! `Metadata` header are removed, one row per flattened record is appended
//! in template column order, and the workbook is saved under the dated name.
//! The header row is never re-emitted.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use polars::prelude::{AnyValue, DataFrame};
use tracing::info;

use cds_ingest::any_to_string;

const METADATA_SHEET: &str = "Metadata";

/// Write the mapped output frame into a copy of the template workbook.
pub fn write_output_workbook(
    template_path: &Path,
    output_path: &Path,
    frame: &DataFrame,
) -> Result<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(template_path)
        .map_err(|e| anyhow!("read template workbook {}: {e}", template_path.display()))?;
    let sheet = book
        .get_sheet_by_name_mut(METADATA_SHEET)
        .ok_or_else(|| anyhow!("template has no '{METADATA_SHEET}' sheet"))?;

    // Drop any data the template shipped with; the header row stays.
    let highest_row = sheet.get_highest_row();
    if highest_row >= 2 {
        sheet.remove_row(&2, &(highest_row - 1));
    }

    let columns = frame.get_columns();
    for row_idx in 0..frame.height() {
        for (col_idx, column) in columns.iter().enumerate() {
            let value = any_to_string(column.get(row_idx).unwrap_or(AnyValue::Null));
            if value.is_empty() {
                continue;
            }
            let coordinate = ((col_idx + 1) as u32, (row_idx + 2) as u32);
            sheet.get_cell_mut(coordinate).set_value(value);
        }
    }

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    umya_spreadsheet::writer::xlsx::write(&book, output_path)
        .map_err(|e| anyhow!("write workbook {}: {e}", output_path.display()))?;
    info!(
        rows = frame.height(),
        path = %output_path.display(),
        "wrote CDS workbook"
    );
    Ok(())
}
