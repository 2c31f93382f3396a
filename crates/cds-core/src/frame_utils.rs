//! Small frame helpers shared across the flattening stages.

use anyhow::{Context, Result};
use polars::prelude::{BooleanChunked, DataFrame};

use cds_model::{BOOKKEEPING_COLUMNS, LINKING_COLUMN_RENAMES};

pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.column(name).is_ok()
}

/// Drop the manifest bookkeeping columns (`type`, `id`) plus any extras,
/// skipping names that are not present.
pub fn drop_bookkeeping(frame: &DataFrame, extras: &[&str]) -> DataFrame {
    let mut out = frame.clone();
    for name in BOOKKEEPING_COLUMNS.iter().chain(extras.iter()) {
        if has_column(&out, name) {
            let _ = out.drop_in_place(name);
        }
    }
    out
}

/// Apply the fixed foreign-key renaming map so joins can use short linking
/// names. A rename is skipped when the short name is already taken.
pub fn rename_linking_columns(frame: &mut DataFrame) -> Result<()> {
    for (from, to) in LINKING_COLUMN_RENAMES {
        if has_column(frame, from) && !has_column(frame, to) {
            frame
                .rename(from, to.into())
                .with_context(|| format!("rename linking column {from}"))?;
        }
    }
    Ok(())
}

/// Row mask marking cells that carry an actual value (non-null, non-blank).
pub fn non_empty_mask(frame: &DataFrame, name: &str) -> Result<BooleanChunked> {
    let values = frame
        .column(name)
        .with_context(|| format!("column {name}"))?
        .str()
        .with_context(|| format!("string column {name}"))?;
    Ok(values
        .into_iter()
        .map(|value| Some(value.is_some_and(|v| !v.trim().is_empty())))
        .collect())
}

/// True when at least one row has a value in the column.
pub fn column_has_values(frame: &DataFrame, name: &str) -> Result<bool> {
    Ok(non_empty_mask(frame, name)?.any())
}

/// Distinct non-empty values of a column in first-occurrence order.
pub fn distinct_non_null(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    let values = frame
        .column(name)
        .with_context(|| format!("column {name}"))?
        .str()
        .with_context(|| format!("string column {name}"))?;
    let mut seen = Vec::new();
    for value in values.into_iter().flatten() {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.iter().any(|s| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    Ok(seen)
}
