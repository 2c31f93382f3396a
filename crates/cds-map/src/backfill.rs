//! Required-field backfill.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};

use cds_model::{CdsTemplate, REQUIRED_PLACEHOLDER};

/// Replace every empty cell of a required destination column with the fixed
/// placeholder. Returns the number of cells filled. Pure with respect to row
/// order and non-required columns.
pub fn backfill_required(frame: &mut DataFrame, template: &CdsTemplate) -> Result<usize> {
    let mut filled = 0usize;
    for name in &template.columns {
        if !template.is_required(name) {
            continue;
        }
        let Ok(column) = frame.column(name) else {
            continue;
        };
        let mut values = Vec::with_capacity(frame.height());
        let mut changed = false;
        for idx in 0..frame.height() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            let text = match value {
                AnyValue::String(s) => s.to_string(),
                AnyValue::StringOwned(s) => s.to_string(),
                AnyValue::Null => String::new(),
                other => other.to_string(),
            };
            if text.trim().is_empty() {
                values.push(REQUIRED_PLACEHOLDER.to_string());
                changed = true;
                filled += 1;
            } else {
                values.push(text);
            }
        }
        if changed {
            let series = Series::new(name.as_str().into(), values);
            frame
                .replace(name, series)
                .with_context(|| format!("backfill column {name}"))?;
        }
    }
    Ok(filled)
}
