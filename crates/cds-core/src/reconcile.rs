//! Column reconciliation after a join.
//!
//! Joining two tables that share a column name leaves a collided pair behind:
//! the accumulated side keeps the base name and the freshly joined side picks
//! up the [`JOIN_SUFFIX`]. Reconciliation collapses each pair into one
//! base-named column, row-wise preferring whichever side is semantically more
//! specific to the row:
//!
//! - [`ReconcilePreference::Joined`]: ancestor-chain phase, where the deeper
//!   child node carries the more specific value;
//! - [`ReconcilePreference::Accumulated`]: file-join phase, where the
//!   ancestor snapshot outranks the file sheet's copy of the same property.
//!
//! The operation is idempotent and never reorders rows.

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};

/// Suffix the join attaches to the freshly joined side of a collision.
pub const JOIN_SUFFIX: &str = "_y";

/// Which side of a collided column pair wins a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePreference {
    /// Prefer the freshly joined (suffixed) column.
    Joined,
    /// Prefer the previously accumulated (base-named) column.
    Accumulated,
}

/// Collapse every (`name`, `name_y`) pair into a single `name` column.
///
/// Returns the number of pairs reconciled; zero means the frame had no
/// collisions, so re-running is a no-op.
pub fn reconcile_collisions(
    frame: &mut DataFrame,
    prefer: ReconcilePreference,
) -> Result<usize> {
    let names: Vec<String> = frame
        .get_column_names_owned()
        .iter()
        .map(|n| n.to_string())
        .collect();
    let mut reconciled = 0usize;
    for name in &names {
        let Some(base) = name.strip_suffix(JOIN_SUFFIX) else {
            continue;
        };
        if base.is_empty() || !names.iter().any(|n| n == base) {
            continue;
        }
        let joined = frame
            .column(name)
            .with_context(|| format!("collided column {name}"))?
            .str()
            .with_context(|| format!("string column {name}"))?
            .clone();
        let accumulated = frame
            .column(base)
            .with_context(|| format!("collided column {base}"))?
            .str()
            .with_context(|| format!("string column {base}"))?
            .clone();
        let mut values: Vec<Option<String>> = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let joined_value = joined.get(idx).filter(|v| !v.trim().is_empty());
            let accumulated_value = accumulated.get(idx).filter(|v| !v.trim().is_empty());
            let winner = match prefer {
                ReconcilePreference::Joined => joined_value.or(accumulated_value),
                ReconcilePreference::Accumulated => accumulated_value.or(joined_value),
            };
            values.push(winner.map(str::to_string));
        }
        let series = Series::new(base.into(), values);
        frame
            .replace(base, series)
            .with_context(|| format!("replace reconciled column {base}"))?;
        frame
            .drop_in_place(name)
            .with_context(|| format!("drop collided column {name}"))?;
        reconciled += 1;
    }
    Ok(reconciled)
}
