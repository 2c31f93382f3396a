//! File-node union.
//!
//! All `*_file` sheets are concatenated into one generic file relation before
//! any ancestor join, so common file properties (`file_name`, `file_type`,
//! `md5sum`, ...) never collide with each other. Concatenation is a diagonal
//! row union: columns a sheet lacks are filled with nulls.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::functions::concat_df_diagonal;
use polars::prelude::DataFrame;
use tracing::debug;

use cds_model::{ANCESTOR_REFERENCE_COLUMNS, FILE_NODE_CONCAT_ORDER, HierarchyLevel};

use crate::frame_utils::{
    column_has_values, drop_bookkeeping, has_column, rename_linking_columns,
};

/// Union the present file nodes, rename linking columns, strip bookkeeping
/// and ancestor row references, and drop linking columns that are empty in
/// every row. Returns `None` when no file node is present.
pub fn build_file_relation(
    present: &[String],
    tables: &BTreeMap<String, DataFrame>,
) -> Result<Option<DataFrame>> {
    let mut parts = Vec::new();
    for node in FILE_NODE_CONCAT_ORDER {
        if !present.iter().any(|n| n == node) {
            continue;
        }
        let table = tables
            .get(node)
            .with_context(|| format!("table for present node {node}"))?;
        parts.push(table.clone());
    }
    if parts.is_empty() {
        return Ok(None);
    }

    let mut files = concat_df_diagonal(&parts).context("concatenate file nodes")?;
    rename_linking_columns(&mut files)?;
    files = drop_bookkeeping(&files, &ANCESTOR_REFERENCE_COLUMNS);

    // A parent linking column carried by the template but never filled in
    // would otherwise force a pointless join pass.
    for level in HierarchyLevel::FILE_JOIN_ORDER {
        let key = level.linking_column();
        if has_column(&files, key) && !column_has_values(&files, key)? {
            debug!(key, "dropping empty linking column from file relation");
            let _ = files.drop_in_place(key);
        }
    }
    debug!(
        rows = files.height(),
        columns = files.width(),
        "built file relation"
    );
    Ok(Some(files))
}
