//! End-to-end manifest flattening.
//!
//! Joins the ancestor snapshots, unions the file nodes, builds one
//! JoinedAdd-set per ancestor level the file relation can link to, and stacks
//! the add-sets into the flattened relation the field mapper consumes.
//!
//! Join policy (inherited from the established conversion and deliberately
//! preserved): every add-set keeps the file rows whose own linking column is
//! populated, with no cross-level precedence. A file row carrying keys for
//! more than one ancestor level therefore appears once per populated key;
//! that duplication is intentional, not an error.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::functions::concat_df_diagonal;
use polars::prelude::DataFrame;
use tracing::{debug, info};

use cds_ingest::node_filter::{NodeFilterOutcome, filter_populated_nodes};
use cds_model::HierarchyLevel;

use crate::file_relation::build_file_relation;
use crate::frame_utils::{has_column, non_empty_mask};
use crate::hierarchy::{
    Snapshots, StepOutcome, StepRecord, build_snapshots, right_join_files,
};
use crate::reconcile::{ReconcilePreference, reconcile_collisions};

/// Flattened relation plus the run's audit trail.
#[derive(Debug, Clone)]
pub struct FlattenResult {
    /// One row per (ancestor, file) pairing, reconciled.
    pub frame: DataFrame,
    /// Which join steps ran, were skipped, or lacked keys.
    pub trace: Vec<StepRecord>,
    /// Outcome of the candidate-node scan.
    pub nodes: NodeFilterOutcome,
}

impl FlattenResult {
    pub fn record_count(&self) -> usize {
        self.frame.height()
    }
}

fn level_add_set(
    snapshot: &DataFrame,
    files: &DataFrame,
    level: HierarchyLevel,
) -> Result<Option<DataFrame>> {
    let key = level.linking_column();
    if !has_column(files, key) || !has_column(snapshot, key) {
        return Ok(None);
    }
    let mut joined = right_join_files(snapshot, files, key)?;
    reconcile_collisions(&mut joined, ReconcilePreference::Accumulated)?;
    let mask = non_empty_mask(&joined, key)?;
    let add_set = joined
        .filter(&mask)
        .with_context(|| format!("filter {key} add-set"))?;
    Ok(Some(add_set))
}

fn snapshot_for(snapshots: &Snapshots, level: HierarchyLevel) -> &DataFrame {
    match level {
        HierarchyLevel::Sample => &snapshots.sample,
        HierarchyLevel::Participant => &snapshots.participant,
        HierarchyLevel::Study => &snapshots.study,
    }
}

/// Flatten a loaded manifest into the relation consumed by the field mapper.
pub fn flatten_manifest(tables: &BTreeMap<String, DataFrame>) -> Result<FlattenResult> {
    let nodes = filter_populated_nodes(tables);
    info!(
        present = nodes.present.len(),
        removed = nodes.removed.len(),
        "scanned manifest nodes"
    );

    let mut trace = Vec::new();
    let snapshots = build_snapshots(&nodes.present, tables, &mut trace)?;

    let files = build_file_relation(&nodes.present, tables)?;
    let mut add_sets = Vec::new();
    if let Some(files) = &files {
        for level in HierarchyLevel::FILE_JOIN_ORDER {
            let label = format!("file join on {}", level.linking_column());
            match level_add_set(snapshot_for(&snapshots, level), files, level)? {
                Some(add_set) => {
                    debug!(level = level.name(), rows = add_set.height(), "built add-set");
                    trace.push(StepRecord {
                        step: label,
                        outcome: StepOutcome::Joined {
                            rows: add_set.height(),
                        },
                    });
                    if add_set.height() > 0 {
                        add_sets.push(add_set);
                    }
                }
                None => {
                    trace.push(StepRecord {
                        step: label,
                        outcome: StepOutcome::KeyMissing,
                    });
                }
            }
        }
    }

    let frame = if add_sets.is_empty() {
        DataFrame::default()
    } else {
        concat_df_diagonal(&add_sets).context("stack add-sets")?
    };
    info!(rows = frame.height(), "flattened manifest");

    Ok(FlattenResult {
        frame,
        trace,
        nodes,
    })
}
