//! Ancestor-chain snapshot construction.
//!
//! The manifest hierarchy is walked as an explicit ordered list of optional
//! join steps rather than a fall-through conditional chain, so every run
//! leaves an audit trail of which steps actually joined, which nodes were
//! absent, and which joins were skipped for want of a key. Snapshots are
//! captured cumulatively: a level's snapshot is the accumulation at that
//! point in the walk even when the level's own node was skipped.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use polars::prelude::{
    DataFrame, IntoLazy, JoinArgs, JoinType, MaintainOrderJoin, col,
};
use tracing::debug;

use crate::frame_utils::{drop_bookkeeping, has_column, rename_linking_columns};
use crate::reconcile::{JOIN_SUFFIX, ReconcilePreference, reconcile_collisions};

/// One entry in the merge audit trail.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The join ran; `rows` is the accumulation height afterwards.
    Joined { rows: usize },
    /// The node's sheet was absent or empty; step skipped.
    NodeAbsent,
    /// One side lacked the linking column; step skipped.
    KeyMissing,
}

impl StepRecord {
    pub fn ran(&self) -> bool {
        matches!(self.outcome, StepOutcome::Joined { .. })
    }
}

/// Accumulated ancestor tables at each hierarchy level.
#[derive(Debug, Clone)]
pub struct Snapshots {
    pub study: DataFrame,
    pub participant: DataFrame,
    pub sample: DataFrame,
}

struct ChainStep {
    node: &'static str,
    key: &'static str,
    extra_drops: &'static [&'static str],
}

/// The fixed parent→child walk. Snapshot captures happen after
/// `study_personnel` (study level), `diagnosis` (participant level), and
/// `sample` (sample level).
const CHAIN_STEPS: [ChainStep; 5] = [
    ChainStep {
        node: "study_admin",
        key: "study_id",
        extra_drops: &["study.id"],
    },
    ChainStep {
        node: "study_personnel",
        key: "study_id",
        extra_drops: &["study.id"],
    },
    ChainStep {
        node: "participant",
        key: "study_id",
        extra_drops: &["study.id"],
    },
    ChainStep {
        node: "diagnosis",
        key: "participant_id",
        extra_drops: &["participant.id"],
    },
    ChainStep {
        node: "sample",
        key: "participant_id",
        extra_drops: &["participant.id"],
    },
];

const STUDY_SNAPSHOT_AFTER: &str = "study_personnel";
const PARTICIPANT_SNAPSHOT_AFTER: &str = "diagnosis";

/// Inner-join a child node onto the accumulation, suffixing the child's
/// collided columns, keeping the accumulation's row order.
pub(crate) fn inner_join_on(
    accumulation: &DataFrame,
    child: &DataFrame,
    key: &str,
) -> Result<DataFrame> {
    let mut args = JoinArgs::new(JoinType::Inner);
    args.suffix = Some(JOIN_SUFFIX.into());
    args.maintain_order = MaintainOrderJoin::Left;
    accumulation
        .clone()
        .lazy()
        .join(child.clone().lazy(), [col(key)], [col(key)], args)
        .collect()
        .with_context(|| format!("inner join on {key}"))
}

/// Right-outer-join the file relation onto an ancestor snapshot: every file
/// row survives, the snapshot's collided columns keep the base name, and the
/// file relation's row order is preserved.
pub(crate) fn right_join_files(
    snapshot: &DataFrame,
    files: &DataFrame,
    key: &str,
) -> Result<DataFrame> {
    let mut args = JoinArgs::new(JoinType::Right);
    args.suffix = Some(JOIN_SUFFIX.into());
    args.maintain_order = MaintainOrderJoin::Right;
    snapshot
        .clone()
        .lazy()
        .join(files.clone().lazy(), [col(key)], [col(key)], args)
        .collect()
        .with_context(|| format!("right join files on {key}"))
}

/// Walk the ancestor chain, producing the three level snapshots and the
/// audit trail of executed/skipped steps.
pub fn build_snapshots(
    present: &[String],
    tables: &BTreeMap<String, DataFrame>,
    trace: &mut Vec<StepRecord>,
) -> Result<Snapshots> {
    let study = tables
        .get("study")
        .filter(|_| present.iter().any(|n| n == "study"))
        .cloned();
    let Some(study) = study else {
        bail!("manifest has no populated 'study' node");
    };
    let mut accumulation = drop_bookkeeping(&study, &[]);

    let mut study_level: Option<DataFrame> = None;
    let mut participant_level: Option<DataFrame> = None;

    for step in &CHAIN_STEPS {
        let label = format!("join {} on {}", step.node, step.key);
        let outcome = if !present.iter().any(|n| n == step.node) {
            StepOutcome::NodeAbsent
        } else {
            let node_table = tables
                .get(step.node)
                .with_context(|| format!("table for present node {}", step.node))?;
            let mut child = drop_bookkeeping(node_table, step.extra_drops);
            rename_linking_columns(&mut child)?;
            if !has_column(&accumulation, step.key) || !has_column(&child, step.key) {
                StepOutcome::KeyMissing
            } else {
                let mut joined = inner_join_on(&accumulation, &child, step.key)?;
                reconcile_collisions(&mut joined, ReconcilePreference::Joined)?;
                let rows = joined.height();
                accumulation = joined;
                StepOutcome::Joined { rows }
            }
        };
        debug!(step = %label, outcome = ?outcome, "chain step");
        trace.push(StepRecord {
            step: label,
            outcome,
        });

        if step.node == STUDY_SNAPSHOT_AFTER {
            study_level = Some(accumulation.clone());
        }
        if step.node == PARTICIPANT_SNAPSHOT_AFTER {
            participant_level = Some(accumulation.clone());
        }
    }

    Ok(Snapshots {
        study: study_level.unwrap_or_else(|| accumulation.clone()),
        participant: participant_level.unwrap_or_else(|| accumulation.clone()),
        sample: accumulation,
    })
}
