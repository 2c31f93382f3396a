//! Present/non-empty node filtering.
//!
//! A candidate node participates in the conversion only when its sheet exists
//! and carries at least one non-blank cell outside the bookkeeping `type`
//! column. An absent sheet and a present-but-empty sheet are equivalent:
//! both are simply skipped by every downstream join.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::debug;

use cds_model::CCDI_NODE_ORDER;

/// Result of the candidate-node scan, preserving hierarchy order.
#[derive(Debug, Clone, Default)]
pub struct NodeFilterOutcome {
    /// Nodes present with data, in `CCDI_NODE_ORDER`.
    pub present: Vec<String>,
    /// Candidate nodes that were absent or empty.
    pub removed: Vec<String>,
}

impl NodeFilterOutcome {
    pub fn is_present(&self, node: &str) -> bool {
        self.present.iter().any(|n| n == node)
    }
}

/// Does the sheet hold any data once the `type` column is ignored?
///
/// The `type` column stays in the retained table; it is excluded from the
/// emptiness test only.
pub fn node_has_data(frame: &DataFrame) -> bool {
    for column in frame.get_columns() {
        if column.name().as_str() == "type" {
            continue;
        }
        let Ok(values) = column.str() else {
            continue;
        };
        if values
            .into_iter()
            .any(|value| value.is_some_and(|v| !v.trim().is_empty()))
        {
            return true;
        }
    }
    false
}

/// Scan the fixed candidate list against the loaded sheets.
pub fn filter_populated_nodes(tables: &BTreeMap<String, DataFrame>) -> NodeFilterOutcome {
    let mut outcome = NodeFilterOutcome::default();
    for node in CCDI_NODE_ORDER {
        match tables.get(node) {
            Some(frame) if node_has_data(frame) => {
                outcome.present.push(node.to_string());
            }
            Some(_) => {
                debug!(node, "dropping empty manifest node");
                outcome.removed.push(node.to_string());
            }
            None => {
                outcome.removed.push(node.to_string());
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| Series::new(name.into(), values).into())
                .collect(),
        )
        .expect("frame")
    }

    #[test]
    fn type_only_content_counts_as_empty() {
        let df = frame(vec![
            ("type", vec![Some("study")]),
            ("study_id", vec![None]),
        ]);
        assert!(!node_has_data(&df));
    }

    #[test]
    fn any_data_cell_keeps_the_node() {
        let df = frame(vec![
            ("type", vec![Some("study")]),
            ("study_id", vec![Some("S1")]),
        ]);
        assert!(node_has_data(&df));
    }
}
