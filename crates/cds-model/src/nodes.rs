//! Fixed CCDI entity hierarchy used by the flattening engine.
//!
//! The manifest walk is deliberately hard coded: the node order, the
//! linking-column renames, and the bookkeeping columns are part of the CCDI
//! model contract, and a fuzzier graph-walking approach tends to fail or eat
//! memory on denormalized manifests.

/// CCDI nodes consumed by the CDS conversion, in hierarchy order.
pub const CCDI_NODE_ORDER: [&str; 13] = [
    "study",
    "study_admin",
    "study_personnel",
    "participant",
    "diagnosis",
    "sample",
    "radiology_file",
    "sequencing_file",
    "clinical_measure_file",
    "methylation_array_file",
    "cytogenomic_file",
    "pathology_file",
    "single_cell_sequencing_file",
];

/// Concatenation order for the file-node union.
///
/// This is not the hierarchy order above; it matches the established output
/// row ordering of the conversion and must stay fixed for reproducibility.
pub const FILE_NODE_CONCAT_ORDER: [&str; 7] = [
    "radiology_file",
    "sequencing_file",
    "methylation_array_file",
    "cytogenomic_file",
    "pathology_file",
    "single_cell_sequencing_file",
    "clinical_measure_file",
];

/// Fully-qualified foreign-key columns renamed to short linking names before
/// any join.
pub const LINKING_COLUMN_RENAMES: [(&str, &str); 5] = [
    ("study.study_id", "study_id"),
    ("participant.participant_id", "participant_id"),
    ("sample.sample_id", "sample_id"),
    ("pdx.pdx_id", "pdx_id"),
    ("cell_line.cell_line_id", "cell_line_id"),
];

/// Columns carrying manifest bookkeeping rather than data.
pub const BOOKKEEPING_COLUMNS: [&str; 2] = ["type", "id"];

/// Ancestor row-reference columns stripped from the file relation.
pub const ANCESTOR_REFERENCE_COLUMNS: [&str; 5] = [
    "study.id",
    "participant.id",
    "sample.id",
    "pdx.id",
    "cell_line.id",
];

/// Returns true for the `*_file` leaf nodes that feed the file relation.
pub fn is_file_node(node: &str) -> bool {
    FILE_NODE_CONCAT_ORDER.contains(&node)
}

/// Ancestor levels a file row can link to, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HierarchyLevel {
    Sample,
    Participant,
    Study,
}

impl HierarchyLevel {
    /// Join order for the file-relation add-sets.
    pub const FILE_JOIN_ORDER: [HierarchyLevel; 3] = [
        HierarchyLevel::Sample,
        HierarchyLevel::Participant,
        HierarchyLevel::Study,
    ];

    /// The linking column a file row uses to reach this level.
    pub fn linking_column(self) -> &'static str {
        match self {
            HierarchyLevel::Sample => "sample_id",
            HierarchyLevel::Participant => "participant_id",
            HierarchyLevel::Study => "study_id",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HierarchyLevel::Sample => "sample",
            HierarchyLevel::Participant => "participant",
            HierarchyLevel::Study => "study",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_nodes_are_candidates() {
        for node in FILE_NODE_CONCAT_ORDER {
            assert!(CCDI_NODE_ORDER.contains(&node));
            assert!(is_file_node(node));
        }
        assert!(!is_file_node("study"));
    }

    #[test]
    fn file_join_order_is_most_specific_first() {
        assert_eq!(
            HierarchyLevel::FILE_JOIN_ORDER[0].linking_column(),
            "sample_id"
        );
        assert_eq!(
            HierarchyLevel::FILE_JOIN_ORDER[2].linking_column(),
            "study_id"
        );
    }
}
