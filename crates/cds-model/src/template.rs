use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Placeholder written into required destination cells that end the mapping
/// phase empty.
pub const REQUIRED_PLACEHOLDER: &str = "Not Applicable";

/// Destination schema extracted from the CDS submission template workbook.
///
/// `columns` is the header row of the `Metadata` sheet in template order;
/// `required` is the set of fields the `Dictionary` sheet marks mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdsTemplate {
    pub columns: Vec<String>,
    pub required: BTreeSet<String>,
}

impl CdsTemplate {
    pub fn new(columns: Vec<String>, required: impl IntoIterator<Item = String>) -> Self {
        Self {
            columns,
            required: required.into_iter().collect(),
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_required_fields() {
        let template = CdsTemplate::new(
            vec!["phs_accession".to_string(), "file_name".to_string()],
            vec!["phs_accession".to_string()],
        );
        assert!(template.is_required("phs_accession"));
        assert!(!template.is_required("file_name"));
        assert_eq!(template.column_count(), 2);
    }

    #[test]
    fn template_serializes() {
        let template = CdsTemplate::new(vec!["acl".to_string()], vec!["acl".to_string()]);
        let json = serde_json::to_string(&template).expect("serialize template");
        let round: CdsTemplate = serde_json::from_str(&json).expect("deserialize template");
        assert_eq!(round.columns, template.columns);
        assert!(round.is_required("acl"));
    }
}
