//! Declarative CCDI→CDS field-mapping rule table.
//!
//! Each rule reads zero or more source columns from the flattened join result
//! and populates destination columns of the CDS template. The rule shapes are
//! the compatibility surface between the flattening core and the business
//! mapping; the catalog itself is the fixed CCDI/CDS property equivalency
//! set.

use serde::{Deserialize, Serialize};

/// Honorific tokens stripped from the front of a personnel name before
/// first/middle/last assignment.
pub const NAME_PREFIXES: [&str; 13] = [
    "Dr.", "Dr", "Mr.", "Mr", "Mrs.", "Mrs", "Ms.", "Ms", "Miss", "Sir", "Dame", "Lord", "Lady",
];

/// What a study-wide aggregate does when the distinct non-null value set is
/// not usable as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManyValuePolicy {
    /// More than one distinct value: concatenate distinct values with `;`.
    JoinSemicolon,
    /// More than one distinct value: use the fallback, same as the empty case.
    Fallback,
}

/// Value used when an aggregate cannot resolve to a single broadcast value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFallback {
    /// A fixed literal broadcast to every row.
    Literal(String),
    /// Per-row copy of another source column.
    Column(String),
}

/// One mapping rule: destination column(s), shape, and source column(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldRule {
    /// Copy the source column when it exists in the flattened relation.
    Direct { target: String, source: String },

    /// Copy the first listed source column that exists. When none does and
    /// `report_missing` is set, the mapper reports a non-fatal message.
    FirstAvailable {
        target: String,
        sources: Vec<String>,
        report_missing: bool,
    },

    /// Study-wide aggregate: exactly one distinct non-null value broadcasts
    /// to every row; otherwise `on_many`/`fallback` decide.
    Aggregate {
        target: String,
        source: String,
        on_many: ManyValuePolicy,
        fallback: AggregateFallback,
    },

    /// Decompose a full-name column into first/middle/last destinations,
    /// applied per distinct value and broadcast to matching rows.
    PersonName {
        source: String,
        first_target: String,
        middle_target: String,
        last_target: String,
    },

    /// Copy `target` directly when present; otherwise derive it from the acl
    /// column's `['...` format contract.
    AuthzFromAcl { target: String, acl_source: String },
}

impl FieldRule {
    /// Destination columns this rule writes.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            FieldRule::Direct { target, .. }
            | FieldRule::FirstAvailable { target, .. }
            | FieldRule::Aggregate { target, .. }
            | FieldRule::AuthzFromAcl { target, .. } => vec![target],
            FieldRule::PersonName {
                first_target,
                middle_target,
                last_target,
                ..
            } => vec![first_target, middle_target, last_target],
        }
    }
}

fn direct(target: &str, source: &str) -> FieldRule {
    FieldRule::Direct {
        target: target.to_string(),
        source: source.to_string(),
    }
}

/// The fixed CCDI→CDS property equivalency catalog.
pub fn cds_field_rules() -> Vec<FieldRule> {
    vec![
        // study and study modifiers
        direct("phs_accession", "phs_accession"),
        direct("study_acronym", "study_acronym"),
        direct("acl", "acl"),
        direct("email", "email_address"),
        direct("role_or_affiliation", "personnel_type"),
        direct("title", "study_short_title"),
        FieldRule::AuthzFromAcl {
            target: "authz".to_string(),
            acl_source: "acl".to_string(),
        },
        FieldRule::Aggregate {
            target: "experimental_strategy_and_data_subtype".to_string(),
            source: "experimental_strategy_and_data_subtype".to_string(),
            on_many: ManyValuePolicy::JoinSemicolon,
            fallback: AggregateFallback::Literal("Sequencing".to_string()),
        },
        FieldRule::Aggregate {
            target: "study_data_types".to_string(),
            source: "study_data_types".to_string(),
            on_many: ManyValuePolicy::JoinSemicolon,
            fallback: AggregateFallback::Literal("Genomics".to_string()),
        },
        FieldRule::Aggregate {
            target: "study_name".to_string(),
            source: "study_name".to_string(),
            on_many: ManyValuePolicy::Fallback,
            fallback: AggregateFallback::Column("study_short_title".to_string()),
        },
        // The literal 1 covers both the empty and the multi-value distinct
        // set; the multi-value case is intentional, see mapping tests.
        FieldRule::Aggregate {
            target: "number_of_participants".to_string(),
            source: "number_of_participants".to_string(),
            on_many: ManyValuePolicy::Fallback,
            fallback: AggregateFallback::Literal("1".to_string()),
        },
        FieldRule::Aggregate {
            target: "number_of_samples".to_string(),
            source: "number_of_samples".to_string(),
            on_many: ManyValuePolicy::Fallback,
            fallback: AggregateFallback::Literal("1".to_string()),
        },
        FieldRule::PersonName {
            source: "personnel_name".to_string(),
            first_target: "first_name".to_string(),
            middle_target: "middle_name".to_string(),
            last_target: "last_name".to_string(),
        },
        // participant
        direct("participant_id", "participant_id"),
        // diagnosis: source column name depends on the CCDI model version
        FieldRule::FirstAvailable {
            target: "primary_diagnosis".to_string(),
            sources: vec![
                "diagnosis_icd_o".to_string(),
                "diagnosis_classification".to_string(),
            ],
            report_missing: true,
        },
        // sample; anatomic site is the closest approximation for sample_type
        direct("sample_id", "sample_id"),
        direct("sample_type", "anatomic_site"),
        // file
        direct("file_name", "file_name"),
        direct("file_size", "file_size"),
        direct("file_type", "file_type"),
        direct("file_url_in_cds", "file_url_in_cds"),
        direct("instrument_model", "instrument_model"),
        direct("library_id", "library_id"),
        direct("library_layout", "library_layout"),
        direct("library_selection", "library_selection"),
        direct("library_source", "library_source"),
        direct("library_strategy", "library_strategy"),
        direct("md5sum", "md5sum"),
        direct("platform", "platform"),
        direct("design_description", "design_description"),
        direct("reference_genome_assembly", "reference_genome_assembly"),
        FieldRule::FirstAvailable {
            target: "gender".to_string(),
            sources: vec!["gender".to_string(), "sex_at_birth".to_string()],
            report_missing: false,
        },
        direct("race", "race"),
        direct("ethnicity", "ethnicity"),
        direct("bases", "number_of_bp"),
        direct("number_of_reads", "number_of_reads"),
        direct("avg_read_length", "avg_read_length"),
        direct("coverage", "coverage"),
        direct("file_mapping_level", "file_mapping_level"),
        direct("adult_or_childhood_study", "adult_or_childhood_study"),
        direct("organism_species", "organism_species"),
        direct("methylation_platform", "methylation_platform"),
        direct("reporter_label", "reporter_label"),
        direct("age_at_diagnosis", "age_at_diagnosis"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_targets_are_unique_per_rule() {
        let rules = cds_field_rules();
        let mut seen = std::collections::BTreeSet::new();
        for rule in &rules {
            for target in rule.targets() {
                assert!(seen.insert(target.to_string()), "duplicate target {target}");
            }
        }
        assert!(seen.contains("primary_diagnosis"));
        assert!(seen.contains("last_name"));
    }

    #[test]
    fn rules_round_trip_as_json() {
        let rules = cds_field_rules();
        let json = serde_json::to_string(&rules).expect("serialize rules");
        let round: Vec<FieldRule> = serde_json::from_str(&json).expect("deserialize rules");
        assert_eq!(round, rules);
    }
}
