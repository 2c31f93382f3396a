//! End-to-end flattening tests over in-memory manifests.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, NamedFrom, Series};

use cds_core::{StepOutcome, build_snapshots, flatten_manifest};

fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    DataFrame::new(
        columns
            .into_iter()
            .map(|(name, values)| Series::new(name.into(), values).into())
            .collect(),
    )
    .expect("frame")
}

fn column(frame: &DataFrame, name: &str) -> Vec<Option<String>> {
    frame
        .column(name)
        .expect("column")
        .str()
        .expect("string column")
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn study_sheet() -> DataFrame {
    frame(vec![
        ("type", vec![Some("study")]),
        ("study_id", vec![Some("S1")]),
        ("phs_accession", vec![Some("phs000001")]),
        ("study_short_title", vec![Some("Short Title")]),
    ])
}

#[test]
fn study_level_files_join_on_study_id() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file"), Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam"), Some("b.bam")]),
            ("study.study_id", vec![Some("S1"), Some("S1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    assert_eq!(result.record_count(), 2);
    assert_eq!(
        column(&result.frame, "file_name"),
        vec![Some("a.bam".to_string()), Some("b.bam".to_string())]
    );
    // study properties broadcast onto every file row
    assert_eq!(
        column(&result.frame, "phs_accession"),
        vec![Some("phs000001".to_string()); 2]
    );

    let study_join = result
        .trace
        .iter()
        .find(|r| r.step == "file join on study_id")
        .expect("study join step");
    assert_eq!(study_join.outcome, StepOutcome::Joined { rows: 2 });
    let sample_join = result
        .trace
        .iter()
        .find(|r| r.step == "file join on sample_id")
        .expect("sample join step");
    assert_eq!(sample_join.outcome, StepOutcome::KeyMissing);
}

#[test]
fn present_but_empty_node_behaves_like_an_absent_one() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "participant".to_string(),
        frame(vec![
            ("type", vec![Some("participant")]),
            ("participant_id", vec![None]),
            ("study.study_id", vec![None]),
        ]),
    );
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    assert!(result.nodes.removed.contains(&"participant".to_string()));
    let participant_step = result
        .trace
        .iter()
        .find(|r| r.step == "join participant on study_id")
        .expect("participant step");
    assert_eq!(participant_step.outcome, StepOutcome::NodeAbsent);
    assert_eq!(result.record_count(), 1);
}

#[test]
fn missing_linking_column_skips_the_step() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    // populated participant sheet, but no foreign key back to the study
    tables.insert(
        "participant".to_string(),
        frame(vec![
            ("type", vec![Some("participant")]),
            ("participant_id", vec![Some("P1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    let participant_step = result
        .trace
        .iter()
        .find(|r| r.step == "join participant on study_id")
        .expect("participant step");
    assert_eq!(participant_step.outcome, StepOutcome::KeyMissing);
}

#[test]
fn file_with_two_keys_appears_once_per_level() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "participant".to_string(),
        frame(vec![
            ("type", vec![Some("participant")]),
            ("participant_id", vec![Some("P1")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );
    tables.insert(
        "sample".to_string(),
        frame(vec![
            ("type", vec![Some("sample")]),
            ("sample_id", vec![Some("SA1")]),
            ("anatomic_site", vec![Some("Lung")]),
            ("participant.participant_id", vec![Some("P1")]),
        ]),
    );
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam")]),
            ("sample.sample_id", vec![Some("SA1")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    // one row from the sample-level add-set, one from the study-level add-set
    assert_eq!(result.record_count(), 2);
    assert_eq!(
        column(&result.frame, "file_name"),
        vec![Some("a.bam".to_string()); 2]
    );
}

#[test]
fn sample_only_file_rows_appear_exactly_once() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "participant".to_string(),
        frame(vec![
            ("type", vec![Some("participant")]),
            ("participant_id", vec![Some("P1")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );
    tables.insert(
        "sample".to_string(),
        frame(vec![
            ("type", vec![Some("sample")]),
            ("sample_id", vec![Some("SA1")]),
            ("participant.participant_id", vec![Some("P1")]),
        ]),
    );
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam")]),
            ("sample.sample_id", vec![Some("SA1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    assert_eq!(result.record_count(), 1);
    // the sample-level snapshot carries the study properties down
    assert_eq!(
        column(&result.frame, "phs_accession"),
        vec![Some("phs000001".to_string())]
    );
}

#[test]
fn null_linking_values_are_filtered_per_level() {
    // both linking columns exist on the file sheet with some values, so the
    // per-row non-empty filter, not column absence, decides which add-set a
    // row lands in
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "participant".to_string(),
        frame(vec![
            ("type", vec![Some("participant")]),
            ("participant_id", vec![Some("P1")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );
    tables.insert(
        "sample".to_string(),
        frame(vec![
            ("type", vec![Some("sample")]),
            ("sample_id", vec![Some("SA1")]),
            ("participant.participant_id", vec![Some("P1")]),
        ]),
    );
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file"), Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam"), Some("b.bam")]),
            ("sample.sample_id", vec![Some("SA1"), None]),
            ("study.study_id", vec![None, Some("S1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    assert_eq!(result.record_count(), 2);
    let names = column(&result.frame, "file_name");
    assert_eq!(names.iter().filter(|n| n.as_deref() == Some("a.bam")).count(), 1);
    assert_eq!(names.iter().filter(|n| n.as_deref() == Some("b.bam")).count(), 1);

    let sample_join = result
        .trace
        .iter()
        .find(|r| r.step == "file join on sample_id")
        .expect("sample join step");
    assert_eq!(sample_join.outcome, StepOutcome::Joined { rows: 1 });
    let study_join = result
        .trace
        .iter()
        .find(|r| r.step == "file join on study_id")
        .expect("study join step");
    assert_eq!(study_join.outcome, StepOutcome::Joined { rows: 1 });
}

#[test]
fn snapshot_values_outrank_file_copies() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam")]),
            ("study_short_title", vec![Some("Stale Copy")]),
            ("study.study_id", vec![Some("S1")]),
        ]),
    );

    let result = flatten_manifest(&tables).expect("flatten");
    assert_eq!(
        column(&result.frame, "study_short_title"),
        vec![Some("Short Title".to_string())]
    );
}

#[test]
fn manifest_without_file_nodes_flattens_to_nothing() {
    let mut tables = BTreeMap::new();
    tables.insert("study".to_string(), study_sheet());

    let result = flatten_manifest(&tables).expect("flatten");
    assert_eq!(result.record_count(), 0);
}

#[test]
fn missing_study_node_is_fatal() {
    let mut tables = BTreeMap::new();
    tables.insert(
        "sequencing_file".to_string(),
        frame(vec![
            ("type", vec![Some("sequencing_file")]),
            ("file_name", vec![Some("a.bam")]),
        ]),
    );
    assert!(flatten_manifest(&tables).is_err());
}

#[test]
fn ancestor_chain_prefers_joined_child_values() {
    let mut tables = BTreeMap::new();
    tables.insert(
        "study".to_string(),
        frame(vec![
            ("type", vec![Some("study")]),
            ("study_id", vec![Some("S1")]),
            ("organism_species", vec![Some("old")]),
        ]),
    );
    tables.insert(
        "study_admin".to_string(),
        frame(vec![
            ("type", vec![Some("study_admin")]),
            ("study.study_id", vec![Some("S1")]),
            ("organism_species", vec![Some("Homo sapiens")]),
        ]),
    );

    let present = vec!["study".to_string(), "study_admin".to_string()];
    let mut trace = Vec::new();
    let snapshots = build_snapshots(&present, &tables, &mut trace).expect("snapshots");
    assert_eq!(
        column(&snapshots.study, "organism_species"),
        vec![Some("Homo sapiens".to_string())]
    );
    assert_eq!(trace[0].outcome, StepOutcome::Joined { rows: 1 });
}
