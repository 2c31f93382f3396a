//! Tests for post-join column reconciliation.

use polars::prelude::{DataFrame, NamedFrom, Series};

use cds_core::{ReconcilePreference, reconcile_collisions};

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

#[test]
fn joined_preference_takes_the_fresh_side_per_row() {
    let mut df = frame(vec![
        ("v", vec![Some("a"), None, Some("c")]),
        ("v_y", vec![Some("x"), Some("y"), None]),
    ]);
    let reconciled =
        reconcile_collisions(&mut df, ReconcilePreference::Joined).expect("reconcile");
    assert_eq!(reconciled, 1);
    assert!(df.column("v_y").is_err());
    assert_eq!(
        column(&df, "v"),
        vec![
            Some("x".to_string()),
            Some("y".to_string()),
            Some("c".to_string())
        ]
    );
}

#[test]
fn accumulated_preference_keeps_the_base_side_per_row() {
    let mut df = frame(vec![
        ("v", vec![Some("a"), None, Some("c")]),
        ("v_y", vec![Some("x"), Some("y"), None]),
    ]);
    reconcile_collisions(&mut df, ReconcilePreference::Accumulated).expect("reconcile");
    assert_eq!(
        column(&df, "v"),
        vec![
            Some("a".to_string()),
            Some("y".to_string()),
            Some("c".to_string())
        ]
    );
}

#[test]
fn blank_strings_lose_to_real_values() {
    let mut df = frame(vec![
        ("v", vec![Some("  ")]),
        ("v_y", vec![Some("val")]),
    ]);
    reconcile_collisions(&mut df, ReconcilePreference::Accumulated).expect("reconcile");
    assert_eq!(column(&df, "v"), vec![Some("val".to_string())]);
}

#[test]
fn reconciliation_is_idempotent() {
    let mut df = frame(vec![
        ("v", vec![Some("a")]),
        ("v_y", vec![Some("x")]),
        ("w", vec![Some("keep")]),
    ]);
    let first = reconcile_collisions(&mut df, ReconcilePreference::Joined).expect("first");
    let second = reconcile_collisions(&mut df, ReconcilePreference::Joined).expect("second");
    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(column(&df, "w"), vec![Some("keep".to_string())]);
}

#[test]
fn suffixed_column_without_a_base_is_untouched() {
    let mut df = frame(vec![("legacy_y", vec![Some("x")])]);
    let reconciled =
        reconcile_collisions(&mut df, ReconcilePreference::Joined).expect("reconcile");
    assert_eq!(reconciled, 0);
    assert!(df.column("legacy_y").is_ok());
}
