//! Field-mapping rule execution.
//!
//! Consumes the flattened join relation and populates the CDS destination
//! columns per the declarative rule table. Mapping problems are never fatal:
//! they are collected into a [`MappingReport`] for the operator, and the
//! affected destination column is left empty for the required-field backfill
//! to close out.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::warn;

use cds_core::frame_utils::distinct_non_null;
use cds_model::{AggregateFallback, CdsTemplate, FieldRule, ManyValuePolicy};

use crate::person_name::decompose_person_name;

/// Non-fatal operator messages produced during mapping.
#[derive(Debug, Clone, Default)]
pub struct MappingReport {
    pub messages: Vec<String>,
}

impl MappingReport {
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.messages.push(message);
    }
}

/// Working store for destination columns before frame assembly.
struct OutputColumns {
    height: usize,
    columns: BTreeMap<String, Vec<Option<String>>>,
}

impl OutputColumns {
    fn new(template: &CdsTemplate, height: usize) -> Self {
        let columns = template
            .columns
            .iter()
            .map(|name| (name.clone(), vec![None; height]))
            .collect();
        Self { height, columns }
    }

    fn set(&mut self, target: &str, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.height);
        if let Some(slot) = self.columns.get_mut(target) {
            *slot = values;
        } else {
            warn!(target, "mapping target is not a template column; skipped");
        }
    }

    fn broadcast(&mut self, target: &str, value: &str) {
        let values = vec![Some(value.to_string()); self.height];
        self.set(target, values);
    }

    fn into_frame(self, template: &CdsTemplate) -> Result<DataFrame> {
        let mut series = Vec::with_capacity(template.columns.len());
        for name in &template.columns {
            let values = self
                .columns
                .get(name)
                .cloned()
                .unwrap_or_else(|| vec![None; self.height]);
            series.push(Series::new(name.as_str().into(), values).into());
        }
        DataFrame::new(series).context("assemble output frame")
    }
}

/// Pull a source column as trimmed optional strings; `None` when absent.
fn source_values(flattened: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(column) = flattened.column(name) else {
        return Ok(None);
    };
    let values = column
        .str()
        .with_context(|| format!("string column {name}"))?;
    Ok(Some(
        values
            .into_iter()
            .map(|value| {
                value.and_then(|v| {
                    let trimmed = v.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
            })
            .collect(),
    ))
}

fn apply_aggregate(
    flattened: &DataFrame,
    out: &mut OutputColumns,
    report: &mut MappingReport,
    target: &str,
    source: &str,
    on_many: &ManyValuePolicy,
    fallback: &AggregateFallback,
) -> Result<()> {
    let distinct = if flattened.column(source).is_ok() {
        distinct_non_null(flattened, source)?
    } else {
        Vec::new()
    };
    match distinct.len() {
        1 => out.broadcast(target, &distinct[0]),
        n if n > 1 && *on_many == ManyValuePolicy::JoinSemicolon => {
            out.broadcast(target, &distinct.join(";"));
        }
        _ => match fallback {
            AggregateFallback::Literal(value) => out.broadcast(target, value),
            AggregateFallback::Column(column) => match source_values(flattened, column)? {
                Some(values) => out.set(target, values),
                None => report.push(format!(
                    "cannot fill '{target}': fallback column '{column}' is missing"
                )),
            },
        },
    }
    Ok(())
}

fn apply_person_name(
    flattened: &DataFrame,
    out: &mut OutputColumns,
    source: &str,
    first_target: &str,
    middle_target: &str,
    last_target: &str,
) -> Result<()> {
    let Some(values) = source_values(flattened, source)? else {
        return Ok(());
    };
    let mut first = vec![None; values.len()];
    let mut middle = vec![None; values.len()];
    let mut last = vec![None; values.len()];
    for value in distinct_non_null(flattened, source)? {
        let name = decompose_person_name(&value);
        for (idx, cell) in values.iter().enumerate() {
            if cell.as_deref() == Some(value.as_str()) {
                first[idx].clone_from(&name.first);
                middle[idx].clone_from(&name.middle);
                last[idx].clone_from(&name.last);
            }
        }
    }
    out.set(first_target, first);
    out.set(middle_target, middle);
    out.set(last_target, last);
    Ok(())
}

/// The acl format contract: a CCDI acl is a bracketed list literal, e.g.
/// `['phs002430.c1']`, and the authz path reuses everything past the
/// opening `['`.
fn apply_authz(
    flattened: &DataFrame,
    out: &mut OutputColumns,
    report: &mut MappingReport,
    target: &str,
    acl_source: &str,
) -> Result<()> {
    if let Some(values) = source_values(flattened, target)? {
        out.set(target, values);
        return Ok(());
    }
    let acl_values = if flattened.column(acl_source).is_ok() {
        distinct_non_null(flattened, acl_source)?
    } else {
        Vec::new()
    };
    let Some(acl) = acl_values.first() else {
        report.push(format!(
            "cannot derive '{target}': no '{acl_source}' value is present"
        ));
        return Ok(());
    };
    if !acl.starts_with("['") {
        report.push(format!(
            "cannot derive '{target}': '{acl_source}' value '{acl}' does not start with \"['\""
        ));
        return Ok(());
    }
    out.broadcast(target, &format!("['/programs/{}", &acl[2..]));
    Ok(())
}

/// Run the rule table over the flattened relation, producing the output
/// frame in template column order plus the operator report.
pub fn map_fields(
    flattened: &DataFrame,
    template: &CdsTemplate,
    rules: &[FieldRule],
) -> Result<(DataFrame, MappingReport)> {
    let mut out = OutputColumns::new(template, flattened.height());
    let mut report = MappingReport::default();

    for rule in rules {
        // A rule only applies when the template asks for at least one of its
        // destination columns; otherwise it must stay silent too, or a
        // trimmed-down template would report problems about fields it never
        // requested.
        if !rule
            .targets()
            .iter()
            .any(|target| template.columns.iter().any(|c| c == target))
        {
            continue;
        }
        match rule {
            FieldRule::Direct { target, source } => {
                if let Some(values) = source_values(flattened, source)? {
                    out.set(target, values);
                }
            }
            FieldRule::FirstAvailable {
                target,
                sources,
                report_missing,
            } => {
                let mut filled = false;
                for source in sources {
                    if let Some(values) = source_values(flattened, source)? {
                        out.set(target, values);
                        filled = true;
                        break;
                    }
                }
                if !filled && *report_missing {
                    report.push(format!(
                        "no '{target}' was transferred: none of [{}] is present",
                        sources.join(", ")
                    ));
                }
            }
            FieldRule::Aggregate {
                target,
                source,
                on_many,
                fallback,
            } => {
                apply_aggregate(
                    flattened,
                    &mut out,
                    &mut report,
                    target,
                    source,
                    on_many,
                    fallback,
                )?;
            }
            FieldRule::PersonName {
                source,
                first_target,
                middle_target,
                last_target,
            } => {
                apply_person_name(
                    flattened,
                    &mut out,
                    source,
                    first_target,
                    middle_target,
                    last_target,
                )?;
            }
            FieldRule::AuthzFromAcl { target, acl_source } => {
                apply_authz(flattened, &mut out, &mut report, target, acl_source)?;
            }
        }
    }

    let frame = out.into_frame(template)?;
    Ok((frame, report))
}
