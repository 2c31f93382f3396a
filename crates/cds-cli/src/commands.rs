use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use tracing::{info, info_span};

use cds_core::flatten_manifest;
use cds_ingest::{read_manifest, read_template};
use cds_map::{backfill_required, map_fields};
use cds_model::{CCDI_NODE_ORDER, cds_field_rules, is_file_node};
use cds_output::{derive_output_path, write_output_workbook};

use crate::cli::ConvertArgs;
use crate::summary::apply_table_style;
use crate::types::{ConvertResult, NodeStatus};

pub fn run_nodes() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Node", "Role"]);
    apply_table_style(&mut table);
    for node in CCDI_NODE_ORDER {
        let role = if is_file_node(node) { "file" } else { "ancestor" };
        table.add_row(vec![node, role]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let convert_span = info_span!("convert", manifest = %args.manifest.display());
    let _convert_guard = convert_span.enter();
    let start = Instant::now();

    let template = read_template(&args.template)
        .with_context(|| format!("load CDS template {}", args.template.display()))?;
    let tables = read_manifest(&args.manifest)
        .with_context(|| format!("load CCDI manifest {}", args.manifest.display()))?;

    let flattened = flatten_manifest(&tables)?;

    let rules = cds_field_rules();
    let (mut output, report) = map_fields(&flattened.frame, &template, &rules)?;
    let filled_required_cells = backfill_required(&mut output, &template)?;

    let output_path = if args.dry_run {
        None
    } else {
        let today = Local::now().date_naive();
        let path = derive_output_path(&args.manifest, args.output_dir.as_deref(), today);
        write_output_workbook(&args.template, &path, &output)?;
        Some(path)
    };

    let nodes = CCDI_NODE_ORDER
        .iter()
        .map(|node| NodeStatus {
            node: (*node).to_string(),
            present: flattened.nodes.is_present(node),
            rows: tables.get(*node).map_or(0, polars::prelude::DataFrame::height),
        })
        .collect();

    info!(
        records = output.height(),
        filled_required_cells,
        duration_ms = start.elapsed().as_millis(),
        "conversion complete"
    );

    let has_errors = report.has_messages();
    Ok(ConvertResult {
        manifest: args.manifest.clone(),
        output_path,
        records: output.height(),
        filled_required_cells,
        nodes,
        steps: flattened.trace,
        messages: report.messages,
        has_errors,
    })
}
