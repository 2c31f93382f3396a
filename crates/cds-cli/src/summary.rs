use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cds_core::StepOutcome;

use crate::types::ConvertResult;

pub fn print_summary(result: &ConvertResult) {
    println!("Manifest: {}", result.manifest.display());
    match &result.output_path {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut nodes = Table::new();
    nodes.set_header(vec![
        header_cell("Node"),
        header_cell("Rows"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut nodes);
    align_column(&mut nodes, 1, CellAlignment::Right);
    for status in &result.nodes {
        let status_cell = if status.present {
            Cell::new("merged").fg(Color::Green)
        } else {
            dim_cell("absent or empty")
        };
        nodes.add_row(vec![
            Cell::new(&status.node),
            Cell::new(status.rows),
            status_cell,
        ]);
    }
    println!("{nodes}");

    let mut steps = Table::new();
    steps.set_header(vec![header_cell("Join step"), header_cell("Outcome")]);
    apply_table_style(&mut steps);
    for record in &result.steps {
        steps.add_row(vec![Cell::new(&record.step), outcome_cell(&record.outcome)]);
    }
    println!("{steps}");

    println!(
        "Records: {} ({} required cells backfilled)",
        result.records, result.filled_required_cells
    );

    if !result.messages.is_empty() {
        eprintln!("Mapping problems:");
        for message in &result.messages {
            eprintln!("- {message}");
        }
    }
}

fn outcome_cell(outcome: &StepOutcome) -> Cell {
    match outcome {
        StepOutcome::Joined { rows } => Cell::new(format!("joined ({rows} rows)")).fg(Color::Green),
        StepOutcome::NodeAbsent => dim_cell("skipped (node absent or empty)"),
        StepOutcome::KeyMissing => Cell::new("skipped (linking column missing)").fg(Color::Yellow),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
