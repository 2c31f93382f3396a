use std::path::PathBuf;

use cds_core::StepRecord;

#[derive(Debug)]
pub struct ConvertResult {
    pub manifest: PathBuf,
    pub output_path: Option<PathBuf>,
    pub records: usize,
    pub filled_required_cells: usize,
    pub nodes: Vec<NodeStatus>,
    pub steps: Vec<StepRecord>,
    pub messages: Vec<String>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct NodeStatus {
    pub node: String,
    pub present: bool,
    pub rows: usize,
}
