pub mod error;
pub mod node_filter;
pub mod polars_utils;
pub mod template;
pub mod workbook;

pub use error::{IngestError, Result};
pub use node_filter::{NodeFilterOutcome, filter_populated_nodes, node_has_data};
pub use polars_utils::{any_to_string, any_to_string_non_empty, format_numeric};
pub use template::read_template;
pub use workbook::{SheetTable, read_manifest, sheet_table_to_frame};
