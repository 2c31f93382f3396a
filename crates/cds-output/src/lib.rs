pub mod naming;
pub mod writer;

pub use naming::{derive_output_path, output_file_name};
pub use writer::write_output_workbook;
