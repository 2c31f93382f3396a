use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("workbook {path} has no sheet named '{sheet}'")]
    SheetMissing { path: PathBuf, sheet: String },
    #[error("sheet '{sheet}' is missing required column '{column}'")]
    ColumnMissing { sheet: String, column: String },
    #[error("build frame for sheet '{sheet}': {source}")]
    Frame {
        sheet: String,
        #[source]
        source: polars::error::PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
