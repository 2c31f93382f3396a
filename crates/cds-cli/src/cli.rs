//! CLI argument definitions for the CCDI to CDS converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ccdi-cds-convert",
    version,
    about = "CCDI to CDS Converter - Flatten a CCDI manifest into a CDS submission sheet",
    long_about = "Convert a CCDI dataset manifest workbook into a CDS submission\n\
                  metadata workbook.\n\n\
                  The manifest's hierarchical node sheets are joined into a single\n\
                  file-level table, mapped onto the CDS template columns, and written\n\
                  back into a copy of the template under a dated file name."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a CCDI manifest into a CDS submission workbook.
    Convert(ConvertArgs),

    /// List the CCDI manifest nodes the converter recognizes.
    Nodes,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// CCDI dataset manifest workbook (.xlsx).
    #[arg(short = 'f', long = "file", value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// CDS submission metadata template workbook (.xlsx).
    #[arg(short = 't', long = "template", value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Output directory for the converted workbook (default: next to the manifest).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Flatten, map, and report without writing the output workbook.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
