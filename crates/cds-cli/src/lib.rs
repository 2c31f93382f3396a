//! CLI library components for the CCDI to CDS converter.

pub mod logging;
