//! Output file naming.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// `<manifest stem>_CDS<YYYYMMDD>.xlsx`
pub fn output_file_name(manifest: &Path, today: NaiveDate) -> String {
    let stem = manifest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "manifest".to_string());
    format!("{stem}_CDS{}.xlsx", today.format("%Y%m%d"))
}

/// Place the dated output next to the manifest unless an explicit output
/// directory was given.
pub fn derive_output_path(
    manifest: &Path,
    output_dir: Option<&Path>,
    today: NaiveDate,
) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| manifest.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(output_file_name(manifest, today))
}
