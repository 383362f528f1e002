// src/score/writer.rs

use std::path::Path;

use tracing::info;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::score::ScoreReport;

/// Write `report` as pretty JSON. The file is complete when this returns,
/// so anything launched afterwards can read it.
pub fn write_report(fs: &dyn FileSystem, path: &Path, report: &ScoreReport) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(report)?;
    json.push(b'\n');
    fs.write(path, &json)?;
    info!(path = ?path, nodes = report.summary.total, "score written");
    Ok(())
}
