//! Report command implementation

use crate::cli::ReportArgs;
use crate::commands::api_client;
use crate::output::OutputWriter;
use crate::output_types::ReportOutput;
use anyhow::{Context, Result};
use satlens_client::AnalysisBackend;
use satlens_core::config::LayeredConfig;
use satlens_core::models::ReportFormat;
use std::fs;
use std::path::{Path, PathBuf};

pub async fn execute(args: ReportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = api_client(config);
    let bytes = client
        .download_report(&args.id, args.format)
        .await
        .with_context(|| format!("Failed to download {} report for {}", args.format, args.id))?;

    let path = save_report(&args.output, &args.id, args.format, &bytes)?;

    if output.is_json() {
        output.result(ReportOutput {
            analysis_id: args.id,
            format: args.format.to_string(),
            path: path.display().to_string(),
            bytes: bytes.len(),
        })?;
    } else {
        output.success(format!("Report saved to {} ({} bytes)", path.display(), bytes.len()));
    }

    Ok(())
}

/// Write report bytes to `dir/analysis-{id}.{ext}`, creating `dir` if needed
pub fn save_report(dir: &Path, analysis_id: &str, format: ReportFormat, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(format.file_name(analysis_id));
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved report");

    Ok(path)
}
