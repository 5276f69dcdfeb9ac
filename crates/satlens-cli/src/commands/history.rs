//! History command implementation

use crate::cli::HistoryArgs;
use crate::commands::api_client;
use crate::output::OutputWriter;
use crate::output_types::HistoryRow;
use anyhow::{Context, Result};
use satlens_client::AnalysisBackend;
use satlens_core::config::LayeredConfig;

pub async fn execute(args: HistoryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = api_client(config);
    let analyses = client
        .analysis_history(args.limit)
        .await
        .context("Failed to fetch analysis history")?;

    if output.is_json() {
        return output.result(analyses);
    }

    output.section(format!("Recent Analyses ({})", analyses.len()));
    let rows: Vec<HistoryRow> = analyses.iter().map(HistoryRow::from).collect();
    output.table(rows)
}
