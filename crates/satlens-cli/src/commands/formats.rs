//! Formats command implementation

use crate::commands::api_client;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use satlens_client::AnalysisBackend;
use satlens_core::config::LayeredConfig;

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = api_client(config);
    let formats = client
        .supported_formats()
        .await
        .context("Failed to fetch supported formats")?;

    if output.is_json() {
        return output.result(formats);
    }

    output.section("Supported Formats");
    for format in &formats {
        println!("  • {}", format);
    }

    Ok(())
}
