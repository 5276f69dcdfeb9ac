//! Health command implementation

use crate::commands::api_client;
use crate::output::OutputWriter;
use crate::output_types::HealthOutput;
use anyhow::{Context, Result};
use satlens_client::AnalysisBackend;
use satlens_core::config::LayeredConfig;

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = api_client(config);
    let health = client.health_check().await.context("Health check failed")?;

    if output.is_json() {
        return output.result(HealthOutput {
            api_url: client.base_url().to_string(),
            status: health.status,
            version: health.version,
        });
    }

    output.success(format!("Backend is up at {}", client.base_url()));
    output.kv("Status", &health.status);
    if !health.version.is_empty() {
        output.kv("Version", &health.version);
    }

    Ok(())
}
