//! Track command implementation

use crate::cli::TrackArgs;
use crate::commands::analyze::render_result;
use crate::commands::api_client;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::AnalysisOutput;
use crate::progress::{create_analysis_bar, follow};
use anyhow::{Context, Result};
use satlens_core::config::LayeredConfig;
use satlens_session::{Pacing, UploadSession, UploadState};

pub async fn execute(args: TrackArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = api_client(config);
    let mut session = UploadSession::new(Pacing::default());

    let bar = create_analysis_bar(output.is_json());
    let renderer = tokio::spawn(follow(session.subscribe(), bar));
    let state = session.track_analysis(&client, &args.id, config.poll_interval()).await;
    renderer.await.context("Progress renderer stopped unexpectedly")?;

    if state != UploadState::Complete {
        let message = session.error().unwrap_or("Analysis failed");
        return Err(errors::analysis_failed(message).into());
    }

    let Some(result) = session.result().cloned() else {
        return Err(errors::analysis_failed("Analysis finished without a result").into());
    };

    if output.is_json() {
        output.result(AnalysisOutput {
            confidence_percent: result.confidence_percent(),
            result,
            report_path: None,
        })?;
    } else {
        render_result(&result, output)?;
    }

    Ok(())
}
