//! Analyze command implementation

use crate::cli::AnalyzeArgs;
use crate::commands::api_client;
use crate::commands::report::save_report;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{AnalysisOutput, LandUseRow};
use crate::progress::{create_analysis_bar, follow};
use anyhow::{Context, Result};
use satlens_core::config::LayeredConfig;
use satlens_core::models::{format_share, AnalysisResult, UploadedFile};
use satlens_session::{Pacing, UploadSession, UploadState};

pub async fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let path_display = args.path.display().to_string();
    if !args.path.is_file() {
        return Err(errors::file_not_found(&path_display).into());
    }

    let file = UploadedFile::from_path(&args.path)
        .with_context(|| format!("Failed to read {}", path_display))?;
    let mime_type = file.mime_type.clone();

    let client = api_client(config);
    let mut session = UploadSession::new(Pacing::default());
    if !session.select_file(file) {
        return Err(errors::not_an_image(&path_display, &mime_type).into());
    }

    if !output.is_json() {
        if let Some(file) = session.file() {
            println!("Analyzing {} ({:.2} MB)", file.name, file.size_mb());
        }
    }

    let bar = create_analysis_bar(output.is_json());
    let renderer = tokio::spawn(follow(session.subscribe(), bar));
    let state = session.start_analysis(&client).await;
    renderer.await.context("Progress renderer stopped unexpectedly")?;

    if state != UploadState::Complete {
        let message = session.error().unwrap_or("Analysis failed");
        return Err(errors::analysis_failed(message).into());
    }

    let Some(result) = session.result().cloned() else {
        return Err(errors::analysis_failed("Analysis finished without a result").into());
    };

    let report_path = match args.report {
        Some(format) => {
            let bytes = session
                .download_report(&client, format)
                .await
                .context("Failed to download report")?;
            Some(save_report(&args.output, &result.id, format, &bytes)?)
        }
        None => None,
    };

    if output.is_json() {
        output.result(AnalysisOutput {
            confidence_percent: result.confidence_percent(),
            result,
            report_path: report_path.map(|p| p.display().to_string()),
        })?;
    } else {
        render_result(&result, output)?;
        if let Some(path) = report_path {
            output.success(format!("Report saved to {}", path.display()));
        }
    }

    Ok(())
}

/// Human summary of an analysis result
pub fn render_result(result: &AnalysisResult, output: &OutputWriter) -> Result<()> {
    output.section("Analysis Result");
    output.kv("ID", &result.id);
    if !result.filename.is_empty() {
        output.kv("File", &result.filename);
    }
    output.kv("Confidence", format!("{}%", result.confidence_percent()));
    if result.processing_time > 0.0 {
        output.kv("Processing Time", format!("{:.1}s", result.processing_time));
    }

    output.section("Land Use");
    let rows: Vec<LandUseRow> = result.land_use_tiles().into_iter().map(LandUseRow::from).collect();
    output.table(rows)?;

    output.section("Vegetation (NDVI)");
    output.kv("Mean", format!("{:.2}", result.ndvi.mean));
    output.kv("Std Dev", format!("{:.2}", result.ndvi.std));
    output.kv("Health Score", format!("{:.0}", result.ndvi.health_score));

    output.section("Environmental");
    let env = &result.environmental;
    output.kv("Sustainability", format!("{:.0}", env.sustainability_score));
    output.kv("Climate Impact", format!("{:.0}", env.climate_impact));
    output.kv("Biodiversity", format!("{:.0}", env.biodiversity_index));

    if let Some(change) = &result.change_detection {
        output.section("Change Detection");
        output.kv("Change", format_share(change.change_percentage));
        output.kv("Type", &change.change_type);
        output.kv("Timespan", &change.timespan);
    }

    if let Some(explanation) = &result.explanation {
        output.section("Explanation");
        println!("{}", explanation);
    }

    Ok(())
}
