use clap::{Parser, Subcommand};
use satlens_core::models::ReportFormat;
use std::path::PathBuf;

/// SatLens - Satellite image analysis from the terminal
#[derive(Parser, Debug)]
#[command(name = "satlens")]
#[command(about = "Analyze satellite imagery and chat about the results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Analysis backend base URL (overrides SATLENS_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Model forwarded to the backend with uploads
    #[arg(long, global = true, value_name = "MODEL")]
    pub gpt_model: Option<String>,

    /// Configuration file (defaults to ./satlens.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload an image and wait for its analysis
    Analyze(AnalyzeArgs),

    /// Follow a running analysis by polling its status
    Track(TrackArgs),

    /// Ask questions about an analyzed image
    Chat(ChatArgs),

    /// Download the report for an analysis
    Report(ReportArgs),

    /// List previous analyses
    History(HistoryArgs),

    /// List image formats the backend accepts
    Formats,

    /// Check that the backend is up
    Health,

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze (JPEG, PNG, TIFF, ...)
    pub path: PathBuf,

    /// Also download a report in this format (pdf, csv, json)
    #[arg(long, value_name = "FORMAT")]
    pub report: Option<ReportFormat>,

    /// Directory for the downloaded report
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct TrackArgs {
    /// Analysis identifier returned by the backend
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Use canned replies instead of the backend
    #[arg(long)]
    pub demo: bool,

    /// Analysis the questions are about
    #[arg(long, value_name = "ID")]
    pub image_id: Option<String>,

    /// Send a single message and exit instead of starting a prompt
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Analysis identifier
    pub id: String,

    /// Report format (pdf, csv, json)
    #[arg(long, short = 'f', default_value = "pdf")]
    pub format: ReportFormat,

    /// Directory to write the report into
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Maximum number of analyses to list
    #[arg(long, short = 'n', default_value = "10")]
    pub limit: usize,
}
