use satlens_core::models::{AnalysisResult, ChatMessage, LandUseTile};
use serde::Serialize;
use tabled::Tabled;

/// Output for analyze and track commands
#[derive(Debug, Serialize)]
pub struct AnalysisOutput {
    pub result: AnalysisResult,
    pub confidence_percent: u32,
    pub report_path: Option<String>,
}

/// Output for one-shot chat
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub reply: String,
    pub transcript: Vec<ChatMessage>,
}

/// Output for report command
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub analysis_id: String,
    pub format: String,
    pub path: String,
    pub bytes: usize,
}

/// Output for health command
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub api_url: String,
    pub status: String,
    pub version: String,
}

/// One row of the land-use breakdown
#[derive(Debug, Serialize, Tabled)]
pub struct LandUseRow {
    #[tabled(rename = "Land Use")]
    pub label: String,
    #[tabled(rename = "Coverage")]
    pub coverage: String,
}

impl From<LandUseTile> for LandUseRow {
    fn from(tile: LandUseTile) -> Self {
        Self {
            label: tile.label,
            coverage: tile.display,
        }
    }
}

/// One row of the history listing
#[derive(Debug, Serialize, Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "File")]
    pub filename: String,
    #[tabled(rename = "Confidence")]
    pub confidence: String,
    #[tabled(rename = "Dominant Land Use")]
    pub dominant: String,
    #[tabled(rename = "Timestamp")]
    pub timestamp: String,
}

impl From<&AnalysisResult> for HistoryRow {
    fn from(result: &AnalysisResult) -> Self {
        let dominant = result
            .land_use_tiles()
            .into_iter()
            .next()
            .map(|tile| format!("{} ({})", tile.label, tile.display))
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: result.id.clone(),
            filename: result.filename.clone(),
            confidence: format!("{}%", result.confidence_percent()),
            dominant,
            timestamp: result.timestamp.clone(),
        }
    }
}

/// One row of the config listing
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
