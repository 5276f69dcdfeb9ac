use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of analysis requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Classification,
    Ndvi,
    Environmental,
    ChangeDetection,
}

impl AnalysisType {
    /// Every analysis type, in the order the upload form lists them
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::Classification,
        AnalysisType::Ndvi,
        AnalysisType::Environmental,
        AnalysisType::ChangeDetection,
    ];
}

/// Result of one analysis, as returned by the backend
///
/// Missing fields fall back to their defaults; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,

    pub filename: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub classification: Classification,

    pub ndvi: NdviStats,

    pub environmental: EnvironmentalScores,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_detection: Option<ChangeDetection>,

    /// Backend processing time in seconds
    pub processing_time: f64,

    pub timestamp: String,
}

/// Land-use classification block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Classification {
    /// Land-use label to percentage of image coverage
    pub land_use: HashMap<String, f64>,

    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Vegetation index statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NdviStats {
    pub mean: f64,
    pub std: f64,
    pub health_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentalScores {
    pub sustainability_score: f64,
    pub climate_impact: f64,
    pub biodiversity_index: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeDetection {
    pub change_percentage: f64,
    pub change_type: String,
    pub timespan: String,
}

/// One rendered land-use tile
#[derive(Debug, Clone, PartialEq)]
pub struct LandUseTile {
    pub label: String,
    pub share: f64,
    pub display: String,
}

impl AnalysisResult {
    /// Confidence as a whole percentage, e.g. 0.83 -> 83
    pub fn confidence_percent(&self) -> u32 {
        (self.classification.confidence * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Land-use tiles, largest share first
    pub fn land_use_tiles(&self) -> Vec<LandUseTile> {
        let mut tiles: Vec<LandUseTile> = self
            .classification
            .land_use
            .iter()
            .map(|(label, share)| LandUseTile {
                label: label.clone(),
                share: *share,
                display: format_share(*share),
            })
            .collect();

        tiles.sort_by(|a, b| {
            b.share
                .partial_cmp(&a.share)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        tiles
    }
}

/// Format a percentage with one decimal place, e.g. 60 -> "60.0%"
pub fn format_share(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Backend-side lifecycle of a long-running analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Completed | AnalysisState::Failed)
    }
}

/// Polled status of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStatus {
    pub status: AnalysisState,

    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub current_step: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
