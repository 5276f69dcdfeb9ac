//! Backend port definitions

use async_trait::async_trait;
use satlens_core::error::Result;
use satlens_core::models::{
    AnalysisResult, AnalysisStatus, ChatMessage, ChatResponse, HealthStatus, ReportFormat,
    UploadedFile,
};

/// Port for the external analysis backend
///
/// Implementations neither retry nor cache; every call maps to exactly one request.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Upload an image and run every analysis type on it
    async fn upload_image(&self, file: &UploadedFile) -> Result<AnalysisResult>;

    /// Fetch the status of a long-running analysis
    async fn analysis_status(&self, analysis_id: &str) -> Result<AnalysisStatus>;

    /// Ask a question about an analyzed image
    ///
    /// # Arguments
    /// * `image_id` - Analysis the question refers to
    /// * `message` - The question text
    /// * `history` - Transcript preceding the question
    async fn chat_with_image(
        &self,
        image_id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse>;

    /// Download a rendered report as raw bytes
    async fn download_report(&self, analysis_id: &str, format: ReportFormat) -> Result<Vec<u8>>;

    async fn supported_formats(&self) -> Result<Vec<String>>;

    async fn health_check(&self) -> Result<HealthStatus>;

    /// Most recent analyses, newest first
    async fn analysis_history(&self, limit: usize) -> Result<Vec<AnalysisResult>>;
}
