//! Scripted in-memory backend shared by the session tests

#![allow(dead_code)]

use async_trait::async_trait;
use satlens_client::AnalysisBackend;
use satlens_core::error::{Result, SatlensError};
use satlens_core::models::{
    AnalysisResult, AnalysisStatus, ChatMessage, ChatResponse, HealthStatus, ReportFormat,
    UploadedFile,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the fake does when asked to analyze an upload
pub enum UploadBehavior {
    Succeed(AnalysisResult),
    FailWithStatus(u16),
    NetworkDown,
}

pub struct ScriptedBackend {
    pub upload: UploadBehavior,
    pub statuses: Mutex<VecDeque<Result<AnalysisStatus>>>,
    pub chat_reply: Option<String>,
    pub chat_calls: Mutex<Vec<(String, String, usize)>>,
    pub report: Vec<u8>,
}

impl ScriptedBackend {
    pub fn new(upload: UploadBehavior) -> Self {
        Self {
            upload,
            statuses: Mutex::new(VecDeque::new()),
            chat_reply: Some("Mostly cropland.".to_string()),
            chat_calls: Mutex::new(Vec::new()),
            report: b"label,share\nCropland,60\n".to_vec(),
        }
    }

    pub fn with_statuses(self, statuses: Vec<Result<AnalysisStatus>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn without_chat(mut self) -> Self {
        self.chat_reply = None;
        self
    }
}

/// The result from the "select a JPEG, backend answers a1" scenario
pub fn scenario_result() -> AnalysisResult {
    serde_json::from_value(serde_json::json!({
        "id": "a1",
        "classification": {
            "landUse": {"Cropland": 60, "Water": 15, "Urban": 25},
            "confidence": 0.83
        },
        "ndvi": {"mean": 0.62, "std": 0.04, "healthScore": 78}
    }))
    .unwrap()
}

pub fn jpeg(name: &str, size: usize) -> UploadedFile {
    UploadedFile::new(name, "image/jpeg", vec![0xAB; size])
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn upload_image(&self, _file: &UploadedFile) -> Result<AnalysisResult> {
        match &self.upload {
            UploadBehavior::Succeed(result) => Ok(result.clone()),
            UploadBehavior::FailWithStatus(status) => {
                Err(SatlensError::Http { status: *status, message: None })
            }
            UploadBehavior::NetworkDown => {
                Err(SatlensError::Network { message: "connection refused".to_string() })
            }
        }
    }

    async fn analysis_status(&self, _analysis_id: &str) -> Result<AnalysisStatus> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SatlensError::Http { status: 404, message: None }))
    }

    async fn chat_with_image(
        &self,
        image_id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse> {
        self.chat_calls.lock().unwrap().push((
            image_id.to_string(),
            message.to_string(),
            history.len(),
        ));

        match &self.chat_reply {
            Some(reply) => Ok(ChatResponse {
                message: reply.clone(),
                confidence: 0.9,
                sources: None,
            }),
            None => Err(SatlensError::Http { status: 502, message: None }),
        }
    }

    async fn download_report(&self, _analysis_id: &str, _format: ReportFormat) -> Result<Vec<u8>> {
        Ok(self.report.clone())
    }

    async fn supported_formats(&self) -> Result<Vec<String>> {
        Ok(vec!["jpeg".to_string(), "png".to_string()])
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        Ok(HealthStatus { status: "ok".to_string(), version: "test".to_string() })
    }

    async fn analysis_history(&self, _limit: usize) -> Result<Vec<AnalysisResult>> {
        Ok(Vec::new())
    }
}
