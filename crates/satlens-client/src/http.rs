use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use satlens_core::config::resolve_base_url;
use satlens_core::error::{Result, SatlensError};
use satlens_core::models::{
    AnalysisResult, AnalysisStatus, AnalysisType, ChatMessage, ChatRequest, ChatResponse,
    HealthStatus, ReportFormat, UploadedFile,
};
use serde::de::DeserializeOwned;

use crate::ports::AnalysisBackend;

/// Settings for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Model forwarded as `gptModel` on analysis uploads
    pub gpt_model: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: resolve_base_url(Some(base_url.as_ref()), None),
            gpt_model: None,
        }
    }

    pub fn with_gpt_model(mut self, model: impl Into<String>) -> Self {
        self.gpt_model = Some(model.into());
        self
    }
}

/// reqwest implementation of [`AnalysisBackend`]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        let raw = format!("{}{}", self.config.base_url, endpoint);
        Url::parse(&raw).map_err(|e| SatlensError::ConfigInvalid {
            key: "api_url".to_string(),
            reason: format!("Cannot build request URL '{}': {}", raw, e),
        })
    }

    /// URL for `/api/analysis/{id}/{action}` with the id escaped as one path segment
    fn analysis_url(&self, analysis_id: &str, action: &str) -> Result<Url> {
        let mut url = self.url("/api/analysis")?;
        url.path_segments_mut()
            .map_err(|_| SatlensError::ConfigInvalid {
                key: "api_url".to_string(),
                reason: format!("Base URL '{}' cannot have path segments", self.config.base_url),
            })?
            .push(analysis_id)
            .push(action);
        Ok(url)
    }

    /// Send a request and reject non-2xx responses
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response> {
        tracing::debug!(endpoint = %endpoint, "Sending backend request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint = %endpoint, error = %e, "API request failed");
            SatlensError::Network { message: e.to_string() }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "API request failed");
            return Err(SatlensError::Http {
                status: status.as_u16(),
                message: if body.is_empty() { None } else { Some(body) },
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| SatlensError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint)?;
        let response = self.send(endpoint, self.http.get(url)).await?;
        Self::decode(endpoint, response).await
    }
}

#[async_trait]
impl AnalysisBackend for ApiClient {
    async fn upload_image(&self, file: &UploadedFile) -> Result<AnalysisResult> {
        let endpoint = "/api/analyze";
        let mut url = self.url(endpoint)?;
        if let Some(model) = &self.config.gpt_model {
            url.query_pairs_mut().append_pair("gptModel", model);
        }

        let analysis_types = serde_json::to_string(&AnalysisType::ALL)
            .map_err(|e| SatlensError::validation(format!("Cannot encode analysis types: {}", e)))?;

        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                SatlensError::validation(format!("Invalid MIME type '{}': {}", file.mime_type, e))
            })?;

        let form = Form::new().part("file", part).text("analysis_types", analysis_types);

        tracing::info!(filename = %file.name, size = file.size(), "Uploading image for analysis");

        let response = self.send(endpoint, self.http.post(url).multipart(form)).await?;
        Self::decode(endpoint, response).await
    }

    async fn analysis_status(&self, analysis_id: &str) -> Result<AnalysisStatus> {
        let url = self.analysis_url(analysis_id, "status")?;
        let endpoint = url.path().to_string();
        let response = self.send(&endpoint, self.http.get(url)).await?;
        Self::decode(&endpoint, response).await
    }

    async fn chat_with_image(
        &self,
        image_id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse> {
        let endpoint = "/api/chat";
        let url = self.url(endpoint)?;
        let body = ChatRequest {
            image_id,
            message,
            conversation_history: history,
        };

        let response = self.send(endpoint, self.http.post(url).json(&body)).await?;
        Self::decode(endpoint, response).await
    }

    async fn download_report(&self, analysis_id: &str, format: ReportFormat) -> Result<Vec<u8>> {
        let mut url = self.analysis_url(analysis_id, "report")?;
        let endpoint = url.path().to_string();
        url.query_pairs_mut().append_pair("format", format.as_str());

        let response = self.send(&endpoint, self.http.get(url)).await?;
        let bytes = response.bytes().await.map_err(|e| SatlensError::Network {
            message: format!("Failed to read report body: {}", e),
        })?;

        Ok(bytes.to_vec())
    }

    async fn supported_formats(&self) -> Result<Vec<String>> {
        self.get_json("/api/formats").await
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        self.get_json("/api/health").await
    }

    async fn analysis_history(&self, limit: usize) -> Result<Vec<AnalysisResult>> {
        self.get_json(&format!("/api/analysis/history?limit={}", limit)).await
    }
}
