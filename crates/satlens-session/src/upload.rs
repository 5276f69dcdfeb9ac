//! Upload/analysis state machine
//!
//! `Idle` -> `FileSelected` -> `Analyzing` -> `Complete` | `Failed`. Progress
//! and the current step are published on a watch channel so a front-end can
//! render them while [`UploadSession::start_analysis`] is running.

use satlens_client::AnalysisBackend;
use satlens_core::error::{Result, SatlensError};
use satlens_core::models::{AnalysisResult, AnalysisState, ReportFormat, UploadedFile};
use std::time::Duration;
use tokio::sync::watch;

use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::progress::{
    Pacing, ProgressSimulator, ProgressSnapshot, COMPLETE_STEP, FAILED_STEP, MAX_PROGRESS,
    UPLOAD_STEP,
};

/// Message shown when an upload fails
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";

/// Message shown when status polling itself fails
pub const STATUS_CHECK_FAILED_MESSAGE: &str = "Failed to check analysis status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FileSelected,
    Analyzing,
    Complete,
    Failed,
}

impl UploadState {
    /// States in which a new file may be picked
    pub fn accepts_file(&self) -> bool {
        !matches!(self, UploadState::Analyzing)
    }
}

pub struct UploadSession {
    state: UploadState,
    file: Option<UploadedFile>,
    preview: Option<PreviewHandle>,
    result: Option<AnalysisResult>,
    error: Option<String>,
    analysis_id: Option<String>,
    pacing: Pacing,
    previews: PreviewRegistry,
    progress_tx: watch::Sender<ProgressSnapshot>,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}

impl UploadSession {
    pub fn new(pacing: Pacing) -> Self {
        Self::with_registry(pacing, PreviewRegistry::new())
    }

    /// Create a session that registers previews in `previews`
    pub fn with_registry(pacing: Pacing, previews: PreviewRegistry) -> Self {
        let (progress_tx, _) = watch::channel(ProgressSnapshot::default());
        Self {
            state: UploadState::Idle,
            file: None,
            preview: None,
            result: None,
            error: None,
            analysis_id: None,
            pacing,
            previews,
            progress_tx,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn analysis_id(&self) -> Option<&str> {
        self.analysis_id.as_deref()
    }

    pub fn progress(&self) -> f64 {
        self.progress_tx.borrow().progress
    }

    pub fn current_step(&self) -> String {
        self.progress_tx.borrow().step.clone()
    }

    /// Receive every progress, step, and state change
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress_tx.subscribe()
    }

    /// Pick a file; ignored unless it is an image and the session accepts files.
    ///
    /// Returns true when the session moved to `FileSelected`.
    pub fn select_file(&mut self, file: UploadedFile) -> bool {
        if !self.state.accepts_file() {
            tracing::debug!(filename = %file.name, "Ignoring file selected during analysis");
            return false;
        }

        if !file.is_image() {
            tracing::debug!(
                filename = %file.name,
                mime_type = %file.mime_type,
                "Ignoring non-image file"
            );
            return false;
        }

        tracing::info!(filename = %file.name, size = file.size(), "File selected");

        // Replacing the handle revokes the previous preview
        self.preview = Some(self.previews.create(&file));
        self.file = Some(file);
        self.result = None;
        self.error = None;
        self.analysis_id = None;
        self.publish(0.0, "");
        self.set_state(UploadState::FileSelected);
        true
    }

    /// Accept the first file of a multi-file drop, under the same rules as [`Self::select_file`]
    pub fn drop_files(&mut self, files: Vec<UploadedFile>) -> bool {
        match files.into_iter().next() {
            Some(first) => self.select_file(first),
            None => false,
        }
    }

    /// Discard the current file and result ("choose different file")
    pub fn clear_selection(&mut self) {
        if self.state.accepts_file() {
            self.reset();
        }
    }

    /// Return to `Idle`, dropping file, preview, result, and error
    pub fn reset(&mut self) {
        self.file = None;
        self.preview = None;
        self.result = None;
        self.error = None;
        self.analysis_id = None;
        self.publish(0.0, "");
        self.set_state(UploadState::Idle);
    }

    /// Upload the selected file while the progress animation runs.
    ///
    /// Only valid from `FileSelected`; otherwise nothing happens. Returns the
    /// state the session ended in.
    pub async fn start_analysis(&mut self, backend: &dyn AnalysisBackend) -> UploadState {
        if self.state != UploadState::FileSelected {
            tracing::debug!(state = ?self.state, "Ignoring analysis request");
            return self.state;
        }

        self.result = None;
        self.error = None;
        self.analysis_id = None;
        self.publish(0.0, UPLOAD_STEP);
        self.set_state(UploadState::Analyzing);

        let outcome = {
            let Some(file) = self.file.as_ref() else {
                return self.state;
            };
            let progress_tx = &self.progress_tx;

            let mut simulator = ProgressSimulator::new(self.pacing.clone());
            let animation = simulator.run(|progress, step| {
                progress_tx.send_modify(|snapshot| {
                    snapshot.progress = progress;
                    snapshot.step = step.to_string();
                });
            });
            let upload = backend.upload_image(file);
            tokio::pin!(animation);
            tokio::pin!(upload);

            let mut animation_done = false;
            loop {
                tokio::select! {
                    outcome = &mut upload => break outcome,
                    () = &mut animation, if !animation_done => animation_done = true,
                }
            }
        };

        match outcome {
            Ok(result) => self.finish_success(result).await,
            Err(e) => {
                tracing::warn!(error = %e, "Analysis upload failed");
                self.finish_failure(ANALYSIS_FAILED_MESSAGE.to_string()).await;
            }
        }

        self.state
    }

    /// Follow a long-running analysis by polling its status.
    ///
    /// Backend progress is mirrored but never moves backwards.
    pub async fn track_analysis(
        &mut self,
        backend: &dyn AnalysisBackend,
        analysis_id: &str,
        interval: Duration,
    ) -> UploadState {
        if self.state == UploadState::Analyzing {
            tracing::debug!(analysis_id = %analysis_id, "Already analyzing, not tracking");
            return self.state;
        }

        self.result = None;
        self.error = None;
        self.analysis_id = Some(analysis_id.to_string());
        self.publish(0.0, UPLOAD_STEP);
        self.set_state(UploadState::Analyzing);

        loop {
            let status = match backend.analysis_status(analysis_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(analysis_id = %analysis_id, error = %e, "Status check failed");
                    self.finish_failure(STATUS_CHECK_FAILED_MESSAGE.to_string()).await;
                    break;
                }
            };

            let progress = status.progress.clamp(0.0, MAX_PROGRESS).max(self.progress());
            let step = if status.current_step.is_empty() {
                self.current_step()
            } else {
                status.current_step.clone()
            };
            self.publish(progress, &step);

            if !status.status.is_terminal() {
                tokio::time::sleep(interval).await;
                continue;
            }

            match (status.status, status.result) {
                (AnalysisState::Completed, Some(result)) => self.finish_success(result).await,
                (AnalysisState::Completed, None) => {
                    tracing::warn!(analysis_id = %analysis_id, "Completed without a result");
                    self.finish_failure(FAILED_STEP.to_string()).await;
                }
                _ => {
                    let message = status.error.unwrap_or_else(|| FAILED_STEP.to_string());
                    self.finish_failure(message).await;
                }
            }
            break;
        }

        self.state
    }

    /// Download a report for the current analysis
    pub async fn download_report(
        &self,
        backend: &dyn AnalysisBackend,
        format: ReportFormat,
    ) -> Result<Vec<u8>> {
        let analysis_id = self
            .analysis_id
            .as_deref()
            .ok_or_else(|| SatlensError::validation("No analysis available for download"))?;

        backend.download_report(analysis_id, format).await
    }

    async fn finish_success(&mut self, result: AnalysisResult) {
        tracing::info!(analysis_id = %result.id, "Analysis complete");
        self.publish(MAX_PROGRESS, COMPLETE_STEP);
        self.analysis_id = Some(result.id.clone());
        self.result = Some(result);

        tokio::time::sleep(self.pacing.settle).await;
        self.set_state(UploadState::Complete);
    }

    async fn finish_failure(&mut self, message: String) {
        let progress = self.progress();
        self.publish(progress, FAILED_STEP);
        self.result = None;
        self.error = Some(message);

        tokio::time::sleep(self.pacing.settle).await;
        self.set_state(UploadState::Failed);
    }

    fn publish(&self, progress: f64, step: &str) {
        self.progress_tx.send_modify(|snapshot| {
            snapshot.progress = progress;
            snapshot.step = step.to_string();
        });
    }

    fn set_state(&mut self, state: UploadState) {
        self.state = state;
        self.progress_tx.send_modify(|snapshot| snapshot.state = state);
    }
}
