use indicatif::{ProgressBar, ProgressStyle};
use satlens_session::progress::MAX_PROGRESS;
use satlens_session::{ProgressSnapshot, UploadState};
use std::time::Duration;
use tokio::sync::watch;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a percentage bar for an analysis; hidden when output is JSON
pub fn create_analysis_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(MAX_PROGRESS as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n[{bar:40.cyan/blue}] {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}

/// Mirror session snapshots onto `pb` until the session reaches a terminal state
pub async fn follow(mut rx: watch::Receiver<ProgressSnapshot>, pb: ProgressBar) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        pb.set_position(snapshot.progress.round() as u64);
        if !snapshot.step.is_empty() {
            pb.set_message(snapshot.step.clone());
        }

        match snapshot.state {
            UploadState::Complete => {
                finish_success(&pb, &snapshot.step);
                return;
            }
            UploadState::Failed => {
                finish_error(&pb, &snapshot.step);
                return;
            }
            _ => {}
        }
    }

    pb.finish_and_clear();
}
