//! Preview handles for selected images
//!
//! A handle stays registered for as long as it is alive and is revoked when
//! dropped, so replacing or clearing a file can never leak a preview.

use satlens_core::models::UploadedFile;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Tracks which previews are currently live
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for a file
    pub fn create(&self, file: &UploadedFile) -> PreviewHandle {
        let url = format!("preview:{}/{}", Uuid::new_v4(), file.name);
        self.lock().insert(url.clone());
        tracing::debug!(url = %url, "Created preview");

        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url) {
            tracing::debug!(url = %url, "Revoked preview");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A live preview; revoked on drop
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> UploadedFile {
        UploadedFile::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_handle_is_revoked_on_drop() {
        let registry = PreviewRegistry::new();
        let handle = registry.create(&image("a.png"));
        let url = handle.url().to_string();

        assert!(registry.is_live(&url));
        assert_eq!(registry.live_count(), 1);

        drop(handle);

        assert!(!registry.is_live(&url));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_previews_are_distinct() {
        let registry = PreviewRegistry::new();
        let a = registry.create(&image("same.png"));
        let b = registry.create(&image("same.png"));

        assert_ne!(a.url(), b.url());
        assert_eq!(registry.live_count(), 2);
    }
}
