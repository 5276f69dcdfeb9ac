use crate::error::Result;
use std::fs;
use std::path::Path;

const IMAGE_PREFIX: &str = "image/";
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file picked for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_from_name(&name);

        Ok(Self::new(name, mime_type, data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Size in megabytes, as shown next to the file name
    pub fn size_mb(&self) -> f64 {
        self.data.len() as f64 / 1024.0 / 1024.0
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with(IMAGE_PREFIX)
    }
}

/// Guess a MIME type from a file name
pub fn mime_from_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("scene.JPG"), "image/jpeg");
        assert_eq!(mime_from_name("scene.tif"), "image/tiff");
        assert_eq!(mime_from_name("notes.txt"), FALLBACK_MIME);
        assert_eq!(mime_from_name("no_extension"), FALLBACK_MIME);
    }

    #[test]
    fn test_from_path_reads_payload() {
        let mut file = Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let upload = UploadedFile::from_path(file.path()).unwrap();

        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.size(), 4);
        assert!(upload.is_image());
        assert!(upload.name.ends_with(".png"));
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(UploadedFile::from_path("/nonexistent/scene.png").is_err());
    }

    #[test]
    fn test_size_mb() {
        let upload = UploadedFile::new("a.jpg", "image/jpeg", vec![0; 2 * 1024 * 1024]);
        assert_eq!(upload.size_mb(), 2.0);
    }
}
