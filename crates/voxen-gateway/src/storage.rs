//! Blob storage payloads: the file being uploaded, upload options with a
//! progress callback, and the public URL the gateway hands back.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{GatewayError, Result};

/// Progress callback, invoked with a percentage in `0.0..=100.0` zero or
/// more times while a transfer runs.
pub type ProgressFn = Arc<dyn Fn(f32) + Send + Sync>;

/// Public URL of an uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUrl {
    pub public_url: String,
}

/// A file staged for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GatewayError::Config(format!("Invalid file path: {}", path.display())))?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let content_type = content_type_for(&file_name).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes: Bytes::from(bytes),
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Options for one upload call.
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Overwrite an existing blob at the same path.
    pub upsert: bool,
    pub on_progress: Option<ProgressFn>,
}

impl UploadOptions {
    pub fn upsert() -> Self {
        Self {
            upsert: true,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Report progress if a callback is registered.
    pub fn progress(&self, percent: f32) {
        if let Some(ref cb) = self.on_progress {
            cb(percent);
        }
    }
}

/// Content type derived from a file extension. The accepted-type checks only
/// look at the `image/` and `video/` prefixes, so unknown extensions fall
/// back to a generic binary type.
fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_path_reads_bytes_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        tokio::fs::write(&path, b"fake-png").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "avatar.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.size(), 8);
    }

    #[test]
    fn unknown_extension_is_generic_binary() {
        assert_eq!(content_type_for("data.blob"), "application/octet-stream");
        assert_eq!(content_type_for("MOVIE.MP4"), "video/mp4");
    }

    #[test]
    fn progress_is_optional() {
        let opts = UploadOptions::upsert();
        opts.progress(50.0);

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let opts = UploadOptions::upsert().with_progress(Arc::new(move |p| {
            sink.lock().unwrap().push(p);
        }));
        opts.progress(25.0);
        opts.progress(100.0);
        assert_eq!(*seen.lock().unwrap(), vec![25.0, 100.0]);
    }
}
