use std::{fmt, path::Path, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::AppError;

/// What a file input slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccept {
    /// `image/*`
    Image,
    /// `application/pdf`
    Pdf,
}

impl FileAccept {
    pub fn accepts(self, mime: &str) -> bool {
        match self {
            FileAccept::Image => mime.starts_with("image/"),
            FileAccept::Pdf => mime == "application/pdf",
        }
    }
}

impl fmt::Display for FileAccept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAccept::Image => f.write_str("image/*"),
            FileAccept::Pdf => f.write_str("application/pdf"),
        }
    }
}

/// A file chosen for upload, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct FormFile {
    pub file_name: String,
    pub mime: String,
    bytes: Arc<Vec<u8>>,
}

impl fmt::Debug for FormFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FormFile {
    /// Builds a file handle, sniffing the MIME type from the content and
    /// falling back to the file extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = detect_mime(&file_name, &bytes);
        FormFile {
            file_name,
            mime,
            bytes: Arc::new(bytes),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidFile(format!("{} has no file name", path.display())))?
            .to_string();

        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// Rejects the file unless its MIME type fits the slot.
    pub fn ensure_accepted(&self, accept: FileAccept) -> Result<(), AppError> {
        if accept.accepts(&self.mime) {
            Ok(())
        } else {
            Err(AppError::InvalidFile(format!(
                "{} ({}) is not {}",
                self.file_name, self.mime, accept
            )))
        }
    }

    /// Encodes the file as a `data:` URL for local preview.
    pub async fn preview_data_url(&self) -> Result<String, AppError> {
        let bytes = self.bytes();
        let mime = self.mime.clone();
        tokio::task::spawn_blocking(move || {
            format!("data:{};base64,{}", mime, STANDARD.encode(bytes.as_slice()))
        })
        .await
        .map_err(|e| AppError::Io(format!("preview task failed: {}", e)))
    }
}

fn detect_mime(file_name: &str, bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .or_else(|| mime_guess::from_path(file_name).first_raw().map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
