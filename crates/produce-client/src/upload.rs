//! File payloads sent to the prediction service.

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::{ClientError, ClientResult};

/// Filename attached to a part when the caller gave none.
pub const DEFAULT_FILE_NAME: &str = "upload";

/// A single binary payload plus the metadata carried on its form part.
///
/// The client never inspects or mutates the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    bytes: Vec<u8>,
    file_name: Option<String>,
    mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            mime_type: None,
        }
    }

    /// Read a file from disk, naming the part after it and guessing the
    /// content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let mut file = Self::new(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            file.file_name = Some(name.to_string());
        }
        file.mime_type = guess_mime_type(path).map(str::to_string);
        Ok(file)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Convert into a multipart file part.
    pub(crate) fn into_part(self) -> ClientResult<Part> {
        let file_name = self
            .file_name
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let part = Part::bytes(self.bytes).file_name(file_name);

        match self.mime_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ClientError::InvalidUpload(format!("content type {mime:?}: {e}"))),
            None => Ok(part),
        }
    }
}

impl From<Vec<u8>> for UploadFile {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for UploadFile {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for UploadFile {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
