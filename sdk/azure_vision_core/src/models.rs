//! Common types shared across all Computer Vision crates.

use std::path::Path;

use bytes::Bytes;

use crate::error::{VisionError, VisionResult};

/// The image a request operates on.
///
/// Remote images are sent as a JSON body `{"url": ...}`; in-memory images are
/// sent as `application/octet-stream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A publicly reachable image URL.
    Url(String),
    /// Raw image bytes (JPEG, PNG, GIF or BMP).
    Bytes(Bytes),
}

impl ImageSource {
    /// Create a source from a remote URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Create a source from in-memory bytes.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self::Bytes(data.into())
    }

    /// Read a local image file.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Io`] carrying the path if the file cannot be read.
    pub async fn from_file(path: impl AsRef<Path>) -> VisionResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|source| VisionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read local image");
        Ok(Self::Bytes(Bytes::from(data)))
    }

    /// Short label for logs: the URL, or the byte length for local images.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Bytes(data) => format!("<{} bytes>", data.len()),
        }
    }

    /// Validate that the source is usable for a request.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Builder`] for an empty URL or empty image data.
    pub fn validate(&self) -> VisionResult<()> {
        match self {
            Self::Url(url) if url.is_empty() => {
                Err(VisionError::Builder("image url must not be empty".into()))
            }
            Self::Bytes(data) if data.is_empty() => {
                Err(VisionError::Builder("image data must not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}
