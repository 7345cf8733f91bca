//! Image description (`POST /vision/v2.0/describe`).
//!
//! Returns one or more human-readable captions ranked by confidence, plus the
//! tag names the captions were generated from.

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::{VisionError, VisionResult};
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::analyze::validate_language;
use crate::models::{ImageDescription, ImageMetadata};

/// A request to describe an image.
#[derive(Debug, Clone)]
pub struct DescribeRequest {
    source: ImageSource,
    max_candidates: u32,
    language: Option<String>,
}

impl DescribeRequest {
    /// Creates a new builder for a describe request.
    pub fn builder() -> DescribeRequestBuilder {
        DescribeRequestBuilder::default()
    }

    /// Describe `source` with the service defaults.
    pub fn new(source: ImageSource) -> VisionResult<Self> {
        Self::builder().source(source).build()
    }

    pub(crate) fn query_string(&self) -> String {
        match self.language {
            Some(ref lang) => format!("maxCandidates={}&language={lang}", self.max_candidates),
            None => format!("maxCandidates={}", self.max_candidates),
        }
    }
}

/// Builder for [`DescribeRequest`].
#[derive(Debug, Default)]
pub struct DescribeRequestBuilder {
    source: Option<ImageSource>,
    max_candidates: Option<u32>,
    language: Option<String>,
}

impl DescribeRequestBuilder {
    /// Sets the image to describe (required).
    pub fn source(mut self, source: ImageSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Maximum number of captions to return. Defaults to 1.
    pub fn max_candidates(mut self, max_candidates: u32) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    /// Sets the caption language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Builder`] if the source is missing or empty,
    /// `max_candidates` is zero, or the language is invalid.
    pub fn build(self) -> VisionResult<DescribeRequest> {
        let source = self
            .source
            .ok_or_else(|| VisionError::Builder("source is required".into()))?;
        source.validate()?;

        let max_candidates = self.max_candidates.unwrap_or(1);
        if max_candidates == 0 {
            return Err(VisionError::Builder(
                "max_candidates must be at least 1".into(),
            ));
        }

        Ok(DescribeRequest {
            source,
            max_candidates,
            language: self.language.map(validate_language).transpose()?,
        })
    }
}

/// The result of a describe request.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeResult {
    #[serde(default)]
    pub description: ImageDescription,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// Generate captions for an image.
///
/// # Tracing
///
/// Emits a span named `vision::describe::describe` with fields
/// `max_candidates` and `source`.
#[tracing::instrument(
    name = "vision::describe::describe",
    skip(client, request),
    fields(max_candidates = request.max_candidates, source = %request.source.describe())
)]
pub async fn describe(
    client: &VisionClient,
    request: &DescribeRequest,
) -> VisionResult<DescribeResult> {
    tracing::debug!("describing image");

    let path = client.vision_path(&format!("describe?{}", request.query_string()));
    let response = client.post_image(&path, &request.source).await?;
    let result = response.json::<DescribeResult>().await?;

    tracing::debug!(captions = result.description.captions.len(), "describe complete");
    Ok(result)
}
