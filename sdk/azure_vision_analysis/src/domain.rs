//! Domain-specific models (`POST /vision/v2.0/models/{model}/analyze`).
//!
//! The service exposes two domain models: `celebrities` and `landmarks`.

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::VisionResult;
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::analyze::validate_language;
use crate::models::{CelebrityResult, ImageMetadata, LandmarkResult};

/// A domain-specific recognition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainModel {
    Celebrities,
    Landmarks,
}

impl DomainModel {
    /// Returns the model name used in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celebrities => "celebrities",
            Self::Landmarks => "landmarks",
        }
    }
}

impl std::fmt::Display for DomainModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized items; only the list for the requested model is populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainResult {
    #[serde(default)]
    pub celebrities: Vec<CelebrityResult>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkResult>,
}

/// The result of a domain model request.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainModelResults {
    #[serde(default)]
    pub result: DomainResult,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// Recognize domain-specific content (celebrities or landmarks).
///
/// # Tracing
///
/// Emits a span named `vision::domain::analyze_by_domain` with field `model`.
#[tracing::instrument(
    name = "vision::domain::analyze_by_domain",
    skip(client, source),
    fields(model = %model, source = %source.describe())
)]
pub async fn analyze_by_domain(
    client: &VisionClient,
    model: DomainModel,
    source: &ImageSource,
    language: Option<&str>,
) -> VisionResult<DomainModelResults> {
    tracing::debug!("analyzing image with domain model");

    let mut resource = format!("models/{}/analyze", model.as_str());
    if let Some(lang) = language {
        let lang = validate_language(lang.to_string())?;
        resource.push_str(&format!("?language={lang}"));
    }

    let response = client
        .post_image(&client.vision_path(&resource), source)
        .await?;
    let result = response.json::<DomainModelResults>().await?;

    tracing::debug!(
        celebrities = result.result.celebrities.len(),
        landmarks = result.result.landmarks.len(),
        "domain analysis complete"
    );
    Ok(result)
}
