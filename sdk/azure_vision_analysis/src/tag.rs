//! Image tagging (`POST /vision/v2.0/tag`).

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::VisionResult;
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::analyze::validate_language;
use crate::models::{ImageMetadata, ImageTag};

/// The result of a tag request.
#[derive(Debug, Clone, Deserialize)]
pub struct TagResult {
    #[serde(default)]
    pub tags: Vec<ImageTag>,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// Tag an image with content words, optionally in `language`.
///
/// # Tracing
///
/// Emits a span named `vision::tag::tag`.
#[tracing::instrument(
    name = "vision::tag::tag",
    skip(client, source),
    fields(source = %source.describe())
)]
pub async fn tag(
    client: &VisionClient,
    source: &ImageSource,
    language: Option<&str>,
) -> VisionResult<TagResult> {
    tracing::debug!("tagging image");

    let path = match language {
        Some(lang) => {
            let lang = validate_language(lang.to_string())?;
            client.vision_path(&format!("tag?language={lang}"))
        }
        None => client.vision_path("tag"),
    };

    let response = client.post_image(&path, source).await?;
    let result = response.json::<TagResult>().await?;

    tracing::debug!(tags = result.tags.len(), "tagging complete");
    Ok(result)
}
