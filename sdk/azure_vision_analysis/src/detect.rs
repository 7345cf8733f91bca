//! Object detection (`POST /vision/v2.0/detect`).

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::VisionResult;
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::models::{DetectedObject, ImageMetadata};

/// The result of an object detection request.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectResult {
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// Detect objects in an image.
#[tracing::instrument(
    name = "vision::detect::detect_objects",
    skip(client, source),
    fields(source = %source.describe())
)]
pub async fn detect_objects(
    client: &VisionClient,
    source: &ImageSource,
) -> VisionResult<DetectResult> {
    tracing::debug!("detecting objects");

    let response = client
        .post_image(&client.vision_path("detect"), source)
        .await?;
    let result = response.json::<DetectResult>().await?;

    tracing::debug!(objects = result.objects.len(), "object detection complete");
    Ok(result)
}
