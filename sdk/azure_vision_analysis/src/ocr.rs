//! Synchronous printed-text OCR (`POST /vision/v2.0/ocr`).
//!
//! Unlike [`read`](crate::read), OCR answers in a single request. Bounding
//! boxes come back as `"x,y,w,h"` strings; [`Rectangle::parse_ocr`] decodes
//! them.

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::VisionResult;
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::analyze::validate_language;
use crate::models::Rectangle;

/// Language value asking the service to detect the language itself.
pub const AUTO_DETECT_LANGUAGE: &str = "unk";

/// A recognized word.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrWord {
    #[serde(rename = "boundingBox")]
    pub bounding_box: String,
    pub text: String,
}

/// A recognized line of words.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrLine {
    #[serde(rename = "boundingBox")]
    pub bounding_box: String,
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

impl OcrLine {
    /// The words of the line joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The decoded bounding box.
    pub fn rectangle(&self) -> VisionResult<Rectangle> {
        Rectangle::parse_ocr(&self.bounding_box)
    }
}

/// A region of text lines.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrRegion {
    #[serde(rename = "boundingBox")]
    pub bounding_box: String,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

/// The result of an OCR request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// Detected BCP-47 language code.
    pub language: Option<String>,
    /// Angle in degrees the text is rotated by.
    pub text_angle: Option<f64>,
    /// Orientation of the text: `Up`, `Down`, `Left`, `Right` or `NotDetected`.
    pub orientation: Option<String>,
    #[serde(default)]
    pub regions: Vec<OcrRegion>,
}

impl OcrResult {
    /// All lines in reading order, across regions.
    pub fn lines(&self) -> impl Iterator<Item = &OcrLine> {
        self.regions.iter().flat_map(|r| r.lines.iter())
    }
}

/// Recognize printed text in an image.
///
/// `language` defaults to [`AUTO_DETECT_LANGUAGE`]. With `detect_orientation`
/// set the service corrects rotated images before recognition.
#[tracing::instrument(
    name = "vision::ocr::recognize_printed_text",
    skip(client, source),
    fields(source = %source.describe())
)]
pub async fn recognize_printed_text(
    client: &VisionClient,
    source: &ImageSource,
    detect_orientation: bool,
    language: Option<&str>,
) -> VisionResult<OcrResult> {
    tracing::debug!("recognizing printed text");

    let language = validate_language(language.unwrap_or(AUTO_DETECT_LANGUAGE).to_string())?;
    let path = client.vision_path(&format!(
        "ocr?language={language}&detectOrientation={detect_orientation}"
    ));

    let response = client.post_image(&path, source).await?;
    let result = response.json::<OcrResult>().await?;

    tracing::debug!(
        regions = result.regions.len(),
        language = ?result.language,
        "ocr complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use wiremock::matchers::{method, path as match_path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ocr_body() -> serde_json::Value {
        serde_json::json!({
            "language": "en",
            "textAngle": 0.0,
            "orientation": "Up",
            "regions": [{
                "boundingBox": "21,16,304,451",
                "lines": [
                    {"boundingBox": "28,16,288,41", "words": [
                        {"boundingBox": "28,16,288,41", "text": "NOTHING"}
                    ]},
                    {"boundingBox": "27,66,283,52", "words": [
                        {"boundingBox": "27,66,283,52", "text": "EXISTS"},
                        {"boundingBox": "100,66,50,52", "text": "EXCEPT"}
                    ]}
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_recognize_printed_text_defaults() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/ocr"))
            .and(query_param("language", "unk"))
            .and(query_param("detectOrientation", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ocr_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = recognize_printed_text(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            true,
            None,
        )
        .await
        .expect("should succeed");

        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(result.orientation.as_deref(), Some("Up"));
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "NOTHING");
        assert_eq!(lines[1].text(), "EXISTS EXCEPT");
        assert_eq!(
            lines[1].rectangle().unwrap(),
            Rectangle { x: 27, y: 66, w: 283, h: 52 }
        );
    }

    #[tokio::test]
    async fn test_recognize_printed_text_no_regions() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/ocr"))
            .and(query_param("language", "de"))
            .and(query_param("detectOrientation", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "language": "de",
                "orientation": "NotDetected",
                "regions": []
            })))
            .mount(&server)
            .await;

        let result = recognize_printed_text(
            &client,
            &ImageSource::bytes(vec![1u8, 2]),
            false,
            Some("de"),
        )
        .await
        .expect("should succeed");
        assert_eq!(result.lines().count(), 0);
    }
}
