//! Multi-feature image analysis (`POST /vision/v2.0/analyze`).
//!
//! One call can return categories, tags, a description, faces, adult-content
//! scores, color information, image type, objects and brands, selected with
//! [`VisualFeature`]. Domain-specific [`Details`] (celebrities, landmarks) are
//! attached to the matching categories.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_vision_core::client::VisionClient;
//! use azure_vision_core::config::VisionConfig;
//! use azure_vision_analysis::analyze::{self, ImageAnalysisRequest, VisualFeature};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VisionClient::from_config(&VisionConfig::from_env()?)?;
//!
//! let request = ImageAnalysisRequest::builder()
//!     .url("https://example.com/image.jpg")
//!     .features(vec![VisualFeature::Faces, VisualFeature::Adult])
//!     .build()?;
//!
//! let result = analyze::analyze(&client, &request).await?;
//! for face in &result.faces {
//!     println!("age {}", face.age);
//! }
//! # Ok(())
//! # }
//! ```

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::{VisionError, VisionResult};
use azure_vision_core::models::ImageSource;
use serde::Deserialize;

use crate::models::{
    CelebrityResult, DetectedObject, FaceRectangle, ImageDescription, ImageMetadata, ImageTag,
    LandmarkResult, Rectangle,
};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A visual feature to extract from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFeature {
    /// Categorize content according to the 86-category taxonomy.
    Categories,
    /// Tag the image with content words.
    Tags,
    /// Describe the image with complete sentences.
    Description,
    /// Detect faces with age, gender and location.
    Faces,
    /// Detect clip art and line drawings.
    ImageType,
    /// Accent, dominant and black-and-white color information.
    Color,
    /// Adult and racy content scores.
    Adult,
    /// Detect objects with bounding boxes.
    Objects,
    /// Detect commercial brands with bounding boxes.
    Brands,
}

impl VisualFeature {
    /// Returns the API string representation of this feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Tags => "Tags",
            Self::Description => "Description",
            Self::Faces => "Faces",
            Self::ImageType => "ImageType",
            Self::Color => "Color",
            Self::Adult => "Adult",
            Self::Objects => "Objects",
            Self::Brands => "Brands",
        }
    }
}

/// Domain-specific detail to return alongside categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Details {
    Celebrities,
    Landmarks,
}

impl Details {
    /// Returns the API string representation of this detail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celebrities => "Celebrities",
            Self::Landmarks => "Landmarks",
        }
    }
}

/// A request to analyze an image.
///
/// ```rust
/// use azure_vision_analysis::analyze::{Details, ImageAnalysisRequest, VisualFeature};
///
/// let request = ImageAnalysisRequest::builder()
///     .url("https://example.com/image.jpg")
///     .features(vec![VisualFeature::Categories])
///     .details(vec![Details::Landmarks])
///     .build()
///     .expect("valid request");
/// ```
#[derive(Debug, Clone)]
pub struct ImageAnalysisRequest {
    source: ImageSource,
    features: Vec<VisualFeature>,
    details: Vec<Details>,
    language: Option<String>,
}

impl ImageAnalysisRequest {
    /// Creates a new builder for an image analysis request.
    pub fn builder() -> ImageAnalysisRequestBuilder {
        ImageAnalysisRequestBuilder::default()
    }

    /// Returns the image this request analyzes.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Returns the requested features.
    pub fn features(&self) -> &[VisualFeature] {
        &self.features
    }

    /// Returns the features as a comma-separated query parameter value.
    pub(crate) fn features_query_param(&self) -> String {
        join(self.features.iter().map(VisualFeature::as_str))
    }

    /// Builds the query string for the API request.
    pub(crate) fn query_string(&self) -> String {
        let mut params = Vec::new();
        if !self.features.is_empty() {
            params.push(format!("visualFeatures={}", self.features_query_param()));
        }
        if !self.details.is_empty() {
            params.push(format!(
                "details={}",
                join(self.details.iter().map(Details::as_str))
            ));
        }
        if let Some(ref lang) = self.language {
            params.push(format!("language={lang}"));
        }
        params.join("&")
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(",")
}

/// Builder for [`ImageAnalysisRequest`].
#[derive(Debug, Default)]
pub struct ImageAnalysisRequestBuilder {
    source: Option<ImageSource>,
    features: Vec<VisualFeature>,
    details: Vec<Details>,
    language: Option<String>,
}

impl ImageAnalysisRequestBuilder {
    /// Sets the image to analyze (required).
    pub fn source(mut self, source: ImageSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Analyze a remote image by URL.
    pub fn url(self, url: impl Into<String>) -> Self {
        self.source(ImageSource::url(url))
    }

    /// Sets the visual features to extract.
    pub fn features(mut self, features: Vec<VisualFeature>) -> Self {
        self.features = features;
        self
    }

    /// Sets the domain-specific details to return.
    pub fn details(mut self, details: Vec<Details>) -> Self {
        self.details = details;
        self
    }

    /// Sets the language for text output (e.g. `en`, `es`, `ja`, `pt`, `zh`).
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the request, validating all required fields.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Builder`] if:
    /// - the source is missing or empty
    /// - neither features nor details are requested
    /// - the language is empty or not a language tag
    pub fn build(self) -> VisionResult<ImageAnalysisRequest> {
        let source = self
            .source
            .ok_or_else(|| VisionError::Builder("source is required".into()))?;
        source.validate()?;

        if self.features.is_empty() && self.details.is_empty() {
            return Err(VisionError::Builder(
                "at least one visual feature or detail is required".into(),
            ));
        }

        let mut features = self.features;
        dedup_in_order(&mut features);
        let mut details = self.details;
        dedup_in_order(&mut details);

        let language = self.language.map(validate_language).transpose()?;

        Ok(ImageAnalysisRequest {
            source,
            features,
            details,
            language,
        })
    }
}

fn dedup_in_order<T: PartialEq + Copy>(values: &mut Vec<T>) {
    let mut seen = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.contains(v) {
            false
        } else {
            seen.push(*v);
            true
        }
    });
}

/// Validate a language tag used in a query string.
pub(crate) fn validate_language(language: String) -> VisionResult<String> {
    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(VisionError::Builder(format!(
            "language {language:?} is not a valid language tag"
        )));
    }
    Ok(language)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// The result of an analyze request. Fields are empty or `None` for features
/// that were not requested.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default)]
    pub categories: Vec<ImageCategory>,
    #[serde(default)]
    pub tags: Vec<ImageTag>,
    pub description: Option<ImageDescription>,
    #[serde(default)]
    pub faces: Vec<FaceDescription>,
    pub adult: Option<AdultInfo>,
    pub color: Option<ColorInfo>,
    pub image_type: Option<ImageType>,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub brands: Vec<DetectedBrand>,
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// A category from the 86-category taxonomy.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageCategory {
    /// Category name, e.g. `people_` or `building_`.
    pub name: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f64,
    /// Domain-specific details, when requested.
    pub detail: Option<CategoryDetail>,
}

/// Celebrities and landmarks attached to a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDetail {
    #[serde(default)]
    pub celebrities: Vec<CelebrityResult>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkResult>,
}

/// A detected face.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDescription {
    pub age: u32,
    pub gender: Option<String>,
    pub face_rectangle: FaceRectangle,
}

/// Adult and racy content classification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdultInfo {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub adult_score: f64,
    pub racy_score: f64,
}

/// Color information for the image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorInfo {
    pub dominant_color_foreground: String,
    pub dominant_color_background: String,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    /// Accent color as a hex string without the leading `#`.
    pub accent_color: String,
    #[serde(rename = "isBWImg")]
    pub is_bw_img: bool,
}

/// Clip art and line drawing classification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageType {
    /// Clip art likelihood, 0 (not clip art) to 3 (good clip art).
    pub clip_art_type: u8,
    /// 1 if the image is a line drawing, otherwise 0.
    pub line_drawing_type: u8,
}

/// Decoded [`ImageType::clip_art_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipArtType {
    NonClipArt,
    Ambiguous,
    Normal,
    Good,
    Unknown(u8),
}

impl ImageType {
    /// The clip art classification.
    pub fn clip_art(&self) -> ClipArtType {
        match self.clip_art_type {
            0 => ClipArtType::NonClipArt,
            1 => ClipArtType::Ambiguous,
            2 => ClipArtType::Normal,
            3 => ClipArtType::Good,
            other => ClipArtType::Unknown(other),
        }
    }

    /// Returns `true` if the image is a line drawing.
    pub fn is_line_drawing(&self) -> bool {
        self.line_drawing_type != 0
    }
}

/// A detected brand logo.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedBrand {
    pub name: String,
    pub confidence: f64,
    pub rectangle: Rectangle,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Analyze an image for the requested features.
///
/// # Tracing
///
/// Emits a span named `vision::analyze::analyze` with fields `features` and
/// `source`.
#[tracing::instrument(
    name = "vision::analyze::analyze",
    skip(client, request),
    fields(
        features = %request.features_query_param(),
        source = %request.source.describe(),
    )
)]
pub async fn analyze(
    client: &VisionClient,
    request: &ImageAnalysisRequest,
) -> VisionResult<ImageAnalysis> {
    tracing::debug!("analyzing image");

    let path = client.vision_path(&format!("analyze?{}", request.query_string()));
    let response = client.post_image(&path, &request.source).await?;
    let result = response.json::<ImageAnalysis>().await?;

    tracing::debug!(request_id = ?result.request_id, "image analysis complete");
    Ok(result)
}
