//! One independently callable function per demonstration.
//!
//! Each demo makes its own request(s) and returns the console lines to print,
//! starting with a blank line and a heading that names the image.

use std::path::Path;

use azure_vision_analysis::analyze::{self, ImageAnalysis, ImageAnalysisRequest, VisualFeature};
use azure_vision_analysis::describe::{self, DescribeRequest};
use azure_vision_analysis::domain::{self, DomainModel};
use azure_vision_analysis::read::{self, PollOptions, TextRecognitionMode};
use azure_vision_analysis::{detect, ocr, tag};
use azure_vision_core::client::VisionClient;
use azure_vision_core::config::{VisionConfig, API_KEY_ENV, REGION_ENV};
use azure_vision_core::error::VisionResult;
use azure_vision_core::models::ImageSource;
use tokio_util::sync::CancellationToken;

use crate::format;

/// An image to demonstrate against, with how to refer to it in output.
#[derive(Debug, Clone)]
pub struct DemoImage {
    label: &'static str,
    location: String,
    source: ImageSource,
}

impl DemoImage {
    /// Load a local image file.
    pub async fn local(path: impl AsRef<Path>) -> VisionResult<Self> {
        let path = path.as_ref();
        let location = std::path::absolute(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        Ok(Self {
            label: "local",
            location,
            source: ImageSource::from_file(path).await?,
        })
    }

    /// Refer to a remote image by URL.
    pub fn remote(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            label: "remote",
            location: url.clone(),
            source: ImageSource::url(url),
        }
    }

    /// The file path or URL of the image.
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Read the configuration, or produce the setup instructions to print.
pub fn config_from_env() -> Result<VisionConfig, String> {
    for variable in [API_KEY_ENV, REGION_ENV] {
        if !matches!(std::env::var(variable), Ok(value) if !value.is_empty()) {
            return Err(format::setup_instructions(variable));
        }
    }
    VisionConfig::from_env().map_err(|err| format!("\n{err}"))
}

fn heading(text: String) -> Vec<String> {
    vec![String::new(), text]
}

async fn analyze_for(
    client: &VisionClient,
    image: &DemoImage,
    feature: VisualFeature,
) -> VisionResult<ImageAnalysis> {
    let request = ImageAnalysisRequest::builder()
        .source(image.source.clone())
        .features(vec![feature])
        .build()?;
    analyze::analyze(client, &request).await
}

/// List the captions the service generates for the image.
pub async fn describe_image(client: &VisionClient, image: &DemoImage) -> VisionResult<Vec<String>> {
    let request = DescribeRequest::new(image.source.clone())?;
    let result = describe::describe(client, &request).await?;

    let mut out = heading(format!("Captions from {} image: ", image.label));
    out.extend(format::captions(&result.description.captions));
    Ok(out)
}

/// List the categories the image falls into.
pub async fn categorize_image(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::Categories).await?;

    let mut out = heading(format!("Categories from {} image: ", image.label));
    out.extend(format::categories(&result.categories));
    Ok(out)
}

/// List the content tags of the image.
pub async fn tag_image(client: &VisionClient, image: &DemoImage) -> VisionResult<Vec<String>> {
    let result = tag::tag(client, &image.source, None).await?;

    let mut out = heading(format!("Tags in the {} image: ", image.label));
    out.extend(format::tags(&result.tags));
    Ok(out)
}

/// List the gender, age and position of every face.
pub async fn detect_faces(client: &VisionClient, image: &DemoImage) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::Faces).await?;

    let mut out = heading(format!("Faces in the {} image: ", image.label));
    out.extend(format::faces(&result.faces));
    Ok(out)
}

/// List the adult and racy classification with its scores.
pub async fn detect_adult_content(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::Adult).await?;

    let mut out = heading(format!(
        "Analyzing {} image for adult or racy content ... ",
        image.label
    ));
    match result.adult {
        Some(ref adult) => out.extend(format::adult(adult)),
        None => out.push("No adult content classification returned.".into()),
    }
    Ok(out)
}

/// List the accent, dominant and black-and-white color information.
pub async fn detect_color_scheme(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::Color).await?;

    let mut out = heading(format!("Color scheme of the {} image: ", image.label));
    match result.color {
        Some(ref color) => out.extend(format::color(color)),
        None => out.push("No color information returned.".into()),
    }
    Ok(out)
}

/// List the celebrities and landmarks recognized in the image.
pub async fn detect_domain_content(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let celebs =
        domain::analyze_by_domain(client, DomainModel::Celebrities, &image.source, None).await?;
    let landmarks =
        domain::analyze_by_domain(client, DomainModel::Landmarks, &image.source, None).await?;

    let mut out = heading(format!("Celebrities in the {} image:", image.label));
    out.extend(format::celebrities(&celebs.result.celebrities));
    out.extend(heading(format!("Landmarks in the {} image:", image.label)));
    out.extend(format::landmarks(&landmarks.result.landmarks));
    Ok(out)
}

/// Report whether the image is clip art or a line drawing.
pub async fn detect_image_type(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::ImageType).await?;

    let mut out = heading(format!("Image type of {} image:", image.label));
    match result.image_type {
        Some(ref image_type) => out.extend(format::image_type(image_type)),
        None => out.push("No image type returned.".into()),
    }
    Ok(out)
}

/// List the bounds of every detected object.
pub async fn detect_objects(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = detect::detect_objects(client, &image.source).await?;

    let mut out = heading(format!("Detecting objects in {} image:", image.label));
    out.extend(format::objects(&result.objects));
    Ok(out)
}

/// List the brands detected in the image with their bounds.
pub async fn detect_brands(client: &VisionClient, image: &DemoImage) -> VisionResult<Vec<String>> {
    let result = analyze_for(client, image, VisualFeature::Brands).await?;

    let mut out = heading(format!("Detecting brands in {} image: ", image.label));
    out.extend(format::brands(&result.brands));
    Ok(out)
}

/// Recognize text with the batch Read API, giving up once `cancel` fires.
pub async fn read_text(
    client: &VisionClient,
    image: &DemoImage,
    mode: TextRecognitionMode,
    options: &PollOptions,
    cancel: &CancellationToken,
) -> VisionResult<Vec<String>> {
    let pages = read::read_text_or_cancelled(client, &image.source, mode, options, cancel).await?;

    let mut out = heading(format!(
        "Recognizing text in a {} image with the batch Read API ... ",
        image.label
    ));
    out.push(String::new());
    out.extend(format::read_results(&pages));
    Ok(out)
}

/// List the text found by the synchronous OCR endpoint.
pub async fn recognize_printed_text(
    client: &VisionClient,
    image: &DemoImage,
) -> VisionResult<Vec<String>> {
    let result = ocr::recognize_printed_text(client, &image.source, true, None).await?;

    let mut out = heading(format!(
        "Recognizing printed text with OCR in a {} image:",
        image.label
    ));
    out.extend(format::ocr(&result));
    Ok(out)
}
