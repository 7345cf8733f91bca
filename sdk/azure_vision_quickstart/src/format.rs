//! Console formatting for each demonstration.
//!
//! Every function returns the lines to print, so output can be checked
//! without a terminal.

use azure_vision_analysis::analyze::{
    AdultInfo, ClipArtType, ColorInfo, DetectedBrand, FaceDescription, ImageCategory, ImageType,
};
use azure_vision_analysis::models::{
    CelebrityResult, DetectedObject, ImageCaption, ImageTag, LandmarkResult,
};
use azure_vision_analysis::ocr::OcrResult;
use azure_vision_analysis::read::TextRecognitionResult;

/// Printed when a required environment variable is missing.
pub fn setup_instructions(variable: &str) -> String {
    format!(
        "\nPlease set the {variable} environment variable.\n\
         **Note that you might need to restart your shell or IDE.**"
    )
}

fn percent(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

fn none_detected(category: &str) -> Vec<String> {
    vec![format!("No {category} detected.")]
}

pub fn captions(captions: &[ImageCaption]) -> Vec<String> {
    if captions.is_empty() {
        return none_detected("captions");
    }
    captions
        .iter()
        .map(|c| format!("'{}' with confidence {}", c.text, percent(c.confidence)))
        .collect()
}

pub fn categories(categories: &[ImageCategory]) -> Vec<String> {
    if categories.is_empty() {
        return none_detected("categories");
    }
    categories
        .iter()
        .map(|c| format!("'{}' with confidence {}", c.name, percent(c.score)))
        .collect()
}

pub fn tags(tags: &[ImageTag]) -> Vec<String> {
    if tags.is_empty() {
        return none_detected("tags");
    }
    tags.iter()
        .map(|t| format!("'{}' with confidence {}", t.name, percent(t.confidence)))
        .collect()
}

pub fn faces(faces: &[FaceDescription]) -> Vec<String> {
    if faces.is_empty() {
        return none_detected("faces");
    }
    faces
        .iter()
        .map(|f| {
            let rect = &f.face_rectangle;
            format!(
                "'{}' of age {} at location {}, {}, {}, {}",
                f.gender.as_deref().unwrap_or("Unknown"),
                f.age,
                rect.left,
                rect.top,
                rect.right(),
                rect.bottom(),
            )
        })
        .collect()
}

pub fn adult(adult: &AdultInfo) -> Vec<String> {
    vec![
        format!(
            "Is adult content: {} with confidence {}",
            adult.is_adult_content,
            percent(adult.adult_score)
        ),
        format!(
            "Has racy content: {} with confidence {}",
            adult.is_racy_content,
            percent(adult.racy_score)
        ),
    ]
}

pub fn color(color: &ColorInfo) -> Vec<String> {
    vec![
        format!("Is black and white: {}", color.is_bw_img),
        format!("Accent color: 0x{}", color.accent_color),
        format!(
            "Dominant background color: {}",
            color.dominant_color_background
        ),
        format!(
            "Dominant foreground color: {}",
            color.dominant_color_foreground
        ),
        format!("Dominant colors: {}", color.dominant_colors.join(", ")),
    ]
}

pub fn celebrities(celebrities: &[CelebrityResult]) -> Vec<String> {
    if celebrities.is_empty() {
        return none_detected("celebrities");
    }
    celebrities.iter().map(|c| c.name.clone()).collect()
}

pub fn landmarks(landmarks: &[LandmarkResult]) -> Vec<String> {
    if landmarks.is_empty() {
        return none_detected("landmarks");
    }
    landmarks.iter().map(|l| l.name.clone()).collect()
}

pub fn image_type(image_type: &ImageType) -> Vec<String> {
    let clip_art = match image_type.clip_art() {
        ClipArtType::NonClipArt => "Image is not clip art.".to_string(),
        ClipArtType::Ambiguous => "Image is ambiguously clip art.".to_string(),
        ClipArtType::Normal => "Image is normal clip art.".to_string(),
        ClipArtType::Good => "Image is good clip art.".to_string(),
        ClipArtType::Unknown(code) => format!("Image has unknown clip art type {code}."),
    };
    let line_drawing = if image_type.is_line_drawing() {
        "Image is a line drawing."
    } else {
        "Image is not a line drawing."
    };
    vec![clip_art, line_drawing.to_string()]
}

pub fn objects(objects: &[DetectedObject]) -> Vec<String> {
    if objects.is_empty() {
        return none_detected("objects");
    }
    objects
        .iter()
        .map(|o| {
            let r = &o.rectangle;
            format!(
                "object at location {}, {}, {}, {}",
                r.x,
                r.right(),
                r.y,
                r.bottom()
            )
        })
        .collect()
}

pub fn brands(brands: &[DetectedBrand]) -> Vec<String> {
    if brands.is_empty() {
        return none_detected("brands");
    }
    brands
        .iter()
        .map(|b| {
            let r = &b.rectangle;
            format!(
                "'{}' brand detected with confidence {:.1}% at location {}, {}, {}, {}",
                b.name,
                b.confidence * 100.0,
                r.x,
                r.right(),
                r.y,
                r.bottom()
            )
        })
        .collect()
}

/// `[x1, y1, x2, y2, ...]`; integral coordinates print without a fraction.
pub fn bounding_box(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Each recognized line, then its bounding box, then a blank line.
pub fn read_results(pages: &[TextRecognitionResult]) -> Vec<String> {
    let lines: Vec<_> = pages.iter().flat_map(|p| &p.lines).collect();
    if lines.is_empty() {
        return none_detected("text");
    }
    lines
        .into_iter()
        .flat_map(|line| [line.text.clone(), bounding_box(&line.bounding_box), String::new()])
        .collect()
}

pub fn ocr(result: &OcrResult) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(ref language) = result.language {
        out.push(format!("Language: {language}"));
    }
    if let Some(ref orientation) = result.orientation {
        out.push(format!("Orientation: {orientation}"));
    }

    let mut any = false;
    for line in result.lines() {
        any = true;
        out.push(line.text());
        out.push(line.bounding_box.clone());
        out.push(String::new());
    }
    if !any {
        out.extend(none_detected("text"));
    }
    out
}
