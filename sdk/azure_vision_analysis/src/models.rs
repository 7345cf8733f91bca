//! Response types shared by several Computer Vision endpoints.
//!
//! The same shapes (rectangles, tags, captions, detected objects) come back
//! from `analyze`, `describe`, `tag`, `detect` and the domain models, so they
//! live here rather than in any one endpoint module.

use azure_vision_core::error::{VisionError, VisionResult};
use serde::Deserialize;

/// A rectangle in pixel coordinates, as returned for objects and brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rectangle {
    /// X-coordinate of the top-left corner.
    pub x: i32,
    /// Y-coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rectangle {
    /// Parse the comma-separated `"x,y,w,h"` form used by the OCR endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Api`] with code `InvalidBoundingBox` if the value
    /// does not contain exactly four integers.
    pub fn parse_ocr(value: &str) -> VisionResult<Self> {
        let parts = value
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid_bounding_box(value))?;

        match parts.as_slice() {
            [x, y, w, h] => Ok(Self {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
            }),
            _ => Err(invalid_bounding_box(value)),
        }
    }

    /// X-coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Y-coordinate of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

fn invalid_bounding_box(value: &str) -> VisionError {
    VisionError::Api {
        code: "InvalidBoundingBox".into(),
        message: format!("expected \"x,y,w,h\", got {value:?}"),
    }
}

/// The rectangle enclosing a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FaceRectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRectangle {
    /// X-coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Y-coordinate of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Metadata about the analyzed image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageMetadata {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Image format, e.g. `Jpeg`.
    pub format: Option<String>,
}

/// A content tag assigned to the image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageTag {
    /// Tag name.
    pub name: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
    /// Disambiguation hint, when the tag is ambiguous.
    pub hint: Option<String>,
}

/// A natural-language caption for the image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageCaption {
    /// The caption text.
    pub text: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
}

/// Captions plus the plain tag names used to produce them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageDescription {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<ImageCaption>,
}

/// The parent of a detected object in the object taxonomy.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectHierarchy {
    /// Parent object name.
    pub object: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
    /// The grandparent, if any.
    pub parent: Option<Box<ObjectHierarchy>>,
}

/// An object located in the image.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedObject {
    /// Location of the object.
    pub rectangle: Rectangle,
    /// Object name.
    pub object: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
    /// Parent in the object taxonomy.
    pub parent: Option<ObjectHierarchy>,
}

/// A celebrity recognized by the `celebrities` domain model.
#[derive(Debug, Clone, Deserialize)]
pub struct CelebrityResult {
    pub name: String,
    pub confidence: f64,
    #[serde(rename = "faceRectangle")]
    pub face_rectangle: Option<FaceRectangle>,
}

/// A landmark recognized by the `landmarks` domain model.
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkResult {
    pub name: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_deserialization_and_edges() {
        let json = r#"{"x": 10, "y": 20, "w": 100, "h": 50}"#;
        let rect: Rectangle = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(rect, Rectangle { x: 10, y: 20, w: 100, h: 50 });
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
    }

    #[test]
    fn test_parse_ocr_bounding_box() {
        let rect = Rectangle::parse_ocr("21,16,304,451").expect("should parse");
        assert_eq!(rect, Rectangle { x: 21, y: 16, w: 304, h: 451 });
    }

    #[test]
    fn test_parse_ocr_bounding_box_rejects_malformed() {
        for bad in ["", "1,2,3", "1,2,3,4,5", "a,b,c,d"] {
            let err = Rectangle::parse_ocr(bad).expect_err("should reject");
            assert!(
                matches!(&err, VisionError::Api { code, .. } if code == "InvalidBoundingBox"),
                "{bad:?}: {err:?}"
            );
        }
    }

    #[test]
    fn test_face_rectangle_edges() {
        let json = r#"{"left": 118, "top": 159, "width": 95, "height": 95}"#;
        let face: FaceRectangle = serde_json::from_str(json).unwrap();
        assert_eq!(face.right(), 213);
        assert_eq!(face.bottom(), 254);
    }

    #[test]
    fn test_detected_object_with_nested_parent() {
        let json = r#"{
            "rectangle": {"x": 1, "y": 2, "w": 3, "h": 4},
            "object": "Labrador",
            "confidence": 0.8,
            "parent": {
                "object": "dog",
                "confidence": 0.9,
                "parent": {"object": "mammal", "confidence": 0.95}
            }
        }"#;
        let obj: DetectedObject = serde_json::from_str(json).expect("should deserialize");
        let parent = obj.parent.expect("parent");
        assert_eq!(parent.object, "dog");
        assert_eq!(parent.parent.expect("grandparent").object, "mammal");
    }

    #[test]
    fn test_image_description_defaults_to_empty() {
        let desc: ImageDescription = serde_json::from_str("{}").unwrap();
        assert!(desc.tags.is_empty());
        assert!(desc.captions.is_empty());
    }
}
