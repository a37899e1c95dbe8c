//! Persisted record types: projects, images, and their annotations

use crate::model::geometry::BoundingBox;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One labeled rectangle on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
    pub bounds: BoundingBox,
}

/// One uploaded image plus its owned annotation list.
///
/// Annotations are append-only per user action (or bulk-cleared); their order
/// is creation order and is preserved across save/load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    pub project_id: u64,
    pub filename: String,
    /// Store-relative path of the uploaded file.
    pub image_path: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Original pixel dimensions, probed at upload.
    #[serde(default)]
    pub natural_width: u32,
    #[serde(default)]
    pub natural_height: u32,
    pub uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Distinct labels used on this image, in first-use order.
    pub fn labels(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ann in &self.annotations {
            if !out.contains(&ann.label) {
                out.push(ann.label.clone());
            }
        }
        out
    }
}

/// A user-owned group of images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
}

/// Filter a requested project title down to alphanumeric characters.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::Point;

    fn image_with_labels(labels: &[&str]) -> ImageRecord {
        ImageRecord {
            id: 1,
            project_id: 1,
            filename: "dog.png".to_string(),
            image_path: "files/dog.png".to_string(),
            annotations: labels
                .iter()
                .map(|l| Annotation {
                    label: l.to_string(),
                    bounds: BoundingBox::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
                })
                .collect(),
            natural_width: 640,
            natural_height: 480,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_labels_are_deduplicated_in_first_use_order() {
        let image = image_with_labels(&["car", "dog", "car", "cat"]);
        assert_eq!(image.labels(), vec!["car", "dog", "cat"]);
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("My Project #1!"), "MyProject1");
        assert_eq!(sanitize_title("plain"), "plain");
        assert_eq!(sanitize_title("---"), "");
    }

    #[test]
    fn test_annotation_round_trips_through_json() {
        let image = image_with_labels(&["car"]);
        let json = serde_json::to_string(&image).unwrap();
        let back: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.annotations, image.annotations);
        assert_eq!(back.filename, image.filename);
    }
}
