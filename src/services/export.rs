//! CSV export writers
//!
//! Three exports share one row shape for annotations
//! (`filename,class,top,left,bottom,right`, image coordinates): a single
//! image, a whole project, and the flattened report table. Output files are
//! written into the chosen directory with a timestamped name and the path is
//! returned for display.

use crate::model::record::{ImageRecord, Project};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct AnnotationRow<'a> {
    filename: &'a str,
    class: &'a str,
    top: f64,
    left: f64,
    bottom: f64,
    right: f64,
}

fn timestamped(prefix: &str) -> String {
    format!("{prefix}_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
}

fn write_annotation_rows<'a>(
    path: &Path,
    images: impl Iterator<Item = &'a ImageRecord>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for image in images {
        for annotation in &image.annotations {
            writer.serialize(AnnotationRow {
                filename: &image.filename,
                class: &annotation.label,
                top: annotation.bounds.top_left.y,
                left: annotation.bounds.top_left.x,
                bottom: annotation.bounds.bottom_right.y,
                right: annotation.bounds.bottom_right.x,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Export one image's annotations. Refuses an unannotated image instead of
/// writing an empty spreadsheet.
pub fn export_image_annotations(dir: &Path, image: &ImageRecord) -> Result<PathBuf> {
    if image.annotations.is_empty() {
        bail!("no annotations found for {}", image.filename);
    }
    let stem = image.filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(&image.filename);
    let path = dir.join(timestamped(&format!("{stem}_annotations")));
    write_annotation_rows(&path, std::iter::once(image))?;
    Ok(path)
}

/// Export every annotation in a project, image by image.
pub fn export_project_annotations(
    dir: &Path,
    project: &Project,
    images: &[ImageRecord],
) -> Result<PathBuf> {
    let path = dir.join(timestamped(&format!("{}_annotations", project.title)));
    write_annotation_rows(&path, images.iter())?;
    Ok(path)
}

/// Export pre-flattened report rows under the given headers.
pub fn export_report(dir: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<PathBuf> {
    let path = dir.join(timestamped("report"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, BoundingBox, Point};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("anno-export-test-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn annotated_image(filename: &str, labels: &[&str]) -> ImageRecord {
        ImageRecord {
            id: 1,
            project_id: 1,
            filename: filename.to_string(),
            image_path: format!("files/{filename}"),
            annotations: labels
                .iter()
                .enumerate()
                .map(|(i, label)| Annotation {
                    label: label.to_string(),
                    bounds: BoundingBox::from_corners(
                        Point::new(10.0 * i as f64, 5.0),
                        Point::new(10.0 * i as f64 + 8.0, 20.0),
                    ),
                })
                .collect(),
            natural_width: 640,
            natural_height: 480,
            uploaded_at: Utc::now(),
        }
    }

    fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_image_export_has_one_row_per_annotation() {
        let dir = temp_dir("image");
        let image = annotated_image("dog.png", &["dog", "collar"]);
        let path = export_image_annotations(&dir, &image).unwrap();

        let (headers, rows) = read_rows(&path);
        assert_eq!(headers, vec!["filename", "class", "top", "left", "bottom", "right"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "dog.png");
        assert_eq!(rows[0][1], "dog");
        assert_eq!(rows[0][2], "5.0");
        assert_eq!(rows[0][3], "0.0");
        assert_eq!(rows[0][4], "20.0");
        assert_eq!(rows[0][5], "8.0");
    }

    #[test]
    fn test_image_export_refuses_an_unannotated_image() {
        let dir = temp_dir("empty");
        let image = annotated_image("blank.png", &[]);
        let err = export_image_annotations(&dir, &image).unwrap_err();
        assert!(err.to_string().contains("no annotations"));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_project_export_spans_all_images() {
        let dir = temp_dir("project");
        let project = Project {
            id: 1,
            title: "Streets".to_string(),
            user: "alice".to_string(),
            created_at: Utc::now(),
        };
        let images = vec![
            annotated_image("a.png", &["car"]),
            annotated_image("b.png", &[]),
            annotated_image("c.png", &["dog", "cat"]),
        ];
        let path = export_project_annotations(&dir, &project, &images).unwrap();

        let (_, rows) = read_rows(&path);
        assert_eq!(rows.len(), 3);
        let files: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(files, vec!["a.png", "c.png", "c.png"]);
    }

    #[test]
    fn test_report_export_writes_headers_and_rows_verbatim() {
        let dir = temp_dir("report");
        let rows = vec![
            vec!["1".to_string(), "a.png".to_string(), "car".to_string()],
            vec!["1".to_string(), "a.png".to_string(), "dog".to_string()],
        ];
        let path = export_report(&dir, &["ID", "Filename", "Labels"], &rows).unwrap();

        let (headers, back) = read_rows(&path);
        assert_eq!(headers, vec!["ID", "Filename", "Labels"]);
        assert_eq!(back, rows);
    }
}
