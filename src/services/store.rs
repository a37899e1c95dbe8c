//! JSON-file record store
//!
//! Records live in per-collection JSON files under the data directory
//! (`projects.json`, `images.json`); uploaded image bytes go under `files/`.
//! Every failure is reported as a structured code plus message so the UI can
//! show it verbatim.

use crate::model::record::{ImageRecord, Project};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem read/write failed.
pub const ERR_IO: i32 = 100;
/// A record or file that should exist was not found.
pub const ERR_NOT_FOUND: i32 = 101;
/// A collection file held malformed JSON.
pub const ERR_FORMAT: i32 = 107;
/// A project with the same title already exists for this user.
pub const ERR_DUPLICATE: i32 = 137;
/// The uploaded file could not be read as an image.
pub const ERR_BAD_IMAGE: i32 = 130;

/// Structured store failure: numeric code plus human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    pub code: i32,
    pub message: String,
}

impl StoreError {
    fn io(context: &str, err: impl fmt::Display) -> Self {
        Self { code: ERR_IO, message: format!("{context}: {err}") }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for StoreError {}

/// File-backed record store rooted at a data directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(root.join("files"))
            .map_err(|e| StoreError::io("creating data directory", e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a store-relative file path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| StoreError::io(&format!("reading {name}.json"), e))?;
        serde_json::from_str(&contents).map_err(|e| StoreError {
            code: ERR_FORMAT,
            message: format!("{name}.json is malformed: {e}"),
        })
    }

    fn save_collection<T: Serialize>(&self, name: &str, records: &[T]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::io(&format!("encoding {name}.json"), e))?;
        fs::write(self.collection_path(name), contents)
            .map_err(|e| StoreError::io(&format!("writing {name}.json"), e))
    }

    /// Projects owned by `user`, oldest first.
    pub fn projects_for(&self, user: &str) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self.load_collection("projects")?;
        projects.retain(|p| p.user == user);
        Ok(projects)
    }

    /// Create a project with the given (already sanitized) title.
    pub fn create_project(&self, user: &str, title: &str) -> Result<Project, StoreError> {
        let mut projects: Vec<Project> = self.load_collection("projects")?;
        if projects.iter().any(|p| p.user == user && p.title == title) {
            return Err(StoreError {
                code: ERR_DUPLICATE,
                message: format!("project '{title}' already exists"),
            });
        }
        let project = Project {
            id: projects.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            title: title.to_string(),
            user: user.to_string(),
            created_at: Utc::now(),
        };
        projects.push(project.clone());
        self.save_collection("projects", &projects)?;
        Ok(project)
    }

    /// Images belonging to one project, upload order.
    pub fn images_for(&self, project_id: u64) -> Result<Vec<ImageRecord>, StoreError> {
        let mut images: Vec<ImageRecord> = self.load_collection("images")?;
        images.retain(|i| i.project_id == project_id);
        Ok(images)
    }

    /// Replace the stored copy of `image` (matched by id) with this one.
    pub fn save_image(&self, image: &ImageRecord) -> Result<(), StoreError> {
        let mut images: Vec<ImageRecord> = self.load_collection("images")?;
        match images.iter_mut().find(|i| i.id == image.id) {
            Some(slot) => *slot = image.clone(),
            None => {
                return Err(StoreError {
                    code: ERR_NOT_FOUND,
                    message: format!("image {} does not exist", image.id),
                })
            }
        }
        self.save_collection("images", &images)
    }

    /// Intake one image file: probe its pixel dimensions, copy the bytes
    /// under `files/`, and append a record with a fresh id.
    pub fn add_image(&self, project_id: u64, source: &Path) -> Result<ImageRecord, StoreError> {
        if !source.exists() {
            return Err(StoreError {
                code: ERR_NOT_FOUND,
                message: format!("no such file: {}", source.display()),
            });
        }
        let (width, height) = image::image_dimensions(source).map_err(|e| StoreError {
            code: ERR_BAD_IMAGE,
            message: format!("{} is not a readable image: {e}", source.display()),
        })?;

        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let mut images: Vec<ImageRecord> = self.load_collection("images")?;
        let id = images.iter().map(|i| i.id).max().unwrap_or(0) + 1;

        let relative = format!("files/{id}_{filename}");
        fs::copy(source, self.root.join(&relative))
            .map_err(|e| StoreError::io("copying image into store", e))?;

        let record = ImageRecord {
            id,
            project_id,
            filename,
            image_path: relative,
            annotations: Vec::new(),
            natural_width: width,
            natural_height: height,
            uploaded_at: Utc::now(),
        };
        images.push(record.clone());
        self.save_collection("images", &images)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> Store {
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "anno-store-test-{}-{seq}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        Store::open(root).unwrap()
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::new(w, h).save(&path).unwrap();
        path
    }

    #[test]
    fn test_create_project_assigns_increasing_ids() {
        let store = temp_store();
        let a = store.create_project("alice", "Streets").unwrap();
        let b = store.create_project("alice", "Parks").unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.projects_for("alice").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_project_title_is_rejected() {
        let store = temp_store();
        store.create_project("alice", "Streets").unwrap();
        let err = store.create_project("alice", "Streets").unwrap_err();
        assert_eq!(err.code, ERR_DUPLICATE);
        // A different user may reuse the title.
        assert!(store.create_project("bob", "Streets").is_ok());
    }

    #[test]
    fn test_projects_are_scoped_to_their_owner() {
        let store = temp_store();
        store.create_project("alice", "Streets").unwrap();
        store.create_project("bob", "Parks").unwrap();
        let mine = store.projects_for("alice").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Streets");
    }

    #[test]
    fn test_add_image_probes_dimensions_and_copies_file() {
        let store = temp_store();
        let project = store.create_project("alice", "Streets").unwrap();
        let src = write_png(store.root(), "dog.png", 64, 48);

        let record = store.add_image(project.id, &src).unwrap();
        assert_eq!(record.natural_width, 64);
        assert_eq!(record.natural_height, 48);
        assert_eq!(record.filename, "dog.png");
        assert!(store.resolve(&record.image_path).exists());
        assert_eq!(store.images_for(project.id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_image_rejects_missing_and_non_image_files() {
        let store = temp_store();
        let missing = store.root().join("nope.png");
        assert_eq!(store.add_image(1, &missing).unwrap_err().code, ERR_NOT_FOUND);

        let bogus = store.root().join("notes.txt");
        fs::write(&bogus, "not pixels").unwrap();
        assert_eq!(store.add_image(1, &bogus).unwrap_err().code, ERR_BAD_IMAGE);
    }

    #[test]
    fn test_save_image_replaces_by_id() {
        let store = temp_store();
        let project = store.create_project("alice", "Streets").unwrap();
        let src = write_png(store.root(), "dog.png", 8, 8);
        let mut record = store.add_image(project.id, &src).unwrap();

        record.annotations.push(crate::model::Annotation {
            label: "dog".to_string(),
            bounds: crate::model::BoundingBox::from_corners(
                crate::model::Point::new(1.0, 1.0),
                crate::model::Point::new(5.0, 5.0),
            ),
        });
        store.save_image(&record).unwrap();

        let reloaded = store.images_for(project.id).unwrap();
        assert_eq!(reloaded[0].annotations.len(), 1);
        assert_eq!(reloaded[0].annotations[0].label, "dog");
    }

    #[test]
    fn test_save_unknown_image_is_not_found() {
        let store = temp_store();
        let record = ImageRecord {
            id: 99,
            project_id: 1,
            filename: "x.png".to_string(),
            image_path: "files/x.png".to_string(),
            annotations: Vec::new(),
            natural_width: 1,
            natural_height: 1,
            uploaded_at: Utc::now(),
        };
        assert_eq!(store.save_image(&record).unwrap_err().code, ERR_NOT_FOUND);
    }

    #[test]
    fn test_malformed_collection_reports_format_error() {
        let store = temp_store();
        fs::write(store.root().join("projects.json"), "{ nope").unwrap();
        assert_eq!(store.projects_for("alice").unwrap_err().code, ERR_FORMAT);
    }
}
