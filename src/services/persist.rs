//! Background persistence worker
//!
//! Writes go to the store on a spawned thread so annotation input never
//! blocks on disk. The UI applies its change locally first, hands the record
//! here, and polls on each tick; a failed write surfaces its error but the
//! local state is left as the user made it.

use crate::model::record::ImageRecord;
use crate::services::store::{Store, StoreError};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

pub struct PersistWorker {
    root: PathBuf,
    tx: Sender<Result<(), StoreError>>,
    rx: Receiver<Result<(), StoreError>>,
    in_flight: usize,
}

impl PersistWorker {
    pub fn new(root: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { root, tx, rx, in_flight: 0 }
    }

    /// Queue one image record for writing. Returns immediately.
    pub fn save_image(&mut self, image: ImageRecord) {
        let root = self.root.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let outcome = Store::open(root).and_then(|store| store.save_image(&image));
            let _ = tx.send(outcome);
        });
    }

    /// Drain finished writes, returning any failures.
    pub fn poll(&mut self) -> Vec<StoreError> {
        let mut failures = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if let Err(err) = outcome {
                        failures.push(err);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        failures
    }

    /// Block until every queued write has finished or the timeout passes.
    /// Called on quit so an in-flight write is never killed mid-file.
    pub fn drain(&mut self, timeout: Duration) -> Vec<StoreError> {
        let deadline = Instant::now() + timeout;
        let mut failures = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    if let Err(err) = outcome {
                        failures.push(err);
                    }
                }
                Err(_) => break,
            }
        }
        failures
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn temp_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("anno-persist-test-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn test_save_completes_and_persists() {
        let root = temp_root("ok");
        let store = Store::open(root.clone()).unwrap();
        let project = store.create_project("alice", "Streets").unwrap();
        let src = root.join("dog.png");
        image::RgbaImage::new(4, 4).save(&src).unwrap();
        let mut record = store.add_image(project.id, &src).unwrap();
        record.filename = "renamed.png".to_string();

        let mut worker = PersistWorker::new(root);
        worker.save_image(record.clone());
        let failures = worker.drain(Duration::from_secs(5));
        assert!(failures.is_empty());
        assert_eq!(store.images_for(project.id).unwrap()[0].filename, "renamed.png");
    }

    #[test]
    fn test_drain_finishes_queued_writes_before_returning() {
        let root = temp_root("drain");
        let store = Store::open(root.clone()).unwrap();
        let project = store.create_project("alice", "Streets").unwrap();
        let src = root.join("cat.png");
        image::RgbaImage::new(4, 4).save(&src).unwrap();
        let mut record = store.add_image(project.id, &src).unwrap();
        record.filename = "landed.png".to_string();

        let mut worker = PersistWorker::new(root);
        worker.save_image(record);
        worker.drain(Duration::from_secs(5));

        // Nothing left in flight and the write is on disk
        assert_eq!(worker.in_flight(), 0);
        assert_eq!(store.images_for(project.id).unwrap()[0].filename, "landed.png");
    }

    #[test]
    fn test_failed_save_surfaces_its_error() {
        let root = temp_root("fail");
        Store::open(root.clone()).unwrap();
        let record = ImageRecord {
            id: 42,
            project_id: 1,
            filename: "ghost.png".to_string(),
            image_path: "files/ghost.png".to_string(),
            annotations: Vec::new(),
            natural_width: 1,
            natural_height: 1,
            uploaded_at: Utc::now(),
        };

        let mut worker = PersistWorker::new(root);
        worker.save_image(record);
        let failures = worker.drain(Duration::from_secs(5));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].code, crate::services::store::ERR_NOT_FOUND);
    }
}
