//! External service interactions
//!
//! This module contains services for everything outside the UI:
//! - The JSON-file record store and uploaded image intake
//! - Background persistence writes
//! - User accounts and sessions
//! - Label vocabulary loading
//! - CSV exports

pub mod export;
pub mod labels;
pub mod persist;
pub mod session;
pub mod store;

pub use labels::load_vocabulary;
pub use persist::PersistWorker;
pub use session::SessionManager;
pub use store::{Store, StoreError};
