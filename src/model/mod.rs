//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DomainState` - Business/data state (projects, images, annotations)
//! - `EditorState` - The drag-to-annotate state machine
//! - `TableEngine` - Filter/pagination engine for the report view
//! - `ModalStack` - Modal overlay management

pub mod debounce;
pub mod domain;
pub mod geometry;
pub mod modal;
pub mod record;
pub mod table;
pub mod ui;

// Re-export commonly used types
pub use debounce::Debouncer;
pub use geometry::{BoundingBox, EditorPhase, EditorState, ImageGeometry, Point};
pub use record::{Annotation, ImageRecord, Project};
pub use table::{Cell, ColumnKind, ColumnSpec, Row, TableEngine};
