//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod create_project_dialog;
pub mod editor;
pub mod gallery;
pub mod help_dialog;
pub mod label_picker;
pub mod layout;
pub mod login;
pub mod quit_dialog;
pub mod report;
pub mod splash;
pub mod upload_dialog;

pub use create_project_dialog::CreateProjectDialog;
pub use editor::EditorComponent;
pub use gallery::{GalleryComponent, GalleryFocus, GalleryRenderContext};
pub use help_dialog::HelpDialog;
pub use layout::centered_popup;
pub use login::LoginComponent;
pub use quit_dialog::QuitDialog;
pub use report::ReportComponent;
pub use splash::SplashComponent;
pub use upload_dialog::UploadDialog;
