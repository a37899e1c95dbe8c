//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::record::Annotation;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations/updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Transition from splash to main app
    SplashComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────
    /// Submit the login form (register first when `register` is set)
    SubmitLogin {
        username: String,
        password: String,
        register: bool,
    },
    /// Log out and return to the login screen
    Logout,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next item in the focused list
    NextItem,
    /// Move to previous item in the focused list
    PrevItem,
    /// Switch to the gallery view
    OpenGallery,
    /// Switch to the report view
    OpenReport,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Projects and Images
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the new-project title prompt
    OpenCreateProject,
    /// Create a project with the given raw title
    CreateProject(String),
    /// Open the image upload path prompt
    OpenUploadImage,
    /// Intake the image file at the given path
    UploadImage(String),
    /// Open the annotation editor for the selected image
    OpenImageEditor,
    /// Ask before deleting every annotation on the selected image
    OpenClearConfirm,
    /// Delete every annotation on the selected image
    ClearAnnotations,

    // ─────────────────────────────────────────────────────────────────────────
    // Annotation
    // ─────────────────────────────────────────────────────────────────────────
    /// A drag was committed and labeled in the editor
    CommitAnnotation(Annotation),

    // ─────────────────────────────────────────────────────────────────────────
    // Exports
    // ─────────────────────────────────────────────────────────────────────────
    /// Export the selected image's annotations to CSV
    ExportImageCsv,
    /// Export every annotation in the selected project to CSV
    ExportProjectCsv,
    /// Export the filtered report rows to CSV
    ExportReportCsv,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SplashComplete => write!(f, "SplashComplete"),
            Action::SubmitLogin { username, register, .. } => {
                write!(f, "SubmitLogin({}, register={})", username, register)
            }
            Action::Logout => write!(f, "Logout"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::OpenGallery => write!(f, "OpenGallery"),
            Action::OpenReport => write!(f, "OpenReport"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::OpenCreateProject => write!(f, "OpenCreateProject"),
            Action::CreateProject(title) => write!(f, "CreateProject({})", title),
            Action::OpenUploadImage => write!(f, "OpenUploadImage"),
            Action::UploadImage(path) => write!(f, "UploadImage({})", path),
            Action::OpenImageEditor => write!(f, "OpenImageEditor"),
            Action::OpenClearConfirm => write!(f, "OpenClearConfirm"),
            Action::ClearAnnotations => write!(f, "ClearAnnotations"),
            Action::CommitAnnotation(ann) => write!(f, "CommitAnnotation({})", ann.label),
            Action::ExportImageCsv => write!(f, "ExportImageCsv"),
            Action::ExportProjectCsv => write!(f, "ExportProjectCsv"),
            Action::ExportReportCsv => write!(f, "ExportReportCsv"),
        }
    }
}
