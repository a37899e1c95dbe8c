//! UI state - presentation state separate from domain data
//!
//! Note: Most UI state lives in the components that own it; only the
//! top-level mode and view switches live here.

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Splash,
    Login,
    Running,
}

/// Which main screen is shown while Running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Gallery,
    Report,
}

impl View {
    pub fn name(&self) -> &str {
        match self {
            View::Gallery => "Gallery",
            View::Report => "Report",
        }
    }
}
