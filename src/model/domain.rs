//! Domain state - business/data state separate from UI concerns

use super::record::{ImageRecord, Project};

/// Domain state containing all business data
#[derive(Default)]
pub struct DomainState {
    /// Name of the logged-in user
    pub user: Option<String>,

    /// Projects owned by the logged-in user
    pub projects: Vec<Project>,

    /// Images of the selected project
    pub images: Vec<ImageRecord>,

    /// Selected project id, if any
    pub selected_project: Option<u64>,

    /// Selected image id within the selected project, if any
    pub selected_image: Option<u64>,

    /// Label vocabulary offered by the picker
    pub vocabulary: Vec<String>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn image(&self, id: u64) -> Option<&ImageRecord> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn image_mut(&mut self, id: u64) -> Option<&mut ImageRecord> {
        self.images.iter_mut().find(|i| i.id == id)
    }

    pub fn selected_image_record(&self) -> Option<&ImageRecord> {
        self.selected_image.and_then(|id| self.image(id))
    }
}
