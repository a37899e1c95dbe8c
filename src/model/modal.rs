//! Modal stack for managing overlays
//!
//! Replaces scattered boolean flags (show_quit_confirm, show_editor, etc.)
//! with a proper state machine using an enum-based modal stack.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Full-screen annotation editor for the selected image
    ImageEditor,
    /// New project title prompt
    CreateProject { title: String },
    /// Image file path prompt
    UploadImage { path: String },
    /// Confirmation before deleting every annotation on an image
    ClearConfirm,
    /// Persistence failure notice, Parse-style code plus message
    ErrorNotice { code: i32, message: String },
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create a new empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    /// Get a mutable reference to the top modal
    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert!(stack.top().is_some());

        stack.push(Modal::ImageEditor);

        let top = stack.pop();
        assert_eq!(top, Some(Modal::ImageEditor));

        let top = stack.pop();
        assert_eq!(top, Some(Modal::QuitConfirm));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_modal_stack_top() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        stack.push(Modal::Help { scroll_offset: 0 });
        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 0 }));
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::CreateProject { title: String::new() });

        if let Some(Modal::CreateProject { title }) = stack.top_mut() {
            title.push_str("Streets");
        }

        assert_eq!(
            stack.top(),
            Some(&Modal::CreateProject { title: "Streets".to_string() })
        );
    }
}
