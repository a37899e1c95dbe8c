//! Annotation editor component
//!
//! Full-screen overlay for drawing labeled bounding boxes on one image with
//! the mouse. Terminal cells stand in for displayed pixels: the canvas area
//! drawn last frame is the image's viewport geometry, and every pointer
//! event is translated through it before reaching the drag state machine.
//!
//! The box overlay is paint-only; committed boxes, the live drag box, and
//! the frozen box awaiting a label are drawn in distinct colors since a
//! terminal stroke cannot be dashed.

use crate::action::Action;
use crate::component::Component;
use crate::components::label_picker::LabelPicker;
use crate::model::geometry::{EditorPhase, EditorState, ImageGeometry, Point};
use crate::model::record::{Annotation, ImageRecord};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Rectangle},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

pub struct EditorComponent {
    pub state: EditorState,
    pub picker: LabelPicker,
    annotations: Vec<Annotation>,
    filename: String,
    natural: (u32, u32),
    vocabulary: Vec<String>,
    canvas_area: Option<Rect>,
}

impl Default for EditorComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            state: EditorState::new(),
            picker: LabelPicker::new(),
            annotations: Vec::new(),
            filename: String::new(),
            natural: (0, 0),
            vocabulary: Vec::new(),
            canvas_area: None,
        }
    }

    /// Load one image into the editor. Geometry is captured on the next draw.
    pub fn open(&mut self, image: &ImageRecord, vocabulary: Vec<String>) {
        self.annotations = image.annotations.clone();
        self.filename = image.filename.clone();
        self.natural = (image.natural_width, image.natural_height);
        self.vocabulary = vocabulary;
        self.state = EditorState::new();
        self.canvas_area = None;
    }

    /// Resync after App mutated the record (commit, clear).
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    fn viewport_point(mouse: &MouseEvent) -> Point {
        Point::new(f64::from(mouse.column), f64::from(mouse.row))
    }

    /// Freeze-or-reset just happened; show the picker if a box survived.
    fn after_gesture_end(&mut self) {
        if self.state.phase() == EditorPhase::PendingLabel {
            self.picker.open(self.vocabulary.clone());
        }
    }
}

impl Component for EditorComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.state.phase() == EditorPhase::PendingLabel {
            let action = match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.picker.select_next();
                    None
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.picker.select_prev();
                    None
                }
                KeyCode::Enter => {
                    // Selecting the placeholder is a no-op; the picker stays
                    // open until a real label (or Esc) resolves the box.
                    match self.picker.selected_label().map(str::to_string) {
                        Some(label) => self.state.take_pending_box().map(|bounds| {
                            let annotation = Annotation { label, bounds };
                            self.annotations.push(annotation.clone());
                            Action::CommitAnnotation(annotation)
                        }),
                        None => None,
                    }
                }
                KeyCode::Esc => {
                    self.state.cancel();
                    None
                }
                _ => None,
            };
            return Ok(action);
        }

        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.state.cancel();
                Some(Action::CloseModal)
            }
            KeyCode::Char('x') => Some(Action::OpenClearConfirm),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        // The picker owns the interaction while a box awaits its label.
        if self.state.phase() == EditorPhase::PendingLabel {
            return Ok(None);
        }

        let point = Self::viewport_point(&mouse);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.state.geometry().is_some_and(|g| g.contains(point)) {
                    self.state.pointer_down(point);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.state.geometry().is_some_and(|g| g.contains(point)) {
                    self.state.pointer_move(point);
                } else {
                    // Dragged off the image: same commit check as release.
                    self.state.pointer_leave();
                    self.after_gesture_end();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.state.pointer_up(point);
                self.after_gesture_end();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Annotate: {} ({}x{} px) ",
                self.filename, self.natural.0, self.natural.1
            ))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        // (Re)capture geometry when the canvas area changes; cells are the
        // displayed pixels.
        if self.canvas_area != Some(inner) {
            self.canvas_area = Some(inner);
            self.state.image_loaded(ImageGeometry {
                viewport_offset: Point::new(f64::from(inner.x), f64::from(inner.y)),
                displayed: (f64::from(inner.width), f64::from(inner.height)),
                natural: (f64::from(self.natural.0), f64::from(self.natural.1)),
            });
        }

        let (width, height) = (f64::from(inner.width), f64::from(inner.height));
        let annotations = self.annotations.clone();
        let live = self.state.live_box();
        let pending = self.state.pending_box();

        // Canvas y grows upward; flip the image-space y on the way in.
        let flip = move |top: f64, box_height: f64| height - top - box_height;

        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for annotation in &annotations {
                    let b = annotation.bounds;
                    ctx.draw(&Rectangle {
                        x: b.top_left.x,
                        y: flip(b.top_left.y, b.height()),
                        width: b.width(),
                        height: b.height(),
                        color: Color::Green,
                    });
                    ctx.print(
                        b.top_left.x,
                        flip(b.top_left.y, 0.0),
                        Span::styled(
                            annotation.label.clone(),
                            Style::default().fg(Color::Green),
                        ),
                    );
                }
                if let Some(b) = live {
                    ctx.draw(&Rectangle {
                        x: b.top_left.x,
                        y: flip(b.top_left.y, b.height()),
                        width: b.width(),
                        height: b.height(),
                        color: Color::Yellow,
                    });
                }
                if let Some(b) = pending {
                    ctx.draw(&Rectangle {
                        x: b.top_left.x,
                        y: flip(b.top_left.y, b.height()),
                        width: b.width(),
                        height: b.height(),
                        color: Color::Magenta,
                    });
                }
            });
        frame.render_widget(canvas, inner);

        let help_spans = match self.state.phase() {
            EditorPhase::PendingLabel => vec![
                Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
                Span::raw("Choose label  "),
                Span::styled(" Enter ", Style::default().fg(Color::Green)),
                Span::raw("Apply  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
                Span::raw("Discard box"),
            ],
            _ => vec![
                Span::styled(" drag ", Style::default().fg(Color::Cyan)),
                Span::raw("Draw box  "),
                Span::styled(" x ", Style::default().fg(Color::Cyan)),
                Span::raw("Clear all  "),
                Span::styled(" Esc/q ", Style::default().fg(Color::Yellow)),
                Span::raw("Close"),
            ],
        };
        let help = Paragraph::new(Line::from(help_spans))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        // Picker sits at the frozen box's lower-left corner.
        if self.state.phase() == EditorPhase::PendingLabel {
            if let Some(anchor) = self.state.picker_anchor() {
                self.picker
                    .draw_at(frame, area, (anchor.x as u16, anchor.y as u16));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::BoundingBox;
    use chrono::Utc;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn test_image() -> ImageRecord {
        ImageRecord {
            id: 1,
            project_id: 1,
            filename: "dog.png".to_string(),
            image_path: "files/dog.png".to_string(),
            annotations: Vec::new(),
            natural_width: 640,
            natural_height: 480,
            uploaded_at: Utc::now(),
        }
    }

    fn open_editor() -> EditorComponent {
        let mut editor = EditorComponent::new();
        editor.open(&test_image(), vec!["car".to_string(), "dog".to_string()]);
        // Geometry normally captured on draw; inject an 80x24 canvas at (1,1).
        editor.state.image_loaded(ImageGeometry {
            viewport_offset: Point::new(1.0, 1.0),
            displayed: (80.0, 24.0),
            natural: (640.0, 480.0),
        });
        editor
    }

    #[test]
    fn test_drag_then_label_commits_annotation() {
        let mut editor = open_editor();

        editor
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5))
            .unwrap();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 15))
            .unwrap();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 30, 15))
            .unwrap();
        assert_eq!(editor.state.phase(), EditorPhase::PendingLabel);

        // Placeholder first: Enter does nothing and the box stays frozen.
        let action = editor.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, None);
        assert_eq!(editor.state.phase(), EditorPhase::PendingLabel);

        editor.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = editor.handle_key_event(key(KeyCode::Enter)).unwrap();
        let expected = BoundingBox::from_corners(Point::new(9.0, 4.0), Point::new(29.0, 14.0));
        assert_eq!(
            action,
            Some(Action::CommitAnnotation(Annotation {
                label: "car".to_string(),
                bounds: expected,
            }))
        );
        assert_eq!(editor.state.phase(), EditorPhase::Idle);
        assert_eq!(editor.annotations.len(), 1);
    }

    #[test]
    fn test_short_drag_never_opens_picker() {
        let mut editor = open_editor();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5))
            .unwrap();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 13, 20))
            .unwrap();
        assert_eq!(editor.state.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_click_outside_image_does_not_start_a_drag() {
        let mut editor = open_editor();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0))
            .unwrap();
        assert_eq!(editor.state.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_dragging_off_the_image_freezes_the_box() {
        let mut editor = open_editor();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5))
            .unwrap();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 12))
            .unwrap();
        // Off the right edge of the 80x24 canvas at offset (1,1).
        editor
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 100, 12))
            .unwrap();
        assert_eq!(editor.state.phase(), EditorPhase::PendingLabel);
        let bounds = editor.state.pending_box().unwrap();
        assert_eq!(bounds.bottom_right, Point::new(39.0, 11.0));
    }

    #[test]
    fn test_escape_discards_frozen_box() {
        let mut editor = open_editor();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5))
            .unwrap();
        editor
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 30, 15))
            .unwrap();
        editor.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(editor.state.phase(), EditorPhase::Idle);
        assert!(editor.annotations.is_empty());
    }

    #[test]
    fn test_escape_when_idle_closes_the_editor() {
        let mut editor = open_editor();
        let action = editor.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::CloseModal));
    }
}
