//! Label picker widget
//!
//! Shown after a drag is committed, anchored at the box's lower-left
//! corner. The first row is a "Choose One" placeholder; selecting it does
//! nothing and the picker stays open, so a box can only be labeled with a
//! real vocabulary entry.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

pub const PLACEHOLDER: &str = "Choose One";

pub struct LabelPicker {
    pub labels: Vec<String>,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for LabelPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelPicker {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            labels: Vec::new(),
            selected_index: 0,
            list_state,
        }
    }

    /// Reset to the placeholder row with a fresh vocabulary.
    pub fn open(&mut self, labels: Vec<String>) {
        self.labels = labels;
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }

    /// The chosen label, or None while the placeholder row is selected.
    pub fn selected_label(&self) -> Option<&str> {
        if self.selected_index == 0 {
            None
        } else {
            self.labels.get(self.selected_index - 1).map(|s| s.as_str())
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_index < self.labels.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Draw the picker near `anchor` (editor-area cell coordinates),
    /// flipped or clamped so it stays inside `area`.
    pub fn draw_at(&mut self, frame: &mut Frame, area: Rect, anchor: (u16, u16)) {
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .chain(std::iter::once(PLACEHOLDER.len()))
            .max()
            .unwrap_or(0) as u16
            + 6;
        let height = self.labels.len() as u16 + 3;

        let mut x = anchor.0;
        let mut y = anchor.1;
        if x + width > area.x + area.width {
            x = (area.x + area.width).saturating_sub(width);
        }
        if y + height > area.y + area.height {
            y = (area.y + area.height).saturating_sub(height);
        }
        let popup_area = Rect::new(x.max(area.x), y.max(area.y), width, height)
            .intersection(area);

        frame.render_widget(Clear, popup_area);

        let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        )))];
        for label in &self.labels {
            items.push(ListItem::new(Line::from(Span::styled(
                label.clone(),
                Style::default().fg(Color::White),
            ))));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(" Label ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, popup_area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> LabelPicker {
        let mut picker = LabelPicker::new();
        picker.open(vec!["car".to_string(), "dog".to_string()]);
        picker
    }

    #[test]
    fn test_opens_on_placeholder_with_no_label() {
        let picker = picker();
        assert_eq!(picker.selected_index, 0);
        assert_eq!(picker.selected_label(), None);
    }

    #[test]
    fn test_navigation_reaches_real_labels() {
        let mut picker = picker();
        picker.select_next();
        assert_eq!(picker.selected_label(), Some("car"));
        picker.select_next();
        assert_eq!(picker.selected_label(), Some("dog"));
        // Clamped at the last entry.
        picker.select_next();
        assert_eq!(picker.selected_label(), Some("dog"));
    }

    #[test]
    fn test_navigating_back_to_placeholder_clears_choice() {
        let mut picker = picker();
        picker.select_next();
        picker.select_prev();
        assert_eq!(picker.selected_label(), None);
        picker.select_prev();
        assert_eq!(picker.selected_index, 0);
    }
}
