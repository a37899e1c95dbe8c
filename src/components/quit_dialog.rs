//! Quit confirmation dialog component
//!
//! Confirmed quits wait for queued annotation writes, so the dialog shows
//! how many are still in flight.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog;

impl QuitDialog {
    /// Draw with the number of annotation writes still in flight.
    pub fn draw_with_pending(&self, frame: &mut Frame, area: Rect, pending: usize) -> Result<()> {
        let popup_area = centered_popup(area, 46, 9);

        frame.render_widget(Clear, popup_area);

        let save_line = match pending {
            0 => Line::from(Span::styled(
                "All annotations are saved.",
                Style::default().fg(Color::DarkGray),
            )),
            1 => Line::from(Span::styled(
                "1 write still in flight, it will finish first.",
                Style::default().fg(Color::Yellow),
            )),
            n => Line::from(Span::styled(
                format!("{n} writes still in flight, they will finish first."),
                Style::default().fg(Color::Yellow),
            )),
        };

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Quit anno-tui?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            save_line,
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Yes, quit  "),
                Span::styled(
                    " n/Esc ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("No, cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Quit? ")
                    .title_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for QuitDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_pending(frame, area, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_confirm_emits_force_quit() {
        let mut dialog = QuitDialog;
        let action = dialog.handle_key_event(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
    }

    #[test]
    fn test_decline_closes_the_dialog() {
        let mut dialog = QuitDialog;
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
        assert_eq!(dialog.handle_key_event(key(KeyCode::Char('z'))).unwrap(), None);
    }
}
