//! Login / registration screen component
//!
//! Two-field form shown before any project data is loaded. Tab moves
//! between fields, Ctrl+R flips between signing in and creating an
//! account, Enter submits. Failures come back from App via `set_error`.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

/// Login form component
pub struct LoginComponent {
    pub username: String,
    pub password: String,
    /// Create a new account instead of signing in
    pub register: bool,
    focus: Field,
    error: Option<String>,
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginComponent {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            register: false,
            focus: Field::Username,
            error: None,
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Wipe the form, e.g. after logout.
    pub fn reset(&mut self) {
        self.username.clear();
        self.password.clear();
        self.register = false;
        self.focus = Field::Username;
        self.error = None;
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn submit(&self) -> Option<Action> {
        Some(Action::SubmitLogin {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            register: self.register,
        })
    }
}

impl Component for LoginComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.register = !self.register;
            self.error = None;
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.focus = match self.focus {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.focused_input().pop();
                self.error = None;
                None
            }
            KeyCode::Char(c) => {
                self.focused_input().push(c);
                self.error = None;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let content_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Form
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let mode_title = if self.register { " Create Account " } else { " Sign In " };
        let title = Paragraph::new(Line::from(Span::styled(
            format!(" anno-tui {}", mode_title.trim()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let field_line = |label: &str, value: &str, focused: bool, masked: bool| {
            let shown = if masked {
                "•".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(
                    format!("{label:10}"),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("> {shown}{cursor}"),
                    if focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    },
                ),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line(
                "Username",
                &self.username,
                self.focus == Field::Username,
                false,
            ),
            Line::from(""),
            field_line(
                "Password",
                &self.password,
                self.focus == Field::Password,
                true,
            ),
            Line::from(""),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            )));
        } else if self.register {
            lines.push(Line::from(Span::styled(
                "A new account will be created and signed in.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(mode_title)
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(form, chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw(if self.register { "Register  " } else { "Sign in  " }),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Switch field  "),
            Span::styled(" Ctrl+r ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle register  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_typing_targets_the_focused_field() {
        let mut login = LoginComponent::new();
        login.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        login.handle_key_event(key(KeyCode::Tab)).unwrap();
        login.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        assert_eq!(login.username, "a");
        assert_eq!(login.password, "p");
    }

    #[test]
    fn test_enter_submits_trimmed_username() {
        let mut login = LoginComponent::new();
        login.username = " alice ".to_string();
        login.password = "pw".to_string();
        let action = login.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::SubmitLogin {
                username: "alice".to_string(),
                password: "pw".to_string(),
                register: false,
            })
        );
    }

    #[test]
    fn test_ctrl_r_toggles_register_mode() {
        let mut login = LoginComponent::new();
        let ctrl_r = KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        login.handle_key_event(ctrl_r).unwrap();
        assert!(login.register);
        login.handle_key_event(ctrl_r).unwrap();
        assert!(!login.register);
    }
}
