//! New project dialog component
//!
//! Single-line title prompt. Key handling lives in App since the typed
//! title is held in the modal variant; this component only draws. Titles
//! are reduced to alphanumerics on creation and the preview shows what
//! will actually be kept.

use crate::components::centered_popup;
use crate::model::record::sanitize_title;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct CreateProjectDialog;

impl CreateProjectDialog {
    pub fn draw_with_input(&self, frame: &mut Frame, area: Rect, title: &str) -> Result<()> {
        let popup_area = centered_popup(area, 60, 10);
        frame.render_widget(Clear, popup_area);

        let sanitized = sanitize_title(title);
        let preview = if sanitized == title || title.is_empty() {
            Line::from("")
        } else {
            Line::from(Span::styled(
                format!("will be saved as: {sanitized}"),
                Style::default().fg(Color::DarkGray),
            ))
        };

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Project title:",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", title),
                Style::default().fg(Color::Cyan),
            )),
            preview,
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Enter ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Create  "),
                Span::styled(
                    " Esc ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(" New Project ")
                    .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
