//! Image upload dialog component
//!
//! Single-line path prompt for bringing an image file into the selected
//! project. Key handling lives in App since the typed path is held in the
//! modal variant; this component only draws.

use crate::components::centered_popup;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct UploadDialog;

impl UploadDialog {
    pub fn draw_with_input(&self, frame: &mut Frame, area: Rect, path: &str) -> Result<()> {
        let popup_area = centered_popup(area, 70, 10);
        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Path to image file:",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", path),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                "the file is copied into the project store",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Enter ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Upload  "),
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
                    .title(" Upload Image ")
                    .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
