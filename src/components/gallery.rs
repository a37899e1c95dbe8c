//! Gallery component
//!
//! Main screen: the user's projects on the left, the selected project's
//! images on the right, with a summary of the selected image below. The
//! cursor is the selection; App mirrors it into the domain state after
//! every move.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_gallery_layout;
use crate::model::record::{ImageRecord, Project};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Which list has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryFocus {
    Projects,
    Images,
}

/// Data the gallery needs from App to render
pub struct GalleryRenderContext<'a> {
    pub user: &'a str,
    pub projects: &'a [Project],
    pub images: &'a [ImageRecord],
    pub status_message: Option<&'a str>,
}

pub struct GalleryComponent {
    pub focus: GalleryFocus,
    pub project_index: usize,
    pub image_index: usize,
    project_state: ListState,
    image_state: ListState,
}

impl Default for GalleryComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryComponent {
    pub fn new() -> Self {
        Self {
            focus: GalleryFocus::Projects,
            project_index: 0,
            image_index: 0,
            project_state: ListState::default(),
            image_state: ListState::default(),
        }
    }

    /// Clamp cursors after the underlying lists changed.
    pub fn sync(&mut self, project_count: usize, image_count: usize) {
        if project_count == 0 {
            self.project_index = 0;
        } else if self.project_index >= project_count {
            self.project_index = project_count - 1;
        }
        if image_count == 0 {
            self.image_index = 0;
        } else if self.image_index >= image_count {
            self.image_index = image_count - 1;
        }
    }

    /// Move the image cursor back to the top, e.g. after switching project.
    pub fn reset_image_cursor(&mut self) {
        self.image_index = 0;
    }

    pub fn next(&mut self, project_count: usize, image_count: usize) {
        match self.focus {
            GalleryFocus::Projects => {
                if self.project_index + 1 < project_count {
                    self.project_index += 1;
                }
            }
            GalleryFocus::Images => {
                if self.image_index + 1 < image_count {
                    self.image_index += 1;
                }
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            GalleryFocus::Projects => {
                self.project_index = self.project_index.saturating_sub(1);
            }
            GalleryFocus::Images => {
                self.image_index = self.image_index.saturating_sub(1);
            }
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            GalleryFocus::Projects => GalleryFocus::Images,
            GalleryFocus::Images => GalleryFocus::Projects,
        };
    }

    pub fn draw_with_state(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        ctx: &GalleryRenderContext,
    ) -> Result<()> {
        let layout = calculate_gallery_layout(area, ctx.status_message.is_some());

        // Title bar
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " anno-tui ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", ctx.user),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, layout.title);

        // Project list
        let project_items: Vec<ListItem> = if ctx.projects.is_empty() {
            vec![ListItem::new(Span::styled(
                "no projects yet, press n",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            ctx.projects
                .iter()
                .map(|p| ListItem::new(Span::raw(p.title.clone())))
                .collect()
        };
        let focused = self.focus == GalleryFocus::Projects;
        self.project_state.select(if ctx.projects.is_empty() {
            None
        } else {
            Some(self.project_index)
        });
        let project_list = List::new(project_items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Projects ")
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(project_list, layout.projects, &mut self.project_state);

        // Image list
        let image_items: Vec<ListItem> = if ctx.images.is_empty() {
            vec![ListItem::new(Span::styled(
                "no images, press u to upload",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            ctx.images
                .iter()
                .map(|img| {
                    let count = img.annotations.len();
                    ListItem::new(Line::from(vec![
                        Span::raw(img.filename.clone()),
                        Span::styled(
                            format!("  {count} box{}", if count == 1 { "" } else { "es" }),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        };
        let focused = self.focus == GalleryFocus::Images;
        self.image_state.select(if ctx.images.is_empty() {
            None
        } else {
            Some(self.image_index)
        });
        let image_list = List::new(image_items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Images ")
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(image_list, layout.images, &mut self.image_state);

        // Selected image summary
        let summary_lines = match ctx.images.get(self.image_index) {
            Some(img) => {
                let labels = img.labels();
                vec![
                    Line::from(vec![
                        Span::styled("File:       ", Style::default().fg(Color::Cyan)),
                        Span::raw(img.filename.clone()),
                    ]),
                    Line::from(vec![
                        Span::styled("Size:       ", Style::default().fg(Color::Cyan)),
                        Span::raw(format!("{}x{} px", img.natural_width, img.natural_height)),
                    ]),
                    Line::from(vec![
                        Span::styled("Uploaded:   ", Style::default().fg(Color::Cyan)),
                        Span::raw(img.uploaded_at.format("%Y-%m-%d %H:%M").to_string()),
                    ]),
                    Line::from(vec![
                        Span::styled("Boxes:      ", Style::default().fg(Color::Cyan)),
                        Span::raw(img.annotations.len().to_string()),
                    ]),
                    Line::from(vec![
                        Span::styled("Labels:     ", Style::default().fg(Color::Cyan)),
                        Span::raw(if labels.is_empty() {
                            "-".to_string()
                        } else {
                            labels.join(", ")
                        }),
                    ]),
                ]
            }
            None => vec![Line::from(Span::styled(
                "select an image",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        let summary = Paragraph::new(summary_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Selected ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(summary, layout.summary);

        if let (Some(status_area), Some(message)) = (layout.status, ctx.status_message) {
            let status = Paragraph::new(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(status, status_area);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Annotate  "),
            Span::styled(" n ", Style::default().fg(Color::Cyan)),
            Span::raw("New project  "),
            Span::styled(" u ", Style::default().fg(Color::Cyan)),
            Span::raw("Upload  "),
            Span::styled(" x ", Style::default().fg(Color::Cyan)),
            Span::raw("Clear  "),
            Span::styled(" e/E ", Style::default().fg(Color::Cyan)),
            Span::raw("Export  "),
            Span::styled(" v ", Style::default().fg(Color::Cyan)),
            Span::raw("Report  "),
            Span::styled(" ? ", Style::default().fg(Color::Yellow)),
            Span::raw("Help  "),
            Span::styled(" q ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, layout.help);

        Ok(())
    }
}

impl Component for GalleryComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Tab => {
                self.toggle_focus();
                None
            }
            KeyCode::Enter => Some(Action::OpenImageEditor),
            KeyCode::Char('n') => Some(Action::OpenCreateProject),
            KeyCode::Char('u') => Some(Action::OpenUploadImage),
            KeyCode::Char('x') => Some(Action::OpenClearConfirm),
            KeyCode::Char('e') => Some(Action::ExportImageCsv),
            KeyCode::Char('E') => Some(Action::ExportProjectCsv),
            KeyCode::Char('v') => Some(Action::OpenReport),
            KeyCode::Char('L') => Some(Action::Logout),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Rendering needs domain data; App calls draw_with_state instead.
        Ok(())
    }
}
