//! Report view component
//!
//! Paginated table of every image in the selected project, one row per
//! image, with a typeable filter per column. Keystrokes edit the focused
//! filter immediately but the row set only recomputes once the debounce
//! window closes, so filtering stays cheap while typing.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_report_layout;
use crate::model::debounce::Debouncer;
use crate::model::record::ImageRecord;
use crate::model::table::{Cell, ColumnKind, ColumnSpec, Row, TableEngine};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

fn report_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec { key: "id", title: "ID", kind: ColumnKind::Identifier },
        ColumnSpec { key: "filename", title: "Filename", kind: ColumnKind::Text },
        ColumnSpec { key: "labels", title: "Labels", kind: ColumnKind::MultiValue },
    ]
}

pub struct ReportComponent {
    pub engine: TableEngine,
    pub debouncer: Debouncer,
    rows: Vec<Row>,
    /// Raw typed text per column, applied to the engine on debounce fire
    inputs: Vec<String>,
    focused_column: usize,
}

impl ReportComponent {
    pub fn new(page_size: usize) -> Self {
        let columns = report_columns();
        let inputs = vec![String::new(); columns.len()];
        Self {
            engine: TableEngine::new(columns, page_size),
            debouncer: Debouncer::default(),
            rows: Vec::new(),
            inputs,
            focused_column: 0,
        }
    }

    /// Rebuild the row snapshot from the project's images.
    pub fn set_records(&mut self, images: &[ImageRecord]) {
        self.rows = images
            .iter()
            .map(|img| {
                let mut row = Row::new();
                row.insert("id", Cell::Text(img.id.to_string()));
                row.insert("filename", Cell::Text(img.filename.clone()));
                row.insert("labels", Cell::List(img.labels()));
                row
            })
            .collect();
        self.engine.recompute(&self.rows);
    }

    /// Leaving the view drops any pending trigger.
    pub fn deactivate(&mut self) {
        self.debouncer.cancel();
    }

    fn apply_filters(&mut self) {
        let keys: Vec<&'static str> = self.engine.columns().iter().map(|c| c.key).collect();
        for (key, input) in keys.into_iter().zip(&self.inputs) {
            self.engine.set_filter(key, input);
        }
        self.engine.recompute(&self.rows);
    }

    /// Headers and flattened rows for CSV export, filtered order.
    pub fn export_data(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        let headers = self.engine.columns().iter().map(|c| c.title).collect();
        (headers, self.engine.explode(&self.rows, "labels"))
    }

    pub fn draw_with_status(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        status: Option<&str>,
    ) -> Result<()> {
        let layout = calculate_report_layout(area, status.is_some());

        // One filter input per column
        let filter_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, self.inputs.len() as u32);
                self.inputs.len()
            ])
            .split(layout.filters);
        for (i, (spec, input)) in self
            .engine
            .columns()
            .to_vec()
            .iter()
            .zip(&self.inputs)
            .enumerate()
        {
            let focused = i == self.focused_column;
            let cursor = if focused { "_" } else { "" };
            let widget = Paragraph::new(Span::styled(
                format!("{input}{cursor}"),
                if focused {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                },
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", spec.title))
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            );
            frame.render_widget(widget, filter_chunks[i]);
        }

        // Visible page as display strings
        let columns = self.engine.columns().to_vec();
        let page: Vec<Vec<String>> = self
            .engine
            .visible_indices()
            .iter()
            .map(|&idx| {
                columns
                    .iter()
                    .map(|spec| {
                        self.rows[idx]
                            .get(spec.key)
                            .map(|c| c.display())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        // Display-width aware column sizing
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.title.width()).collect();
        for row in &page {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(cell.width());
            }
        }
        for width in &mut col_widths {
            *width = (*width).min(50);
        }

        let truncate = |text: &str, width: usize| {
            if text.width() > width {
                let mut out = String::new();
                for ch in text.chars() {
                    if out.width() + 4 > width {
                        break;
                    }
                    out.push(ch);
                }
                format!("{out}...")
            } else {
                text.to_string()
            }
        };

        let mut lines: Vec<Line> = Vec::new();
        let header_spans: Vec<Span> = columns
            .iter()
            .enumerate()
            .flat_map(|(i, spec)| {
                vec![
                    Span::styled(
                        format!("{:width$}", spec.title, width = col_widths[i]),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" │ "),
                ]
            })
            .collect();
        lines.push(Line::from(header_spans));
        lines.push(Line::from(Span::styled(
            col_widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("─┼─"),
            Style::default().fg(Color::DarkGray),
        )));
        for row in &page {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .flat_map(|(i, cell)| {
                    vec![
                        Span::styled(
                            format!(
                                "{:width$}",
                                truncate(cell, col_widths[i]),
                                width = col_widths[i]
                            ),
                            Style::default().fg(Color::White),
                        ),
                        Span::raw(" │ "),
                    ]
                })
                .collect();
            lines.push(Line::from(spans));
        }
        if page.is_empty() {
            lines.push(Line::from(Span::styled(
                "no matching images",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let table = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Report ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(table, layout.table);

        let pager = Paragraph::new(Span::styled(
            format!(
                "Page {}/{}  ({} row{})",
                self.engine.page() + 1,
                self.engine.page_count(),
                self.engine.filtered_count(),
                if self.engine.filtered_count() == 1 { "" } else { "s" },
            ),
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(pager, layout.pager);

        if let (Some(status_area), Some(message)) = (layout.status, status) {
            let widget = Paragraph::new(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(widget, status_area);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Filter column  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Cyan)),
            Span::raw("Page  "),
            Span::styled(" Ctrl+e ", Style::default().fg(Color::Cyan)),
            Span::raw("Export  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Gallery"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, layout.help);

        Ok(())
    }
}

impl Component for ReportComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
            return Ok(Some(Action::ExportReportCsv));
        }
        let action = match key.code {
            KeyCode::Esc => Some(Action::OpenGallery),
            KeyCode::Tab => {
                self.focused_column = (self.focused_column + 1) % self.inputs.len();
                None
            }
            KeyCode::BackTab => {
                self.focused_column =
                    (self.focused_column + self.inputs.len() - 1) % self.inputs.len();
                None
            }
            KeyCode::Left => {
                self.engine.prev_page();
                None
            }
            KeyCode::Right => {
                self.engine.next_page();
                None
            }
            KeyCode::Enter => {
                // Apply immediately instead of waiting out the window.
                self.debouncer.cancel();
                self.apply_filters();
                None
            }
            KeyCode::Backspace => {
                self.inputs[self.focused_column].pop();
                self.debouncer.schedule();
                None
            }
            KeyCode::Char(c) => {
                self.inputs[self.focused_column].push(c);
                self.debouncer.schedule();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick && self.debouncer.poll() {
            self.apply_filters();
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_status(frame, area, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::model::geometry::{BoundingBox, Point};
    use crate::model::record::Annotation;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn image(id: u64, filename: &str, labels: &[&str]) -> ImageRecord {
        ImageRecord {
            id,
            project_id: 1,
            filename: filename.to_string(),
            image_path: format!("files/{filename}"),
            annotations: labels
                .iter()
                .map(|l| Annotation {
                    label: l.to_string(),
                    bounds: BoundingBox::from_corners(Point::new(0.0, 0.0), Point::new(5.0, 5.0)),
                })
                .collect(),
            natural_width: 100,
            natural_height: 100,
            uploaded_at: Utc::now(),
        }
    }

    fn report_with(images: &[ImageRecord]) -> ReportComponent {
        let mut report = ReportComponent::new(10);
        report.debouncer = Debouncer::new(Duration::from_millis(10));
        report.set_records(images);
        report
    }

    #[test]
    fn test_typing_does_not_filter_until_debounce_fires() {
        let images = vec![image(1, "dog.png", &["dog"]), image(2, "cat.png", &["cat"])];
        let mut report = report_with(&images);

        report.handle_key_event(key(KeyCode::Tab)).unwrap(); // focus filename
        for c in "dog".chars() {
            report.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        report.update(Action::Tick).unwrap();
        assert_eq!(report.engine.filtered_count(), 2);

        std::thread::sleep(Duration::from_millis(20));
        report.update(Action::Tick).unwrap();
        assert_eq!(report.engine.filtered_count(), 1);
    }

    #[test]
    fn test_enter_applies_filters_immediately() {
        let images = vec![image(1, "dog.png", &["dog"]), image(2, "cat.png", &["cat"])];
        let mut report = report_with(&images);

        report.handle_key_event(key(KeyCode::Tab)).unwrap();
        report.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        report.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(report.engine.filtered_count(), 1);
        assert!(!report.debouncer.is_pending());
    }

    #[test]
    fn test_narrowing_filter_returns_to_first_page() {
        let images: Vec<ImageRecord> = (0..23)
            .map(|i| {
                let name = if i < 5 { format!("keep_{i}.png") } else { format!("img_{i}.png") };
                image(i, &name, &["car"])
            })
            .collect();
        let mut report = report_with(&images);
        report.handle_key_event(key(KeyCode::Right)).unwrap();
        report.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(report.engine.page(), 2);

        report.handle_key_event(key(KeyCode::Tab)).unwrap();
        for c in "keep".chars() {
            report.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        report.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(report.engine.page(), 0);
        assert_eq!(report.engine.filtered_count(), 5);
    }

    #[test]
    fn test_export_explodes_labels() {
        let images = vec![image(1, "a.png", &["car", "dog"]), image(2, "b.png", &[])];
        let report = report_with(&images);
        let (headers, rows) = report.export_data();
        assert_eq!(headers, vec!["ID", "Filename", "Labels"]);
        // b.png has no labels, so it contributes no rows
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "a.png", "car"]);
        assert_eq!(rows[1], vec!["1", "a.png", "dog"]);
    }

    #[test]
    fn test_leaving_view_cancels_pending_filter() {
        let images = vec![image(1, "dog.png", &["dog"])];
        let mut report = report_with(&images);
        report.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        report.deactivate();
        std::thread::sleep(Duration::from_millis(20));
        report.update(Action::Tick).unwrap();
        assert_eq!(report.engine.filtered_count(), 1);
    }
}
