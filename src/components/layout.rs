//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Gallery screen layout areas
pub struct GalleryLayout {
    pub title: Rect,
    pub projects: Rect,
    pub images: Rect,
    pub summary: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Report screen layout areas
pub struct ReportLayout {
    pub filters: Rect,
    pub table: Rect,
    pub pager: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = (area.width.saturating_sub(width)) / 2;
    let popup_y = (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

fn split_off_footer(area: Rect, has_status: bool) -> (Rect, Option<Rect>, Rect) {
    if has_status {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);
        (chunks[0], Some(chunks[1]), chunks[2])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);
        (chunks[0], None, chunks[1])
    }
}

/// Calculate the gallery screen layout
pub fn calculate_gallery_layout(area: Rect, has_status: bool) -> GalleryLayout {
    let (content, status, help) = split_off_footer(area, has_status);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(content);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(horizontal[1]);

    GalleryLayout {
        title: vertical[0],
        projects: horizontal[0],
        images: right[0],
        summary: right[1],
        status,
        help,
    }
}

/// Calculate the report screen layout
pub fn calculate_report_layout(area: Rect, has_status: bool) -> ReportLayout {
    let (content, status, help) = split_off_footer(area, has_status);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(content);

    ReportLayout {
        filters: chunks[0],
        table: chunks[1],
        pager: chunks[2],
        status,
        help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_is_clamped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_popup(area, 40, 40);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }

    #[test]
    fn test_gallery_layout_partitions_area() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = calculate_gallery_layout(area, true);
        assert!(layout.status.is_some());
        assert_eq!(layout.help.height, 3);
        assert!(layout.projects.width < layout.images.width);
    }
}
