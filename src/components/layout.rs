//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the form panel including borders
const FORM_HEIGHT: u16 = 7;

/// Main screen layout areas
pub struct MainLayout {
    pub form: Option<Rect>,
    pub table: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout: form, table, optional status line, help bar
pub fn calculate_main_layout(area: Rect, show_form: bool, has_status: bool) -> MainLayout {
    let mut constraints = Vec::with_capacity(4);
    if show_form {
        constraints.push(Constraint::Length(FORM_HEIGHT));
    }
    constraints.push(Constraint::Min(0));
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    let form = if show_form {
        next += 1;
        Some(chunks[0])
    } else {
        None
    };
    let table = chunks[next];
    next += 1;
    let status = if has_status {
        next += 1;
        Some(chunks[next - 1])
    } else {
        None
    };

    MainLayout {
        form,
        table,
        status,
        help: chunks[next],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_with_everything() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 40), true, true);
        let form = layout.form.unwrap();
        assert_eq!(form.height, FORM_HEIGHT);
        assert_eq!(layout.table.y, form.y + form.height);
        assert_eq!(layout.status.unwrap().height, 1);
        assert_eq!(layout.help.height, 3);
        assert_eq!(layout.help.y + layout.help.height, 40);
    }

    #[test]
    fn test_layout_without_form() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 40), false, false);
        assert!(layout.form.is_none());
        assert!(layout.status.is_none());
        assert_eq!(layout.table.y, 0);
        assert_eq!(layout.table.height, 37);
    }

    #[test]
    fn test_centered_popup_is_clamped() {
        let popup = centered_popup(Rect::new(0, 0, 20, 10), 40, 7);
        assert_eq!(popup.width, 20);
        assert_eq!(popup.height, 7);
    }
}
