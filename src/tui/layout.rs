use ratatui::layout::{Rect, Layout as RatLayout, Direction, Constraint};

pub struct Layout {
    pub inner_area: Rect,  // Area inside the outer border
    pub list_area: Rect,
    pub form_area: Rect,
    pub banner_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: list (20) + form (28) inside the border
    /// Height: enough for every form input at one line each, plus banner and status
    pub const MIN_WIDTH: u16 = 48;
    pub const MIN_HEIGHT: u16 = 12;

    /// Share of the content width given to the appointment list
    const LIST_WIDTH_PERCENT: u16 = 45;

    pub fn calculate(size: Rect) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // content, banner (1 line), status (1 line)
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner_area);

        let list_width = (vertical[0].width * Self::LIST_WIDTH_PERCENT / 100).max(20);
        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(list_width),
                Constraint::Min(1),
            ])
            .split(vertical[0]);

        Self {
            inner_area,
            list_area: horizontal[0],
            form_area: horizontal[1],
            banner_area: vertical[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panes_fill_the_inner_area() {
        let layout = Layout::calculate(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.inner_area, Rect::new(1, 1, 98, 38));
        assert_eq!(layout.list_area.width + layout.form_area.width, 98);
        assert_eq!(layout.list_area.height, 36);
        assert_eq!(layout.banner_area.y, 37);
        assert_eq!(layout.status_area.y, 38);
    }

    #[test]
    fn tiny_terminal_is_clamped_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5));
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
    }
}
