use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions (inside the outer border)
    /// Width fits the sidebar minimum (24) plus a usable detail pane
    pub const MIN_WIDTH: u16 = 48;
    pub const MIN_HEIGHT: u16 = 14;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Sidebar: requested percent, at least 24 columns, at most 50%, leaving 20 for details
        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested_width = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = inner_area.width / 2;
            requested_width
                .max(24)
                .min(max_width)
                .min(inner_area.width.saturating_sub(20))
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Content (sidebar + main)
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[0]);

        Self {
            inner_area,
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            status_area: vertical[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_sidebar_gives_main_full_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 100, 30), 30, true);
        assert_eq!(layout.sidebar_area.width, 0);
        assert_eq!(layout.main_area.width, 98);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn sidebar_respects_minimum_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 60, 20), 10, false);
        assert_eq!(layout.sidebar_area.width, 24);
        assert_eq!(layout.sidebar_area.width + layout.main_area.width, 58);
    }
}
