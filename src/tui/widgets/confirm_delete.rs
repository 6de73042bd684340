use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::models::Plant;
use crate::tui::app::DeleteChoice;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

pub fn render_confirm_delete(f: &mut Frame, area: Rect, plant: &Plant, choice: DeleteChoice, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let base = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 50, 35);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled("Delete this plant and its watering history?", base)),
        Line::from(""),
        Line::from(Span::styled(plant.name.clone(), base)),
        Line::from(""),
    ];

    for option in [DeleteChoice::Delete, DeleteChoice::Cancel] {
        let text = match option {
            DeleteChoice::Delete => "Delete",
            DeleteChoice::Cancel => "Cancel",
        };
        let (prefix, style) = if option == choice {
            ("> ", Style::default().fg(highlight_fg).bg(highlight_bg))
        } else {
            ("  ", base)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, text), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑↓ to choose, Enter to confirm, Esc to cancel",
        base,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
