use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => (
            truncate(msg, max_width),
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Join as many hints as fit, ending with an ellipsis when some are dropped
pub fn fit_hints(hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let sep_len = if i == 0 { 0 } else { SEPARATOR.chars().count() };
        let would_be = text.chars().count() + sep_len + hint.chars().count();
        if would_be > max_width {
            if text.is_empty() {
                return truncate(hint, max_width);
            }
            if text.chars().count() + ELLIPSIS.len() > max_width {
                text = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
            }
            text.push_str(ELLIPSIS);
            return text;
        }
        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}
