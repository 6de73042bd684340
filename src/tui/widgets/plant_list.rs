use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::Config;
use crate::models::Plant;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, phase_color};

pub fn render_plant_list(
    f: &mut Frame,
    area: Rect,
    plants: &[Plant],
    list_state: &mut ListState,
    config: &Config,
    now: DateTime<Utc>,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    // 2 for borders, 2 for the highlight symbol
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = plants
        .iter()
        .map(|plant| {
            let (label, label_style) = match plant.growth_at(now) {
                Ok(info) => (info.label, Style::default().fg(phase_color(&theme, info.phase))),
                Err(_) => ("?".to_string(), Style::default().fg(fg_color)),
            };

            let mut name = plant.name.clone();
            let budget = max_width.saturating_sub(label.chars().count() + 1);
            if name.chars().count() > budget {
                name = name.chars().take(budget.saturating_sub(1)).collect::<String>() + "…";
            }

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", name)),
                Span::styled(label, label_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Plants ({})", plants.len())),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
