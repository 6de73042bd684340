use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use crate::Config;
use crate::growth::{GrowthError, PhaseDescriptor};
use crate::models::{Plant, WateringRecord};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, phase_color};

pub fn render_plant_view(
    f: &mut Frame,
    area: Rect,
    plant: &Plant,
    growth: &Result<PhaseDescriptor, GrowthError>,
    waterings: &[WateringRecord],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let base = Style::default().fg(fg_color).bg(bg_color);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", plant.name))
        .style(base);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Strain, planting date, phase badge
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Day X of Y
            Constraint::Length(5), // Details
            Constraint::Min(1),    // Waterings
        ])
        .split(inner);

    let mut summary = vec![Line::from(format!(
        "Strain: {}",
        plant.strain.as_deref().unwrap_or("-")
    ))];

    match growth {
        Ok(info) => {
            let accent = phase_color(&theme, info.phase);
            summary.push(Line::from(format!(
                "Planted: {} (day {})",
                plant.plant_date, info.current_day
            )));
            summary.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", info.label),
                    Style::default()
                        .fg(get_contrast_text_color(accent))
                        .bg(accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}", info.phase)),
            ]));
            f.render_widget(Paragraph::new(summary).style(base), rows[0]);

            // The bar stops at 100%; the label shows the real value
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(accent).bg(bg_color))
                .ratio(info.display_percent() / 100.0)
                .label(format!("{:.0}%", info.progress_percent));
            f.render_widget(gauge, rows[1]);

            let mut day_line = format!("Day {} of {} days", info.days_in_phase, info.total_phase_days);
            if info.is_overdue() {
                day_line.push_str(&format!(
                    "  (+{} days past plan)",
                    info.days_in_phase - info.total_phase_days
                ));
            }
            f.render_widget(Paragraph::new(day_line).style(base), rows[2]);
        }
        Err(e) => {
            summary.push(Line::from(format!("Planted: {}", plant.plant_date)));
            summary.push(Line::from(format!("Phase unavailable: {}", e)));
            f.render_widget(Paragraph::new(summary).style(base), rows[0]);
        }
    }

    let last_watered = waterings
        .first()
        .map(|record| record.watered_at.as_str())
        .unwrap_or("never");
    let mut details = vec![
        Line::from(format!("Flowering: {} weeks", plant.flowering_weeks)),
        Line::from(format!(
            "Flowering started: {}",
            plant.flowering_start_date.as_deref().unwrap_or("not recorded")
        )),
        Line::from(format!("Last watered: {}", last_watered)),
    ];
    if let Some(ref notes) = plant.notes {
        details.push(Line::from(format!("Notes: {}", notes)));
    }
    if !plant.image_urls.is_empty() {
        details.push(Line::from(format!("Images: {}", plant.image_urls.join(", "))));
    }
    f.render_widget(
        Paragraph::new(details).style(base).wrap(Wrap { trim: true }),
        rows[3],
    );

    let items: Vec<ListItem> = waterings
        .iter()
        .map(|record| {
            let text = match record.notes {
                Some(ref note) => format!("{}  {}", record.watered_at, note),
                None => record.watered_at.clone(),
            };
            ListItem::new(text)
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(format!("Waterings ({})", waterings.len())),
        )
        .style(base);
    f.render_widget(list, rows[4]);
}

/// Placeholder shown when there is nothing to select
pub fn render_empty_view(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let paragraph = Paragraph::new("No plants yet.\n\nAdd one with `grow add <name> --planted YYYY-MM-DD`.")
        .block(Block::default().borders(Borders::ALL).title("Plant"))
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
