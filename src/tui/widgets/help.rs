use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::config::KeyBindings;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(&config.key_bindings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(bindings: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {} or ↑ / ↓: Select plant\n",
        key(&bindings.list_up),
        key(&bindings.list_down)
    ));
    text.push_str(&format!("  {}: Toggle sidebar\n", key(&bindings.toggle_sidebar)));
    text.push('\n');

    text.push_str("Actions:\n");
    text.push_str(&format!("  {}: Water selected plant\n", key(&bindings.water)));
    text.push_str(&format!("  {}: Record flowering start\n", key(&bindings.start_flowering)));
    text.push_str(&format!("  {}: Delete selected plant\n", key(&bindings.delete)));
    text.push_str(&format!("  {}: Reload from database\n", key(&bindings.refresh)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&bindings.quit)));
    text.push_str(&format!("  {} / Esc: Show/hide help\n", key(&bindings.help)));
    text.push_str("\nPlants are added and edited with the `grow` command line.\n");

    text
}
