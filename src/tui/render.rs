use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::tui::app::{Mode, SidebarState};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    help::render_help,
    plant_list::render_plant_list,
    plant_view::{render_empty_view, render_plant_view},
    status_bar::render_status_bar,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Grow Tracker")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    let now = Utc::now();

    if app.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        render_plant_list(
            f,
            layout.sidebar_area,
            &app.plants,
            &mut app.list_state,
            &app.config,
            now,
        );
    }

    match app.selected_plant() {
        Some(plant) => {
            let growth = plant.growth_at(now);
            render_plant_view(f, layout.main_area, plant, &growth, &app.waterings, &app.config);
        }
        None => render_empty_view(f, layout.main_area, &app.config),
    }

    // Popups draw over the normal content
    match app.mode {
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::ConfirmDelete => {
            if let Some(plant) = app.selected_plant() {
                render_confirm_delete(f, f.area(), plant, app.delete_choice, &app.config);
            }
        }
        Mode::View => {}
    }

    let hints = key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status_message.as_ref(),
        &hints,
        &app.config,
    );
}

fn key_hints(app: &App) -> Vec<String> {
    let bindings = &app.config.key_bindings;
    match app.mode {
        Mode::View => vec![
            format!("{}: Water", key(&bindings.water)),
            format!("{}: Start flowering", key(&bindings.start_flowering)),
            format!("{}: Delete", key(&bindings.delete)),
            format!("{}: Reload", key(&bindings.refresh)),
            format!("{}: Sidebar", key(&bindings.toggle_sidebar)),
            format!("{}: Help", key(&bindings.help)),
            format!("{}: Quit", key(&bindings.quit)),
        ],
        Mode::Help => vec!["Esc: Close help".to_string()],
        Mode::ConfirmDelete => vec![
            "↑↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ],
    }
}
