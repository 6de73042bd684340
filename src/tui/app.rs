use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::config::KeyBindings;
use crate::models::{Plant, WateringRecord};
use crate::tui::error::TuiError;
use crate::utils::{ParsedKeyBinding, parse_key_binding};
use crate::{Config, Database};

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    ConfirmDelete,
}

/// Options in the delete confirmation modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Delete,
    Cancel,
}

/// Key bindings from config, parsed once at startup
#[derive(Debug, Clone)]
pub struct ResolvedKeyBindings {
    pub quit: ParsedKeyBinding,
    pub water: ParsedKeyBinding,
    pub start_flowering: ParsedKeyBinding,
    pub delete: ParsedKeyBinding,
    pub refresh: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub toggle_sidebar: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
}

impl ResolvedKeyBindings {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |name: &str, value: &str| {
            parse_key_binding(value)
                .map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
        };
        Ok(Self {
            quit: parse("quit", &bindings.quit)?,
            water: parse("water", &bindings.water)?,
            start_flowering: parse("start_flowering", &bindings.start_flowering)?,
            delete: parse("delete", &bindings.delete)?,
            refresh: parse("refresh", &bindings.refresh)?,
            list_up: parse("list_up", &bindings.list_up)?,
            list_down: parse("list_down", &bindings.list_down)?,
            toggle_sidebar: parse("toggle_sidebar", &bindings.toggle_sidebar)?,
            help: parse("help", &bindings.help)?,
        })
    }
}

pub struct App {
    pub config: Config,
    pub database: Database,
    pub keys: ResolvedKeyBindings,
    pub plants: Vec<Plant>,
    /// Waterings of the selected plant, newest first
    pub waterings: Vec<WateringRecord>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub delete_choice: DeleteChoice,
    pub status_message: Option<String>,
    status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config, database: Database) -> Result<Self, TuiError> {
        let keys = ResolvedKeyBindings::from_config(&config.key_bindings)?;
        let mut app = Self {
            config,
            database,
            keys,
            plants: Vec::new(),
            waterings: Vec::new(),
            selected_index: 0,
            list_state: ListState::default(),
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            delete_choice: DeleteChoice::Cancel,
            status_message: None,
            status_message_time: None,
        };
        app.load_data()?;
        Ok(app)
    }

    /// Reload plants and the selected plant's waterings from the database
    pub fn load_data(&mut self) -> Result<(), TuiError> {
        self.plants = self.database.get_all_plants()?;
        self.adjust_selected_index();
        self.load_waterings()
    }

    fn load_waterings(&mut self) -> Result<(), TuiError> {
        self.waterings = match self.selected_plant().and_then(|p| p.id) {
            Some(id) => self.database.get_waterings(id)?,
            None => Vec::new(),
        };
        Ok(())
    }

    pub fn selected_plant(&self) -> Option<&Plant> {
        self.plants.get(self.selected_index)
    }

    /// Keep the selection inside the list after it shrinks
    pub fn adjust_selected_index(&mut self) {
        if self.plants.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.plants.len() {
            self.selected_index = self.plants.len() - 1;
        }
        self.sync_list_state();
    }

    pub fn sync_list_state(&mut self) {
        if self.plants.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) -> Result<(), TuiError> {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.sync_list_state();
            self.load_waterings()?;
        }
        Ok(())
    }

    pub fn move_selection_down(&mut self) -> Result<(), TuiError> {
        if self.selected_index + 1 < self.plants.len() {
            self.selected_index += 1;
            self.sync_list_state();
            self.load_waterings()?;
        }
        Ok(())
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_state = match self.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
        self.status_message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.clear_status_message();
            }
        }
    }

    /// Record a watering for the selected plant
    pub fn water_selected(&mut self) {
        let Some((id, name)) = self.selected_plant().and_then(|p| p.id.map(|id| (id, p.name.clone()))) else {
            self.set_status_message("No plant selected".to_string());
            return;
        };
        match self.database.insert_watering(&WateringRecord::new(id, Some("Watered".to_string()))) {
            Ok(_) => match self.load_waterings() {
                Ok(()) => self.set_status_message(format!("{} watered", name)),
                Err(e) => self.set_status_message(format!("Failed to reload waterings: {}", e)),
            },
            Err(e) => {
                tracing::warn!(plant_id = id, error = %e, "watering failed");
                self.set_status_message(format!("Failed to water plant: {}", e));
            }
        }
    }

    /// Stamp the flowering start of the selected plant
    pub fn start_flowering_selected(&mut self) {
        let Some(id) = self.selected_plant().and_then(|p| p.id) else {
            self.set_status_message("No plant selected".to_string());
            return;
        };
        match self.database.start_flowering(id) {
            Ok(plant) => {
                let message = format!("Flowering start recorded for {}", plant.name);
                if let Some(slot) = self.plants.get_mut(self.selected_index) {
                    *slot = plant;
                }
                self.set_status_message(message);
            }
            Err(e) => {
                tracing::warn!(plant_id = id, error = %e, "start flowering failed");
                self.set_status_message(format!("Failed to start flowering: {}", e));
            }
        }
    }

    /// Open the delete confirmation for the selected plant
    pub fn request_delete(&mut self) {
        if self.selected_plant().is_some() {
            self.delete_choice = DeleteChoice::Cancel;
            self.mode = Mode::ConfirmDelete;
        } else {
            self.set_status_message("No plant selected".to_string());
        }
    }

    pub fn toggle_delete_choice(&mut self) {
        self.delete_choice = match self.delete_choice {
            DeleteChoice::Delete => DeleteChoice::Cancel,
            DeleteChoice::Cancel => DeleteChoice::Delete,
        };
    }

    /// Apply the modal's current choice and close it
    pub fn confirm_delete(&mut self) {
        self.mode = Mode::View;
        if self.delete_choice == DeleteChoice::Cancel {
            return;
        }
        let Some((id, name)) = self.selected_plant().and_then(|p| p.id.map(|id| (id, p.name.clone()))) else {
            return;
        };
        if let Err(e) = self.database.delete_plant(id) {
            self.set_status_message(format!("Failed to delete plant: {}", e));
            return;
        }
        match self.load_data() {
            Ok(()) => self.set_status_message(format!("{} deleted", name)),
            Err(e) => self.set_status_message(format!("Failed to reload data: {}", e)),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.mode = Mode::View;
        self.delete_choice = DeleteChoice::Cancel;
    }

    pub fn refresh(&mut self) {
        match self.load_data() {
            Ok(()) => self.set_status_message("Reloaded".to_string()),
            Err(e) => self.set_status_message(format!("Failed to reload data: {}", e)),
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.mode = Mode::View;
    }
}
