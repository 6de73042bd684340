use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::database::{Database, DatabaseError};
use crate::models::{Plant, WateringRecord};
use crate::utils::{get_current_date_string, parse_date};

#[derive(Parser)]
#[command(name = "grow")]
#[command(about = "Grow Tracker - plants, waterings and growth phases in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard (default if no subcommand)
    Tui,
    /// List all plants with their current phase
    List,
    /// Show one plant with its phase and watering history
    Show {
        /// Plant ID
        id: i64,
    },
    /// Add a new plant
    Add {
        /// Plant name
        name: String,
        /// Strain or variety
        #[arg(long)]
        strain: Option<String>,
        /// Planting date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        planted: Option<String>,
        /// Flowering duration in weeks, defaults to the configured value
        #[arg(long)]
        flowering_weeks: Option<i64>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit an existing plant
    Edit {
        /// Plant ID
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        strain: Option<String>,
        /// Planting date (YYYY-MM-DD)
        #[arg(long)]
        planted: Option<String>,
        #[arg(long)]
        flowering_weeks: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
        /// Append an image reference (path or URL)
        #[arg(long)]
        add_image: Option<String>,
    },
    /// Delete a plant and its watering history
    Delete {
        /// Plant ID
        id: i64,
    },
    /// Record a watering
    Water {
        /// Plant ID
        id: i64,
        /// Note stored with the watering
        #[arg(long)]
        note: Option<String>,
    },
    /// List waterings for a plant, newest first
    Waterings {
        /// Plant ID
        id: i64,
    },
    /// Record that flowering started now
    StartFlowering {
        /// Plant ID
        id: i64,
    },
    /// List color themes, or switch to the named one
    Theme {
        /// Theme to activate
        name: Option<String>,
    },
    /// Serve the JSON API
    Serve {
        /// Address to bind, defaults to the configured host
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, defaults to the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Changes requested by `grow edit`
#[derive(Debug, Default, Clone)]
pub struct PlantEdit {
    pub name: Option<String>,
    pub strain: Option<String>,
    pub planted: Option<String>,
    pub flowering_weeks: Option<i64>,
    pub notes: Option<String>,
    pub add_image: Option<String>,
}

impl PlantEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.strain.is_none()
            && self.planted.is_none()
            && self.flowering_weeks.is_none()
            && self.notes.is_none()
            && self.add_image.is_none()
    }
}

fn check_date(date: &str) -> Result<(), CliError> {
    parse_date(date)
        .map(|_| ())
        .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date, e)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// One-line summary: id, name, strain, phase label and rounded progress
pub fn format_plant_line(plant: &Plant, now: DateTime<Utc>) -> String {
    let id = plant.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    let strain = plant.strain.as_ref()
        .map(|s| format!(" ({})", s))
        .unwrap_or_default();
    match plant.growth_at(now) {
        Ok(info) => format!(
            "#{} {}{}  {}  {:.0}%",
            id, plant.name, strain, info.label, info.progress_percent
        ),
        Err(e) => format!("#{} {}{}  phase unavailable: {}", id, plant.name, strain, e),
    }
}

/// Multi-line details for `grow show`
pub fn format_plant_details(plant: &Plant, waterings: &[WateringRecord], now: DateTime<Utc>) -> String {
    let mut text = String::new();
    text.push_str(&format!(
        "Plant #{}: {}\n",
        plant.id.unwrap_or_default(),
        plant.name
    ));
    if let Some(ref strain) = plant.strain {
        text.push_str(&format!("Strain: {}\n", strain));
    }

    match plant.growth_at(now) {
        Ok(info) => {
            text.push_str(&format!("Planted: {} (day {})\n", plant.plant_date, info.current_day));
            text.push_str(&format!("Phase: {} - {}\n", info.phase, info.label));
            text.push_str(&format!(
                "Progress: {:.0}% (day {} of {})\n",
                info.progress_percent, info.days_in_phase, info.total_phase_days
            ));
        }
        Err(e) => {
            text.push_str(&format!("Planted: {}\n", plant.plant_date));
            text.push_str(&format!("Phase: unavailable ({})\n", e));
        }
    }

    text.push_str(&format!("Flowering weeks: {}\n", plant.flowering_weeks));
    text.push_str(&format!(
        "Flowering started: {}\n",
        plant.flowering_start_date.as_deref().unwrap_or("not recorded")
    ));
    if let Some(ref notes) = plant.notes {
        text.push_str(&format!("Notes: {}\n", notes));
    }
    if !plant.image_urls.is_empty() {
        text.push_str(&format!("Images: {}\n", plant.image_urls.join(", ")));
    }

    text.push_str(&format!("Waterings ({}):\n", waterings.len()));
    for record in waterings {
        match record.notes {
            Some(ref note) => text.push_str(&format!("  {}  {}\n", record.watered_at, note)),
            None => text.push_str(&format!("  {}\n", record.watered_at)),
        }
    }
    text
}

/// Handle the list command
pub fn handle_list(db: &Database) -> Result<(), CliError> {
    let plants = db.get_all_plants()?;
    if plants.is_empty() {
        println!("No plants yet. Add one with `grow add <name>`.");
        return Ok(());
    }
    let now = Utc::now();
    for plant in &plants {
        let last = match plant.id {
            Some(id) => db.get_last_watering(id)?,
            None => None,
        };
        match last {
            Some(record) => println!("{}  watered {}", format_plant_line(plant, now), record.watered_at),
            None => println!("{}", format_plant_line(plant, now)),
        }
    }
    Ok(())
}

/// Handle the show command
pub fn handle_show(id: i64, db: &Database) -> Result<(), CliError> {
    let plant = db.get_plant(id)?;
    let waterings = db.get_waterings(id)?;
    print!("{}", format_plant_details(&plant, &waterings, Utc::now()));
    Ok(())
}

/// Handle the add command
pub fn handle_add(
    name: String,
    strain: Option<String>,
    planted: Option<String>,
    flowering_weeks: Option<i64>,
    notes: Option<String>,
    db: &Database,
    config: &Config,
) -> Result<i64, CliError> {
    let plant_date = match planted {
        Some(date) => {
            check_date(&date)?;
            date
        }
        None => get_current_date_string(),
    };

    let mut plant = Plant::new(name, plant_date);
    plant.strain = non_empty(strain);
    plant.notes = non_empty(notes);
    plant.flowering_weeks = flowering_weeks.unwrap_or(config.default_flowering_weeks);

    let id = db.insert_plant(&plant)?;
    println!("Plant created successfully (ID: {})", id);

    Ok(id)
}

/// Handle the edit command
pub fn handle_edit(id: i64, edit: PlantEdit, db: &Database) -> Result<Plant, CliError> {
    let mut plant = db.get_plant(id)?;
    if edit.is_empty() {
        println!("No changes given for plant {}", id);
        return Ok(plant);
    }

    if let Some(name) = edit.name {
        plant.name = name;
    }
    if let Some(strain) = edit.strain {
        plant.strain = non_empty(Some(strain));
    }
    if let Some(date) = edit.planted {
        check_date(&date)?;
        plant.plant_date = date;
    }
    if let Some(weeks) = edit.flowering_weeks {
        plant.flowering_weeks = weeks;
    }
    if let Some(notes) = edit.notes {
        plant.notes = non_empty(Some(notes));
    }
    if let Some(image) = non_empty(edit.add_image) {
        plant.image_urls.push(image);
    }

    db.update_plant(&plant)?;
    println!("Plant {} updated", id);

    Ok(db.get_plant(id)?)
}

/// Handle the delete command
pub fn handle_delete(id: i64, db: &Database) -> Result<(), CliError> {
    db.delete_plant(id)?;
    println!("Plant {} deleted", id);
    Ok(())
}

/// Handle the water command
pub fn handle_water(id: i64, note: Option<String>, db: &Database) -> Result<WateringRecord, CliError> {
    let record = db.insert_watering(&WateringRecord::new(id, non_empty(note)))?;
    println!("Plant {} watered at {}", id, record.watered_at);
    Ok(record)
}

/// Handle the waterings command
pub fn handle_waterings(id: i64, db: &Database) -> Result<(), CliError> {
    // Distinguish "no such plant" from "never watered"
    let plant = db.get_plant(id)?;
    let records = db.get_waterings(id)?;
    if records.is_empty() {
        println!("{} has not been watered yet", plant.name);
        return Ok(());
    }
    for record in &records {
        match record.notes {
            Some(ref note) => println!("{}  {}", record.watered_at, note),
            None => println!("{}", record.watered_at),
        }
    }
    Ok(())
}

/// Handle the start-flowering command
pub fn handle_start_flowering(id: i64, db: &Database) -> Result<Plant, CliError> {
    let plant = db.start_flowering(id)?;
    println!(
        "Flowering start recorded for {} at {}",
        plant.name,
        plant.flowering_start_date.as_deref().unwrap_or_default()
    );
    Ok(plant)
}

/// Handle the theme command. Without a name, lists themes and marks the active one.
pub fn handle_theme(name: Option<String>, config: &mut Config, config_path: &Path) -> Result<(), CliError> {
    match name {
        Some(name) => {
            config.set_theme(&name)?;
            config.save_to_path(config_path)?;
            println!("Theme set to {}", name);
        }
        None => {
            for theme in config.get_available_themes() {
                let marker = if theme == config.current_theme { "*" } else { " " };
                println!("{} {}", marker, theme);
            }
        }
    }
    Ok(())
}
