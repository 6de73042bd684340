use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use std::path::Path;

use grow_tracker::api::{self, AppState};
use grow_tracker::cli::{self, Cli, Commands, PlantEdit};
use grow_tracker::{Config, Database, Profile, logging, utils};

const LOG_FILE_NAME: &str = "grow-tracker.log";

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };
    let command = cli.command.unwrap_or(Commands::Tui);

    // The dashboard owns the terminal, so its logs go to a file
    if matches!(command, Commands::Tui) {
        match utils::get_data_dir(profile) {
            Some(dir) => logging::init_file_logger(&dir.join(LOG_FILE_NAME), cli.verbose)?,
            None => logging::init_stderr_logger(cli.verbose),
        }
    } else {
        logging::init_stderr_logger(cli.verbose);
    }

    let (mut config, config_path) = match cli.config {
        Some(ref path) => {
            let path = utils::expand_path(path);
            (Config::load_from_path(&path)?, path)
        }
        None => (
            Config::load_with_profile(profile)?,
            Config::get_config_path(profile)?,
        ),
    };
    tracing::debug!(profile = profile.app_name(), "configuration loaded");

    let db_path = config.get_database_path();
    let db = open_database(&db_path)?;

    match command {
        Commands::Tui => {
            let app = grow_tracker::tui::App::new(config, db)?;
            grow_tracker::tui::run_event_loop(app)?;
        }
        Commands::List => cli::handle_list(&db)?,
        Commands::Show { id } => cli::handle_show(id, &db)?,
        Commands::Add {
            name,
            strain,
            planted,
            flowering_weeks,
            notes,
        } => {
            cli::handle_add(name, strain, planted, flowering_weeks, notes, &db, &config)?;
        }
        Commands::Edit {
            id,
            name,
            strain,
            planted,
            flowering_weeks,
            notes,
            add_image,
        } => {
            let edit = PlantEdit {
                name,
                strain,
                planted,
                flowering_weeks,
                notes,
                add_image,
            };
            cli::handle_edit(id, edit, &db)?;
        }
        Commands::Delete { id } => cli::handle_delete(id, &db)?,
        Commands::Water { id, note } => {
            cli::handle_water(id, note, &db)?;
        }
        Commands::Waterings { id } => cli::handle_waterings(id, &db)?,
        Commands::StartFlowering { id } => {
            cli::handle_start_flowering(id, &db)?;
        }
        Commands::Theme { name } => cli::handle_theme(name, &mut config, &config_path)?,
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let state = AppState::new(db, config.default_flowering_weeks);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(state, &addr))?;
        }
    }

    Ok(())
}

fn open_database(path: &Path) -> Result<Database> {
    let path = path
        .to_str()
        .ok_or_else(|| eyre!("Database path contains invalid UTF-8"))?;
    Ok(Database::new(path)?)
}
