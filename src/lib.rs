pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod growth;
pub mod logging;
pub mod models;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use growth::{GrowthPhaseCalculator, Phase, PhaseDescriptor};
pub use models::{Plant, WateringRecord};
pub use utils::Profile;
