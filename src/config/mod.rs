//! Configuration models for settings, the program catalog and new games.

pub mod catalog;
pub mod game;
pub mod settings;

pub use catalog::{ProgramCatalogConfig, ProgramConfig};
pub use game::GameConfig;
pub use settings::Settings;
