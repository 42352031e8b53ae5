/// Database connection and table creation
pub mod database;

/// Dashboard settings from the TOML file
pub mod settings;

pub use settings::Settings;
