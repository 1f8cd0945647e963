/// Database configuration and connection management
pub mod database;

/// Application settings and venue catalog loading from config.toml
pub mod settings;
