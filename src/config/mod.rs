/// Database configuration and connection management
pub mod database;

/// LLC seed configuration loading from config.toml
pub mod llcs;

/// Acting-user configuration from environment variables
pub mod users;
