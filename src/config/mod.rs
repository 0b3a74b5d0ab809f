/// Database configuration and connection management
pub mod database;

/// Catalog seeding from config.toml
pub mod seed;
