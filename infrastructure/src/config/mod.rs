//! Configuration schema and loading

pub mod loader;
pub mod settings;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ServerConfig, TmdbConfig};
