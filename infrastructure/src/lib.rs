//! Infrastructure layer for reelmatch
//!
//! Adapters for the outside world: the TMDB movie catalog and
//! configuration loading. Implements the ports defined by the
//! application layer.

pub mod config;
pub mod tmdb;

pub use config::{ConfigError, ConfigLoader, ServerConfig, TmdbConfig};
pub use tmdb::TmdbCatalog;
