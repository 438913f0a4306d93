//! Configuration loader with multi-source merging

use super::settings::ServerConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Bare `PORT` environment variable (the original process surface)
    /// 2. `REELMATCH_*` environment variables (`__` separates nesting,
    ///    e.g. `REELMATCH_TMDB__API_KEY`)
    /// 3. Explicit config path (if provided), else `./reelmatch.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<ServerConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(ServerConfig::default()));

        match config_path {
            Some(path) => {
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let path = PathBuf::from("reelmatch.toml");
                if path.exists() {
                    figment = figment.merge(Toml::file(&path));
                }
            }
        }

        figment = figment.merge(Env::prefixed("REELMATCH_").split("__"));

        let mut config: ServerConfig = figment.extract().map_err(Box::new)?;

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        Ok(config)
    }

    /// Load only default configuration
    pub fn load_defaults() -> ServerConfig {
        ServerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.port, 3001);
        assert!(config.tmdb.api_key.is_empty());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "host = \"127.0.0.1\"\nport = 4500\n\n[tmdb]\napi_key = \"k\"").unwrap();

        let config = ConfigLoader::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4500);
        assert_eq!(config.tmdb.api_key, "k");
        // Unset fields keep their defaults
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_missing_explicit_file_keeps_defaults() {
        let config = ConfigLoader::load(Some(&PathBuf::from("/nonexistent/reelmatch.toml")));
        // figment treats a missing file as an empty source
        assert_eq!(config.unwrap().port, 3001);
    }
}
