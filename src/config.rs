use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DexError;
use crate::gateway::DEFAULT_BASE_URL;

/// Fixed initial window, matching the original directory's first page.
pub const DEFAULT_PAGE_LIMIT: u32 = 151;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub page_limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub page_limit: u32,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves an optional `pokedex.json`. An explicitly named file must
    /// exist and parse; an absent default file falls back to defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DexError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("pokedex.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| DexError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DexError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_limit: config.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let resolved = ConfigLoader::resolve_config(Config::default());
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.page_limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn explicit_values_win() {
        let resolved = ConfigLoader::resolve_config(Config {
            base_url: Some("http://localhost:9000/api".to_string()),
            page_limit: Some(20),
        });
        assert_eq!(resolved.base_url, "http://localhost:9000/api");
        assert_eq!(resolved.page_limit, 20);
    }
}
