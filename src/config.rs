// Service configuration, layered with the 'config' crate:
// defaults -> optional config.toml -> APP_* environment variables

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::catalog::CatalogSource;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_address: String,
    // Local JSON file holding the raw catalog ({"cars": [...]})
    pub catalog_path: String,
    // Remote catalog; takes precedence over catalog_path when set
    pub catalog_url: Option<String>,
    // Wishlist/compare persistence file. In-memory only when absent.
    pub store_path: Option<String>,
    pub compare_limit: usize,
    pub budget_threshold: f64,
    pub default_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            catalog_path: "data/cars.json".to_string(),
            catalog_url: None,
            store_path: None,
            compare_limit: 3,
            budget_threshold: 30000.0,
            default_page_size: 12,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let defaults = Settings::default();
        let builder = Config::builder()
            .set_default("server_address", defaults.server_address)?
            .set_default("catalog_path", defaults.catalog_path)?
            .set_default("compare_limit", defaults.compare_limit as i64)?
            .set_default("budget_threshold", defaults.budget_threshold)?
            .set_default("default_page_size", defaults.default_page_size as i64)?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Single underscores are part of our key names, so nested keys use "__"
            // (e.g., APP_CATALOG_PATH, APP_COMPARE_LIMIT)
            .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match self.catalog_url.as_deref() {
            Some(url) if !url.trim().is_empty() => CatalogSource::Url(url.to_string()),
            _ => CatalogSource::File(PathBuf::from(&self.catalog_path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_source_wins_over_path() {
        let settings = Settings {
            catalog_url: Some("https://cdn.example.com/cars.json".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings.catalog_source(),
            CatalogSource::Url("https://cdn.example.com/cars.json".to_string())
        );
    }

    #[test]
    fn blank_url_falls_back_to_file() {
        let settings = Settings {
            catalog_url: Some("   ".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings.catalog_source(),
            CatalogSource::File(PathBuf::from("data/cars.json"))
        );
    }
}
