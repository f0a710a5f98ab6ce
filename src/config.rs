//! # Configuration
//!
//! Settings are read from the environment, after loading a `.env` file from
//! the working directory if there is one.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `ASSET_PREFIX` | yes | |
//! | `INVENTORY_URL` | for asset labels | |
//! | `BOX_URL_BASE` | no | `https://s.emf.camp/i` |
//! | `TEMPLATE_DIR` | no | `templates` |
//! | `LOG_LEVEL` | no | `info` |

use std::path::PathBuf;

use tracing::debug;

use crate::error::LabelError;
use crate::sheet::DEFAULT_BOX_URL_BASE;
use crate::template::DEFAULT_TEMPLATE_DIR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Organisation prefix of asset tags, e.g. `EMF`
    pub asset_prefix: String,
    /// Base URL of the inventory web UI
    pub inventory_url: Option<String>,
    /// Base URL of box QR links
    pub box_url_base: String,
    pub template_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load `.env`, then read the process environment.
    pub fn from_env() -> Result<Self, LabelError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(LabelError::Config(format!(".env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LabelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            asset_prefix: lookup("ASSET_PREFIX")
                .ok_or_else(|| LabelError::Config("ASSET_PREFIX not set in environment".to_string()))?,
            inventory_url: get("INVENTORY_URL").map(|url| url.trim_end_matches('/').to_string()),
            box_url_base: get("BOX_URL_BASE").unwrap_or_else(|| DEFAULT_BOX_URL_BASE.to_string()),
            template_dir: get("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR)),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Inventory URL, required for asset-backed labels.
    pub fn require_inventory_url(&self) -> Result<&str, LabelError> {
        self.inventory_url
            .as_deref()
            .ok_or_else(|| LabelError::Config("INVENTORY_URL not set in environment".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, LabelError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("ASSET_PREFIX", "EMF")]).unwrap();
        assert_eq!(
            config,
            Config {
                asset_prefix: "EMF".into(),
                inventory_url: None,
                box_url_base: "https://s.emf.camp/i".into(),
                template_dir: PathBuf::from("templates"),
                log_level: "info".into(),
            }
        );
        assert!(matches!(config.require_inventory_url(), Err(LabelError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ASSET_PREFIX", ""),
            ("INVENTORY_URL", "https://inventory.example/"),
            ("TEMPLATE_DIR", "/etc/labels"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.asset_prefix, "");
        assert_eq!(config.require_inventory_url().unwrap(), "https://inventory.example");
        assert_eq!(config.template_dir, PathBuf::from("/etc/labels"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_prefix_required() {
        assert!(matches!(config(&[]), Err(LabelError::Config(_))));
    }
}
