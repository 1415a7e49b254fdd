use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, DEFAULT_API_URL, DEFAULT_CDN_URL, DEFAULT_STATIC_URL, ENV_PREFIX,
    HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_FILE,
};
use crate::utils::CdnjsError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local mirror configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog service configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Where mirrored assets live and how they are served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local storage root; also holds the resolution cache document
    pub static_root: PathBuf,
    /// Public URL prefix for mirrored files
    pub static_url: String,
    /// Never mirror, always hand out CDN URLs
    pub force_cdn: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let static_root = ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().join("static"))
            .unwrap_or_else(|| PathBuf::from("static"));

        Self {
            static_root,
            static_url: DEFAULT_STATIC_URL.to_string(),
            force_cdn: false,
        }
    }
}

/// cdnjs endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog API host
    pub api_url: String,
    /// CDN host that serves the files
    pub cdn_url: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Load configuration from multiple sources
///
/// An explicit `path` replaces the global and project-local files.
pub fn load_config(path: Option<&Path>) -> crate::utils::Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match path {
        Some(path) => {
            figment = figment.merge(Toml::file(path));
        }
        None => {
            if let Some(global_config) = global_config_path() {
                if global_config.exists() {
                    figment = figment.merge(Toml::file(&global_config));
                }
            }

            let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
            if local_config.exists() {
                figment = figment.merge(Toml::file(&local_config));
            }
        }
    }

    // CDNJS_STORAGE__FORCE_CDN=true -> storage.force_cdn
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment
        .extract()
        .map_err(|err| CdnjsError::Config(err.to_string()))
}

/// Path of the per-user configuration file
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = global_config_path().context("Could not determine config directory")?;

    if !config_file.exists() {
        save_config(&Config::default(), &config_file)?;
    }

    Ok(config_file)
}
