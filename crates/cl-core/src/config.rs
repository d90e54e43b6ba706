//! Configuration loading for the chem light controller.
//!
//! Resolution order for the config file:
//! 1. explicit path (`--config`)
//! 2. `CHEMLIGHT_CONFIG`
//! 3. `$XDG_CONFIG_HOME/chemlight/config.json`
//! 4. built-in defaults
//!
//! An explicit or env-var path must exist; the XDG location is optional.
//! `CHEMLIGHT_DESIGNATION` overrides the file's designation, and an explicit
//! designation (`--designation`) overrides both.

use cl_common::WGS84_WKID;
use cl_geomessage::GEOMESSAGE_VERSION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config path override variable.
pub const CONFIG_PATH_ENV: &str = "CHEMLIGHT_CONFIG";
/// Designation override variable.
pub const DESIGNATION_ENV: &str = "CHEMLIGHT_DESIGNATION";

const CONFIG_DIR_NAME: &str = "chemlight";
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChemLightConfig {
    /// Sender designation stamped on every report.
    pub unique_designation: Option<String>,
    /// Spatial reference used when a send does not name one.
    pub default_wkid: u32,
    /// Geomessage envelope version.
    pub geomessage_version: String,
}

impl Default for ChemLightConfig {
    fn default() -> Self {
        Self {
            unique_designation: None,
            default_wkid: WGS84_WKID,
            geomessage_version: GEOMESSAGE_VERSION.to_string(),
        }
    }
}

impl ChemLightConfig {
    /// Semantic checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_wkid == 0 {
            return Err(ConfigError::Invalid(
                "default_wkid must be a positive spatial reference code".to_string(),
            ));
        }
        if self.geomessage_version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "geomessage_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigResolution {
    CliFlag,
    EnvVar,
    XdgConfig,
    Default,
}

/// Caller-supplied overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub config_path: Option<PathBuf>,
    pub unique_designation: Option<String>,
    /// Replaces the platform config directory (tests, sandboxes).
    pub config_dir: Option<PathBuf>,
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ChemLightConfig,
    pub path: Option<PathBuf>,
    pub resolution: ConfigResolution,
}

/// Load configuration using the process environment.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    load_config_with(options, |key| std::env::var(key).ok())
}

/// Load configuration using an arbitrary variable lookup.
pub fn load_config_with(
    options: &ConfigOptions,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let (path, resolution) = resolve_path(options, &lookup);

    let mut config = match &path {
        Some(path) => read_config(path)?,
        None => ChemLightConfig::default(),
    };

    if let Some(designation) = lookup(DESIGNATION_ENV) {
        config.unique_designation = Some(designation);
    }
    if let Some(designation) = &options.unique_designation {
        config.unique_designation = Some(designation.clone());
    }

    config.validate()?;

    Ok(ResolvedConfig {
        config,
        path,
        resolution,
    })
}

fn resolve_path(
    options: &ConfigOptions,
    lookup: &impl Fn(&str) -> Option<String>,
) -> (Option<PathBuf>, ConfigResolution) {
    if let Some(path) = &options.config_path {
        return (Some(path.clone()), ConfigResolution::CliFlag);
    }

    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return (Some(PathBuf::from(path)), ConfigResolution::EnvVar);
    }

    let config_dir = options
        .config_dir
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME)));
    if let Some(dir) = config_dir {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return (Some(path), ConfigResolution::XdgConfig);
        }
    }

    (None, ConfigResolution::Default)
}

fn read_config(path: &Path) -> Result<ChemLightConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}
