//! Dashboard configuration.
//!
//! Values come from three layers, highest priority first: command-line flags
//! (and their environment variables), the optional YAML file, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use atlas_client::{ClientConfig, DEFAULT_BACKEND_URL, DEFAULT_MAP_URL, DEFAULT_TIMEOUT_SECS};
use atlas_common::Theme;
use drilldown::DEFAULT_ROOT_NAME;
use serde::{Deserialize, Serialize};

/// Contents of the YAML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub root_name: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl FileConfig {
    /// Load configuration from YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub map_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub theme: Option<Theme>,
}

/// Resolved configuration used to build the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    pub client: ClientConfig,
    pub root_name: String,
    pub theme: Theme,
    pub session_file: PathBuf,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), Overrides::default())
    }
}

impl AtlasConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let client = ClientConfig {
            backend_url: overrides
                .backend_url
                .or(file.backend_url)
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            map_url: overrides
                .map_url
                .or(file.map_url)
                .unwrap_or_else(|| DEFAULT_MAP_URL.to_string()),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        };

        Self {
            client,
            root_name: file
                .root_name
                .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string()),
            theme: overrides.theme.or(file.theme).unwrap_or_default(),
            session_file: overrides
                .session_file
                .or(file.session_file)
                .unwrap_or_else(default_session_file),
        }
    }

    /// Load the optional file at `path` and apply `overrides` on top.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let config = Self::resolve(file, overrides);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.client.validate()?;
        if self.root_name.trim().is_empty() {
            bail!("root_name must not be empty");
        }
        if self.session_file.as_os_str().is_empty() {
            bail!("session_file must not be empty");
        }
        Ok(())
    }
}

/// `~/.atlas/session.json`, or a file in the working directory without a home.
fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".atlas").join("session.json"),
        None => PathBuf::from("atlas-session.json"),
    }
}
