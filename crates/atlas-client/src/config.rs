//! Connection settings shared by the API clients.

use std::time::Duration;

use atlas_common::{AtlasError, AtlasResult};
use reqwest::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_MAP_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the auth/users service; endpoint paths are appended.
    pub backend_url: String,
    /// Base URL of the geospatial service; only its origin is used.
    pub map_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            map_url: DEFAULT_MAP_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> AtlasResult<()> {
        parse_base("backend_url", &self.backend_url)?;
        parse_base("map_url", &self.map_url)?;
        if self.timeout.is_zero() {
            return Err(AtlasError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Parse a base URL, rejecting empty and non-HTTP values.
pub(crate) fn parse_base(name: &str, value: &str) -> AtlasResult<Url> {
    if value.trim().is_empty() {
        return Err(AtlasError::Config(format!("{} must not be empty", name)));
    }
    let url = Url::parse(value.trim())
        .map_err(|e| AtlasError::Config(format!("{} '{}' is not a valid URL: {}", name, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AtlasError::Config(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}
