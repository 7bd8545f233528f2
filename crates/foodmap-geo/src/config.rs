//! Configuration for the upstream geocoding and POI services.
//!
//! The defaults point at the public Nominatim and Overpass instances.
//! Both services ask clients to identify themselves, so a user agent is
//! always sent.

use std::time::Duration;

use serde::Deserialize;

use crate::error::GeoError;

/// Public Nominatim search endpoint base.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Public Overpass API interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Upstream service settings, the `geo:` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Base URL of a Nominatim-compatible geocoder (no trailing `/search`).
    pub nominatim_url: String,
    /// Full URL of an Overpass interpreter endpoint.
    pub overpass_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_owned(),
            overpass_url: DEFAULT_OVERPASS_URL.to_owned(),
            user_agent: format!("foodmap/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 25,
        }
    }
}

impl GeoConfig {
    /// Per-request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that the settings can produce working clients.
    pub fn validate(&self) -> Result<(), GeoError> {
        for (name, url) in [
            ("nominatim_url", &self.nominatim_url),
            ("overpass_url", &self.overpass_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(GeoError::Config(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(GeoError::Config(String::from(
                "timeout_secs must be greater than zero",
            )));
        }
        Ok(())
    }

    /// Build the shared HTTP client for both services.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, GeoError> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout())
            .build()
            .map_err(|e| GeoError::Config(format!("could not build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GeoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(25));
        assert!(config.user_agent.starts_with("foodmap/"));
    }

    #[test]
    fn rejects_non_http_url() {
        let config = GeoConfig {
            overpass_url: String::from("ftp://example.org"),
            ..GeoConfig::default()
        };
        assert!(matches!(config.validate(), Err(GeoError::Config(msg)) if msg.starts_with("overpass_url")));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = GeoConfig {
            timeout_secs: 0,
            ..GeoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let parsed: Result<GeoConfig, _> =
            serde_json::from_str(r#"{"overpass_url": "http://localhost:12345/api/interpreter"}"#);
        let parsed = parsed.ok();
        assert_eq!(
            parsed.as_ref().map(|c| c.nominatim_url.as_str()),
            Some(DEFAULT_NOMINATIM_URL)
        );
        assert_eq!(parsed.map(|c| c.timeout_secs), Some(25));
    }
}
