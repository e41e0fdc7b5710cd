//! Configuration for the NIH RePORTER MCP server.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

use crate::normalize::FallbackChains;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the RePORTER v2 API.
    pub const BASE_URL: &str = "https://api.reporter.nih.gov/v2";

    /// Project search endpoint path.
    pub const PROJECTS_PATH: &str = "/projects/search";

    /// Publication search endpoint path.
    pub const PUBLICATIONS_PATH: &str = "/publications/search";

    /// Header carrying the optional API key.
    pub const API_KEY_HEADER: &str = "x-api-key";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Internal retries on transient failures (disabled unless configured).
    pub const MAX_RETRIES: u32 = 0;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Default log file, relative to the working directory.
    pub const LOG_FILE: &str = "mcp-nih-reporter.log";
}

/// Paging bounds enforced on every search.
pub mod limits {
    /// Records per page when the caller gives no limit.
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Largest page RePORTER serves.
    pub const MAX_LIMIT: u32 = 500;

    /// Publication page size for combined search.
    pub const DEFAULT_PUBLICATION_LIMIT: u32 = 100;

    /// Largest offset RePORTER accepts.
    pub const MAX_OFFSET: u32 = 14_999;

    /// First fiscal year with data in RePORTER.
    pub const MIN_FISCAL_YEAR: i32 = 1985;
}

/// Environment variable names.
pub mod env {
    pub const API_KEY: &str = "NIH_REPORTER_API_KEY";
    pub const BASE_URL: &str = "NIH_REPORTER_BASE_URL";
    pub const TIMEOUT_SECS: &str = "NIH_REPORTER_TIMEOUT_SECS";
    pub const MAX_RETRIES: &str = "NIH_REPORTER_MAX_RETRIES";
    pub const LOG_FILE: &str = "NIH_REPORTER_LOG_FILE";
    pub const ABSTRACT_FIELDS: &str = "NIH_REPORTER_ABSTRACT_FIELDS";
}

/// Project fields requested on every project search.
pub mod fields {
    /// Display fields always requested.
    pub const PROJECT: &[&str] = &[
        "ApplId",
        "ProjectNum",
        "CoreProjectNum",
        "ProjectTitle",
        "PrincipalInvestigators",
        "Organization",
        "OrganizationType",
        "FiscalYear",
        "AwardAmount",
        "ProjectStartDate",
        "ProjectEndDate",
        "FundingMechanism",
        "AgencyIcAdmin",
        "SpendingCategoriesDesc",
        "CovidResponse",
        "FullStudySection",
        "ProjectDetailUrl",
    ];

    /// Added when abstracts are requested.
    pub const ABSTRACTS: &[&str] = &["AbstractText", "PhrText"];
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// RePORTER API key (optional).
    pub api_key: Option<String>,

    /// Base URL for the API (for testing with mock servers).
    pub base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Internal retries on transient failures.
    pub max_retries: u32,

    /// Append-only log file.
    pub log_file: PathBuf,

    /// Field fallback chains used by the normalizer.
    pub fallbacks: FallbackChains,
}

impl Config {
    /// Create a new configuration with optional API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: api::BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            log_file: PathBuf::from(api::LOG_FILE),
            fallbacks: FallbackChains::default(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0,
            log_file: std::env::temp_dir().join("mcp-nih-reporter-test.log"),
            fallbacks: FallbackChains::default(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var(env::API_KEY).ok());

        if let Ok(url) = std::env::var(env::BASE_URL) {
            config = config.with_base_url(&url);
        }
        if let Ok(secs) = std::env::var(env::TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", env::TIMEOUT_SECS))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(retries) = std::env::var(env::MAX_RETRIES) {
            config.max_retries = retries
                .trim()
                .parse()
                .with_context(|| format!("{} must be a non-negative integer", env::MAX_RETRIES))?;
        }
        if let Ok(path) = std::env::var(env::LOG_FILE) {
            config.log_file = PathBuf::from(path);
        }
        if let Ok(keys) = std::env::var(env::ABSTRACT_FIELDS) {
            config.fallbacks = config.fallbacks.with_abstract_fields(&keys);
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns error on a malformed base URL or a zero timeout.
    pub fn validate(&self) -> anyhow::Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL: {}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("base URL must use http or https: {}", self.base_url);
        }
        if self.request_timeout.is_zero() {
            bail!("request timeout must be greater than zero");
        }
        Ok(())
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.has_api_key());
        assert_eq!(config.base_url, api::BASE_URL);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = Config::new(Some("   ".to_string()));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = Config::default().with_base_url("http://localhost:9000/v2/");
        assert_eq!(config.endpoint(api::PROJECTS_PATH), "http://localhost:9000/v2/projects/search");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config::default().with_base_url("not a url");
        assert!(config.validate().is_err());

        let config = Config::default().with_base_url("ftp://example.org");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config { request_timeout: Duration::ZERO, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fields() {
        assert!(fields::PROJECT.contains(&"ProjectNum"));
        assert!(fields::ABSTRACTS.contains(&"AbstractText"));
        assert!(!fields::PROJECT.contains(&"AbstractText"));
    }
}
