//! Portal endpoints, timeout, and client identity.

use std::time::Duration;

use reqwest::Url;

use crate::TransportError;

/// Origin of the court's public site.
pub const DEFAULT_BASE_URL: &str = "https://delhihighcourt.nic.in";

/// Path of the case-number lookup page (GET for the form, POST to search).
pub const DEFAULT_CASE_SEARCH_PATH: &str = "/app/case-number";

/// Path of the CAPTCHA validation endpoint.
pub const DEFAULT_VALIDATE_CAPTCHA_PATH: &str = "/app/validateCaptcha";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Desktop browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "CASE_LOOKUP_BASE_URL";

/// Environment variable overriding [`DEFAULT_TIMEOUT_SECS`].
pub const TIMEOUT_ENV: &str = "CASE_LOOKUP_TIMEOUT_SECS";

/// Where and how to reach the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    /// Path of the case-number lookup page.
    pub case_search_path: String,
    /// Path of the CAPTCHA validation endpoint.
    pub validate_captcha_path: String,
    /// Bound applied to every request.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PortalConfig {
    /// Creates a config for the given origin with default paths and timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            case_search_path: DEFAULT_CASE_SEARCH_PATH.to_owned(),
            validate_captcha_path: DEFAULT_VALIDATE_CAPTCHA_PATH.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Builds a config from `CASE_LOOKUP_BASE_URL` and
    /// `CASE_LOOKUP_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url);

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => log::warn!("Ignoring invalid {TIMEOUT_ENV}={raw:?}"),
            }
        }

        config
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        user_agent.clone_into(&mut self.user_agent);
        self
    }

    /// Absolute URL of the case-number lookup page.
    #[must_use]
    pub fn case_search_url(&self) -> String {
        format!("{}{}", self.base_url, self.case_search_path)
    }

    /// Absolute URL of the CAPTCHA validation endpoint.
    #[must_use]
    pub fn validate_captcha_url(&self) -> String {
        format!("{}{}", self.base_url, self.validate_captcha_path)
    }

    /// Parses the base URL for resolving relative links.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the base URL is malformed.
    pub fn origin(&self) -> Result<Url, TransportError> {
        Url::parse(&self.base_url).map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", self.base_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls_from_origin() {
        let config = PortalConfig::new("https://portal.example/");
        assert_eq!(config.case_search_url(), "https://portal.example/app/case-number");
        assert_eq!(
            config.validate_captcha_url(),
            "https://portal.example/app/validateCaptcha"
        );
    }

    #[test]
    fn defaults_to_thirty_second_timeout() {
        assert_eq!(PortalConfig::default().timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_malformed_origin() {
        assert!(matches!(
            PortalConfig::new("not a url").origin(),
            Err(TransportError::InvalidUrl(_))
        ));
    }
}
