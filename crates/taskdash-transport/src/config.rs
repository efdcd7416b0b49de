//! Immutable client configuration.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::HeaderMap;

use crate::error::{TransportError, TransportResult};

/// Default backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("taskdash/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every request issued through one client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address every endpoint path is appended to.
    pub base_url: Url,
    /// Keep and resend cookies issued by the backend.
    pub forward_credentials: bool,
    /// Upper bound on a single request; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Headers attached to every request before credentials are applied.
    pub default_headers: HeaderMap,
}

impl ClientConfig {
    /// Configuration targeting `base_url` with credential forwarding enabled.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            forward_credentials: true,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: HeaderMap::new(),
        }
    }

    /// Parse the base address from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidConfig`] when the string is not a URL.
    pub fn from_url_str(input: &str) -> TransportResult<Self> {
        let base_url = input.trim().parse::<Url>().map_err(|_| {
            TransportError::invalid_config("base_url", "not a valid URL", Some(input.to_string()))
        })?;
        Ok(Self::new(base_url))
    }

    /// Override the credential forwarding flag.
    #[must_use]
    pub const fn with_forward_credentials(mut self, enabled: bool) -> Self {
        self.forward_credentials = enabled;
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the default headers.
    #[must_use]
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Check that the base address can carry endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidConfig`] for non-HTTP schemes and for
    /// addresses that cannot be a base (`mailto:` and friends).
    pub fn validate(&self) -> TransportResult<()> {
        let url = &self.base_url;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::invalid_config(
                "base_url",
                "scheme must be http or https",
                Some(url.to_string()),
            ));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(TransportError::invalid_config(
                "base_url",
                "address cannot carry endpoint paths",
                Some(url.to_string()),
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(TransportError::invalid_config(
                "base_url",
                "address must not carry a query or fragment",
                Some(url.to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_address_forwards_credentials_without_timeout() {
        let config = ClientConfig::from_url_str(DEFAULT_API_URL).expect("default address parses");
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
        assert!(config.forward_credentials);
        assert!(config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = ClientConfig::from_url_str(DEFAULT_API_URL)
            .expect("default address parses")
            .with_forward_credentials(false)
            .with_timeout(Some(Duration::from_secs(3)))
            .with_user_agent("probe/1.0");
        assert!(!config.forward_credentials);
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.user_agent, "probe/1.0");
    }

    #[test]
    fn rejects_unparseable_urls() {
        let err = ClientConfig::from_url_str("not a url").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_non_http_schemes() {
        for input in ["ftp://example.com/api", "mailto:ops@example.com"] {
            let config = ClientConfig::from_url_str(input).expect("parses as a URL");
            assert!(config.validate().is_err(), "{input} must be rejected");
        }
    }

    #[test]
    fn rejects_base_with_query() {
        let config = ClientConfig::from_url_str("https://example.com/api?x=1").expect("parses");
        assert!(matches!(
            config.validate(),
            Err(TransportError::InvalidConfig {
                field: "base_url",
                ..
            })
        ));
    }
}
