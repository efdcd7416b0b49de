//! Credential providers and the authorization interceptor.
//!
//! # Design
//!
//! - Credentials come from an injected [`CredentialProvider`]; no provider means standalone mode.
//! - The provider is consulted for every request, never cached, so a session that appears
//!   after the client was built is still honoured.
//! - The session-init-data is forwarded verbatim as the `Authorization` header.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::error::{TransportError, TransportResult};

/// Environment variable read by [`EnvInitData::default`].
pub const DEFAULT_INIT_DATA_VAR: &str = "TASKDASH_INIT_DATA";

/// Source of the session-init-data issued by the embedding host.
pub trait CredentialProvider: Send + Sync {
    /// Current session-init-data, or `None` when no session is active.
    fn session_init_data(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn session_init_data(&self) -> Option<String> {
        self()
    }
}

/// Standalone mode: never supplies credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn session_init_data(&self) -> Option<String> {
        None
    }
}

/// A fixed session-init-data string.
#[derive(Clone)]
pub struct StaticCredentials {
    init_data: String,
}

impl StaticCredentials {
    /// Wrap an init-data string.
    #[must_use]
    pub fn new(init_data: impl Into<String>) -> Self {
        Self {
            init_data: init_data.into(),
        }
    }
}

impl Debug for StaticCredentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StaticCredentials")
            .field("init_data", &"<redacted>")
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn session_init_data(&self) -> Option<String> {
        Some(self.init_data.clone())
    }
}

/// Host adapter reading the init-data from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvInitData {
    var: String,
}

impl EnvInitData {
    /// Read from the named variable.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable consulted.
    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvInitData {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_DATA_VAR)
    }
}

impl CredentialProvider for EnvInitData {
    fn session_init_data(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Request hook attaching the session-init-data as the `Authorization` header.
#[derive(Clone, Default)]
pub struct AuthInterceptor {
    provider: Option<Arc<dyn CredentialProvider>>,
}

impl AuthInterceptor {
    /// Interceptor backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Interceptor that never attaches credentials.
    #[must_use]
    pub const fn standalone() -> Self {
        Self { provider: None }
    }

    /// Whether a provider is configured at all.
    #[must_use]
    pub const fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Header value for the next request, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidCredential`] when the init-data contains bytes
    /// that are not allowed in a header value.
    pub fn authorization(&self) -> TransportResult<Option<HeaderValue>> {
        let Some(init_data) = self
            .provider
            .as_ref()
            .and_then(|provider| provider.session_init_data())
            .filter(|value| !value.is_empty())
        else {
            return Ok(None);
        };

        let mut value = HeaderValue::from_str(&init_data)
            .map_err(|source| TransportError::InvalidCredential { source })?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Attach credentials to `request` when a session is active.
    ///
    /// # Errors
    ///
    /// Propagates [`AuthInterceptor::authorization`] failures.
    pub fn apply(&self, request: RequestBuilder) -> TransportResult<RequestBuilder> {
        Ok(match self.authorization()? {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        })
    }
}

impl Debug for AuthInterceptor {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthInterceptor")
            .field("provider", &self.has_provider())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn standalone_attaches_nothing() {
        let interceptor = AuthInterceptor::standalone();
        assert!(!interceptor.has_provider());
        assert!(interceptor.authorization().expect("no error").is_none());
    }

    #[test]
    fn no_credentials_provider_attaches_nothing() {
        let interceptor = AuthInterceptor::new(Arc::new(NoCredentials));
        assert!(interceptor.has_provider());
        assert!(interceptor.authorization().expect("no error").is_none());
    }

    #[test]
    fn static_credentials_are_forwarded_verbatim() {
        let init_data = "query_id=AAE&user=%7B%22id%22%3A1%7D&hash=abc";
        let interceptor = AuthInterceptor::new(Arc::new(StaticCredentials::new(init_data)));
        let value = interceptor
            .authorization()
            .expect("no error")
            .expect("header present");
        assert_eq!(value.to_str().expect("ascii"), init_data);
        assert!(value.is_sensitive());
    }

    #[test]
    fn empty_init_data_is_treated_as_absent() {
        let interceptor = AuthInterceptor::new(Arc::new(StaticCredentials::new("")));
        assert!(interceptor.authorization().expect("no error").is_none());
    }

    #[test]
    fn provider_is_consulted_on_every_call() {
        let values = Mutex::new(vec![Some("second".to_string()), Some("first".to_string())]);
        let provider = move || values.lock().ok().and_then(|mut stack| stack.pop().flatten());
        let interceptor = AuthInterceptor::new(Arc::new(provider));

        let first = interceptor.authorization().expect("no error");
        let second = interceptor.authorization().expect("no error");
        let third = interceptor.authorization().expect("no error");
        assert_eq!(first.as_ref().map(HeaderValue::as_bytes), Some(&b"first"[..]));
        assert_eq!(second.as_ref().map(HeaderValue::as_bytes), Some(&b"second"[..]));
        assert!(third.is_none());
    }

    #[test]
    fn control_characters_are_rejected() {
        let interceptor = AuthInterceptor::new(Arc::new(StaticCredentials::new("a\nb")));
        assert!(matches!(
            interceptor.authorization(),
            Err(TransportError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn env_provider_reads_unset_variable_as_absent() {
        let provider = EnvInitData::new("TASKDASH_TEST_INIT_DATA_NEVER_SET");
        assert!(provider.session_init_data().is_none());
        let interceptor = AuthInterceptor::new(Arc::new(provider));
        assert!(interceptor.authorization().expect("no error").is_none());
    }

    #[test]
    fn env_provider_reads_the_live_environment() {
        let provider = EnvInitData::new("CARGO_MANIFEST_DIR");
        assert_eq!(
            provider.session_init_data(),
            std::env::var("CARGO_MANIFEST_DIR").ok()
        );
    }

    #[test]
    fn env_provider_defaults_to_documented_variable() {
        assert_eq!(EnvInitData::default().var(), DEFAULT_INIT_DATA_VAR);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", StaticCredentials::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
