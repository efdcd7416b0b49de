//! Shared HTTP client: request construction, dispatch, and body decoding.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Method, Response, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::credentials::{AuthInterceptor, CredentialProvider};
use crate::error::{TransportError, TransportResult};

/// One backend call: endpoint, method, query, and body. Built per call, never reused.
#[derive(Debug)]
pub(crate) struct RequestDescriptor {
    operation: &'static str,
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: RequestBody,
}

#[derive(Debug)]
enum RequestBody {
    Empty,
    Multipart(Form),
}

impl RequestDescriptor {
    fn new<I, S>(operation: &'static str, method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub(crate) fn get<I, S>(operation: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(operation, Method::GET, segments)
    }

    pub(crate) fn post<I, S>(operation: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(operation, Method::POST, segments)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Endpoint path relative to the base address, for logs and errors.
    pub(crate) fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Handle to the shared HTTP client. Cloning is cheap and shares the connection pool
/// and cookie jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    interceptor: AuthInterceptor,
}

impl ApiClient {
    /// Build a standalone client that never attaches credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        Self::build(config, AuthInterceptor::standalone())
    }

    /// Build a client that asks `provider` for the session-init-data on every request.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the HTTP client cannot be built.
    pub fn with_credentials(
        config: ClientConfig,
        provider: Arc<dyn CredentialProvider>,
    ) -> TransportResult<Self> {
        Self::build(config, AuthInterceptor::new(provider))
    }

    fn build(config: ClientConfig, interceptor: AuthInterceptor) -> TransportResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(config.default_headers.clone())
            .cookie_store(config.forward_credentials);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            interceptor,
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Interceptor applied to every outgoing request.
    #[must_use]
    pub const fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    /// Absolute URL for the given path segments, appended below the base address.
    pub(crate) fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> TransportResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::invalid_config(
                    "base_url",
                    "address cannot carry endpoint paths",
                    Some(self.config.base_url.to_string()),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the response when the status is a success.
    pub(crate) async fn dispatch(&self, request: RequestDescriptor) -> TransportResult<Response> {
        let path = request.path();
        let RequestDescriptor {
            operation,
            method,
            segments,
            query,
            body,
        } = request;
        let url = self.endpoint(segments.as_slice())?;

        let mut builder = self.inner.request(method.clone(), url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let RequestBody::Multipart(form) = body {
            builder = builder.multipart(form);
        }
        let builder = self.interceptor.apply(builder)?;

        debug!(operation, method = %method, path = %path, "dispatching request");
        let response = builder.send().await.map_err(|source| {
            debug!(operation, path = %path, error = %source, "request failed");
            TransportError::Request {
                operation,
                path: path.clone(),
                source,
            }
        })?;

        let status = response.status();
        debug!(operation, path = %path, status = %status, "response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                operation,
                path,
                status,
                body,
            });
        }

        Ok(response)
    }

    /// Send one request and decode the response body.
    pub(crate) async fn fetch_json(&self, request: RequestDescriptor) -> TransportResult<Value> {
        let operation = request.operation;
        let path = request.path();
        let response = self.dispatch(request).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body {
                operation,
                path: path.clone(),
                source,
            })?;

        decode_body(content_type.as_deref(), &bytes).map_err(|source| TransportError::Decode {
            operation,
            path,
            source,
        })
    }

    /// Send one request and discard whatever the backend answers with.
    pub(crate) async fn execute(&self, request: RequestDescriptor) -> TransportResult<()> {
        self.dispatch(request).await.map(drop)
    }
}

/// Decode a success body into a JSON value.
///
/// Empty bodies become `null`. Bodies declared as JSON must parse. Anything else is
/// parsed when it happens to be JSON and returned as a string otherwise.
pub(crate) fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> serde_json::Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    if content_type.is_some_and(is_json_media_type) {
        return serde_json::from_slice(bytes);
    }

    Ok(serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(ClientConfig::from_url_str(base).expect("valid url")).expect("client")
    }

    #[test]
    fn endpoint_appends_below_base_path() {
        let client = client_for("https://dash.example.com/api");
        let url = client.endpoint(&["projects", "p42", "update-sheets"]).expect("url");
        assert_eq!(
            url.as_str(),
            "https://dash.example.com/api/projects/p42/update-sheets"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let client = client_for("https://dash.example.com/api/");
        let url = client.endpoint(&["access"]).expect("url");
        assert_eq!(url.as_str(), "https://dash.example.com/api/access");
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let client = client_for("http://localhost:8080");
        let url = client
            .endpoint(&["tasks", "employee", "jane doe/ops"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/tasks/employee/jane%20doe%2Fops"
        );
    }

    #[test]
    fn descriptor_path_is_slash_joined() {
        let request = RequestDescriptor::get("authorize", ["access"]);
        assert_eq!(request.path(), "/access");
        let request =
            RequestDescriptor::post("update_project_sheets", ["projects", "p1", "update-sheets"]);
        assert_eq!(request.path(), "/projects/p1/update-sheets");
    }

    #[test]
    fn invalid_base_is_rejected_at_construction() {
        let config = ClientConfig::from_url_str("ftp://files.example.com").expect("parses");
        assert!(ApiClient::new(config).is_err());
    }

    #[test]
    fn decode_empty_body_as_null() {
        assert_eq!(decode_body(None, b"").expect("decodes"), Value::Null);
        assert_eq!(
            decode_body(Some("application/json"), b" \n").expect("decodes"),
            Value::Null
        );
    }

    #[test]
    fn decode_json_body_unchanged() {
        let body = br#"[{"id":"t1","estimate":1.5}]"#;
        assert_eq!(
            decode_body(Some("application/json; charset=utf-8"), body).expect("decodes"),
            json!([{ "id": "t1", "estimate": 1.5 }])
        );
    }

    #[test]
    fn decode_sniffs_json_without_json_content_type() {
        let body = br#"{"ok":true}"#;
        assert_eq!(
            decode_body(Some("text/plain; charset=utf-8"), body).expect("decodes"),
            json!({ "ok": true })
        );
    }

    #[test]
    fn decode_plain_text_as_string() {
        let body = b"Sheets updated successfully";
        assert_eq!(
            decode_body(Some("text/plain; charset=utf-8"), body).expect("decodes"),
            Value::String("Sheets updated successfully".to_string())
        );
    }

    #[test]
    fn decode_rejects_malformed_declared_json() {
        assert!(decode_body(Some("application/json"), b"{not json").is_err());
        assert!(decode_body(Some("application/problem+json"), b"<html>").is_err());
    }
}
