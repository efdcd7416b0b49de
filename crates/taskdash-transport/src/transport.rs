//! Dashboard operation catalog.
//!
//! # Design
//!
//! - One method per backend endpoint; each issues exactly one request and never retries.
//! - Returned values are the decoded response bodies, unchanged.
//! - Failures propagate as [`TransportError`], except for [`DashboardTransport::get_quarter_tasks`],
//!   which reports them through [`QuarterTasks`] so the call itself always succeeds.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::warn;

use crate::client::{ApiClient, RequestDescriptor};
use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{TransportError, TransportResult};

/// Multipart field carrying the mindmap document.
pub const MINDMAP_FIELD: &str = "file";

/// File sent to the mindmap parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindmapUpload {
    /// File name reported in the multipart part.
    pub file_name: String,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

impl MindmapUpload {
    /// Wrap file contents under the given name.
    #[must_use]
    pub fn new(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    fn into_form(self) -> Form {
        let part = Part::bytes(self.contents).file_name(self.file_name);
        Form::new().part(MINDMAP_FIELD, part)
    }
}

/// Outcome of loading the current quarter's tasks.
#[derive(Debug)]
pub enum QuarterTasks {
    /// The backend returned a payload.
    Loaded(Value),
    /// The backend answered successfully with no payload.
    Empty,
    /// The request failed; the failure has already been logged.
    Unavailable(TransportError),
}

impl QuarterTasks {
    fn from_result(result: TransportResult<Value>) -> Self {
        match result {
            Ok(Value::Null) => Self::Empty,
            Ok(value) => Self::Loaded(value),
            Err(error) => Self::Unavailable(error),
        }
    }

    /// Payload if one was loaded. Failures and empty answers both yield `None`.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Empty | Self::Unavailable(_) => None,
        }
    }

    /// Borrow the payload if one was loaded.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Empty | Self::Unavailable(_) => None,
        }
    }

    /// Borrow the failure, if the request failed.
    #[must_use]
    pub const fn error(&self) -> Option<&TransportError> {
        match self {
            Self::Unavailable(error) => Some(error),
            Self::Loaded(_) | Self::Empty => None,
        }
    }

    /// Whether the request failed.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Convert back into a conventional result.
    ///
    /// # Errors
    ///
    /// Returns the captured failure for [`QuarterTasks::Unavailable`].
    pub fn into_result(self) -> TransportResult<Option<Value>> {
        match self {
            Self::Loaded(value) => Ok(Some(value)),
            Self::Empty => Ok(None),
            Self::Unavailable(error) => Err(error),
        }
    }
}

/// The dashboard's backend operations.
#[derive(Clone, Debug)]
pub struct DashboardTransport {
    client: ApiClient,
}

impl DashboardTransport {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Build the shared client and wrap it. `None` runs standalone, without credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built.
    pub fn connect(
        config: ClientConfig,
        credentials: Option<Arc<dyn CredentialProvider>>,
    ) -> TransportResult<Self> {
        let client = match credentials {
            Some(provider) => ApiClient::with_credentials(config, provider)?,
            None => ApiClient::new(config)?,
        };
        Ok(Self::new(client))
    }

    /// Underlying client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Tasks assigned to `employee_id` within `[period_start, period_end]` (unix seconds).
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn get_tasks_of_employee(
        &self,
        employee_id: &str,
        period_start: i64,
        period_end: i64,
    ) -> TransportResult<Value> {
        let request =
            RequestDescriptor::get("get_tasks_of_employee", ["tasks", "employee", employee_id])
                .query("period_start", period_start)
                .query("period_end", period_end);
        self.client.fetch_json(request).await
    }

    /// Ask the backend to validate the current session.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure, including `401 Unauthorized`.
    pub async fn authorize(&self) -> TransportResult<()> {
        self.client
            .execute(RequestDescriptor::get("authorize", ["access"]))
            .await
    }

    /// Tasks of the current quarter. Never fails; see [`QuarterTasks`].
    pub async fn get_quarter_tasks(&self) -> QuarterTasks {
        let result = self
            .client
            .fetch_json(RequestDescriptor::get("get_quarter_tasks", ["quarter-tasks"]))
            .await;
        if let Err(error) = &result {
            warn!(
                error = %error,
                status = ?error.status(),
                "failed to load quarter tasks"
            );
        }
        QuarterTasks::from_result(result)
    }

    /// Trigger a full spreadsheet sync.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn update_google_sheets(&self) -> TransportResult<Value> {
        self.client
            .fetch_json(RequestDescriptor::post("update_google_sheets", ["update-sheets"]))
            .await
    }

    /// Trigger a spreadsheet sync for one project. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn update_project_sheets(&self, project_id: &str) -> TransportResult<()> {
        let request = RequestDescriptor::post(
            "update_project_sheets",
            ["projects", project_id, "update-sheets"],
        );
        self.client.execute(request).await
    }

    /// Projects that have a linked spreadsheet.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn list_projects_with_sheets(&self) -> TransportResult<Value> {
        self.client
            .fetch_json(RequestDescriptor::get(
                "list_projects_with_sheets",
                ["projects", "with-sheets"],
            ))
            .await
    }

    /// Upload a mindmap document for task extraction. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn parse_mindmap(&self, upload: MindmapUpload) -> TransportResult<()> {
        let request =
            RequestDescriptor::post("parse_mindmap", ["mindmap"]).multipart(upload.into_form());
        self.client.execute(request).await
    }

    /// Dispatch salary notifications to employees.
    ///
    /// # Errors
    ///
    /// Propagates every transport failure.
    pub async fn notify_about_salary(&self) -> TransportResult<()> {
        self.client
            .execute(RequestDescriptor::post("notify_about_salary", ["salary-notify"]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn status_error() -> TransportError {
        TransportError::Status {
            operation: "get_quarter_tasks",
            path: "/quarter-tasks".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    #[test]
    fn quarter_tasks_distinguish_empty_from_failure() {
        let empty = QuarterTasks::from_result(Ok(Value::Null));
        assert!(matches!(empty, QuarterTasks::Empty));
        assert!(empty.value().is_none());
        assert!(!empty.is_unavailable());

        let failed = QuarterTasks::from_result(Err(status_error()));
        assert!(failed.is_unavailable());
        assert_eq!(
            failed.error().and_then(TransportError::status),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert!(failed.into_value().is_none());
    }

    #[test]
    fn quarter_tasks_keep_empty_lists_as_loaded() {
        let outcome = QuarterTasks::from_result(Ok(json!([])));
        assert_eq!(outcome.value(), Some(&json!([])));
        assert_eq!(outcome.into_result().expect("loaded"), Some(json!([])));
    }

    #[test]
    fn quarter_tasks_into_result_surfaces_failure() {
        let outcome = QuarterTasks::from_result(Err(status_error()));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn mindmap_upload_keeps_name_and_bytes() {
        let upload = MindmapUpload::new("plan.opml", b"<opml/>".to_vec());
        assert_eq!(upload.file_name, "plan.opml");
        assert_eq!(upload.contents, b"<opml/>");
    }
}
