//! Typed views over backend payloads.
//!
//! Operations hand back the decoded body untouched; these types exist for callers that want
//! to render it. Every field is optional on the wire so older or newer backends still decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A task row as reported by the task endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    /// Backend task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Workflow status label.
    pub status: String,
    /// Owning project identifier.
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// Identifier of the assigned employee.
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    /// Display name of the assigned employee.
    pub employee: String,
    /// Raw tags.
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Planned start (RFC 3339).
    pub start_time: Option<String>,
    /// Planned end (RFC 3339).
    pub end_time: Option<String>,
    /// Estimated hours.
    pub estimate: f64,
}

/// A project with a linked spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    /// Backend project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Status label.
    pub status: String,
    /// Project type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Link to the project spreadsheet.
    pub sheets_link: String,
    /// Identifier of the managing employee.
    #[serde(rename = "managerID")]
    pub manager_id: String,
}

/// Decode a list payload. `null` decodes as an empty list.
///
/// # Errors
///
/// Returns an error when the value is neither `null` nor an array of `T`.
pub fn decode_list<T: DeserializeOwned>(value: &Value) -> serde_json::Result<Vec<T>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Vec::<T>::deserialize(value)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
