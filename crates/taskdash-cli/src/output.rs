//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use clap::ValueEnum;
use serde_json::Value;
use taskdash_transport::models::decode_list;
use taskdash_transport::{Project, Task};

use crate::client::{CliError, CliResult};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) fn render_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_tasks(value: &Value, format: OutputFormat) -> CliResult<String> {
    if format == OutputFormat::Json {
        return render_json(value);
    }

    let tasks: Vec<Task> = decode_list(value)
        .map_err(|err| CliError::failure(anyhow!("unexpected task payload: {err}")))?;
    if tasks.is_empty() {
        return Ok("no tasks".to_string());
    }

    let mut out = format!(
        "{:<36} {:<20} {:>7} {:<16} TASK\n",
        "ID", "STATUS", "EST", "EMPLOYEE"
    );
    for task in &tasks {
        let _ = writeln!(
            out,
            "{:<36} {:<20} {:>7} {:<16} {}",
            or_dash(&task.id),
            or_dash(&task.status),
            format_hours(task.estimate),
            truncate(or_dash(&task.employee), 16),
            or_dash(&task.title)
        );
    }
    let _ = write!(
        out,
        "{} task(s), {} estimated",
        tasks.len(),
        format_hours(tasks.iter().map(|task| task.estimate).sum())
    );
    Ok(out)
}

pub(crate) fn render_projects(value: &Value, format: OutputFormat) -> CliResult<String> {
    if format == OutputFormat::Json {
        return render_json(value);
    }

    let projects: Vec<Project> = decode_list(value)
        .map_err(|err| CliError::failure(anyhow!("unexpected project payload: {err}")))?;
    if projects.is_empty() {
        return Ok("no projects with linked sheets".to_string());
    }

    let mut out = format!("{:<36} {:<24} {:<14} SHEETS\n", "ID", "NAME", "STATUS");
    for project in &projects {
        let _ = writeln!(
            out,
            "{:<36} {:<24} {:<14} {}",
            or_dash(&project.id),
            truncate(or_dash(&project.name), 24),
            or_dash(&project.status),
            or_dash(&project.sheets_link)
        );
    }
    Ok(out.trim_end().to_string())
}

/// Render an acknowledgement body: plain strings verbatim, anything else as JSON.
pub(crate) fn render_message(value: &Value, format: OutputFormat) -> CliResult<Option<String>> {
    match (value, format) {
        (Value::Null, _) => Ok(None),
        (Value::String(text), OutputFormat::Table) => Ok(Some(text.trim().to_string())),
        _ => render_json(value).map(Some),
    }
}

pub(crate) fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
