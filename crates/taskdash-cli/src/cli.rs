//! Command-line client for the task dashboard backend.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use taskdash_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, init_logging};
use taskdash_transport::DEFAULT_INIT_DATA_VAR;
use taskdash_transport::config::DEFAULT_API_URL;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{
    AppContext, CliResult, ConnectionSettings, SessionSource, parse_timestamp, parse_url,
};
use crate::commands::access::handle_access;
use crate::commands::projects::handle_projects;
use crate::commands::salary::handle_salary_notify;
use crate::commands::sheets::{handle_project_sheets, handle_sheets_sync};
use crate::commands::tasks::{handle_employee_tasks, handle_mindmap, handle_quarter_tasks};
use crate::output::OutputFormat;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parses CLI arguments, executes the requested command, and returns the process exit code.
pub async fn run() -> i32 {
    run_with(Cli::parse()).await
}

pub(crate) async fn run_with(cli: Cli) -> i32 {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        ..LoggingConfig::default()
    };
    if let Err(err @ TelemetryError::InvalidFilter { .. }) = init_logging(&logging) {
        eprintln!("warning: {err}; logging disabled");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("command", command = command_name, trace_id = %trace_id);

    match dispatch(cli, &trace_id).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let settings = ConnectionSettings {
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
        session: session_source(cli.init_data, cli.init_data_var),
    };
    let ctx = AppContext::connect(&settings, trace_id)?;

    match cli.command {
        Command::Access => handle_access(&ctx).await,
        Command::Tasks(tasks) => match tasks {
            TasksCommand::Employee(args) => handle_employee_tasks(&ctx, &args, cli.output).await,
            TasksCommand::Quarter(args) => handle_quarter_tasks(&ctx, &args, cli.output).await,
            TasksCommand::Mindmap(args) => handle_mindmap(&ctx, &args).await,
        },
        Command::Sheets(sheets) => match sheets {
            SheetsCommand::Sync => handle_sheets_sync(&ctx, cli.output).await,
            SheetsCommand::Project(args) => handle_project_sheets(&ctx, &args).await,
        },
        Command::Projects => handle_projects(&ctx, cli.output).await,
        Command::Salary(SalaryCommand::Notify) => handle_salary_notify(&ctx).await,
    }
}

fn session_source(init_data: Option<String>, var: String) -> SessionSource {
    init_data.map_or(SessionSource::Environment(var), SessionSource::Inline)
}

#[derive(Parser, Debug)]
#[command(name = "taskdash", about = "Command-line client for the task dashboard backend")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "TASKDASH_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "TASKDASH_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Request timeout in seconds (0 disables it)"
    )]
    timeout: u64,
    #[arg(
        long,
        global = true,
        help = "Session init-data sent verbatim as the Authorization header"
    )]
    init_data: Option<String>,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_INIT_DATA_VAR,
        help = "Environment variable re-read for init-data when --init-data is omitted"
    )]
    init_data_var: String,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        env = "TASKDASH_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(long, global = true, env = "TASKDASH_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(long, global = true, env = "TASKDASH_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the current session is authorized.
    Access,
    /// Query and import tasks.
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Synchronise spreadsheets.
    #[command(subcommand)]
    Sheets(SheetsCommand),
    /// List projects with a linked spreadsheet.
    Projects,
    /// Salary notifications.
    #[command(subcommand)]
    Salary(SalaryCommand),
}

#[derive(Subcommand, Debug)]
enum TasksCommand {
    /// Tasks of one employee within a period.
    Employee(EmployeeTasksArgs),
    /// Tasks of the current quarter.
    Quarter(QuarterTasksArgs),
    /// Upload a mindmap document for task extraction.
    Mindmap(MindmapArgs),
}

#[derive(Subcommand, Debug)]
enum SheetsCommand {
    /// Sync every spreadsheet.
    Sync,
    /// Sync the spreadsheet of one project.
    Project(ProjectSheetsArgs),
}

#[derive(Subcommand, Debug)]
enum SalaryCommand {
    /// Send salary notifications to employees.
    Notify,
}

#[derive(Args, Debug)]
pub(crate) struct EmployeeTasksArgs {
    /// Employee identifier.
    pub(crate) employee_id: String,
    /// Period start: unix seconds, RFC 3339, or YYYY-MM-DD.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) from: i64,
    /// Period end: unix seconds, RFC 3339, or YYYY-MM-DD.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) to: i64,
}

#[derive(Args, Debug)]
pub(crate) struct QuarterTasksArgs {
    /// Exit with an error when the quarter tasks cannot be loaded.
    #[arg(long)]
    pub(crate) strict: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MindmapArgs {
    /// Mindmap file to upload.
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectSheetsArgs {
    /// Project identifier.
    pub(crate) project_id: String,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Access => "access",
        Command::Tasks(TasksCommand::Employee(_)) => "tasks_employee",
        Command::Tasks(TasksCommand::Quarter(_)) => "tasks_quarter",
        Command::Tasks(TasksCommand::Mindmap(_)) => "tasks_mindmap",
        Command::Sheets(SheetsCommand::Sync) => "sheets_sync",
        Command::Sheets(SheetsCommand::Project(_)) => "sheets_project",
        Command::Projects => "projects",
        Command::Salary(SalaryCommand::Notify) => "salary_notify",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::try_parse_from(args).map_err(|err| anyhow!(err.to_string()))
    }

    #[test]
    fn parses_employee_tasks_with_mixed_timestamps() -> Result<()> {
        let cli = parse(&[
            "taskdash",
            "tasks",
            "employee",
            "emp-7",
            "--from",
            "1970-01-02",
            "--to",
            "172800",
        ])?;
        let Command::Tasks(TasksCommand::Employee(args)) = cli.command else {
            return Err(anyhow!("expected employee tasks command"));
        };
        assert_eq!(args.employee_id, "emp-7");
        assert_eq!(args.from, 86_400);
        assert_eq!(args.to, 172_800);
        Ok(())
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        assert!(
            parse(&["taskdash", "tasks", "employee", "e", "--from", "soon", "--to", "1"]).is_err()
        );
    }

    #[test]
    fn global_flags_apply_after_subcommand() -> Result<()> {
        let cli = parse(&[
            "taskdash",
            "projects",
            "--output",
            "json",
            "--init-data",
            "query_id=1",
            "--log-format",
            "json",
        ])?;
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.init_data.as_deref(), Some("query_id=1"));
        assert_eq!(cli.log_format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn rejects_invalid_api_url() {
        assert!(parse(&["taskdash", "access", "--api-url", "not a url"]).is_err());
    }

    #[test]
    fn session_source_prefers_inline_init_data() {
        assert_eq!(
            session_source(Some("inline".to_string()), "VAR".to_string()),
            SessionSource::Inline("inline".to_string())
        );
        assert_eq!(
            session_source(None, "VAR".to_string()),
            SessionSource::Environment("VAR".to_string())
        );
    }

    #[test]
    fn command_label_matches_variants() -> Result<()> {
        let cases = [
            (vec!["taskdash", "access"], "access"),
            (vec!["taskdash", "tasks", "quarter", "--strict"], "tasks_quarter"),
            (vec!["taskdash", "tasks", "mindmap", "map.xmind"], "tasks_mindmap"),
            (vec!["taskdash", "sheets", "sync"], "sheets_sync"),
            (vec!["taskdash", "sheets", "project", "p1"], "sheets_project"),
            (vec!["taskdash", "projects"], "projects"),
            (vec!["taskdash", "salary", "notify"], "salary_notify"),
        ];
        for (args, label) in cases {
            assert_eq!(command_label(&parse(&args)?.command), label);
        }
        Ok(())
    }

    #[tokio::test]
    async fn run_with_returns_zero_on_success() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/projects/with-sheets")
                    .header("authorization", "query_id=1")
                    .header_exists("x-request-id");
                then.status(200).json_body(json!([]));
            })
            .await;

        let api_url = server.url("/api");
        let cli = parse(&[
            "taskdash",
            "--api-url",
            &api_url,
            "--init-data",
            "query_id=1",
            "projects",
        ])?;
        assert_eq!(run_with(cli).await, 0);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn run_with_maps_failures_to_exit_codes() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/access");
                then.status(401).body("Unauthorized");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tasks/employee/e1");
                then.status(400).body("invalid period_start");
            })
            .await;

        let api_url = server.url("/api");
        let access = parse(&["taskdash", "--api-url", &api_url, "access"])?;
        assert_eq!(run_with(access).await, 3);

        let tasks = parse(&[
            "taskdash", "--api-url", &api_url, "tasks", "employee", "e1", "--from", "1", "--to",
            "2",
        ])?;
        assert_eq!(run_with(tasks).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn run_with_rejects_non_http_api_url() -> Result<()> {
        let cli = parse(&["taskdash", "--api-url", "ftp://files.example.com", "access"])?;
        assert_eq!(run_with(cli).await, 2);
        Ok(())
    }
}
