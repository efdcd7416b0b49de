use anyhow::anyhow;
use serde_json::Value;
use taskdash_transport::{MindmapUpload, QuarterTasks};

use crate::cli::{EmployeeTasksArgs, MindmapArgs, QuarterTasksArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::require_id;
use crate::output::{OutputFormat, render_tasks};

pub(crate) async fn handle_employee_tasks(
    ctx: &AppContext,
    args: &EmployeeTasksArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let employee_id = require_id("employee id", &args.employee_id)?;
    if args.from > args.to {
        return Err(CliError::validation(format!(
            "period start ({}) must not be after period end ({})",
            args.from, args.to
        )));
    }

    let tasks = ctx
        .transport
        .get_tasks_of_employee(employee_id, args.from, args.to)
        .await?;
    println!("{}", render_tasks(&tasks, output)?);
    Ok(())
}

pub(crate) async fn handle_quarter_tasks(
    ctx: &AppContext,
    args: &QuarterTasksArgs,
    output: OutputFormat,
) -> CliResult<()> {
    match ctx.transport.get_quarter_tasks().await {
        QuarterTasks::Loaded(tasks) => println!("{}", render_tasks(&tasks, output)?),
        QuarterTasks::Empty => println!("{}", render_tasks(&Value::Null, output)?),
        QuarterTasks::Unavailable(error) if args.strict => return Err(error.into()),
        QuarterTasks::Unavailable(error) => {
            eprintln!("warning: quarter tasks unavailable: {error}");
        }
    }
    Ok(())
}

pub(crate) async fn handle_mindmap(ctx: &AppContext, args: &MindmapArgs) -> CliResult<()> {
    let path = args.file.as_path();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CliError::validation(format!(
                "mindmap path '{}' has no usable file name",
                path.display()
            ))
        })?;
    let contents = std::fs::read(path).map_err(|err| {
        CliError::failure(anyhow!(
            "failed to read mindmap file '{}': {err}",
            path.display()
        ))
    })?;

    ctx.transport
        .parse_mindmap(MindmapUpload::new(file_name, contents))
        .await?;
    println!("Mindmap '{file_name}' submitted for parsing");
    Ok(())
}
