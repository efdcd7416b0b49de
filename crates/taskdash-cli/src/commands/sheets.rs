use crate::cli::ProjectSheetsArgs;
use crate::client::{AppContext, CliResult};
use crate::commands::require_id;
use crate::output::{OutputFormat, render_message};

pub(crate) async fn handle_sheets_sync(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let response = ctx.transport.update_google_sheets().await?;
    match render_message(&response, output)? {
        Some(message) => println!("{message}"),
        None => println!("Spreadsheet sync requested"),
    }
    Ok(())
}

pub(crate) async fn handle_project_sheets(
    ctx: &AppContext,
    args: &ProjectSheetsArgs,
) -> CliResult<()> {
    let project_id = require_id("project id", &args.project_id)?;
    ctx.transport.update_project_sheets(project_id).await?;
    println!("Spreadsheet sync requested for project {project_id}");
    Ok(())
}
