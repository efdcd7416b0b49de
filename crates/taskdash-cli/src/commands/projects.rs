use crate::client::{AppContext, CliResult};
use crate::output::{OutputFormat, render_projects};

pub(crate) async fn handle_projects(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let projects = ctx.transport.list_projects_with_sheets().await?;
    println!("{}", render_projects(&projects, output)?);
    Ok(())
}
