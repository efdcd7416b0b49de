use crate::client::{AppContext, CliResult};

pub(crate) async fn handle_salary_notify(ctx: &AppContext) -> CliResult<()> {
    ctx.transport.notify_about_salary().await?;
    println!("Salary notifications sent");
    Ok(())
}
