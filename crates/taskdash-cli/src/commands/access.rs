use crate::client::{AppContext, CliResult};

pub(crate) async fn handle_access(ctx: &AppContext) -> CliResult<()> {
    ctx.transport.authorize().await?;
    println!("Session authorized");
    Ok(())
}
