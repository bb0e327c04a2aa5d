use anyhow::Result;
use clap::Args;
use jumpto::action::OutboundCommand;

use crate::cmd::Run;
use crate::session::app_target;
use crate::session::Session;

/// Resolve a target and print the machine without connecting
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Target to resolve
    target: Option<String>,

    /// Read the target as `[grouping/]app[:number]`
    #[arg(long)]
    app: bool,

    /// Print the full selection as JSON
    #[arg(long)]
    json: bool,
}

impl Run for ResolveArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let selection = if self.app {
            let target = app_target(self.target.as_deref())?;
            session.app(&target).await?
        } else {
            session.machine(self.target.as_deref()).await?
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&selection)?);
        } else {
            println!("{}", selection.endpoint.hostname);
        }

        Ok(None)
    }
}
