use anyhow::Result;
use clap::Args;
use jumpto::action::Action;
use jumpto::action::OutboundCommand;

use crate::cmd::Run;
use crate::session::app_target;
use crate::session::Session;

/// Open a console for an application
#[derive(Debug, Args)]
pub struct AppConsoleArgs {
    /// Application to connect to: `[grouping/]app[:number]`
    target: Option<String>,

    /// Extra arguments handed to ssh as-is
    #[arg(last = true)]
    ssh_args: Vec<String>,
}

impl Run for AppConsoleArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let target = app_target(self.target.as_deref())?;
        let selection = session.app(&target).await?;
        let action = Action::app_console(&target.app);
        Ok(Some(session.command(&selection, &action, &self.ssh_args).await?))
    }
}

/// Open a database console for an application
#[derive(Debug, Args)]
pub struct AppDbconsoleArgs {
    /// Application to connect to: `[grouping/]app[:number]`
    target: Option<String>,

    /// Extra arguments handed to ssh as-is
    #[arg(last = true)]
    ssh_args: Vec<String>,
}

impl Run for AppDbconsoleArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let target = app_target(self.target.as_deref())?;
        let selection = session.app(&target).await?;
        let action = Action::app_dbconsole(&target.app);
        Ok(Some(session.command(&selection, &action, &self.ssh_args).await?))
    }
}
