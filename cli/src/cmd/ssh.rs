use anyhow::Result;
use clap::Args;
use jumpto::action::Action;
use jumpto::action::OutboundCommand;

use crate::cmd::Run;
use crate::session::Session;

/// Open a shell on a machine, or forward a port to it
#[derive(Debug, Args)]
pub struct SshArgs {
    /// Machine to connect to: `[hosting/]name[:number]`
    target: Option<String>,

    /// Forward a free local port to this port on the machine
    #[arg(short = 'p', long, value_name = "PORT")]
    port_forward: Option<u16>,

    /// Extra arguments handed to ssh as-is
    #[arg(last = true)]
    ssh_args: Vec<String>,
}

impl Run for SshArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let selection = session.machine(self.target.as_deref()).await?;
        let action = match self.port_forward {
            Some(remote_port) => Action::PortForward { remote_port },
            None => Action::Shell,
        };
        let command = session
            .command(&selection, &action, &self.ssh_args)
            .await?;
        Ok(Some(command))
    }
}
