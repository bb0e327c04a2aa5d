use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use jumpto::action::Action;
use jumpto::action::OutboundCommand;

use crate::cmd::Run;
use crate::session::Session;

/// Copy local files to a machine
#[derive(Debug, Args)]
pub struct ScpPushArgs {
    /// Machine to copy to: `[hosting/]name[:number]`
    target: String,

    /// Local files, then the remote destination
    #[arg(num_args = 2.., required = true, value_name = "PATH")]
    paths: Vec<String>,

    /// Extra arguments handed to scp as-is
    #[arg(last = true)]
    scp_args: Vec<String>,
}

impl Run for ScpPushArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let (destination, sources) = split_destination(&self.paths);
        let selection = session.machine(Some(&self.target)).await?;
        let action = Action::Push {
            sources: sources.iter().map(Utf8PathBuf::from).collect(),
            destination: destination.to_owned(),
        };
        let command = session
            .command(&selection, &action, &self.scp_args)
            .await?;
        Ok(Some(command))
    }
}

/// Copy files from a machine to local disk
#[derive(Debug, Args)]
pub struct ScpPullArgs {
    /// Machine to copy from: `[hosting/]name[:number]`
    target: String,

    /// Remote files, then the local destination
    #[arg(num_args = 2.., required = true, value_name = "PATH")]
    paths: Vec<String>,

    /// Extra arguments handed to scp as-is
    #[arg(last = true)]
    scp_args: Vec<String>,
}

impl Run for ScpPullArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let (destination, sources) = split_destination(&self.paths);
        let selection = session.machine(Some(&self.target)).await?;
        let action = Action::Pull {
            sources: sources.to_vec(),
            destination: Utf8PathBuf::from(destination),
        };
        let command = session
            .command(&selection, &action, &self.scp_args)
            .await?;
        Ok(Some(command))
    }
}

/// The last path is the destination. Clap guarantees at least two.
fn split_destination(paths: &[String]) -> (&str, &[String]) {
    match paths.split_last() {
        Some((destination, sources)) => (destination, sources),
        None => ("", paths),
    }
}
