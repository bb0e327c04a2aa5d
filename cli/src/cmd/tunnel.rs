use anyhow::Result;
use clap::Args;
use jumpto::action::Action;
use jumpto::action::OutboundCommand;
use jumpto::action::RABBITMQ_PORT;
use jumpto::action::SIDEKIQ_MONITORING_PORT;

use crate::cmd::Run;
use crate::session::app_target;
use crate::session::Session;

/// Forward the RabbitMQ management UI to a local port
#[derive(Debug, Args)]
pub struct RabbitmqArgs {
    /// Machine running RabbitMQ: `[hosting/]name[:number]`
    #[arg(default_value = "rabbitmq")]
    pub(super) target: String,

    /// Extra arguments handed to ssh as-is
    #[arg(last = true)]
    pub(super) ssh_args: Vec<String>,
}

impl Run for RabbitmqArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let selection = session.machine(Some(&self.target)).await?;
        let action = Action::PortForward {
            remote_port: RABBITMQ_PORT,
        };
        Ok(Some(session.command(&selection, &action, &self.ssh_args).await?))
    }
}

/// Forward the Sidekiq monitoring UI to a local port
#[derive(Debug, Args)]
pub struct SidekiqMonitoringArgs {
    /// Application serving the UI: `[grouping/]app[:number]`
    #[arg(default_value = "sidekiq-monitoring")]
    pub(super) target: String,

    /// Extra arguments handed to ssh as-is
    #[arg(last = true)]
    pub(super) ssh_args: Vec<String>,
}

impl Run for SidekiqMonitoringArgs {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>> {
        let target = app_target(Some(&self.target))?;
        let selection = session.app(&target).await?;
        let action = Action::PortForward {
            remote_port: SIDEKIQ_MONITORING_PORT,
        };
        Ok(Some(session.command(&selection, &action, &self.ssh_args).await?))
    }
}
