use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use jumpto::action::Action;
use jumpto::action::CommandBuilder;
use jumpto::action::OutboundCommand;
use jumpto::config::Config;
use jumpto::fleet::Environment;
use jumpto::fleet::HostingProvider;
use jumpto::fleet::JumpboxRegistry;
use jumpto::resolve::inventory::Inventory;
use jumpto::resolve::inventory::RemoteInventory;
use jumpto::resolve::AppTargetSpec;
use jumpto::resolve::Choice;
use jumpto::resolve::Resolver;
use jumpto::resolve::Selection;
use jumpto::resolve::TargetSpec;
use jumpto::Error;

use crate::args::AuthArgs;

/// Everything a subcommand needs, computed once from the flags and config.
#[derive(Debug)]
pub struct Session<I = RemoteInventory> {
    pub environment: Environment,
    pub hosting: Option<HostingProvider>,
    resolver: Resolver<I>,
    commands: CommandBuilder,
}

impl Session {
    pub fn new(
        environment: Environment,
        hosting: Option<HostingProvider>,
        auth_args: &AuthArgs,
        config: &Config,
    ) -> Self {
        let registry = JumpboxRegistry::default();
        let username = auth_args.username(config);
        let identity_file = auth_args.identity_file(config);

        let inventory = RemoteInventory::builder()
            .registry(registry.clone())
            .username(username.clone())
            .maybe_identity_file(identity_file.clone())
            .command(config.inventory_command())
            .connect_timeout(Duration::from(auth_args.connect_timeout))
            .build();
        let resolver = Resolver::builder()
            .registry(registry.clone())
            .inventory(inventory)
            .build();
        let commands = CommandBuilder::builder()
            .registry(registry)
            .username(username)
            .maybe_identity_file(identity_file)
            .build();

        Self {
            environment,
            hosting,
            resolver,
            commands,
        }
    }
}

impl<I: Inventory> Session<I> {
    /// Resolves a machine target. `--hosting` applies when the target names
    /// no provider itself.
    pub async fn machine(&self, target: Option<&str>) -> Result<Selection> {
        let mut target: TargetSpec = target.ok_or(Error::MissingTarget)?.parse()?;
        if target.hosting.is_none() {
            target.hosting = self.hosting;
        }
        let selection = self
            .resolver
            .resolve_machine(target, self.environment, &mut rand::rng())
            .await?;
        report(&selection);
        Ok(selection)
    }

    /// Resolves an application target.
    pub async fn app(&self, target: &AppTargetSpec) -> Result<Selection> {
        let selection = self
            .resolver
            .resolve_app(target.clone(), self.environment, self.hosting, &mut rand::rng())
            .await?;
        report(&selection);
        Ok(selection)
    }

    pub async fn command(
        &self,
        selection: &Selection,
        action: &Action,
        passthrough: &[String],
    ) -> Result<OutboundCommand> {
        let command = self
            .commands
            .build(
                &selection.endpoint,
                self.environment,
                action,
                passthrough,
                &mut rand::rng(),
            )
            .await?;
        Ok(command)
    }
}

/// Parses an application target, failing if none was given.
pub fn app_target(target: Option<&str>) -> Result<AppTargetSpec, Error> {
    target.ok_or(Error::MissingTarget)?.parse()
}

fn report(selection: &Selection) {
    let endpoint = &selection.endpoint;
    match selection.choice {
        Choice::Random { ordinal, of } => eprintln!(
            "{} {endpoint}",
            format!("Randomly selected machine {ordinal} of {of}:").bold()
        ),
        Choice::Requested { ordinal, of } => eprintln!(
            "{} {endpoint}",
            format!("Selected machine {ordinal} of {of}:").bold()
        ),
        Choice::Only | Choice::Qualified => {
            eprintln!("{} {endpoint}", "Connecting to".bold());
        }
    }
}
