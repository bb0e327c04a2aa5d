use clap::Args;
use jumpto::fleet::hosting_and_environment_from_url;
use jumpto::fleet::Environment;
use jumpto::fleet::HostingProvider;
use jumpto::Error;
use url::Url;

const HEADING: Option<&str> = Some("Fleet Options");

/// Arguments that pick the part of the fleet to search.
#[derive(Debug, Args, Clone)]
pub struct FleetArgs {
    /// Environment to connect to (ci, integration, staging, production)
    #[clap(short = 'e', long, env = "JUMPTO_ENVIRONMENT", help_heading = HEADING, global = true)]
    pub environment: Option<String>,

    /// Hosting provider to connect to (aws, carrenza)
    #[clap(long, help_heading = HEADING, global = true)]
    pub hosting: Option<String>,

    /// Take hosting and environment from the URL of an alert
    #[clap(
        long,
        value_name = "URL",
        conflicts_with_all = ["environment", "hosting"],
        help_heading = HEADING,
        global = true
    )]
    pub hosting_and_environment_from_alert_url: Option<Url>,
}

impl FleetArgs {
    /// Environment and, if pinned, hosting provider for this run.
    pub fn scope(&self) -> Result<(Environment, Option<HostingProvider>), Error> {
        if let Some(url) = &self.hosting_and_environment_from_alert_url {
            let (hosting, environment) = hosting_and_environment_from_url(url)?;
            return Ok((environment, Some(hosting)));
        }

        let environment = self
            .environment
            .as_deref()
            .ok_or(Error::MissingEnvironment)
            .and_then(Environment::parse)?;
        let hosting = self
            .hosting
            .as_deref()
            .map(HostingProvider::parse)
            .transpose()?;
        Ok((environment, hosting))
    }
}
