use camino::Utf8PathBuf;
use clap::Args;
use jumpto::config::Config;

const HEADING: Option<&str> = Some("Authentication Options");

/// Arguments for reaching jumpboxes and machines.
#[derive(Debug, Args, Clone)]
pub struct AuthArgs {
    /// Remote user to authenticate as. Defaults to the config file, then the
    /// local login name.
    #[arg(long, env = "JUMPTO_SSH_USERNAME", help_heading = HEADING, global = true)]
    pub ssh_username: Option<String>,

    /// Path to SSH credential file.
    #[arg(long, help_heading = HEADING, global = true)]
    pub ssh_identity_file: Option<Utf8PathBuf>,

    /// Time to wait for jumpboxes to accept a connection
    #[arg(long, default_value = "2s", help_heading = HEADING, global = true)]
    pub connect_timeout: humantime::Duration,
}

impl AuthArgs {
    pub fn username(&self, config: &Config) -> String {
        config.ssh_username(self.ssh_username.as_deref())
    }

    pub fn identity_file(&self, config: &Config) -> Option<Utf8PathBuf> {
        self.ssh_identity_file
            .clone()
            .or_else(|| config.ssh_identity_file.clone())
    }
}
