mod builder;

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

pub use self::builder::CommandBuilder;

/// Remote port of the RabbitMQ management UI.
pub const RABBITMQ_PORT: u16 = 15672;

/// Remote port of the Sidekiq monitoring UI.
pub const SIDEKIQ_MONITORING_PORT: u16 = 3211;

/// What to do once an endpoint is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Interactive shell.
    Shell,
    /// Run `command` on a terminal.
    Console { command: String },
    /// Forward a free local port to `remote_port` on the endpoint.
    PortForward { remote_port: u16 },
    /// Copy local `sources` to `destination` on the endpoint.
    Push {
        sources: Vec<Utf8PathBuf>,
        destination: String,
    },
    /// Copy remote `sources` to local `destination`.
    Pull {
        sources: Vec<String>,
        destination: Utf8PathBuf,
    },
}

impl Action {
    /// Rails console for `app`.
    #[must_use]
    pub fn app_console(app: &str) -> Self {
        Self::Console {
            command: format!("govuk_app_console {app}"),
        }
    }

    /// Database console for `app`.
    #[must_use]
    pub fn app_dbconsole(app: &str) -> Self {
        Self::Console {
            command: format!("govuk_app_dbconsole {app}"),
        }
    }
}

/// A fully built client invocation, ready to replace the current process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Shown to the operator before the command runs.
    pub notice: Option<String>,
}

impl OutboundCommand {
    /// The whole argv, program first.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.argv()) {
            Ok(line) => f.write_str(&line),
            // only fails on NUL bytes, which no shell could take anyway
            Err(_) => write!(f, "{}", self.argv().join(" ")),
        }
    }
}
