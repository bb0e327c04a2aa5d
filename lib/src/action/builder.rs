use bon::Builder;
use camino::Utf8PathBuf;
use rand::Rng;
use tracing::debug;

use super::Action;
use super::OutboundCommand;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::JumpboxRegistry;
use crate::resolve::ResolvedEndpoint;
use crate::util::port::find_free_port;

/// Turns a resolved endpoint and an [`Action`] into an `ssh` or `scp`
/// invocation that hops through the environment's jumpbox.
#[derive(Debug, Clone, Builder)]
pub struct CommandBuilder {
    #[builder(default)]
    registry: JumpboxRegistry,
    #[builder(into)]
    username: String,
    identity_file: Option<Utf8PathBuf>,
}

impl CommandBuilder {
    /// Builds the outbound command. `passthrough` arguments are kept as given:
    /// for `ssh` they follow the constructed options but precede a remote
    /// command, for `scp` they go before the operands.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::MissingJumpbox`] if the registry has no jumpbox for
    ///   the endpoint.
    /// - [`crate::Error::NoFreePortFound`] when forwarding a port.
    pub async fn build(
        &self,
        endpoint: &ResolvedEndpoint,
        environment: Environment,
        action: &Action,
        passthrough: &[String],
        rng: &mut impl Rng,
    ) -> Result<OutboundCommand> {
        let jumpbox = self.registry.jumpbox(environment, endpoint.hosting)?;
        let jump = format!("{}@{jumpbox}", self.username);
        let remote = format!("{}@{}", self.username, endpoint.hostname);

        let mut args = Vec::new();
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_owned());
            args.push(identity.to_string());
        }

        let command = match action {
            Action::Shell | Action::Console { .. } | Action::PortForward { .. } => {
                args.extend(["-J".to_owned(), jump, remote]);
                let mut notice = None;
                let mut remote_command = Vec::new();
                match action {
                    Action::Console { command } => {
                        remote_command.extend(["-t".to_owned(), command.clone()]);
                    }
                    Action::PortForward { remote_port } => {
                        let local_port = find_free_port(rng).await?;
                        args.extend([
                            "-N".to_owned(),
                            "-L".to_owned(),
                            format!("127.0.0.1:{local_port}:127.0.0.1:{remote_port}"),
                        ]);
                        notice = Some(format!(
                            "forwarding to port {remote_port}, open http://127.0.0.1:{local_port}/"
                        ));
                    }
                    _ => {}
                }
                // ssh stops parsing options at the remote command
                args.extend(passthrough.iter().cloned());
                args.extend(remote_command);
                OutboundCommand {
                    program: "ssh".to_owned(),
                    args,
                    notice,
                }
            }
            Action::Push {
                sources,
                destination,
            } => {
                args.extend(["-o".to_owned(), format!("ProxyJump={jump}")]);
                args.extend(passthrough.iter().cloned());
                args.extend(sources.iter().map(ToString::to_string));
                args.push(format!("{remote}:{destination}"));
                scp(args)
            }
            Action::Pull {
                sources,
                destination,
            } => {
                args.extend(["-o".to_owned(), format!("ProxyJump={jump}")]);
                args.extend(passthrough.iter().cloned());
                args.extend(sources.iter().map(|source| format!("{remote}:{source}")));
                args.push(destination.to_string());
                scp(args)
            }
        };

        debug!(%command, "built outbound command");
        Ok(command)
    }
}

fn scp(args: Vec<String>) -> OutboundCommand {
    OutboundCommand {
        program: "scp".to_owned(),
        args,
        notice: None,
    }
}
