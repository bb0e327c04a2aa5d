use std::process::Stdio;
use std::time::Duration;

use bon::Builder;
use camino::Utf8PathBuf;
use tokio::process::Command;
use tracing::debug;
use tracing::instrument;

use super::Inventory;
use super::Query;
use crate::error::Error;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;
use crate::fleet::JumpboxRegistry;

/// Asks jumpboxes about their fleet by running the inventory command over
/// `ssh`.
#[derive(Debug, Clone, Builder)]
pub struct RemoteInventory {
    registry: JumpboxRegistry,
    username: String,
    identity_file: Option<Utf8PathBuf>,
    #[builder(into)]
    command: String,
    #[builder(default = Duration::from_secs(2))]
    connect_timeout: Duration,
}

impl RemoteInventory {
    /// The remote command line for `query`.
    fn remote_command(&self, query: &Query) -> String {
        let mut parts = vec![self.command.as_str()];
        parts.extend(query.args());
        shlex::try_join(parts).unwrap_or_else(|_| format!("{} {query}", self.command))
    }

    /// Full local `ssh` argument list for `query`.
    fn ssh_args(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        query: &Query,
    ) -> Result<Vec<String>> {
        let jumpbox = self.registry.jumpbox(environment, hosting)?;
        // ssh only takes whole seconds
        let timeout = self.connect_timeout.as_secs().max(1);

        let mut args = vec!["-o".to_owned(), format!("ConnectTimeout={timeout}")];
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_owned());
            args.push(identity.to_string());
        }
        args.push(format!("{}@{jumpbox}", self.username));
        args.push(self.remote_command(query));
        Ok(args)
    }
}

impl Inventory for RemoteInventory {
    #[instrument(skip_all, fields(%environment, %hosting, %query))]
    async fn query(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        query: &Query,
    ) -> Result<Vec<String>> {
        let args = self.ssh_args(environment, hosting, query)?;
        debug!(?args, "querying jumpbox");

        let failed = |status: String, stderr: String| Error::RemoteQueryFailed {
            command: self.remote_command(query),
            status,
            stderr,
            username: self.username.clone(),
        };

        let output = Command::new("ssh")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| failed(format!("unable to run ssh: {error}"), String::new()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(failed(output.status.to_string(), stderr));
        }

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        debug!(count = lines.len(), "jumpbox answered");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::fleet::Environment as E;
    use crate::fleet::HostingProvider as H;

    fn inventory(identity_file: Option<&str>) -> RemoteInventory {
        RemoteInventory::builder()
            .registry(JumpboxRegistry::default())
            .username("jdoe".to_owned())
            .maybe_identity_file(identity_file.map(Utf8PathBuf::from))
            .command("govuk_node_list")
            .build()
    }

    #[rustfmt::skip::attributes(case)]
    #[rstest]
    #[case(Query::Groupings,                  "govuk_node_list --classes")]
    #[case(Query::Hosts("backend".to_owned()), "govuk_node_list -c backend")]
    #[case(Query::Applications,               "govuk_node_list --apps")]
    fn remote_command_works(#[case] query: Query, #[case] should: &str) {
        assert_eq!(inventory(None).remote_command(&query), should);
    }

    #[test]
    fn remote_command_quotes_groupings() {
        let query = Query::Hosts("back end".to_owned());
        assert_eq!(
            inventory(None).remote_command(&query),
            "govuk_node_list -c 'back end'"
        );
    }

    #[test]
    fn ssh_args_go_through_the_jumpbox() {
        let args = inventory(Some("/keys/id"))
            .ssh_args(E::Staging, H::Aws, &Query::Groupings)
            .unwrap();
        assert_eq!(
            args,
            vec![
                "-o",
                "ConnectTimeout=2",
                "-i",
                "/keys/id",
                "jdoe@jumpbox.blue.staging.govuk.digital",
                "govuk_node_list --classes",
            ]
        );
    }

    #[test]
    fn ssh_args_need_a_jumpbox() {
        let error = inventory(None)
            .ssh_args(E::Ci, H::Aws, &Query::Groupings)
            .unwrap_err();
        assert!(matches!(error, Error::MissingJumpbox { .. }));
    }
}
