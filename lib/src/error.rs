use std::fmt;

use thiserror::Error;

use crate::fleet::Environment;
use crate::fleet::HostingProvider;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can stop a target from resolving to one endpoint.
///
/// Every variant is terminal for the current invocation. The [`fmt::Display`]
/// output is the short headline, [`Error::remediation`] holds the follow-up
/// lines shown to the operator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid target '{raw}': {reason}")]
    InvalidTargetFormat { raw: String, reason: String },

    #[error("unknown hosting provider '{given}'")]
    UnknownHostingProvider { given: String },

    #[error("unknown environment '{given}'")]
    UnknownEnvironment { given: String },

    #[error("'{name}' exists on more than one hosting provider in {environment}")]
    AmbiguousHosting {
        name: String,
        environment: Environment,
        candidates: Vec<String>,
    },

    #[error("'{app}' runs on more than one machine class")]
    AmbiguousGrouping { app: String, candidates: Vec<String> },

    #[error("couldn't find {kind} '{name}' in {scope}")]
    NotFound {
        kind: NotFoundKind,
        name: String,
        scope: String,
        suggestions: Suggestions,
    },

    #[error("{}", index_headline(.requested, .available))]
    InvalidIndex { requested: i64, available: usize },

    #[error("no free local port found after {attempts} attempts")]
    NoFreePortFound { attempts: usize },

    #[error("inventory query `{command}` failed ({status})")]
    RemoteQueryFailed {
        command: String,
        status: String,
        stderr: String,
        username: String,
    },

    #[error("no target specified")]
    MissingTarget,

    #[error("no environment specified")]
    MissingEnvironment,

    #[error("no jumpbox configured for {hosting} in {environment}")]
    MissingJumpbox {
        environment: Environment,
        hosting: HostingProvider,
    },

    #[error("{hosting} does not host the {environment} environment")]
    HostingNotInEnvironment {
        hosting: HostingProvider,
        environment: Environment,
        available: Vec<HostingProvider>,
    },

    #[error("unable to derive hosting and environment from '{url}'")]
    InvalidAlertUrl { url: String },
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum NotFoundKind {
    #[strum(serialize = "machine class")]
    Grouping,
    #[strum(serialize = "application")]
    Application,
    #[strum(serialize = "machines for")]
    Hosts,
}

/// Candidates offered after a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestions {
    /// Near matches by edit distance.
    Similar(Vec<String>),
    /// Nothing was near, so every known candidate is listed.
    All(Vec<String>),
}

impl Suggestions {
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Similar(names) | Self::All(names) => names,
        }
    }
}

fn index_headline(requested: &i64, available: &usize) -> String {
    if *requested <= 0 {
        format!("machine number {requested} is invalid, numbering starts at 1")
    } else {
        format!("machine number {requested} is out of range, only {available} available")
    }
}

impl Error {
    /// Lines that help the operator correct the failure.
    #[must_use]
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Error::InvalidTargetFormat { .. } => vec![
                "targets look like [hosting/]name[:number]".to_owned(),
                "for example: backend, aws/backend, backend:2".to_owned(),
            ],
            Error::UnknownHostingProvider { .. } => vec![format!(
                "valid hosting providers: {}",
                join(HostingProvider::all())
            )],
            Error::UnknownEnvironment { .. } | Error::MissingEnvironment => vec![format!(
                "valid environments: {}",
                join(Environment::all())
            )],
            Error::AmbiguousHosting { candidates, .. } => {
                let mut lines = vec!["specify the hosting provider, one of:".to_owned()];
                lines.extend(candidates.iter().map(|c| format!("  {c}")));
                lines
            }
            Error::AmbiguousGrouping { candidates, .. } => {
                let mut lines = vec!["specify the machine class, one of:".to_owned()];
                lines.extend(candidates.iter().map(|c| format!("  {c}")));
                lines
            }
            Error::NotFound { suggestions, .. } => match suggestions {
                Suggestions::Similar(names) => {
                    let mut lines = vec!["did you mean:".to_owned()];
                    lines.extend(names.iter().map(|n| format!("  {n}")));
                    lines
                }
                Suggestions::All(names) if names.is_empty() => Vec::new(),
                Suggestions::All(names) => {
                    let mut lines = vec!["known names:".to_owned()];
                    lines.extend(names.iter().map(|n| format!("  {n}")));
                    lines
                }
            },
            Error::InvalidIndex { available, .. } => {
                vec![format!("pick a number between 1 and {available}")]
            }
            Error::NoFreePortFound { .. } => {
                vec!["close some local listeners and try again".to_owned()]
            }
            Error::RemoteQueryFailed {
                stderr, username, ..
            } => {
                let mut lines: Vec<String> = stderr
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| format!("  {l}"))
                    .collect();
                lines.push(format!(
                    "the remote username in use is '{username}', check that it is correct"
                ));
                lines.push(
                    "set it with --ssh-username or ssh_username in the config file".to_owned(),
                );
                lines
            }
            Error::MissingTarget => vec!["pass a target, for example: backend:1".to_owned()],
            Error::MissingJumpbox { .. } => Vec::new(),
            Error::HostingNotInEnvironment {
                environment,
                available,
                ..
            } => vec![format!(
                "hosting providers for {environment}: {}",
                join(available)
            )],
            Error::InvalidAlertUrl { .. } => vec![
                "expected a host under .govuk.digital or .publishing.service.gov.uk".to_owned(),
            ],
        }
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 2, "numbering starts at 1")]
    #[case(-4, 2, "numbering starts at 1")]
    #[case(3, 2, "only 2 available")]
    fn invalid_index_headline(#[case] requested: i64, #[case] available: usize, #[case] has: &str) {
        let error = Error::InvalidIndex {
            requested,
            available,
        };
        assert!(error.to_string().contains(has), "{error}");
    }

    #[test]
    fn remote_failure_mentions_username() {
        let error = Error::RemoteQueryFailed {
            command: "govuk_node_list --classes".to_owned(),
            status: "exit status: 255".to_owned(),
            stderr: "Permission denied (publickey).\n".to_owned(),
            username: "jdoe".to_owned(),
        };
        let lines = error.remediation();
        assert_eq!(lines[0], "  Permission denied (publickey).");
        assert!(lines.iter().any(|l| l.contains("'jdoe'")));
    }

    #[test]
    fn foreign_hosting_lists_the_environment_providers() {
        let error = Error::HostingNotInEnvironment {
            hosting: HostingProvider::Aws,
            environment: Environment::Ci,
            available: vec![HostingProvider::Carrenza],
        };
        assert_eq!(error.to_string(), "aws does not host the ci environment");
        assert_eq!(
            error.remediation(),
            vec!["hosting providers for ci: carrenza".to_owned()]
        );
    }

    #[test]
    fn unknown_provider_lists_valid_ones() {
        let error = Error::UnknownHostingProvider {
            given: "gcp".to_owned(),
        };
        assert_eq!(
            error.remediation(),
            vec!["valid hosting providers: aws, carrenza".to_owned()]
        );
    }
}
