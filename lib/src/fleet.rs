//! The fixed shape of the fleet: environments, hosting providers and the
//! jumpboxes that front each of them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum::EnumIter;
use strum::IntoEnumIterator;
use url::Url;

use crate::error::Error;
use crate::error::Result;

/// A deployment tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Ci,
    Integration,
    Staging,
    Production,
}

impl Environment {
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Parses an environment name, listing the valid ones on failure.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownEnvironment`] if `s` is not one of [`Environment::all`].
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).map_err(|_| Error::UnknownEnvironment {
            given: s.to_owned(),
        })
    }
}

/// An infrastructure platform that hosts part of the fleet.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HostingProvider {
    Aws,
    Carrenza,
}

impl HostingProvider {
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Parses a provider name. Matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownHostingProvider`] if `s` is not a known provider.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).map_err(|_| Error::UnknownHostingProvider {
            given: s.to_owned(),
        })
    }

    /// Suffix of the fully-qualified machine names on this provider.
    #[must_use]
    pub fn hostname_suffix(self) -> &'static str {
        match self {
            Self::Aws => ".internal",
            Self::Carrenza => ".gov.uk",
        }
    }

    /// Suffix of public hostnames (alerting, jumpboxes) on this provider.
    #[must_use]
    pub fn public_domain(self) -> &'static str {
        match self {
            Self::Aws => ".govuk.digital",
            Self::Carrenza => ".publishing.service.gov.uk",
        }
    }

    /// The provider whose machine names end with the suffix of `name`, if any.
    #[must_use]
    pub fn from_hostname(name: &str) -> Option<Self> {
        Self::all().find(|hosting| name.ends_with(hosting.hostname_suffix()))
    }
}

/// Jump host address for every (environment, provider) pair that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpboxRegistry {
    jumpboxes: BTreeMap<(Environment, HostingProvider), String>,
}

impl Default for JumpboxRegistry {
    fn default() -> Self {
        use Environment as E;
        use HostingProvider as H;

        Self::new([
            (E::Ci, H::Carrenza, "ci-jumpbox.integration.publishing.service.gov.uk"),
            (E::Integration, H::Aws, "jumpbox.integration.govuk.digital"),
            (E::Staging, H::Carrenza, "jumpbox.staging.publishing.service.gov.uk"),
            (E::Staging, H::Aws, "jumpbox.blue.staging.govuk.digital"),
            (E::Production, H::Carrenza, "jumpbox.publishing.service.gov.uk"),
            (E::Production, H::Aws, "jumpbox.blue.production.govuk.digital"),
        ])
    }
}

impl JumpboxRegistry {
    pub fn new<'a>(
        entries: impl IntoIterator<Item = (Environment, HostingProvider, &'a str)>,
    ) -> Self {
        let jumpboxes = entries
            .into_iter()
            .map(|(env, hosting, host)| ((env, hosting), host.to_owned()))
            .collect();
        Self { jumpboxes }
    }

    /// Providers that serve `environment`, ordered by provider.
    #[must_use]
    pub fn providers(&self, environment: Environment) -> Vec<HostingProvider> {
        self.jumpboxes
            .keys()
            .filter(|(env, _)| *env == environment)
            .map(|(_, hosting)| *hosting)
            .collect()
    }

    /// Jump host for the pair.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingJumpbox`] if the pair does not exist.
    pub fn jumpbox(&self, environment: Environment, hosting: HostingProvider) -> Result<&str> {
        self.jumpboxes
            .get(&(environment, hosting))
            .map(String::as_str)
            .ok_or(Error::MissingJumpbox {
                environment,
                hosting,
            })
    }
}

/// Derives hosting and environment from the URL of a monitoring alert.
///
/// The provider comes from the public domain the host sits under, the
/// environment from the label right before it. Carrenza production alerts
/// live directly under the public domain.
///
/// # Errors
///
/// - [`Error::InvalidAlertUrl`] if the host matches no known layout.
pub fn hosting_and_environment_from_url(url: &Url) -> Result<(HostingProvider, Environment)> {
    let invalid = || Error::InvalidAlertUrl {
        url: url.to_string(),
    };
    let host = url.host_str().ok_or_else(invalid)?;

    for hosting in HostingProvider::all() {
        let Some(prefix) = host.strip_suffix(hosting.public_domain()) else {
            continue;
        };
        let label = prefix.rsplit('.').next().unwrap_or(prefix);
        if let Ok(environment) = Environment::from_str(label) {
            return Ok((hosting, environment));
        }
        if hosting == HostingProvider::Carrenza && !prefix.contains('.') {
            return Ok((hosting, Environment::Production));
        }
    }

    Err(invalid())
}
