use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::fleet::HostingProvider;

/// A machine target: `[hosting/]name[:number]`.
///
/// `number` is a 1-based index into the sorted machines of `name`. Range
/// checks happen at selection time, so `0` and negatives parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    pub hosting: Option<HostingProvider>,
    pub name: String,
    pub number: Option<i64>,
}

/// An application target: `[grouping/]app[:number]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppTargetSpec {
    pub grouping: Option<String>,
    pub app: String,
    pub number: Option<i64>,
}

/// Splits `[prefix/]name[:number]` into its parts.
fn split(raw: &str) -> Result<(Option<&str>, &str, Option<i64>)> {
    let invalid = |reason: &str| Error::InvalidTargetFormat {
        raw: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let (prefix, rest) = match raw.split_once('/') {
        Some((prefix, rest)) => (Some(prefix), rest),
        None => (None, raw),
    };
    if prefix.is_some_and(str::is_empty) {
        return Err(invalid("empty prefix before '/'"));
    }

    let (name, number) = match rest.rsplit_once(':') {
        Some((name, number)) => {
            let number = number
                .parse::<i64>()
                .map_err(|_| invalid(&format!("'{number}' is not a number")))?;
            (name, Some(number))
        }
        None => (rest, None),
    };
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if name.contains('/') {
        return Err(invalid("more than one '/'"));
    }

    Ok((prefix, name, number))
}

fn write_parts(
    f: &mut fmt::Formatter<'_>,
    prefix: Option<&dyn fmt::Display>,
    name: &str,
    number: Option<i64>,
) -> fmt::Result {
    if let Some(prefix) = prefix {
        write!(f, "{prefix}/")?;
    }
    write!(f, "{name}")?;
    if let Some(number) = number {
        write!(f, ":{number}")?;
    }
    Ok(())
}

impl FromStr for TargetSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (prefix, name, number) = split(s)?;
        let hosting = prefix.map(HostingProvider::parse).transpose()?;
        Ok(Self {
            hosting,
            name: name.to_owned(),
            number,
        })
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosting = self.hosting.as_ref().map(|h| h as &dyn fmt::Display);
        write_parts(f, hosting, &self.name, self.number)
    }
}

impl FromStr for AppTargetSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (prefix, app, number) = split(s)?;
        Ok(Self {
            grouping: prefix.map(ToOwned::to_owned),
            app: app.to_owned(),
            number,
        })
    }
}

impl fmt::Display for AppTargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouping = self.grouping.as_ref().map(|g| g as &dyn fmt::Display);
        write_parts(f, grouping, &self.app, self.number)
    }
}

/// Anything that can become a [`TargetSpec`]. Strings are parsed, specs pass
/// through untouched.
pub trait IntoTarget {
    /// # Errors
    ///
    /// If parsing is needed and fails.
    fn into_target(self) -> Result<TargetSpec>;
}

impl IntoTarget for TargetSpec {
    fn into_target(self) -> Result<TargetSpec> {
        Ok(self)
    }
}

impl IntoTarget for &str {
    fn into_target(self) -> Result<TargetSpec> {
        TargetSpec::from_str(self)
    }
}

/// Anything that can become an [`AppTargetSpec`].
pub trait IntoAppTarget {
    /// # Errors
    ///
    /// If parsing is needed and fails.
    fn into_app_target(self) -> Result<AppTargetSpec>;
}

impl IntoAppTarget for AppTargetSpec {
    fn into_app_target(self) -> Result<AppTargetSpec> {
        Ok(self)
    }
}

impl IntoAppTarget for &str {
    fn into_app_target(self) -> Result<AppTargetSpec> {
        AppTargetSpec::from_str(self)
    }
}
