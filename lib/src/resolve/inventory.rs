mod cached;
#[cfg(test)]
pub(crate) mod fake;
mod remote;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

pub use self::cached::CachedInventory;
pub use self::remote::RemoteInventory;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;

/// One of the fixed questions a jumpbox can answer about its fleet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Every grouping (machine class) identifier.
    Groupings,
    /// Live hostnames of one grouping.
    Hosts(String),
    /// Each grouping followed by the applications it runs.
    Applications,
}

impl Query {
    /// Arguments passed to the inventory command.
    #[must_use]
    pub fn args(&self) -> Vec<&str> {
        match self {
            Query::Groupings => vec!["--classes"],
            Query::Hosts(grouping) => vec!["-c", grouping.as_str()],
            Query::Applications => vec!["--apps"],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

/// Source of fleet inventory. Implementors run a [`Query`] and return its
/// non-empty output lines.
pub trait Inventory {
    async fn query(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        query: &Query,
    ) -> Result<Vec<String>>;
}

impl<T: ?Sized> InventoryExt for T where T: Inventory {}

/// Typed accessors on top of [`Inventory::query`].
pub trait InventoryExt: Inventory {
    /// All grouping identifiers.
    async fn groupings(
        &self,
        environment: Environment,
        hosting: HostingProvider,
    ) -> Result<Vec<String>> {
        self.query(environment, hosting, &Query::Groupings).await
    }

    /// Live hostnames of `grouping`, sorted so that numbering is stable.
    async fn hosts(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        grouping: &str,
    ) -> Result<Vec<String>> {
        let query = Query::Hosts(grouping.to_owned());
        let mut hosts = self.query(environment, hosting, &query).await?;
        hosts.sort();
        hosts.dedup();
        Ok(hosts)
    }

    /// Which applications run on which groupings.
    async fn grouping_inventory(
        &self,
        environment: Environment,
        hosting: HostingProvider,
    ) -> Result<GroupingInventory> {
        let lines = self
            .query(environment, hosting, &Query::Applications)
            .await?;
        Ok(GroupingInventory::from_lines(&lines))
    }
}

/// Grouping identifier to the applications it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingInventory {
    groupings: BTreeMap<String, BTreeSet<String>>,
}

/// Application name to every grouping that runs it.
pub type AppLookupIndex = BTreeMap<String, Vec<String>>;

impl GroupingInventory {
    /// Parses `<grouping> <app> <app> ...` lines. A grouping without
    /// applications is kept with an empty set.
    pub fn from_lines(lines: &[String]) -> Self {
        let mut groupings: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for line in lines {
            let mut words = line.split_whitespace();
            let Some(grouping) = words.next() else {
                continue;
            };
            groupings
                .entry(grouping.to_owned())
                .or_default()
                .extend(words.map(ToOwned::to_owned));
        }
        Self { groupings }
    }

    /// Inverts the inventory.
    #[must_use]
    pub fn app_index(&self) -> AppLookupIndex {
        let mut index = AppLookupIndex::new();
        for (grouping, apps) in &self.groupings {
            for app in apps {
                index.entry(app.clone()).or_default().push(grouping.clone());
            }
        }
        index
    }

    /// Every application name, once.
    pub fn applications(&self) -> impl Iterator<Item = &str> {
        self.groupings
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}

impl<G, A, I> FromIterator<(G, I)> for GroupingInventory
where
    G: Into<String>,
    A: Into<String>,
    I: IntoIterator<Item = A>,
{
    fn from_iter<T: IntoIterator<Item = (G, I)>>(iter: T) -> Self {
        let groupings = iter
            .into_iter()
            .map(|(g, apps)| (g.into(), apps.into_iter().map(Into::into).collect()))
            .collect();
        Self { groupings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|x| (*x).to_owned()).collect()
    }

    #[test]
    fn query_args() {
        assert_eq!(Query::Groupings.to_string(), "--classes");
        assert_eq!(Query::Hosts("backend".to_owned()).to_string(), "-c backend");
        assert_eq!(Query::Applications.to_string(), "--apps");
    }

    #[test]
    fn grouping_inventory_parses() {
        let inventory = GroupingInventory::from_lines(&lines(&[
            "backend publisher  whitehall",
            "whitehall_backend whitehall",
            "cache",
        ]));
        let should: GroupingInventory = [
            ("backend", vec!["publisher", "whitehall"]),
            ("cache", vec![]),
            ("whitehall_backend", vec!["whitehall"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(inventory, should);
    }

    #[test]
    fn app_index_inverts() {
        let inventory: GroupingInventory = [
            ("backend", vec!["publisher", "whitehall"]),
            ("whitehall_backend", vec!["whitehall"]),
        ]
        .into_iter()
        .collect();
        let index = inventory.app_index();
        assert_eq!(index["publisher"], vec!["backend"]);
        assert_eq!(index["whitehall"], vec!["backend", "whitehall_backend"]);
        assert_eq!(
            inventory.applications().collect::<Vec<_>>(),
            vec!["publisher", "whitehall"]
        );
    }
}
