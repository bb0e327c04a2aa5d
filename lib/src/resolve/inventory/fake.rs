use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use super::Inventory;
use super::Query;
use crate::error::Error;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;

/// In-memory inventory that counts the queries it answers. Unknown queries
/// answer with no lines, like a jumpbox with nothing to report.
#[derive(Debug, Default)]
pub struct StaticInventory {
    answers: HashMap<(Environment, HostingProvider, Query), Vec<String>>,
    queries: AtomicUsize,
    failures: AtomicUsize,
}

impl StaticInventory {
    /// Fails the next `count` queries as an unreachable jumpbox would.
    pub fn failing(self, count: usize) -> Self {
        self.failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_groupings<'a>(
        mut self,
        environment: Environment,
        hosting: HostingProvider,
        groupings: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let lines = groupings.into_iter().map(ToOwned::to_owned).collect();
        self.answers
            .insert((environment, hosting, Query::Groupings), lines);
        self
    }

    pub fn with_hosts<'a>(
        mut self,
        environment: Environment,
        hosting: HostingProvider,
        grouping: &str,
        hosts: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let lines = hosts.into_iter().map(ToOwned::to_owned).collect();
        let query = Query::Hosts(grouping.to_owned());
        self.answers.insert((environment, hosting, query), lines);
        self
    }

    pub fn with_apps<'a>(
        mut self,
        environment: Environment,
        hosting: HostingProvider,
        apps: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Self {
        let lines = apps
            .into_iter()
            .map(|(grouping, apps)| {
                let mut line = grouping.to_owned();
                for app in apps {
                    line.push(' ');
                    line.push_str(app);
                }
                line
            })
            .collect();
        self.answers
            .insert((environment, hosting, Query::Applications), lines);
        self
    }

    /// Number of queries answered so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Inventory for StaticInventory {
    async fn query(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        query: &Query,
    ) -> Result<Vec<String>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(Error::RemoteQueryFailed {
                command: format!("govuk_node_list {query}"),
                status: "exit status: 255".to_owned(),
                stderr: "Connection timed out".to_owned(),
                username: "jdoe".to_owned(),
            });
        }
        let key = (environment, hosting, query.clone());
        Ok(self.answers.get(&key).cloned().unwrap_or_default())
    }
}
