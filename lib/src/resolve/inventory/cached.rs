use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use super::Inventory;
use super::Query;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;

type Key = (Environment, HostingProvider, Query);

/// Memoizes another inventory for the lifetime of one resolution, so the same
/// question is never sent to a jumpbox twice. Failures are not cached.
pub struct CachedInventory<I> {
    inner: I,
    answers: Mutex<HashMap<Key, Vec<String>>>,
}

impl<I> fmt::Debug for CachedInventory<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedInventory").finish_non_exhaustive()
    }
}

impl<I> CachedInventory<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            answers: Mutex::default(),
        }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    fn lookup(&self, key: &Key) -> Option<Vec<String>> {
        let answers = self.answers.lock().unwrap_or_else(|e| e.into_inner());
        answers.get(key).cloned()
    }

    fn store(&self, key: Key, lines: Vec<String>) {
        let mut answers = self.answers.lock().unwrap_or_else(|e| e.into_inner());
        answers.insert(key, lines);
    }
}

impl<I: Inventory> Inventory for CachedInventory<I> {
    async fn query(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        query: &Query,
    ) -> Result<Vec<String>> {
        let key = (environment, hosting, query.clone());
        if let Some(lines) = self.lookup(&key) {
            debug!(%environment, %hosting, %query, "inventory cache hit");
            return Ok(lines);
        }
        let lines = self.inner.query(environment, hosting, query).await?;
        self.store(key, lines.clone());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Environment as E;
    use crate::fleet::HostingProvider as H;
    use crate::resolve::inventory::fake::StaticInventory;
    use crate::resolve::inventory::InventoryExt;

    #[tokio::test]
    async fn identical_queries_hit_the_jumpbox_once() {
        let fake = StaticInventory::default().with_groupings(E::Staging, H::Aws, ["backend"]);
        let cached = CachedInventory::new(fake);

        let first = cached.groupings(E::Staging, H::Aws).await.unwrap();
        let second = cached.groupings(E::Staging, H::Aws).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().queries(), 1);
    }

    #[tokio::test]
    async fn distinct_queries_are_not_shared() {
        let fake = StaticInventory::default()
            .with_groupings(E::Staging, H::Aws, ["backend"])
            .with_groupings(E::Staging, H::Carrenza, ["frontend"]);
        let cached = CachedInventory::new(fake);

        let aws = cached.groupings(E::Staging, H::Aws).await.unwrap();
        let carrenza = cached.groupings(E::Staging, H::Carrenza).await.unwrap();

        assert_eq!(aws, vec!["backend"]);
        assert_eq!(carrenza, vec!["frontend"]);
        assert_eq!(cached.inner().queries(), 2);
    }

    #[tokio::test]
    async fn failures_are_retried() {
        let fake = StaticInventory::default()
            .with_groupings(E::Staging, H::Aws, ["backend"])
            .failing(1);
        let cached = CachedInventory::new(fake);

        let error = cached.groupings(E::Staging, H::Aws).await.unwrap_err();
        assert!(matches!(error, crate::error::Error::RemoteQueryFailed { .. }));

        let retried = cached.groupings(E::Staging, H::Aws).await.unwrap();
        assert_eq!(retried, vec!["backend"]);
        assert_eq!(cached.inner().queries(), 2);

        cached.groupings(E::Staging, H::Aws).await.unwrap();
        assert_eq!(cached.inner().queries(), 2);
    }
}
