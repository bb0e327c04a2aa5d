use tracing::debug;

use crate::error::Error;
use crate::error::NotFoundKind;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;
use crate::resolve::inventory::Inventory;
use crate::resolve::inventory::InventoryExt;
use crate::resolve::Resolver;
use crate::util::suggest::suggest_or_all;

impl<I: Inventory> Resolver<I> {
    /// Finds the one grouping that runs `app`.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousGrouping`] if several groupings run `app`.
    /// - [`Error::NotFound`] if none does.
    pub async fn resolve_grouping(
        &self,
        app: &str,
        environment: Environment,
        hosting: HostingProvider,
    ) -> Result<String> {
        let inventory = self
            .inventory
            .grouping_inventory(environment, hosting)
            .await?;
        let mut index = inventory.app_index();

        match index.remove(app).unwrap_or_default().as_mut_slice() {
            [grouping] => {
                debug!(app, %grouping, "application grouping");
                Ok(std::mem::take(grouping))
            }
            [] => Err(Error::NotFound {
                kind: NotFoundKind::Application,
                name: app.to_owned(),
                scope: format!("{hosting}/{environment}"),
                suggestions: suggest_or_all(app, inventory.applications()),
            }),
            candidates => Err(Error::AmbiguousGrouping {
                app: app.to_owned(),
                candidates: candidates.iter().map(|g| format!("{g}/{app}")).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Suggestions;
    use crate::fleet::Environment as E;
    use crate::fleet::HostingProvider as H;
    use crate::resolve::inventory::fake::StaticInventory;

    fn resolver() -> Resolver<StaticInventory> {
        let inventory = StaticInventory::default().with_apps(
            E::Integration,
            H::Aws,
            [
                ("backend", ["publisher", "publishing-api"].as_slice()),
                ("publishing_api", ["publishing-api"].as_slice()),
                ("whitehall_backend", ["whitehall"].as_slice()),
            ],
        );
        Resolver::builder().inventory(inventory).build()
    }

    #[tokio::test]
    async fn single_grouping() {
        let grouping = resolver()
            .resolve_grouping("whitehall", E::Integration, H::Aws)
            .await
            .unwrap();
        assert_eq!(grouping, "whitehall_backend");
    }

    #[tokio::test]
    async fn several_groupings() {
        let error = resolver()
            .resolve_grouping("publishing-api", E::Integration, H::Aws)
            .await
            .unwrap_err();
        let Error::AmbiguousGrouping { candidates, .. } = error else {
            panic!("expected an ambiguous grouping error");
        };
        assert_eq!(
            candidates,
            vec!["backend/publishing-api", "publishing_api/publishing-api"]
        );
    }

    #[tokio::test]
    async fn unknown_app_suggests_apps() {
        let error = resolver()
            .resolve_grouping("whitehal", E::Integration, H::Aws)
            .await
            .unwrap_err();
        let Error::NotFound {
            kind,
            scope,
            suggestions,
            ..
        } = error
        else {
            panic!("expected a not found error");
        };
        assert_eq!(kind, NotFoundKind::Application);
        assert_eq!(scope, "aws/integration");
        assert_eq!(suggestions, Suggestions::Similar(vec!["whitehall".to_owned()]));
    }

    #[tokio::test]
    async fn inventory_is_fetched_once() {
        let resolver = resolver();
        for app in ["whitehall", "publisher", "nope"] {
            let _ = resolver
                .resolve_grouping(app, E::Integration, H::Aws)
                .await;
        }
        assert_eq!(resolver.inventory.inner().queries(), 1);
    }
}
