use std::collections::BTreeSet;

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
    /// Confirms that an explicitly chosen provider serves `environment`.
    ///
    /// # Errors
    ///
    /// - [`Error::HostingNotInEnvironment`] if it does not.
    pub fn check_hosting(
        &self,
        environment: Environment,
        hosting: HostingProvider,
    ) -> Result<HostingProvider> {
        let available = self.registry.providers(environment);
        if available.contains(&hosting) {
            Ok(hosting)
        } else {
            Err(Error::HostingNotInEnvironment {
                hosting,
                environment,
                available,
            })
        }
    }

    /// Decides which provider runs the grouping `name` in `environment`.
    ///
    /// Environments served by a single provider answer without a query.
    /// Otherwise each provider is asked in turn.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousHosting`] if several providers list `name`.
    /// - [`Error::NotFound`] if none does.
    pub async fn resolve_hosting(
        &self,
        name: &str,
        environment: Environment,
    ) -> Result<HostingProvider> {
        let providers = self.registry.providers(environment);
        if let [only] = providers.as_slice() {
            return Ok(*only);
        }

        let mut found = Vec::new();
        let mut known = BTreeSet::new();
        for hosting in providers {
            let groupings = self.inventory.groupings(environment, hosting).await?;
            if groupings.iter().any(|g| g == name) {
                found.push(hosting);
            }
            known.extend(groupings);
        }
        debug!(name, ?found, "hosting candidates");

        match found.as_slice() {
            [hosting] => Ok(*hosting),
            [] => Err(Error::NotFound {
                kind: NotFoundKind::Grouping,
                name: name.to_owned(),
                scope: environment.to_string(),
                suggestions: suggest_or_all(name, known.iter().map(String::as_str)),
            }),
            _ => Err(Error::AmbiguousHosting {
                name: name.to_owned(),
                environment,
                candidates: found
                    .into_iter()
                    .map(|hosting| format!("{hosting}/{name}"))
                    .collect(),
            }),
        }
    }

    /// Decides which provider runs the application `app` in `environment`.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousHosting`] if several providers run `app`.
    /// - [`Error::NotFound`] if none does.
    pub async fn resolve_app_hosting(
        &self,
        app: &str,
        environment: Environment,
    ) -> Result<HostingProvider> {
        let providers = self.registry.providers(environment);
        if let [only] = providers.as_slice() {
            return Ok(*only);
        }

        let mut found = Vec::new();
        let mut known = BTreeSet::new();
        for hosting in providers {
            let inventory = self
                .inventory
                .grouping_inventory(environment, hosting)
                .await?;
            if inventory.app_index().contains_key(app) {
                found.push(hosting);
            }
            known.extend(inventory.applications().map(ToOwned::to_owned));
        }
        debug!(app, ?found, "application hosting candidates");

        match found.as_slice() {
            [hosting] => Ok(*hosting),
            [] => Err(Error::NotFound {
                kind: NotFoundKind::Application,
                name: app.to_owned(),
                scope: environment.to_string(),
                suggestions: suggest_or_all(app, known.iter().map(String::as_str)),
            }),
            _ => Err(Error::AmbiguousHosting {
                name: app.to_owned(),
                environment,
                candidates: found
                    .into_iter()
                    .map(|hosting| format!("--hosting {hosting} {app}"))
                    .collect(),
            }),
        }
    }
}
