use bon::bon;
use rand::Rng;
use tracing::debug;
use tracing::instrument;

use crate::error::Error;
use crate::error::NotFoundKind;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;
use crate::fleet::JumpboxRegistry;
use crate::resolve::endpoint::Choice;
use crate::resolve::endpoint::ResolvedEndpoint;
use crate::resolve::endpoint::Selection;
use crate::resolve::inventory::CachedInventory;
use crate::resolve::inventory::Inventory;
use crate::resolve::target::AppTargetSpec;
use crate::resolve::target::IntoAppTarget;
use crate::resolve::target::IntoTarget;

/// Everything one resolution needs, computed once up front. Inventory answers
/// are memoized for as long as the resolver lives.
#[derive(Debug)]
pub struct Resolver<I> {
    pub(crate) registry: JumpboxRegistry,
    pub(crate) inventory: CachedInventory<I>,
}

#[bon]
impl<I: Inventory> Resolver<I> {
    #[builder]
    pub fn new(#[builder(default)] registry: JumpboxRegistry, inventory: I) -> Self {
        Self {
            registry,
            inventory: CachedInventory::new(inventory),
        }
    }
}

impl<I: Inventory> Resolver<I> {
    /// Resolves a machine target (`[hosting/]grouping[:number]`) to one
    /// endpoint.
    ///
    /// Names that already carry a provider's hostname suffix are used as-is.
    /// A name that is not a known grouping is retried as an application.
    ///
    /// # Errors
    ///
    /// Any resolution failure; see [`Error`].
    #[instrument(skip_all, fields(%environment))]
    pub async fn resolve_machine(
        &self,
        target: impl IntoTarget,
        environment: Environment,
        rng: &mut impl Rng,
    ) -> Result<Selection> {
        let target = target.into_target()?;
        debug!(%target, "resolving machine");

        if let Some(hosting) = HostingProvider::from_hostname(&target.name) {
            return Ok(Selection {
                endpoint: ResolvedEndpoint {
                    hosting,
                    hostname: target.name,
                },
                choice: Choice::Qualified,
            });
        }

        if let Some(hosting) = target.hosting {
            self.check_hosting(environment, hosting)?;
        }

        let attempt = async {
            let hosting = match target.hosting {
                Some(hosting) => hosting,
                None => self.resolve_hosting(&target.name, environment).await?,
            };
            self.select(environment, hosting, &target.name, target.number, rng)
                .await
        };
        let error = match attempt.await {
            Ok(selection) => return Ok(selection),
            Err(error @ Error::NotFound { kind, .. }) if kind != NotFoundKind::Application => {
                error
            }
            Err(error) => return Err(error),
        };

        debug!(name = %target.name, "not a machine class, trying as an application");
        let app = AppTargetSpec {
            grouping: None,
            app: target.name.clone(),
            number: target.number,
        };
        match self.resolve_app(app, environment, target.hosting, rng).await {
            Err(Error::NotFound { .. }) => Err(error),
            other => other,
        }
    }

    /// Resolves an application target (`[grouping/]app[:number]`) to one
    /// endpoint running it.
    ///
    /// `hosting` pins the provider; otherwise it is derived from the
    /// grouping, or from whichever provider runs the application.
    ///
    /// # Errors
    ///
    /// Any resolution failure; see [`Error`].
    #[instrument(skip_all, fields(%environment))]
    pub async fn resolve_app(
        &self,
        target: impl IntoAppTarget,
        environment: Environment,
        hosting: Option<HostingProvider>,
        rng: &mut impl Rng,
    ) -> Result<Selection> {
        let target = target.into_app_target()?;
        debug!(%target, "resolving application");
        let hosting = hosting
            .map(|hosting| self.check_hosting(environment, hosting))
            .transpose()?;

        let (hosting, grouping) = match (&target.grouping, hosting) {
            (Some(grouping), Some(hosting)) => (hosting, grouping.clone()),
            (Some(grouping), None) => {
                let hosting = self.resolve_hosting(grouping, environment).await?;
                (hosting, grouping.clone())
            }
            (None, hosting) => {
                let hosting = match hosting {
                    Some(hosting) => hosting,
                    None => self.resolve_app_hosting(&target.app, environment).await?,
                };
                let grouping = self
                    .resolve_grouping(&target.app, environment, hosting)
                    .await?;
                (hosting, grouping)
            }
        };

        self.select(environment, hosting, &grouping, target.number, rng)
            .await
    }
}
