use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::error::Error;
use crate::error::NotFoundKind;
use crate::error::Result;
use crate::fleet::Environment;
use crate::fleet::HostingProvider;
use crate::resolve::inventory::Inventory;
use crate::resolve::inventory::InventoryExt;
use crate::resolve::Resolver;
use crate::util::suggest::suggest_or_all;

/// A concrete machine to connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEndpoint {
    pub hosting: HostingProvider,
    pub hostname: String,
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.hosting)
    }
}

/// How an endpoint was picked out of its grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    /// The target already named a machine.
    Qualified,
    /// The grouping has a single machine.
    Only,
    /// No number was given, so one was drawn at random.
    Random { ordinal: usize, of: usize },
    /// The operator asked for this number.
    Requested { ordinal: usize, of: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub endpoint: ResolvedEndpoint,
    pub choice: Choice,
}

impl<I: Inventory> Resolver<I> {
    /// Picks one live machine of `grouping`.
    ///
    /// Machines are numbered from 1 in hostname order. With no `number` a
    /// machine is drawn from `rng`; a grouping of one machine ignores any
    /// positive number.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the grouping has no machines.
    /// - [`Error::InvalidIndex`] if `number` is below 1 or past the end.
    pub async fn select(
        &self,
        environment: Environment,
        hosting: HostingProvider,
        grouping: &str,
        number: Option<i64>,
        rng: &mut impl Rng,
    ) -> Result<Selection> {
        let mut hosts = self.inventory.hosts(environment, hosting, grouping).await?;
        let of = hosts.len();

        if hosts.is_empty() {
            let groupings = self.inventory.groupings(environment, hosting).await?;
            return Err(Error::NotFound {
                kind: NotFoundKind::Hosts,
                name: grouping.to_owned(),
                scope: format!("{hosting}/{environment}"),
                suggestions: suggest_or_all(grouping, groupings.iter().map(String::as_str)),
            });
        }

        if let Some(requested) = number.filter(|n| *n <= 0) {
            return Err(Error::InvalidIndex {
                requested,
                available: of,
            });
        }

        let (index, choice) = match number {
            _ if of == 1 => (0, Choice::Only),
            None => {
                let index = rng.random_range(0..of);
                (
                    index,
                    Choice::Random {
                        ordinal: index + 1,
                        of,
                    },
                )
            }
            Some(requested) => match usize::try_from(requested) {
                Ok(ordinal) if ordinal <= of => (ordinal - 1, Choice::Requested { ordinal, of }),
                _ => {
                    return Err(Error::InvalidIndex {
                        requested,
                        available: of,
                    })
                }
            },
        };

        let hostname = hosts.swap_remove(index);
        match choice {
            Choice::Random { ordinal, of } => {
                info!(%hostname, "picked machine {ordinal} of {of} at random");
            }
            _ => debug!(%hostname, ?choice, "picked machine"),
        }

        Ok(Selection {
            endpoint: ResolvedEndpoint { hosting, hostname },
            choice,
        })
    }
}
