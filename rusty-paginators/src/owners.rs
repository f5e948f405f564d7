//! Bot owner lookup used by paginator gates.

use std::{collections::HashSet, future::Future, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, warn};
use twilight_http::Client;
use twilight_model::id::{Id, marker::UserMarker};

/// Source of truth for "is this user a bot owner".
pub trait OwnerLookup: Send + Sync {
    fn is_owner(&self, user_id: Id<UserMarker>) -> impl Future<Output = bool> + Send;
}

/// Owner ids from configuration plus the application's owner or team.
///
/// The application is only fetched on first use. `invalidate` forces a refetch.
#[derive(Debug)]
pub struct OwnerCache {
    http: Arc<Client>,
    configured: HashSet<Id<UserMarker>>,
    fetched: RwLock<Option<HashSet<Id<UserMarker>>>>,
}

impl OwnerCache {
    pub fn new(http: Arc<Client>, configured: impl IntoIterator<Item = Id<UserMarker>>) -> Self {
        Self {
            http,
            configured: configured.into_iter().collect(),
            fetched: RwLock::new(None),
        }
    }

    /// Drop fetched application owners; configured ids are kept.
    pub async fn invalidate(&self) {
        self.fetched.write().await.take();
    }

    /// All known owner ids, fetching the application once when needed.
    ///
    /// A failed fetch is remembered as "no application owners" until `invalidate`.
    pub async fn owner_ids(&self) -> HashSet<Id<UserMarker>> {
        if let Some(fetched) = self.fetched.read().await.as_ref() {
            return self.configured.union(fetched).copied().collect();
        }

        let mut slot = self.fetched.write().await;
        if slot.is_none() {
            let fetched = match self.fetch_application_owners().await {
                Ok(fetched) => {
                    debug!(count = fetched.len(), "fetched application owners");
                    fetched
                }
                Err(source) => {
                    warn!(error = %source, "could not fetch application owners");
                    HashSet::new()
                }
            };
            *slot = Some(fetched);
        }

        let fetched = slot.as_ref().into_iter().flatten().copied();
        self.configured.iter().copied().chain(fetched).collect()
    }

    async fn fetch_application_owners(&self) -> anyhow::Result<HashSet<Id<UserMarker>>> {
        let application = self.http.current_user_application().await?.model().await?;

        let mut owners = HashSet::new();
        if let Some(team) = application.team {
            owners.insert(team.owner_user_id);
            owners.extend(team.members.into_iter().map(|member| member.user.id));
        } else if let Some(owner) = application.owner {
            owners.insert(owner.id);
        }

        Ok(owners)
    }
}

impl OwnerLookup for OwnerCache {
    async fn is_owner(&self, user_id: Id<UserMarker>) -> bool {
        if self.configured.contains(&user_id) {
            return true;
        }

        self.owner_ids().await.contains(&user_id)
    }
}
