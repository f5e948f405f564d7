//! Decides whether an interaction may drive a paginator.

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::debug;
use twilight_model::{
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::UserMarker},
};

use crate::owners::OwnerLookup;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Snapshot of a paginator's position, handed to checks and hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub session: u64,
    pub current_page: usize,
    pub max_pages: usize,
    pub per_page: usize,
    pub total_items: usize,
}

/// Outcome when no owner, author or check rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    Allow,
    Deny,
}

type SyncCheck<I> = dyn Fn(&PageInfo, &I) -> bool + Send + Sync;
type AsyncCheck<I> = dyn Fn(PageInfo, I) -> BoxFuture<'static, bool> + Send + Sync;

/// User supplied predicate run for interactions that no earlier rule decided.
pub enum Check<I = InteractionCreate> {
    Sync(Arc<SyncCheck<I>>),
    Async(Arc<AsyncCheck<I>>),
}

impl<I: 'static> Check<I> {
    pub fn sync(check: impl Fn(&PageInfo, &I) -> bool + Send + Sync + 'static) -> Self {
        Self::Sync(Arc::new(check))
    }

    pub fn with_future<F>(check: impl Fn(PageInfo, I) -> F + Send + Sync + 'static) -> Self
    where
        F: Future<Output = bool> + Send + 'static,
    {
        Self::Async(Arc::new(move |info, interaction| Box::pin(check(info, interaction))))
    }

    async fn run(&self, info: &PageInfo, interaction: &I) -> bool
    where
        I: Clone,
    {
        match self {
            Self::Sync(check) => check(info, interaction),
            Self::Async(check) => check(*info, interaction.clone()).await,
        }
    }
}

impl<I> Clone for Check<I> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(check) => Self::Sync(Arc::clone(check)),
            Self::Async(check) => Self::Async(Arc::clone(check)),
        }
    }
}

impl<I> std::fmt::Debug for Check<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Check::Sync(..)"),
            Self::Async(_) => f.write_str("Check::Async(..)"),
        }
    }
}

/// Ordered authorization rules: owner, then author id, then check, then policy.
#[derive(Debug, Clone)]
pub struct InteractionGate<I = InteractionCreate> {
    pub always_allow_owner: bool,
    pub author_id: Option<Id<UserMarker>>,
    pub check: Option<Check<I>>,
    pub policy: GatePolicy,
}

impl<I: Clone + 'static> InteractionGate<I> {
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            always_allow_owner: false,
            author_id: None,
            check: None,
            policy,
        }
    }

    pub async fn allow(
        &self,
        actor: Id<UserMarker>,
        owners: &impl OwnerLookup,
        info: &PageInfo,
        interaction: &I,
    ) -> bool {
        if self.always_allow_owner && owners.is_owner(actor).await {
            debug!(session = info.session, actor = %actor, "owner allowed");
            return true;
        }

        if let Some(author_id) = self.author_id {
            let allowed = author_id == actor;
            debug!(session = info.session, actor = %actor, allowed, "author id decided");
            return allowed;
        }

        if let Some(check) = &self.check {
            let allowed = check.run(info, interaction).await;
            debug!(session = info.session, actor = %actor, allowed, "check decided");
            return allowed;
        }

        debug!(session = info.session, actor = %actor, policy = ?self.policy, "default policy");
        self.policy == GatePolicy::Allow
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct StaticOwners(HashSet<Id<UserMarker>>);

    impl OwnerLookup for StaticOwners {
        async fn is_owner(&self, user_id: Id<UserMarker>) -> bool {
            self.0.contains(&user_id)
        }
    }

    const OWNER: Id<UserMarker> = Id::new(1);
    const AUTHOR: Id<UserMarker> = Id::new(2);
    const STRANGER: Id<UserMarker> = Id::new(3);

    fn owners() -> StaticOwners {
        StaticOwners(HashSet::from([OWNER]))
    }

    fn info() -> PageInfo {
        PageInfo {
            session: 7,
            current_page: 0,
            max_pages: 3,
            per_page: 1,
            total_items: 3,
        }
    }

    #[tokio::test]
    async fn author_match_beats_a_denying_check() {
        let mut gate = InteractionGate::<()>::new(GatePolicy::Deny);
        gate.author_id = Some(AUTHOR);
        gate.check = Some(Check::sync(|_, _| false));

        assert!(gate.allow(AUTHOR, &owners(), &info(), &()).await);
        assert!(!gate.allow(STRANGER, &owners(), &info(), &()).await);
    }

    #[tokio::test]
    async fn owner_beats_author_mismatch() {
        let mut gate = InteractionGate::<()>::new(GatePolicy::Deny);
        gate.author_id = Some(AUTHOR);
        gate.always_allow_owner = true;

        assert!(gate.allow(OWNER, &owners(), &info(), &()).await);

        gate.always_allow_owner = false;
        assert!(!gate.allow(OWNER, &owners(), &info(), &()).await);
    }

    #[tokio::test]
    async fn async_check_receives_page_info() {
        let mut gate = InteractionGate::<u8>::new(GatePolicy::Deny);
        gate.check = Some(Check::with_future(|info: PageInfo, marker: u8| async move {
            info.max_pages == 3 && marker == 9
        }));

        assert!(gate.allow(STRANGER, &owners(), &info(), &9).await);
        assert!(!gate.allow(STRANGER, &owners(), &info(), &1).await);
    }

    #[tokio::test]
    async fn falls_back_to_policy() {
        let allow = InteractionGate::<()>::new(GatePolicy::Allow);
        let deny = InteractionGate::<()>::new(GatePolicy::Deny);

        assert!(allow.allow(STRANGER, &owners(), &info(), &()).await);
        assert!(!deny.allow(STRANGER, &owners(), &info(), &()).await);
    }
}
