use std::{sync::Arc, time::Duration};

use twilight_http::Client;

use rusty_paginators::{OwnerCache, PaginatorRegistry};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub paginators: Arc<PaginatorRegistry>,
    pub owners: Arc<OwnerCache>,
    /// Inactivity timeout for paginators started by commands.
    pub paginator_timeout: Duration,
}

impl Context {
    pub fn new(http: Arc<Client>, owners: OwnerCache, paginator_timeout: Duration) -> Self {
        Self {
            http,
            paginators: Arc::new(PaginatorRegistry::new()),
            owners: Arc::new(owners),
            paginator_timeout,
        }
    }
}
