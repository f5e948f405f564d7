/// Embed builders and page footer handling.
pub mod embed;
/// Errors raised while configuring or driving a paginator.
pub mod error;
/// Bot owner lookup used by the interaction gate.
pub mod owners;
/// Paginator state, rendering and interaction routing.
pub mod pagination;
/// Expiring cache for lazily loaded pages.
pub mod ttl;

pub use error::PaginatorError;
pub use owners::{OwnerCache, OwnerLookup};
pub use pagination::{
    AfterAction, ContentItem, Destination, GatePolicy, Paginator, PaginatorBuilder,
    PaginatorRegistry, SelectPage,
};
