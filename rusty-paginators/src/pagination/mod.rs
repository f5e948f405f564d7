//! Stable facade for building paginators and routing their interactions.

mod components;
mod config;
mod content;
mod gate;
pub mod interaction;
mod page;
mod paginator;
mod render;
pub mod respond;
mod select;
mod source;
pub mod token;

pub use components::{
    ButtonKey, ButtonSet, MAX_BUTTONS_PER_ROW, PaginatorButton, SortButtonsOn, disable_all,
    into_rows,
};
pub use config::{
    AfterAction, DEFAULT_TIMEOUT_SECS, EditFailurePolicy, PaginatorBuilder, PaginatorSettings,
};
pub use content::{ContentItem, MessageOverrides, PageFile, RemoteAttachment};
pub use gate::{BoxFuture, Check, GatePolicy, InteractionGate, PageInfo};
pub use interaction::PaginatorRegistry;
pub use page::{
    Navigation, PageChange, page_string, page_window, parse_one_based_page, total_pages,
    validate_per_page,
};
pub use paginator::{Controls, CustomButtonAction, NoHooks, Paginator, PaginatorHooks};
pub use render::{RenderKwargs, RenderMode, normalize};
pub use respond::{Destination, MessageRef};
pub use select::{
    MAX_SELECT_OPTIONS, PaginatorOption, ResolvedOption, SelectPage, build_selects, derive_label,
};
pub use source::{PageLoader, PageSource};
