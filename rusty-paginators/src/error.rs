use thiserror::Error;

/// Input-validation failures raised while building or reconfiguring a paginator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginatorError {
    #[error("no pages were provided")]
    NoPages,

    #[error("per_page must be at least 1")]
    InvalidPerPage,

    #[error("per_page ({per_page}) cannot be greater than the amount of items ({items})")]
    PerPageExceedsItems { per_page: usize, items: usize },

    #[error("the {button} button is required when {feature} is enabled")]
    RequiredButtonMissing {
        button: &'static str,
        feature: &'static str,
    },

    #[error("{0} cannot be used when rendering with components v2")]
    IncompatibleV2Content(&'static str),

    #[error("components-v2 layout items need components_v2 rendering to be enabled")]
    V2ComponentsDisabled,

    #[error("nested lists inside a select page are not allowed")]
    NestedSelectOption,

    #[error("too many options for one select (max: {max}, got: {got})")]
    TooManySelectOptions { max: usize, got: usize },

    #[error("per_page cannot be set for select option pages")]
    PerPageWithSelectOptions,

    #[error("no message to edit, send the paginator first")]
    NoMessage,
}
