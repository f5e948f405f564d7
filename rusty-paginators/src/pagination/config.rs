//! Paginator settings and the builder that validates them.

use std::{sync::Arc, time::Duration};

use tracing::warn;
use twilight_model::{
    channel::message::AllowedMentions,
    id::{Id, marker::UserMarker},
};

use crate::error::PaginatorError;

use super::components::ButtonSet;
use super::gate::{Check, GatePolicy, InteractionGate};
use super::page::Navigation;
use super::paginator::{Controls, NoHooks, Paginator, PaginatorHooks};
use super::render::RenderMode;
use super::select::MAX_SELECT_OPTIONS;
use super::source::{PageSource, PageStore};

/// Default timeout for paginator sessions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// What happens to the message once a paginator stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterAction {
    DeleteMessage,
    DisableItems,
    ClearItems,
    #[default]
    Nothing,
}

/// How failures of best-effort message edits are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditFailurePolicy {
    #[default]
    Propagate,
    /// Log with `warn!` and carry on.
    Ignore,
}

impl EditFailurePolicy {
    pub fn handle(self, result: anyhow::Result<()>, action: &str) -> anyhow::Result<()> {
        match (self, result) {
            (_, Ok(())) => Ok(()),
            (Self::Propagate, Err(source)) => Err(source),
            (Self::Ignore, Err(source)) => {
                warn!(error = %source, action, "ignoring failed paginator edit");
                Ok(())
            }
        }
    }
}

/// Render and lifecycle options fixed at build time.
#[derive(Debug, Clone)]
pub struct PaginatorSettings {
    pub after_stop: AfterAction,
    pub after_timeout: AfterAction,
    pub add_page_string: bool,
    pub timeout: Option<Duration>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub allowed_mentions: Option<AllowedMentions>,
    pub render_mode: RenderMode,
    pub edit_failure: EditFailurePolicy,
    pub notify_denied: bool,
}

/// Builds a [`Paginator`].
///
/// The gate's fallback policy has no default and must be chosen up front.
pub struct PaginatorBuilder {
    source: PageSource,
    gate: InteractionGate,
    per_page: Option<usize>,
    loop_pages: bool,
    settings: PaginatorSettings,
    components_v2: Option<bool>,
    buttons: ButtonSet,
    hybrid: bool,
    per_select: usize,
    add_in_order: bool,
    hooks: Arc<dyn PaginatorHooks>,
    fetcher: Option<reqwest::Client>,
}

impl PaginatorBuilder {
    pub fn new(source: impl Into<PageSource>, policy: GatePolicy) -> Self {
        Self {
            source: source.into(),
            gate: InteractionGate::new(policy),
            per_page: None,
            loop_pages: false,
            settings: PaginatorSettings {
                after_stop: AfterAction::Nothing,
                after_timeout: AfterAction::Nothing,
                add_page_string: true,
                timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
                title: None,
                description: None,
                allowed_mentions: None,
                render_mode: RenderMode::Classic,
                edit_failure: EditFailurePolicy::Propagate,
                notify_denied: true,
            },
            components_v2: None,
            buttons: ButtonSet::default(),
            hybrid: false,
            per_select: MAX_SELECT_OPTIONS,
            add_in_order: false,
            hooks: Arc::new(NoHooks),
            fetcher: None,
        }
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn loop_pages(mut self, loop_pages: bool) -> Self {
        self.loop_pages = loop_pages;
        self
    }

    pub fn author_id(mut self, author_id: Id<UserMarker>) -> Self {
        self.gate.author_id = Some(author_id);
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.gate.check = Some(check);
        self
    }

    pub fn always_allow_owner(mut self, enabled: bool) -> Self {
        self.gate.always_allow_owner = enabled;
        self
    }

    pub fn after_stop(mut self, action: AfterAction) -> Self {
        self.settings.after_stop = action;
        self
    }

    pub fn after_timeout(mut self, action: AfterAction) -> Self {
        self.settings.after_timeout = action;
        self
    }

    pub fn add_page_string(mut self, enabled: bool) -> Self {
        self.settings.add_page_string = enabled;
        self
    }

    /// `None` keeps the paginator alive until it is stopped.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.settings.description = Some(description.into());
        self
    }

    pub fn allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.settings.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Force components-v2 rendering on or off. Detected from the pages when unset.
    pub fn components_v2(mut self, enabled: bool) -> Self {
        self.components_v2 = Some(enabled);
        self
    }

    pub fn edit_failure(mut self, policy: EditFailurePolicy) -> Self {
        self.settings.edit_failure = policy;
        self
    }

    pub fn notify_denied(mut self, enabled: bool) -> Self {
        self.settings.notify_denied = enabled;
        self
    }

    pub fn hooks(mut self, hooks: impl PaginatorHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    pub fn buttons(mut self, buttons: ButtonSet) -> Self {
        self.buttons = buttons;
        self
    }

    /// Add a page select menu above the buttons.
    pub fn hybrid(mut self, enabled: bool) -> Self {
        self.hybrid = enabled;
        self
    }

    /// Options per select menu, capped at Discord's limit.
    pub fn per_select(mut self, per_select: usize) -> Self {
        self.per_select = per_select;
        self
    }

    pub fn add_in_order(mut self, enabled: bool) -> Self {
        self.add_in_order = enabled;
        self
    }

    /// HTTP client used to download remote attachments.
    pub fn fetcher(mut self, client: reqwest::Client) -> Self {
        self.fetcher = Some(client);
        self
    }

    pub fn build(mut self) -> Result<Paginator, PaginatorError> {
        let has_v2 = self.source.contains_v2_component();
        self.settings.render_mode = match self.components_v2 {
            Some(false) if has_v2 => return Err(PaginatorError::V2ComponentsDisabled),
            Some(true) => RenderMode::ComponentsV2,
            None if has_v2 => RenderMode::ComponentsV2,
            _ => RenderMode::Classic,
        };
        if self.settings.render_mode == RenderMode::ComponentsV2 && self.source.contains_embed() {
            return Err(PaginatorError::IncompatibleV2Content("embeds"));
        }

        let controls = match &self.source {
            PageSource::Options(_) => {
                if self.per_page.is_some_and(|per_page| per_page != 1) {
                    return Err(PaginatorError::PerPageWithSelectOptions);
                }
                Controls::Select
            }
            _ => {
                self.buttons.validate()?;
                if self.hybrid {
                    Controls::Hybrid(self.buttons)
                } else {
                    Controls::Buttons(self.buttons)
                }
            }
        };

        let store = PageStore::from_source(self.source, self.per_select, self.add_in_order)?;
        let nav = Navigation::new(store.total_items(), self.per_page.unwrap_or(1), self.loop_pages)?;

        Ok(Paginator::from_parts(
            nav,
            store,
            controls,
            self.settings,
            self.gate,
            self.hooks,
            self.fetcher.unwrap_or_default(),
        ))
    }
}
