//! The paginator: navigation, rendering and the stop lifecycle.

use std::sync::Arc;

use tracing::debug;
use twilight_http::Client;
use twilight_model::{
    channel::message::Component, gateway::payload::incoming::InteractionCreate,
};

use crate::error::PaginatorError;
use crate::owners::OwnerLookup;

use super::components::{ButtonSet, disable_all, into_rows};
use super::config::{AfterAction, PaginatorSettings};
use super::content::ContentItem;
use super::gate::{InteractionGate, PageInfo};
use super::page::{Navigation, PageChange};
use super::render::{RenderKwargs, RenderMode, normalize};
use super::respond::{
    Destination, MessageRef, create_followup, create_message, delete_message,
    delete_original_response, respond_deferred_update, respond_update_components,
    respond_with_message, update_message, update_message_components,
};
use super::select::{page_select_menu, select_menu, select_nav_buttons};
use super::source::PageStore;

/// What a custom button asks the paginator to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomButtonAction {
    /// Acknowledge the press and leave the message alone.
    Acknowledge,
    /// Re-render the current page.
    Refresh,
    Goto(i64),
    Stop,
}

/// Integration points for paginator users. Every method has a no-op default.
pub trait PaginatorHooks: Send + Sync {
    /// Adjust a page's items before they are normalized.
    fn format_page(&self, page: Vec<ContentItem>, _info: &PageInfo) -> Vec<ContentItem> {
        page
    }

    fn on_page(&self, _change: PageChange, _info: &PageInfo) {}

    fn on_stop(&self, _is_timeout: bool, _info: &PageInfo) {}

    fn on_custom_button(&self, _custom_id: &str, _info: &PageInfo) -> CustomButtonAction {
        CustomButtonAction::Acknowledge
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PaginatorHooks for NoHooks {}

/// Which components drive navigation.
#[derive(Debug, Clone)]
pub enum Controls {
    Buttons(ButtonSet),
    /// Page select menu plus the button rows.
    Hybrid(ButtonSet),
    /// Option select menu plus previous/next buttons.
    Select,
}

/// Page and select option currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Position {
    page: usize,
    option: usize,
}

pub struct Paginator {
    session: u64,
    nav: Navigation,
    store: PageStore,
    controls: Controls,
    settings: PaginatorSettings,
    gate: InteractionGate,
    hooks: Arc<dyn PaginatorHooks>,
    fetcher: reqwest::Client,
    message: Option<MessageRef>,
    stopped_with: Option<AfterAction>,
}

impl Paginator {
    pub(super) fn from_parts(
        nav: Navigation,
        store: PageStore,
        controls: Controls,
        settings: PaginatorSettings,
        gate: InteractionGate,
        hooks: Arc<dyn PaginatorHooks>,
        fetcher: reqwest::Client,
    ) -> Self {
        Self {
            session: super::token::next_session_id(),
            nav,
            store,
            controls,
            settings,
            gate,
            hooks,
            fetcher,
            message: None,
            stopped_with: None,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            session: self.session,
            current_page: self.nav.current(),
            max_pages: self.nav.max_pages(),
            per_page: self.nav.per_page(),
            total_items: self.nav.total_items(),
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }

    pub fn settings(&self) -> &PaginatorSettings {
        &self.settings
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Buttons of a button or hybrid paginator, e.g. to add custom buttons later.
    pub fn buttons_mut(&mut self) -> Option<&mut ButtonSet> {
        match &mut self.controls {
            Controls::Buttons(buttons) | Controls::Hybrid(buttons) => Some(buttons),
            Controls::Select => None,
        }
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut InteractionGate {
        &mut self.gate
    }

    pub(super) fn hooks(&self) -> &dyn PaginatorHooks {
        self.hooks.as_ref()
    }

    pub fn message(&self) -> Option<MessageRef> {
        self.message
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_with.is_some()
    }

    pub(super) fn position(&self) -> Position {
        let option = match &self.store {
            PageStore::Selects { option_index, .. } => *option_index,
            _ => 0,
        };

        Position {
            page: self.nav.current(),
            option,
        }
    }

    /// Return to `position` without running hooks, e.g. after a failed re-render.
    pub(super) fn restore(&mut self, position: Position) {
        self.nav.goto(position.page as i64);
        if let PageStore::Selects { option_index, .. } = &mut self.store {
            *option_index = position.option;
        }
    }

    /// Move to `target`, clamped or wrapped. Does nothing once stopped.
    pub fn goto(&mut self, target: i64) -> Option<PageChange> {
        if self.is_stopped() {
            return None;
        }

        let change = self.nav.goto(target)?;
        if let PageStore::Selects { option_index, .. } = &mut self.store {
            *option_index = 0;
        }

        debug!(session = self.session, before = change.before, after = change.after, "page switched");
        self.hooks.on_page(change, &self.info());
        Some(change)
    }

    pub fn first(&mut self) -> Option<PageChange> {
        self.goto(0)
    }

    pub fn previous(&mut self) -> Option<PageChange> {
        self.goto(self.nav.current() as i64 - 1)
    }

    pub fn next(&mut self) -> Option<PageChange> {
        self.goto(self.nav.current() as i64 + 1)
    }

    pub fn last(&mut self) -> Option<PageChange> {
        self.goto(self.nav.max_pages() as i64 - 1)
    }

    /// Apply a select menu choice. Returns whether the page needs a re-render.
    pub fn select_value(&mut self, value: &str) -> bool {
        if self.is_stopped() {
            return false;
        }

        if matches!(self.controls, Controls::Hybrid(_)) {
            return value
                .parse::<i64>()
                .ok()
                .and_then(|page| self.goto(page))
                .is_some();
        }

        let current = self.nav.current();
        let PageStore::Selects { selects, option_index } = &mut self.store else {
            return false;
        };
        let Some(index) = selects
            .get(current)
            .and_then(|options| options.iter().position(|option| option.value == value))
        else {
            return false;
        };

        *option_index = index;
        true
    }

    /// Replace the items, keeping the current index inside the new range.
    pub fn set_items(&mut self, items: Vec<ContentItem>) -> Result<(), PaginatorError> {
        if matches!(self.store, PageStore::Selects { .. }) {
            return Err(PaginatorError::PerPageWithSelectOptions);
        }

        let has_v2 = items.iter().any(ContentItem::contains_v2_component);
        match self.settings.render_mode {
            RenderMode::Classic if has_v2 => return Err(PaginatorError::V2ComponentsDisabled),
            RenderMode::ComponentsV2 if items.iter().any(ContentItem::contains_embed) => {
                return Err(PaginatorError::IncompatibleV2Content("embeds"));
            }
            _ => {}
        }

        self.nav.set_total_items(items.len())?;
        self.store = PageStore::Items(items);
        Ok(())
    }

    pub fn set_per_page(&mut self, per_page: usize) -> Result<(), PaginatorError> {
        if matches!(self.store, PageStore::Selects { .. }) {
            return Err(PaginatorError::PerPageWithSelectOptions);
        }

        self.nav.set_per_page(per_page)
    }

    /// Mark the paginator stopped and hand back the action to apply.
    ///
    /// Only the first call returns an action.
    pub fn begin_stop(&mut self, is_timeout: bool) -> Option<AfterAction> {
        if self.is_stopped() {
            return None;
        }

        let action = if is_timeout {
            self.settings.after_timeout
        } else {
            self.settings.after_stop
        };
        self.stopped_with = Some(action);
        debug!(session = self.session, is_timeout, ?action, "paginator stopped");
        self.hooks.on_stop(is_timeout, &self.info());
        Some(action)
    }

    /// Navigation components for the current state.
    pub fn components(&self) -> Vec<Component> {
        let all_disabled = match self.stopped_with {
            Some(AfterAction::ClearItems | AfterAction::DeleteMessage) => return Vec::new(),
            Some(AfterAction::DisableItems) => true,
            _ => false,
        };

        match &self.controls {
            Controls::Buttons(buttons) => buttons.derive(self.session, &self.nav, all_disabled),
            Controls::Hybrid(buttons) => {
                let mut rows = Vec::new();
                if self.nav.max_pages() > 1 {
                    rows.extend(into_rows(vec![page_select_menu(
                        self.session,
                        &self.nav,
                        all_disabled,
                    )]));
                }
                rows.extend(buttons.derive(self.session, &self.nav, all_disabled));
                rows
            }
            Controls::Select => {
                let PageStore::Selects { selects, option_index } = &self.store else {
                    return Vec::new();
                };
                let Some(options) = selects.get(self.nav.current()) else {
                    return Vec::new();
                };

                let mut rows = into_rows(vec![select_menu(
                    self.session,
                    options,
                    *option_index,
                    &self.nav.page_string(),
                    all_disabled,
                )]);
                if self.nav.max_pages() > 1 {
                    rows.extend(select_nav_buttons(self.session, &self.nav, all_disabled));
                }
                rows
            }
        }
    }

    /// Whether the paginator renders anything a user can interact with.
    pub fn has_controls(&self) -> bool {
        !self.components().is_empty()
    }

    /// Items of the current page, loaded, passed through `format_page` and downloaded.
    pub async fn current_page_items(&mut self) -> anyhow::Result<Vec<ContentItem>> {
        let (start, end) = self.nav.window();
        let page = self.store.page(start, end).await?;
        let page = self.hooks.format_page(page, &self.info());
        for item in &page {
            item.prefetch(&self.fetcher).await?;
        }

        Ok(page)
    }

    /// Build the render bag for already prepared page items.
    pub fn render_page(&self, page: &[ContentItem]) -> Result<RenderKwargs, PaginatorError> {
        let mode = self.settings.render_mode;
        // Lazy pages and hooks bypass the builder checks.
        if mode == RenderMode::Classic && page.iter().any(ContentItem::contains_v2_component) {
            return Err(PaginatorError::V2ComponentsDisabled);
        }
        let mut kwargs = normalize(page, mode)?;

        kwargs.decorate(
            self.settings.title.as_deref(),
            self.settings.description.as_deref(),
            mode,
        );
        if self.settings.add_page_string {
            kwargs.apply_page_marker(&self.nav.page_string(), mode);
        }
        if kwargs.allowed_mentions.is_none() {
            kwargs.allowed_mentions = self.settings.allowed_mentions.clone();
        }
        kwargs.components.extend(self.components());

        Ok(kwargs)
    }

    pub async fn render(&mut self) -> anyhow::Result<RenderKwargs> {
        let page = self.current_page_items().await?;
        Ok(self.render_page(&page)?)
    }

    /// Run the gate for the interaction's actor. Interactions without an actor are denied.
    pub async fn interaction_check(
        &self,
        owners: &impl OwnerLookup,
        interaction: &InteractionCreate,
    ) -> bool {
        let Some(actor) = interaction.author_id() else {
            return false;
        };

        self.gate.allow(actor, owners, &self.info(), interaction).await
    }

    /// Render the current page and send it.
    pub async fn send(&mut self, http: &Client, destination: Destination<'_>) -> anyhow::Result<MessageRef> {
        let kwargs = self.render().await?;
        let mode = self.settings.render_mode;

        let message = match destination {
            Destination::Channel(channel_id) => create_message(http, channel_id, &kwargs, mode).await?,
            Destination::Interaction(interaction) => {
                respond_with_message(http, interaction, &kwargs, mode).await?
            }
            Destination::Followup(interaction) => create_followup(http, interaction, &kwargs, mode).await?,
        };

        let message = MessageRef::from(&message);
        debug!(session = self.session, message_id = %message.message_id, "paginator sent");
        self.message = Some(message);
        Ok(message)
    }

    /// Re-render the current page onto the sent message.
    pub async fn edit_existing(&mut self, http: &Client) -> anyhow::Result<()> {
        let message = self.message.ok_or(PaginatorError::NoMessage)?;
        let kwargs = self.render().await?;

        let result = update_message(http, message, &kwargs, self.settings.render_mode).await;
        self.settings.edit_failure.handle(result, "edit paginator message")
    }

    /// Stop without an interaction, e.g. from a command or shutdown path.
    pub async fn stop(&mut self, http: &Client) -> anyhow::Result<()> {
        match self.begin_stop(false) {
            Some(action) => self.apply_after_action(http, action, None).await,
            None => Ok(()),
        }
    }

    pub async fn on_timeout(&mut self, http: &Client) -> anyhow::Result<()> {
        match self.begin_stop(true) {
            Some(action) => self.apply_after_action(http, action, None).await,
            None => Ok(()),
        }
    }

    /// Message components after a stop: page components stay, paginator controls
    /// are disabled or dropped. Clearing a classic message removes everything.
    async fn stopped_components(&mut self, action: AfterAction) -> anyhow::Result<Vec<Component>> {
        if action == AfterAction::ClearItems && self.settings.render_mode == RenderMode::Classic {
            return Ok(Vec::new());
        }

        let components = self.render().await?.components;
        Ok(match action {
            AfterAction::DisableItems => disable_all(&components),
            _ => components,
        })
    }

    /// Apply a stop action, answering `interaction` when it targets the paginator message.
    pub(super) async fn apply_after_action(
        &mut self,
        http: &Client,
        action: AfterAction,
        interaction: Option<&InteractionCreate>,
    ) -> anyhow::Result<()> {
        let policy = self.settings.edit_failure;

        match (action, interaction) {
            (AfterAction::Nothing, Some(interaction)) => {
                respond_deferred_update(http, interaction).await
            }
            (AfterAction::Nothing, None) => Ok(()),
            (AfterAction::DeleteMessage, Some(interaction)) => {
                respond_deferred_update(http, interaction).await?;
                self.message = None;
                policy.handle(
                    delete_original_response(http, interaction).await,
                    "delete paginator message",
                )
            }
            (AfterAction::DeleteMessage, None) => match self.message.take() {
                Some(message) => policy.handle(
                    delete_message(http, message).await,
                    "delete paginator message",
                ),
                None => Ok(()),
            },
            (AfterAction::DisableItems | AfterAction::ClearItems, Some(interaction)) => {
                let components = self.stopped_components(action).await?;
                respond_update_components(http, interaction, &components).await
            }
            (AfterAction::DisableItems | AfterAction::ClearItems, None) => {
                let Some(message) = self.message else {
                    return Ok(());
                };
                let components = self.stopped_components(action).await?;
                policy.handle(
                    update_message_components(http, message, &components).await,
                    "update paginator components",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use std::time::Duration;

    use twilight_model::channel::message::component::{Button, TextDisplay};
    use twilight_util::builder::embed::EmbedBuilder;

    use super::*;
    use crate::pagination::config::PaginatorBuilder;
    use crate::pagination::content::{PageFile, RemoteAttachment};
    use crate::pagination::gate::BoxFuture;
    use crate::pagination::source::{PageLoader, PageSource};
    use crate::pagination::gate::GatePolicy;
    use crate::pagination::select::SelectPage;

    fn texts(count: usize) -> Vec<ContentItem> {
        (0..count).map(|index| ContentItem::text(format!("item {index}"))).collect()
    }

    fn paginator(count: usize) -> Paginator {
        PaginatorBuilder::new(texts(count), GatePolicy::Allow).build().unwrap()
    }

    fn buttons(components: &[Component]) -> Vec<Button> {
        components
            .iter()
            .flat_map(|component| match component {
                Component::ActionRow(row) => row.components.clone(),
                _ => Vec::new(),
            })
            .filter_map(|component| match component {
                Component::Button(button) => Some(button),
                _ => None,
            })
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        pages: Mutex<Vec<PageChange>>,
        stops: AtomicUsize,
    }

    impl PaginatorHooks for Arc<Recorder> {
        fn format_page(&self, mut page: Vec<ContentItem>, info: &PageInfo) -> Vec<ContentItem> {
            page.push(ContentItem::text(format!(" [{}]", info.current_page)));
            page
        }

        fn on_page(&self, change: PageChange, _info: &PageInfo) {
            self.pages.lock().unwrap().push(change);
        }

        fn on_stop(&self, _is_timeout: bool, _info: &PageInfo) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn stop_with_delete_is_applied_once() {
        let mut paginator = PaginatorBuilder::new(texts(6), GatePolicy::Allow)
            .after_stop(AfterAction::DeleteMessage)
            .build()
            .unwrap();

        assert_eq!(paginator.begin_stop(false), Some(AfterAction::DeleteMessage));
        assert_eq!(paginator.begin_stop(false), None);
        assert_eq!(paginator.begin_stop(true), None);

        assert_eq!(paginator.goto(3), None);
        assert_eq!(paginator.next(), None);
        assert_eq!(paginator.navigation().current(), 0);
        assert!(paginator.components().is_empty());
    }

    #[test]
    fn timeout_uses_its_own_action() {
        let mut paginator = PaginatorBuilder::new(texts(3), GatePolicy::Allow)
            .after_stop(AfterAction::DeleteMessage)
            .after_timeout(AfterAction::DisableItems)
            .build()
            .unwrap();

        assert_eq!(paginator.begin_stop(true), Some(AfterAction::DisableItems));
        let rendered = buttons(&paginator.components());
        assert!(!rendered.is_empty());
        assert!(rendered.iter().all(|button| button.disabled));
    }

    #[tokio::test]
    async fn disabling_also_covers_page_components() {
        let vote = Component::Button(Button {
            id: None,
            custom_id: Some("vote".to_owned()),
            disabled: false,
            emoji: None,
            label: Some("Vote".to_owned()),
            style: twilight_model::channel::message::component::ButtonStyle::Primary,
            url: None,
            sku_id: None,
        });
        let pages = vec![
            ContentItem::nested([ContentItem::text("ballot"), ContentItem::from(into_rows(vec![vote]).remove(0))]),
            ContentItem::text("results"),
        ];
        let mut paginator = PaginatorBuilder::new(pages, GatePolicy::Allow)
            .after_stop(AfterAction::DisableItems)
            .build()
            .unwrap();

        let action = paginator.begin_stop(false).unwrap();
        let components = paginator.stopped_components(action).await.unwrap();
        let rendered = buttons(&components);

        assert!(rendered.iter().any(|button| button.label.as_deref() == Some("Vote")));
        assert!(rendered.iter().all(|button| button.disabled));
    }

    #[tokio::test]
    async fn clearing_a_classic_message_drops_everything() {
        let mut paginator = PaginatorBuilder::new(texts(3), GatePolicy::Allow)
            .after_stop(AfterAction::ClearItems)
            .build()
            .unwrap();

        let action = paginator.begin_stop(false).unwrap();
        assert!(paginator.stopped_components(action).await.unwrap().is_empty());
    }

    #[test]
    fn six_items_two_per_page() {
        let mut clamped = PaginatorBuilder::new(texts(6), GatePolicy::Allow)
            .per_page(2)
            .build()
            .unwrap();
        assert_eq!(clamped.navigation().max_pages(), 3);
        clamped.goto(5);
        assert_eq!(clamped.navigation().current(), 2);

        let mut looped = PaginatorBuilder::new(texts(6), GatePolicy::Allow)
            .per_page(2)
            .loop_pages(true)
            .build()
            .unwrap();
        looped.goto(5);
        assert_eq!(looped.navigation().current(), 2);
    }

    #[test]
    fn hot_swap_reclamps_and_rederives_buttons() {
        let mut paginator = paginator(10);
        paginator.last();
        assert_eq!(paginator.navigation().current(), 9);

        paginator.set_items(texts(4)).unwrap();
        assert_eq!(paginator.navigation().current(), 3);

        let labels: Vec<_> = buttons(&paginator.components())
            .into_iter()
            .filter_map(|button| button.label)
            .collect();
        assert!(labels.contains(&"Page 4 of 4".to_owned()));
        assert!(labels.contains(&"Last 4".to_owned()));
    }

    #[tokio::test]
    async fn renders_the_current_window_with_marker() {
        let mut paginator = PaginatorBuilder::new(texts(5), GatePolicy::Allow)
            .per_page(2)
            .title("Numbers")
            .build()
            .unwrap();
        paginator.next();

        let kwargs = paginator.render().await.unwrap();

        assert_eq!(kwargs.content.as_deref(), Some("**Numbers**\nitem 2item 3\nPage 2 of 3"));
        assert!(!kwargs.components.is_empty());
    }

    #[tokio::test]
    async fn repeated_renders_rebuild_file_uploads() {
        let pages = vec![ContentItem::from(PageFile::new("a.txt", b"alpha".to_vec()))];
        let mut paginator = PaginatorBuilder::new(pages, GatePolicy::Allow).build().unwrap();

        let first = paginator.render().await.unwrap().attachments();
        let second = paginator.render().await.unwrap().attachments();

        assert_eq!(first[0].file, second[0].file);
        assert_eq!(first[0].filename, "a.txt");
    }

    #[tokio::test]
    async fn hooks_observe_pages_and_stop() {
        let recorder = Arc::new(Recorder::default());
        let mut paginator = PaginatorBuilder::new(texts(3), GatePolicy::Allow)
            .hooks(Arc::clone(&recorder))
            .build()
            .unwrap();

        paginator.next();
        paginator.next();
        paginator.next();
        let kwargs = paginator.render().await.unwrap();
        paginator.begin_stop(false);
        paginator.begin_stop(false);

        assert_eq!(
            *recorder.pages.lock().unwrap(),
            [
                PageChange { before: 0, after: 1 },
                PageChange { before: 1, after: 2 },
            ]
        );
        assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);
        assert!(kwargs.content.unwrap().starts_with("item 2 [2]"));
    }

    #[tokio::test]
    async fn select_mode_renders_the_chosen_option() {
        let pages = vec![
            SelectPage::from("first"),
            SelectPage::from("second"),
            SelectPage::Group(vec![SelectPage::from("third")]),
        ];
        let mut paginator = PaginatorBuilder::new(pages, GatePolicy::Allow)
            .add_in_order(true)
            .build()
            .unwrap();
        assert_eq!(paginator.navigation().max_pages(), 2);

        assert!(paginator.select_value("0-1"));
        assert!(!paginator.select_value("missing"));
        let kwargs = paginator.render().await.unwrap();
        assert_eq!(kwargs.content.as_deref(), Some("second\nPage 1 of 2"));

        paginator.next();
        let kwargs = paginator.render().await.unwrap();
        assert_eq!(kwargs.content.as_deref(), Some("third\nPage 2 of 2"));
    }

    #[test]
    fn hybrid_select_jumps_to_a_page() {
        let mut paginator = PaginatorBuilder::new(texts(4), GatePolicy::Allow)
            .hybrid(true)
            .build()
            .unwrap();

        assert!(paginator.select_value("2"));
        assert_eq!(paginator.navigation().current(), 2);
        assert!(matches!(
            paginator.components().first(),
            Some(Component::ActionRow(row)) if matches!(row.components[0], Component::SelectMenu(_))
        ));
    }

    #[test]
    fn embeds_get_the_marker_in_their_footer() {
        let pages = vec![ContentItem::from(EmbedBuilder::new().title("one").build())];
        let paginator = PaginatorBuilder::new(pages.clone(), GatePolicy::Allow).build().unwrap();

        let kwargs = paginator.render_page(&pages).unwrap();
        assert_eq!(kwargs.embeds[0].footer.as_ref().unwrap().text, "Page 1 of 1");
        assert!(kwargs.content.is_none());
        assert!(!paginator.has_controls());
    }

    /// Serve `body` to exactly one HTTP request and return the file url.
    fn serve_once(body: &'static [u8]) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0; 1024];
            let _ = stream.read(&mut request);
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });

        format!("http://{addr}/badge.png")
    }

    struct Badge(String);

    impl PaginatorHooks for Badge {
        fn format_page(&self, mut page: Vec<ContentItem>, _info: &PageInfo) -> Vec<ContentItem> {
            page.push(RemoteAttachment::new("badge.png", self.0.clone()).into());
            page
        }
    }

    #[tokio::test]
    async fn attachments_added_by_format_page_are_downloaded() {
        let url = serve_once(b"png bytes");
        let mut paginator = PaginatorBuilder::new(texts(2), GatePolicy::Allow)
            .hooks(Badge(url))
            .fetcher(reqwest::Client::builder().no_proxy().build().unwrap())
            .build()
            .unwrap();

        let kwargs = paginator.render().await.unwrap();

        assert_eq!(kwargs.files.len(), 1);
        assert_eq!(kwargs.files[0].filename, "badge.png");
        assert_eq!(kwargs.files[0].bytes(), b"png bytes");
    }

    struct LayoutLoader;

    impl PageLoader for LayoutLoader {
        fn load(&self, _index: usize) -> BoxFuture<'_, anyhow::Result<ContentItem>> {
            Box::pin(async {
                Ok(ContentItem::from(Component::TextDisplay(TextDisplay {
                    id: None,
                    content: "layout".to_owned(),
                })))
            })
        }
    }

    #[tokio::test]
    async fn lazy_layout_items_need_components_v2() {
        let source = PageSource::lazy(2, LayoutLoader, Duration::from_secs(60));
        let mut classic = PaginatorBuilder::new(source, GatePolicy::Allow).build().unwrap();

        let error = classic.render().await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<PaginatorError>(),
            Some(&PaginatorError::V2ComponentsDisabled)
        );

        let source = PageSource::lazy(2, LayoutLoader, Duration::from_secs(60));
        let mut layout = PaginatorBuilder::new(source, GatePolicy::Allow)
            .components_v2(true)
            .build()
            .unwrap();
        let kwargs = layout.render().await.unwrap();
        assert_eq!(
            kwargs.message_flags(RenderMode::ComponentsV2),
            Some(twilight_model::channel::message::MessageFlags::IS_COMPONENTS_V2)
        );
    }

    #[test]
    fn restoring_a_position_skips_hooks() {
        let recorder = Arc::new(Recorder::default());
        let mut paginator = PaginatorBuilder::new(texts(3), GatePolicy::Allow)
            .hooks(Arc::clone(&recorder))
            .build()
            .unwrap();

        let before = paginator.position();
        paginator.next();
        paginator.restore(before);

        assert_eq!(paginator.navigation().current(), 0);
        assert_eq!(recorder.pages.lock().unwrap().len(), 1);
    }
}
