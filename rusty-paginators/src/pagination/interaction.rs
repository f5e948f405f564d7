//! Live paginator sessions and routing of their component and modal interactions.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};
use twilight_http::Client;
use twilight_model::{
    application::interaction::{InteractionData, modal::ModalInteractionComponent},
    gateway::payload::incoming::InteractionCreate,
};

use crate::owners::OwnerLookup;

use super::page::parse_one_based_page;
use super::paginator::{Controls, CustomButtonAction, Paginator, Position};
use super::respond::{
    Destination, PAGINATION_DENIED_MESSAGE, PAGINATION_EXPIRED_MESSAGE, delete_original_response,
    respond_deferred_update, respond_ephemeral_components, respond_ephemeral_message,
    respond_jump_modal, respond_update_message,
};
use super::token::{PAGE_INPUT_ID, PaginatorAction, parse_custom_id, parse_modal_custom_id};

type SharedPaginator = Arc<Mutex<Paginator>>;

struct Session {
    paginator: SharedPaginator,
    timeout_task: Option<JoinHandle<()>>,
}

/// Running paginators keyed by session id.
#[derive(Default)]
pub struct PaginatorRegistry {
    sessions: Mutex<HashMap<u64, Session>>,
}

impl PaginatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `paginator` and keep it alive for interactions until it stops or times out.
    ///
    /// Paginators without any controls are sent but not tracked.
    pub async fn start(
        self: &Arc<Self>,
        http: Arc<Client>,
        mut paginator: Paginator,
        destination: Destination<'_>,
    ) -> anyhow::Result<u64> {
        paginator.send(&http, destination).await?;

        let session = paginator.session();
        if paginator.has_controls() {
            self.register(http, paginator).await;
        } else {
            debug!(session, "paginator has no controls, not tracking it");
        }

        Ok(session)
    }

    /// Track an already sent paginator and arm its timeout.
    pub async fn register(self: &Arc<Self>, http: Arc<Client>, paginator: Paginator) -> SharedPaginator {
        let session = paginator.session();
        let timeout = paginator.settings().timeout;
        let paginator = Arc::new(Mutex::new(paginator));

        let replaced = self.sessions.lock().await.insert(
            session,
            Session {
                paginator: Arc::clone(&paginator),
                timeout_task: None,
            },
        );
        if let Some(task) = replaced.and_then(|old| old.timeout_task) {
            task.abort();
        }

        self.arm_timeout(session, http, timeout).await;
        debug!(session, "paginator registered");
        paginator
    }

    pub async fn get(&self, session: u64) -> Option<SharedPaginator> {
        self.sessions
            .lock()
            .await
            .get(&session)
            .map(|entry| Arc::clone(&entry.paginator))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Forget a session and cancel its pending timeout.
    pub async fn remove(&self, session: u64) -> Option<SharedPaginator> {
        let entry = self.sessions.lock().await.remove(&session)?;
        if let Some(task) = entry.timeout_task {
            task.abort();
        }

        debug!(session, "paginator removed");
        Some(entry.paginator)
    }

    /// Restart the inactivity timer of a session.
    async fn arm_timeout(self: &Arc<Self>, session: u64, http: Arc<Client>, timeout: Option<Duration>) {
        let mut sessions = self.sessions.lock().await;
        let Some(entry) = sessions.get_mut(&session) else {
            return;
        };
        if let Some(task) = entry.timeout_task.take() {
            task.abort();
        }
        let Some(timeout) = timeout else {
            return;
        };

        let registry = Arc::downgrade(self);
        entry.timeout_task = Some(tokio::spawn(expire_after(registry, session, http, timeout)));
    }

    /// Handle a paginator interaction. Returns `false` when the interaction is not ours.
    pub async fn handle_interaction(
        self: &Arc<Self>,
        http: Arc<Client>,
        owners: &impl OwnerLookup,
        interaction: &InteractionCreate,
    ) -> anyhow::Result<bool> {
        let Some(target) = Target::parse(interaction) else {
            return Ok(false);
        };

        let Some(paginator) = self.get(target.session()).await else {
            debug!(session = target.session(), "interaction for an unknown paginator");
            respond_ephemeral_message(&http, interaction, PAGINATION_EXPIRED_MESSAGE).await?;
            return Ok(true);
        };

        let mut paginator = paginator.lock().await;
        if paginator.is_stopped() {
            respond_ephemeral_message(&http, interaction, PAGINATION_EXPIRED_MESSAGE).await?;
            return Ok(true);
        }

        if !paginator.interaction_check(owners, interaction).await {
            if paginator.settings().notify_denied {
                respond_ephemeral_message(&http, interaction, PAGINATION_DENIED_MESSAGE).await?;
            } else {
                respond_deferred_update(&http, interaction).await?;
            }
            return Ok(true);
        }

        let result = match target {
            Target::Component { action, values, .. } => {
                dispatch_component(&http, &mut paginator, interaction, action, &values).await
            }
            Target::Modal { raw_page, .. } => {
                submit_jump(&http, &mut paginator, interaction, raw_page.as_deref()).await
            }
        };

        let session = paginator.session();
        let stopped = paginator.is_stopped();
        let timeout = paginator.settings().timeout;
        drop(paginator);

        if stopped {
            self.remove(session).await;
        } else {
            self.arm_timeout(session, http, timeout).await;
        }

        result.map(|()| true)
    }
}

async fn expire_after(registry: Weak<PaginatorRegistry>, session: u64, http: Arc<Client>, timeout: Duration) {
    tokio::time::sleep(timeout).await;

    let Some(registry) = registry.upgrade() else {
        return;
    };
    // Take the entry without aborting: this task is its timeout handle.
    let Some(entry) = registry.sessions.lock().await.remove(&session) else {
        return;
    };

    debug!(session, "paginator timed out");
    if let Err(error) = entry.paginator.lock().await.on_timeout(&http).await {
        warn!(session, error = ?error, "failed to apply paginator timeout action");
    }
}

/// What a paginator interaction addresses.
enum Target {
    Component {
        session: u64,
        action: PaginatorAction,
        values: Vec<String>,
    },
    Modal {
        session: u64,
        raw_page: Option<String>,
    },
}

impl Target {
    fn parse(interaction: &InteractionCreate) -> Option<Self> {
        match interaction.data.as_ref()? {
            InteractionData::MessageComponent(data) => {
                let token = parse_custom_id(&data.custom_id)?;
                Some(Self::Component {
                    session: token.session,
                    action: token.action,
                    values: data.values.clone(),
                })
            }
            InteractionData::ModalSubmit(data) => Some(Self::Modal {
                session: parse_modal_custom_id(&data.custom_id)?,
                raw_page: page_input_value(&data.components),
            }),
            _ => None,
        }
    }

    fn session(&self) -> u64 {
        match self {
            Self::Component { session, .. } | Self::Modal { session, .. } => *session,
        }
    }
}

fn page_input_value(components: &[ModalInteractionComponent]) -> Option<String> {
    components.iter().find_map(|component| match component {
        ModalInteractionComponent::ActionRow(row) => page_input_value(&row.components),
        ModalInteractionComponent::Label(label) => {
            page_input_value(std::slice::from_ref(&*label.component))
        }
        ModalInteractionComponent::TextInput(input) if input.custom_id == PAGE_INPUT_ID => {
            Some(input.value.clone())
        }
        _ => None,
    })
}

/// Whether the interaction came from the paginator's own message rather than the switcher.
fn from_paginator_message(paginator: &Paginator, interaction: &InteractionCreate) -> bool {
    match (paginator.message(), interaction.message.as_ref()) {
        (Some(sent), Some(source)) => sent.message_id == source.id,
        _ => true,
    }
}

/// Show the current page, or go back to `previous` and acknowledge when it cannot be rendered.
async fn rerender(
    http: &Client,
    paginator: &mut Paginator,
    interaction: &InteractionCreate,
    previous: Position,
) -> anyhow::Result<()> {
    let kwargs = match paginator.render().await {
        Ok(kwargs) => kwargs,
        Err(error) => {
            warn!(session = paginator.session(), error = ?error, "failed to render page, staying put");
            paginator.restore(previous);
            respond_deferred_update(http, interaction).await?;
            return Err(error);
        }
    };

    respond_update_message(http, interaction, &kwargs, paginator.settings().render_mode).await
}

async fn stop_from(http: &Client, paginator: &mut Paginator, interaction: &InteractionCreate) -> anyhow::Result<()> {
    let Some(action) = paginator.begin_stop(false) else {
        return respond_deferred_update(http, interaction).await;
    };

    if from_paginator_message(paginator, interaction) {
        return paginator.apply_after_action(http, action, Some(interaction)).await;
    }

    respond_deferred_update(http, interaction).await?;
    delete_original_response(http, interaction).await?;
    paginator.apply_after_action(http, action, None).await
}

async fn dispatch_component(
    http: &Client,
    paginator: &mut Paginator,
    interaction: &InteractionCreate,
    action: PaginatorAction,
    values: &[String],
) -> anyhow::Result<()> {
    debug!(session = paginator.session(), ?action, "paginator action");
    let previous = paginator.position();

    let changed = match action {
        PaginatorAction::First => paginator.first().is_some(),
        PaginatorAction::Previous => paginator.previous().is_some(),
        PaginatorAction::Next => paginator.next().is_some(),
        PaginatorAction::Last => paginator.last().is_some(),
        PaginatorAction::Jump | PaginatorAction::SwitcherJump => {
            let info = paginator.info();
            return respond_jump_modal(http, interaction, info.session, info.current_page, info.max_pages)
                .await;
        }
        PaginatorAction::OpenSwitcher => {
            let components = match paginator.controls() {
                Controls::Buttons(buttons) | Controls::Hybrid(buttons) => {
                    buttons.switcher_components(paginator.session())
                }
                Controls::Select => Vec::new(),
            };
            return respond_ephemeral_components(http, interaction, components).await;
        }
        PaginatorAction::Stop | PaginatorAction::SwitcherStop => {
            return stop_from(http, paginator, interaction).await;
        }
        PaginatorAction::Select => match values.first() {
            Some(value) => paginator.select_value(value),
            None => false,
        },
        PaginatorAction::Custom(custom_id) => {
            match paginator.hooks().on_custom_button(&custom_id, &paginator.info()) {
                CustomButtonAction::Acknowledge => false,
                CustomButtonAction::Refresh => true,
                CustomButtonAction::Goto(target) => paginator.goto(target).is_some(),
                CustomButtonAction::Stop => return stop_from(http, paginator, interaction).await,
            }
        }
    };

    if changed {
        rerender(http, paginator, interaction, previous).await
    } else {
        respond_deferred_update(http, interaction).await
    }
}

async fn submit_jump(
    http: &Client,
    paginator: &mut Paginator,
    interaction: &InteractionCreate,
    raw_page: Option<&str>,
) -> anyhow::Result<()> {
    let max_pages = paginator.navigation().max_pages();
    let Some(page) = raw_page.and_then(|raw| parse_one_based_page(raw, max_pages)) else {
        let notice = format!("Please enter a valid number between 1 and {max_pages}");
        return respond_ephemeral_message(http, interaction, &notice).await;
    };

    let previous = paginator.position();
    paginator.goto(page as i64);
    if from_paginator_message(paginator, interaction) {
        return rerender(http, paginator, interaction, previous).await;
    }

    respond_deferred_update(http, interaction).await?;
    delete_original_response(http, interaction).await?;
    let result = paginator.edit_existing(http).await;
    if result.is_err() {
        paginator.restore(previous);
    }
    result
}
