//! Discord calls that deliver rendered pages and paginator notices.

use twilight_http::{Client, request::channel::message::UpdateMessage};
use twilight_model::{
    channel::{
        Message,
        message::{
            MessageFlags,
            component::{ActionRow, Component, TextInput, TextInputStyle},
        },
    },
    gateway::payload::incoming::InteractionCreate,
    http::attachment::Attachment,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

use super::render::{RenderKwargs, RenderMode};
use super::token::{PAGE_INPUT_ID, build_modal_custom_id};

/// Shown when an interaction targets a paginator that already stopped or expired.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This paginator has expired. Run the command again.";
/// Shown when the gate denies an interaction.
pub const PAGINATION_DENIED_MESSAGE: &str = "You are not allowed to use this paginator.";
/// Title of the page jump modal.
pub const JUMP_MODAL_TITLE: &str = "Which page would you like to go to?";

/// Location of a sent paginator message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

impl From<&Message> for MessageRef {
    fn from(message: &Message) -> Self {
        Self {
            channel_id: message.channel_id,
            message_id: message.id,
        }
    }
}

/// Where a paginator is first sent.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    Channel(Id<ChannelMarker>),
    /// Initial response to an interaction that was not answered yet.
    Interaction(&'a InteractionCreate),
    /// Follow-up message for an interaction that was already answered.
    Followup(&'a InteractionCreate),
}

fn response_data(kwargs: &RenderKwargs, mode: RenderMode, editing: bool) -> InteractionResponseData {
    let mut builder = InteractionResponseDataBuilder::new()
        .components(kwargs.components.clone())
        .attachments(kwargs.attachments());

    if mode == RenderMode::Classic {
        builder = builder.embeds(kwargs.embeds.clone());
        match kwargs.content.as_deref() {
            Some(content) => builder = builder.content(content),
            None if editing => builder = builder.content(""),
            None => {}
        }
    }
    if let Some(allowed_mentions) = kwargs.allowed_mentions.clone() {
        builder = builder.allowed_mentions(allowed_mentions);
    }
    if let Some(flags) = kwargs.message_flags(mode) {
        builder = builder.flags(flags);
    }

    builder.build()
}

async fn create_response(
    http: &Client,
    interaction: &InteractionCreate,
    response: &InteractionResponse,
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, response)
        .await?;

    Ok(())
}

/// Send a rendered page as a new channel message.
pub async fn create_message(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    kwargs: &RenderKwargs,
    mode: RenderMode,
) -> anyhow::Result<Message> {
    let attachments = kwargs.attachments();
    let mut request = http
        .create_message(channel_id)
        .components(&kwargs.components)
        .attachments(&attachments);

    if let Some(allowed_mentions) = kwargs.allowed_mentions.as_ref() {
        request = request.allowed_mentions(Some(allowed_mentions));
    }
    if !kwargs.embeds.is_empty() {
        request = request.embeds(&kwargs.embeds);
    }
    if let Some(content) = kwargs.content.as_deref() {
        request = request.content(content);
    }
    if let Some(flags) = kwargs.message_flags(mode) {
        request = request.flags(flags);
    }

    Ok(request.await?.model().await?)
}

/// Answer an interaction with a rendered page and fetch the resulting message.
pub async fn respond_with_message(
    http: &Client,
    interaction: &InteractionCreate,
    kwargs: &RenderKwargs,
    mode: RenderMode,
) -> anyhow::Result<Message> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(response_data(kwargs, mode, false)),
    };
    create_response(http, interaction, &response).await?;

    let message = http
        .interaction(interaction.application_id)
        .response(&interaction.token)
        .await?
        .model()
        .await?;

    Ok(message)
}

/// Send a rendered page as a follow-up of an answered interaction.
pub async fn create_followup(
    http: &Client,
    interaction: &InteractionCreate,
    kwargs: &RenderKwargs,
    mode: RenderMode,
) -> anyhow::Result<Message> {
    let attachments = kwargs.attachments();
    let client = http.interaction(interaction.application_id);
    let mut request = client
        .create_followup(&interaction.token)
        .components(&kwargs.components)
        .attachments(&attachments);

    if let Some(allowed_mentions) = kwargs.allowed_mentions.as_ref() {
        request = request.allowed_mentions(Some(allowed_mentions));
    }
    if !kwargs.embeds.is_empty() {
        request = request.embeds(&kwargs.embeds);
    }
    if let Some(content) = kwargs.content.as_deref() {
        request = request.content(content);
    }
    if let Some(flags) = kwargs.message_flags(mode) {
        request = request.flags(flags);
    }

    Ok(request.await?.model().await?)
}

/// Respond to a component interaction with an in-place message update.
pub async fn respond_update_message(
    http: &Client,
    interaction: &InteractionCreate,
    kwargs: &RenderKwargs,
    mode: RenderMode,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(response_data(kwargs, mode, true)),
    };

    create_response(http, interaction, &response).await
}

/// Respond to a component interaction by replacing only the components.
pub async fn respond_update_components(
    http: &Client,
    interaction: &InteractionCreate,
    components: &[Component],
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .components(components.to_vec())
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Acknowledge a component interaction without changing the message.
pub async fn respond_deferred_update(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredUpdateMessage,
        data: None,
    };

    create_response(http, interaction, &response).await
}

/// Respond to a component interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Respond with an ephemeral message carrying only components.
pub async fn respond_ephemeral_components(
    http: &Client,
    interaction: &InteractionCreate,
    components: Vec<Component>,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .components(components)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Open the modal asking which page to jump to.
#[allow(deprecated)]
pub async fn respond_jump_modal(
    http: &Client,
    interaction: &InteractionCreate,
    session: u64,
    current_page: usize,
    max_pages: usize,
) -> anyhow::Result<()> {
    let page_input = Component::TextInput(TextInput {
        id: None,
        custom_id: PAGE_INPUT_ID.to_owned(),
        label: Some(format!("Enter a number between 1 and {max_pages}")),
        max_length: Some(max_pages.to_string().len() as u16),
        min_length: Some(1),
        placeholder: Some(format!("Current: {}", current_page + 1)),
        required: Some(true),
        style: TextInputStyle::Short,
        value: None,
    });

    let modal_components = vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![page_input],
    })];

    let response = InteractionResponse {
        kind: InteractionResponseType::Modal,
        data: Some(InteractionResponseData {
            components: Some(modal_components),
            custom_id: Some(build_modal_custom_id(session)),
            title: Some(JUMP_MODAL_TITLE.to_owned()),
            ..InteractionResponseData::default()
        }),
    };

    create_response(http, interaction, &response).await
}

/// Delete the message the interaction's original response points at.
pub async fn delete_original_response(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .delete_response(&interaction.token)
        .await?;

    Ok(())
}

/// Re-render an existing message outside of an interaction response.
pub async fn update_message(
    http: &Client,
    message: MessageRef,
    kwargs: &RenderKwargs,
    mode: RenderMode,
) -> anyhow::Result<()> {
    let attachments = kwargs.attachments();
    update_request(http, message, kwargs, mode, &attachments).await?;

    Ok(())
}

/// Edit request for a re-rendered page. Files of the previous page are dropped.
fn update_request<'a>(
    http: &'a Client,
    message: MessageRef,
    kwargs: &'a RenderKwargs,
    mode: RenderMode,
    attachments: &'a [Attachment],
) -> UpdateMessage<'a> {
    let mut request = http
        .update_message(message.channel_id, message.message_id)
        .components(Some(&kwargs.components))
        .keep_attachment_ids(&[])
        .attachments(attachments);

    if let Some(allowed_mentions) = kwargs.allowed_mentions.as_ref() {
        request = request.allowed_mentions(Some(allowed_mentions));
    }
    if mode == RenderMode::Classic {
        request = request
            .content(Some(kwargs.content.as_deref().unwrap_or_default()))
            .embeds(Some(&kwargs.embeds));
    }
    if let Some(flags) = kwargs.message_flags(mode) {
        request = request.flags(flags);
    }

    request
}

/// Replace only the components of an existing message.
pub async fn update_message_components(
    http: &Client,
    message: MessageRef,
    components: &[Component],
) -> anyhow::Result<()> {
    http.update_message(message.channel_id, message.message_id)
        .components(Some(components))
        .await?;

    Ok(())
}

pub async fn delete_message(http: &Client, message: MessageRef) -> anyhow::Result<()> {
    http.delete_message(message.channel_id, message.message_id)
        .await?;

    Ok(())
}
