pub mod utility;

use tracing::debug;
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use rusty_core::Context;
use rusty_paginators::pagination::token::{MODAL_TOKEN_PREFIX, TOKEN_PREFIX};

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::pages::META,
    utility::pages::HYBRID_META,
    utility::select::META,
    // Add new commands here
];

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some(content) = msg.content.trim().strip_prefix(COMMAND_PREFIX) else {
        return Ok(());
    };

    let mut command_and_rest = content.trim().splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let args: Vec<String> = command_and_rest
        .next()
        .map(|rest| rest.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match cmd.as_str() {
        "help" => utility::help::run(ctx.clone(), msg, args.first().copied()).await?,
        "pages" => utility::pages::run(ctx.clone(), msg, &args, false).await?,
        "hybrid" => utility::pages::run(ctx.clone(), msg, &args, true).await?,
        "select" => utility::select::run(ctx.clone(), msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

fn is_paginator_custom_id(custom_id: &str) -> bool {
    custom_id.starts_with(TOKEN_PREFIX) || custom_id.starts_with(MODAL_TOKEN_PREFIX)
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let custom_id = match interaction.data.as_ref() {
        Some(InteractionData::MessageComponent(data)) => data.custom_id.as_str(),
        Some(InteractionData::ModalSubmit(data)) => data.custom_id.as_str(),
        _ => return Ok(()),
    };

    if !is_paginator_custom_id(custom_id) {
        return Ok(());
    }

    let handled = ctx
        .paginators
        .handle_interaction(ctx.http.clone(), ctx.owners.as_ref(), &interaction)
        .await?;
    debug!(handled, "paginator interaction routed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_only_paginator_ids() {
        assert!(is_paginator_custom_id("pgn:12:next"));
        assert!(is_paginator_custom_id("pgnm:12"));
        assert!(!is_paginator_custom_id("terminate:1:confirm"));
    }

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<_> = COMMANDS.iter().map(|command| command.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }
}
