use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::{
    gateway::event::Event,
    id::{Id, marker::UserMarker},
};

use rustls::crypto::ring::default_provider;

use rusty_commands::{handle_interaction, handle_message};
use rusty_core::Context;
use rusty_paginators::{OwnerCache, pagination::DEFAULT_TIMEOUT_SECS};

/// Comma separated user ids in `BOT_OWNER_IDS`; invalid entries are skipped.
fn configured_owner_ids(raw: &str) -> Vec<Id<UserMarker>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>().ok().and_then(Id::new_checked) {
            Some(id) => Some(id),
            None => {
                warn!(entry, "ignoring invalid BOT_OWNER_IDS entry");
                None
            }
        })
        .collect()
}

fn paginator_timeout(raw: Option<&str>) -> Duration {
    let secs = raw.and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!(raw, "ignoring invalid PAGINATOR_TIMEOUT_SECS");
            None
        }
    });

    Duration::from_secs(secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let owner_ids = env::var("BOT_OWNER_IDS")
        .map(|raw| configured_owner_ids(&raw))
        .unwrap_or_default();

    let http = Arc::new(Client::new(token.clone()));
    let owners = OwnerCache::new(Arc::clone(&http), owner_ids);
    let timeout = paginator_timeout(env::var("PAGINATOR_TIMEOUT_SECS").ok().as_deref());
    let ctx = Context::new(Arc::clone(&http), owners, timeout);
    info!(timeout_secs = timeout.as_secs(), "paginator timeout configured");

    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Rusty is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Rusty has successfully awoken!");
            }
            Event::MessageCreate(msg) => {
                if let Err(source) = handle_message(ctx.clone(), msg).await {
                    error!(?source, "message handler failed");
                }
            }
            Event::InteractionCreate(interaction) => {
                if let Err(source) = handle_interaction(ctx.clone(), interaction).await {
                    error!(?source, "interaction handler failed");
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_ids_skip_invalid_entries() {
        let ids = configured_owner_ids("1, 22,, nope ,0");
        assert_eq!(ids, [Id::new(1), Id::new(22)]);
    }

    #[test]
    fn timeout_falls_back_to_default() {
        assert_eq!(paginator_timeout(Some("45")), Duration::from_secs(45));
        assert_eq!(paginator_timeout(Some("0")), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(paginator_timeout(None), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
