use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_util::builder::embed::EmbedBuilder;

use crate::CommandMeta;
use rusty_core::Context;
use rusty_paginators::{
    ContentItem, Destination, GatePolicy, PaginatorBuilder, SelectPage,
    embed::DEFAULT_EMBED_COLOR, pagination::PaginatorOption,
};

pub const META: CommandMeta = CommandMeta {
    name: "select",
    desc: "Browse sample entries through a select menu.",
    category: "utility",
    usage: "!select",
};

fn entry(name: &str, body: &str) -> PaginatorOption {
    let embed = EmbedBuilder::new()
        .title(name)
        .description(body)
        .color(DEFAULT_EMBED_COLOR)
        .build();

    PaginatorOption::new(ContentItem::from(embed)).description(body)
}

fn sample_options() -> Vec<SelectPage> {
    vec![
        SelectPage::from(entry("Gateway", "Receives events over a websocket.")),
        SelectPage::from(entry("HTTP", "Sends requests to the REST API.")),
        SelectPage::Group(vec![
            SelectPage::from(entry("Buttons", "Clickable message components.")),
            SelectPage::from(entry("Selects", "Menus with up to 25 options.")),
            SelectPage::from(entry("Modals", "Popup forms with text inputs.")),
        ]),
    ]
}

/// Send a select paginator where each select groups related entries.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let paginator = PaginatorBuilder::new(sample_options(), GatePolicy::Deny)
        .author_id(msg.author.id)
        .always_allow_owner(true)
        .add_in_order(true)
        .timeout(Some(ctx.paginator_timeout))
        .build()?;

    ctx.paginators
        .start(ctx.http.clone(), paginator, Destination::Channel(msg.channel_id))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_become_their_own_select() {
        let paginator = PaginatorBuilder::new(sample_options(), GatePolicy::Allow)
            .add_in_order(true)
            .build()
            .unwrap();

        assert_eq!(paginator.navigation().max_pages(), 2);
    }
}
