use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use rusty_core::Context;
use rusty_paginators::{
    ContentItem, Destination, GatePolicy, PaginatorBuilder, embed::build_titled_embed,
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

/// Page through the command catalog, one embed per category.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, category: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;

    let categories = categories(category);
    if categories.is_empty() {
        let out = match category {
            Some(wanted) => format!("Unknown category: `{wanted}`"),
            None => "No commands are registered.".to_owned(),
        };
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let pages = categories
        .into_iter()
        .map(|category| {
            let description = category_description(category);
            build_titled_embed(&format!("Commands: {category}"), description).map(ContentItem::from)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let paginator = PaginatorBuilder::new(pages, GatePolicy::Deny)
        .author_id(msg.author.id)
        .always_allow_owner(true)
        .timeout(Some(ctx.paginator_timeout))
        .build()?;

    ctx.paginators
        .start(ctx.http.clone(), paginator, Destination::Channel(msg.channel_id))
        .await?;

    Ok(())
}

fn categories(wanted: Option<&str>) -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = COMMANDS
        .iter()
        .map(|command| command.category)
        .filter(|category| wanted.is_none_or(|wanted| wanted.eq_ignore_ascii_case(category)))
        .collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn category_description(category: &str) -> String {
    let mut commands: Vec<&CommandMeta> = COMMANDS
        .iter()
        .filter(|command| command.category == category)
        .collect();
    commands.sort_unstable_by_key(|command| command.name);

    commands
        .iter()
        .map(|command| format!("`{}` {}", command.usage, command.desc))
        .collect::<Vec<_>>()
        .join("\n")
}
