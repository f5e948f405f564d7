use twilight_model::{
    channel::message::{
        Component,
        component::{ButtonStyle, TextDisplay},
    },
    gateway::payload::incoming::MessageCreate,
};

use crate::CommandMeta;
use rusty_core::Context;
use rusty_paginators::{
    AfterAction, ContentItem, Destination, GatePolicy, PaginatorBuilder,
    embed::build_titled_embed,
    pagination::{ButtonSet, CustomButtonAction, PageInfo, PaginatorButton, PaginatorHooks},
};

pub const META: CommandMeta = CommandMeta {
    name: "pages",
    desc: "Page through generated sample items.",
    category: "utility",
    usage: "!pages [count] [loop] [v2]",
};

pub const HYBRID_META: CommandMeta = CommandMeta {
    name: "hybrid",
    desc: "Page through sample items with a page select above the buttons.",
    category: "utility",
    usage: "!hybrid [count] [loop] [v2]",
};

const DEFAULT_PAGE_COUNT: usize = 12;
const MAX_PAGE_COUNT: usize = 200;
const HOME_BUTTON_ID: &str = "home";

#[derive(Debug, Default, PartialEq, Eq)]
struct PagesArgs {
    count: usize,
    hybrid: bool,
    loop_pages: bool,
    components_v2: bool,
}

fn parse_args(args: &[&str]) -> Option<PagesArgs> {
    let mut parsed = PagesArgs {
        count: DEFAULT_PAGE_COUNT,
        ..PagesArgs::default()
    };

    for arg in args {
        match arg.to_ascii_lowercase().as_str() {
            "hybrid" => parsed.hybrid = true,
            "loop" => parsed.loop_pages = true,
            "v2" => parsed.components_v2 = true,
            raw => {
                parsed.count = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|count| (1..=MAX_PAGE_COUNT).contains(count))?;
            }
        }
    }

    Some(parsed)
}

/// Sends the user back to the first page.
struct HomeButton;

impl PaginatorHooks for HomeButton {
    fn on_custom_button(&self, custom_id: &str, _info: &PageInfo) -> CustomButtonAction {
        match custom_id {
            HOME_BUTTON_ID => CustomButtonAction::Goto(0),
            _ => CustomButtonAction::Acknowledge,
        }
    }
}

fn sample_pages(count: usize, components_v2: bool) -> anyhow::Result<Vec<ContentItem>> {
    (1..=count)
        .map(|index| {
            if components_v2 {
                return Ok(ContentItem::from(Component::TextDisplay(TextDisplay {
                    id: None,
                    content: format!("### Sample item #{index}\nRendered as a text display."),
                })));
            }

            build_titled_embed(
                &format!("Sample item #{index}"),
                format!("This is sample pagination item number {index}."),
            )
            .map(ContentItem::from)
        })
        .collect()
}

/// Send a button paginator over generated pages, with a page select when `hybrid`.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, args: &[&str], hybrid: bool) -> anyhow::Result<()> {
    let Some(mut args) = parse_args(args) else {
        let meta = if hybrid { &HYBRID_META } else { &META };
        let usage = format!("Usage: `{}` (count between 1 and {MAX_PAGE_COUNT})", meta.usage);
        ctx.http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    args.hybrid |= hybrid;

    let mut buttons = ButtonSet::default();
    buttons.add_custom_button(
        PaginatorButton::new("Home")
            .custom_id(HOME_BUTTON_ID)
            .style(ButtonStyle::Secondary)
            .position(6),
    );

    let paginator = PaginatorBuilder::new(sample_pages(args.count, args.components_v2)?, GatePolicy::Deny)
        .author_id(msg.author.id)
        .always_allow_owner(true)
        .loop_pages(args.loop_pages)
        .hybrid(args.hybrid)
        .components_v2(args.components_v2)
        .buttons(buttons)
        .hooks(HomeButton)
        .after_stop(AfterAction::DeleteMessage)
        .after_timeout(AfterAction::DisableItems)
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
    fn parses_flags_in_any_order() {
        assert_eq!(
            parse_args(&["v2", "30", "loop"]),
            Some(PagesArgs {
                count: 30,
                hybrid: false,
                loop_pages: true,
                components_v2: true,
            })
        );
        assert_eq!(parse_args(&[]).map(|args| args.count), Some(DEFAULT_PAGE_COUNT));
        assert_eq!(parse_args(&["0"]), None);
        assert_eq!(parse_args(&["lots"]), None);
    }

    #[test]
    fn home_button_returns_to_the_first_page() {
        let info = PageInfo {
            session: 1,
            current_page: 4,
            max_pages: 12,
            per_page: 1,
            total_items: 12,
        };

        assert_eq!(HomeButton.on_custom_button(HOME_BUTTON_ID, &info), CustomButtonAction::Goto(0));
        assert_eq!(HomeButton.on_custom_button("other", &info), CustomButtonAction::Acknowledge);
    }

    #[test]
    fn v2_pages_build_a_v2_paginator() {
        let pages = sample_pages(3, true).unwrap();
        let paginator = PaginatorBuilder::new(pages, GatePolicy::Allow).build().unwrap();

        assert_eq!(
            paginator.settings().render_mode,
            rusty_paginators::pagination::RenderMode::ComponentsV2
        );
    }
}
