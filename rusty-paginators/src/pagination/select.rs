//! Select menu pages: option chunking, labels and the menu component.

use twilight_model::channel::message::{
    EmojiReactionType,
    component::{Button, ButtonStyle, Component, SelectMenu, SelectMenuOption, SelectMenuType},
};

use crate::error::PaginatorError;

use super::components::into_rows;
use super::content::ContentItem;
use super::page::Navigation;
use super::token::{PaginatorAction, build_custom_id};

/// Discord's limit of options in one select menu.
pub const MAX_SELECT_OPTIONS: usize = 25;

const MAX_LABEL_CHARS: usize = 100;
const UNTITLED: &str = "Untitled";

/// One selectable page.
#[derive(Debug, Clone)]
pub struct PaginatorOption {
    pub content: ContentItem,
    pub label: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<EmojiReactionType>,
}

impl PaginatorOption {
    pub fn new(content: impl Into<ContentItem>) -> Self {
        Self {
            content: content.into(),
            label: None,
            value: None,
            description: None,
            emoji: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn emoji(mut self, emoji: EmojiReactionType) -> Self {
        self.emoji = Some(emoji);
        self
    }
}

/// Input for a select paginator: a loose option or a group forming one whole select.
#[derive(Debug, Clone)]
pub enum SelectPage {
    Option(PaginatorOption),
    Group(Vec<SelectPage>),
}

impl From<PaginatorOption> for SelectPage {
    fn from(value: PaginatorOption) -> Self {
        Self::Option(value)
    }
}

impl From<ContentItem> for SelectPage {
    fn from(value: ContentItem) -> Self {
        Self::Option(PaginatorOption::new(value))
    }
}

impl From<&str> for SelectPage {
    fn from(value: &str) -> Self {
        Self::Option(PaginatorOption::new(value))
    }
}

impl From<Vec<SelectPage>> for SelectPage {
    fn from(value: Vec<SelectPage>) -> Self {
        Self::Group(value)
    }
}

/// A finished option with its label and value resolved.
#[derive(Debug, Clone)]
pub struct ResolvedOption {
    pub content: ContentItem,
    pub label: String,
    pub value: String,
    pub description: Option<String>,
    pub emoji: Option<EmojiReactionType>,
}

/// Split pages into selects of at most `per_select` options.
///
/// Groups always form their own select. With `add_in_order` the loose options
/// collected so far are flushed before a group, otherwise they keep filling the
/// pending select around it.
pub fn build_selects(
    pages: Vec<SelectPage>,
    per_select: usize,
    add_in_order: bool,
) -> Result<Vec<Vec<ResolvedOption>>, PaginatorError> {
    if pages.is_empty() {
        return Err(PaginatorError::NoPages);
    }
    if per_select == 0 {
        return Err(PaginatorError::InvalidPerPage);
    }
    let per_select = per_select.min(MAX_SELECT_OPTIONS);

    let mut selects: Vec<Vec<PaginatorOption>> = Vec::new();
    let mut chunk = Vec::new();
    for page in pages {
        match page {
            SelectPage::Option(option) => {
                chunk.push(option);
                if chunk.len() >= per_select {
                    selects.push(std::mem::take(&mut chunk));
                }
            }
            SelectPage::Group(group) => {
                if add_in_order && !chunk.is_empty() {
                    selects.push(std::mem::take(&mut chunk));
                }
                if group.len() > per_select {
                    return Err(PaginatorError::TooManySelectOptions {
                        max: per_select,
                        got: group.len(),
                    });
                }
                let options = group
                    .into_iter()
                    .map(|entry| match entry {
                        SelectPage::Option(option) => Ok(option),
                        SelectPage::Group(_) => Err(PaginatorError::NestedSelectOption),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                selects.push(options);
            }
        }
    }
    if !chunk.is_empty() {
        selects.push(chunk);
    }

    Ok(selects
        .into_iter()
        .enumerate()
        .map(|(select_index, options)| resolve_options(select_index, options))
        .collect())
}

fn resolve_options(select_index: usize, options: Vec<PaginatorOption>) -> Vec<ResolvedOption> {
    let mut seen = Vec::with_capacity(options.len());
    options
        .into_iter()
        .enumerate()
        .map(|(option_index, option)| {
            let label = option
                .label
                .clone()
                .unwrap_or_else(|| derive_label(&option.content));
            let label = truncate(&label);

            let value = option
                .value
                .clone()
                .filter(|value| *value != label && !seen.contains(value))
                .unwrap_or_else(|| fallback_value(select_index, option_index, &seen));
            seen.push(value.clone());

            ResolvedOption {
                content: option.content,
                label,
                value,
                description: option.description,
                emoji: option.emoji,
            }
        })
        .collect()
}

/// `{select}-{option}`, suffixed until it collides with no earlier value.
fn fallback_value(select_index: usize, option_index: usize, seen: &[String]) -> String {
    let base = format!("{select_index}-{option_index}");
    let mut value = base.clone();
    let mut suffix = 1;
    while seen.contains(&value) {
        value = format!("{base}-{suffix}");
        suffix += 1;
    }

    value
}

/// Label derived from page content: embed fields, file name or first text line.
pub fn derive_label(content: &ContentItem) -> String {
    label_of(content)
        .filter(|label| !label.trim().is_empty())
        .map(|label| label.lines().next().unwrap_or_default().to_owned())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| UNTITLED.to_owned())
}

fn label_of(content: &ContentItem) -> Option<String> {
    match content {
        ContentItem::Text(text) => Some(text.clone()),
        ContentItem::Embed(embed) => embed
            .title
            .clone()
            .or_else(|| embed.description.clone())
            .or_else(|| embed.author.as_ref().map(|author| author.name.clone()))
            .or_else(|| embed.footer.as_ref().map(|footer| footer.text.clone())),
        ContentItem::File(file) => Some(file.filename.clone()),
        ContentItem::Attachment(attachment) => Some(attachment.filename.clone()),
        ContentItem::Nested(items) => items.iter().find_map(label_of),
        ContentItem::Overrides(overrides) => overrides.content.clone(),
        ContentItem::Component(_) => None,
    }
}

fn truncate(label: &str) -> String {
    label.chars().take(MAX_LABEL_CHARS).collect()
}

/// The select menu listing `options`, with `selected` marked as default.
pub fn select_menu(
    session: u64,
    options: &[ResolvedOption],
    selected: usize,
    page_string: &str,
    disabled: bool,
) -> Component {
    let options = options
        .iter()
        .enumerate()
        .map(|(index, option)| SelectMenuOption {
            default: index == selected,
            description: option.description.clone(),
            emoji: option.emoji.clone(),
            label: option.label.clone(),
            value: option.value.clone(),
        })
        .collect();

    menu(session, options, page_string, disabled)
}

/// Hybrid mode: a select over the block of pages around the current one.
pub fn page_select_menu(session: u64, nav: &Navigation, disabled: bool) -> Component {
    let block_start = nav.current() / MAX_SELECT_OPTIONS * MAX_SELECT_OPTIONS;
    let block_end = (block_start + MAX_SELECT_OPTIONS).min(nav.max_pages());
    let options = (block_start..block_end)
        .map(|page| SelectMenuOption {
            default: page == nav.current(),
            description: None,
            emoji: None,
            label: format!("Page {}", page + 1),
            value: page.to_string(),
        })
        .collect();

    menu(session, options, &nav.page_string(), disabled)
}

fn menu(session: u64, options: Vec<SelectMenuOption>, page_string: &str, disabled: bool) -> Component {
    Component::SelectMenu(SelectMenu {
        channel_types: None,
        custom_id: build_custom_id(session, &PaginatorAction::Select),
        default_values: None,
        disabled,
        id: None,
        kind: SelectMenuType::Text,
        max_values: Some(1),
        min_values: Some(1),
        options: Some(options),
        placeholder: Some(format!("Select a page | {page_string}")),
        required: None,
    })
}

/// Previous/next buttons moving between selects.
pub fn select_nav_buttons(session: u64, nav: &Navigation, disabled: bool) -> Vec<Component> {
    let button = |action: PaginatorAction, label: &str, blocked: bool| {
        Component::Button(Button {
            id: None,
            custom_id: Some(build_custom_id(session, &action)),
            disabled: disabled || blocked,
            emoji: None,
            label: Some(label.to_owned()),
            style: ButtonStyle::Primary,
            url: None,
            sku_id: None,
        })
    };

    into_rows(vec![
        button(
            PaginatorAction::Previous,
            "Previous",
            !nav.loop_pages() && nav.is_first(),
        ),
        button(PaginatorAction::Next, "Next", !nav.loop_pages() && nav.is_last()),
    ])
}

#[cfg(test)]
mod tests {
    use twilight_util::builder::embed::{EmbedAuthorBuilder, EmbedBuilder};

    use super::*;
    use crate::pagination::content::PageFile;

    fn loose(count: usize) -> Vec<SelectPage> {
        (0..count)
            .map(|index| SelectPage::from(format!("Page {index}").as_str()))
            .collect()
    }

    #[test]
    fn loose_options_are_chunked() {
        let selects = build_selects(loose(7), 3, false).unwrap();
        let sizes: Vec<_> = selects.iter().map(Vec::len).collect();
        assert_eq!(sizes, [3, 3, 1]);
    }

    #[test]
    fn groups_form_whole_selects() {
        let mut pages = loose(2);
        pages.push(SelectPage::Group(loose(3)));
        pages.push("tail".into());

        let interleaved = build_selects(pages.clone(), 25, false).unwrap();
        let sizes: Vec<_> = interleaved.iter().map(Vec::len).collect();
        assert_eq!(sizes, [3, 3]);
        assert_eq!(interleaved[1][2].label, "tail");

        let ordered = build_selects(pages, 25, true).unwrap();
        let sizes: Vec<_> = ordered.iter().map(Vec::len).collect();
        assert_eq!(sizes, [2, 3, 1]);
    }

    #[test]
    fn rejects_deep_nesting_and_oversized_groups() {
        let nested = vec![SelectPage::Group(vec![SelectPage::Group(loose(1))])];
        assert_eq!(
            build_selects(nested, 25, false).unwrap_err(),
            PaginatorError::NestedSelectOption
        );

        let oversized = vec![SelectPage::Group(loose(4))];
        assert_eq!(
            build_selects(oversized, 3, false).unwrap_err(),
            PaginatorError::TooManySelectOptions { max: 3, got: 4 }
        );
    }

    #[test]
    fn labels_come_from_content() {
        let author_only = EmbedBuilder::new()
            .author(EmbedAuthorBuilder::new("Ferris").build())
            .build();

        assert_eq!(derive_label(&ContentItem::from(author_only)), "Ferris");
        assert_eq!(
            derive_label(&ContentItem::from(PageFile::new("chart.png", vec![0]))),
            "chart.png"
        );
        assert_eq!(derive_label(&ContentItem::text("first\nsecond")), "first");
        assert_eq!(derive_label(&ContentItem::Nested(Vec::new())), "Untitled");
        assert_eq!(derive_label(&ContentItem::text("x".repeat(150))).len(), 150);

        let selects = build_selects(vec![ContentItem::text("y".repeat(150)).into()], 25, false).unwrap();
        assert_eq!(selects[0][0].label.chars().count(), 100);
    }

    #[test]
    fn values_are_unique() {
        let pages = vec![
            PaginatorOption::new("a").label("A").value("same").into(),
            PaginatorOption::new("b").label("B").value("same").into(),
            PaginatorOption::new("c").label("C").value("C").into(),
        ];
        let selects = build_selects(pages, 25, false).unwrap();
        let values: Vec<_> = selects[0].iter().map(|option| option.value.as_str()).collect();

        assert_eq!(values, ["same", "0-1", "0-2"]);
    }

    #[test]
    fn fallback_values_avoid_user_values() {
        let pages = vec![
            PaginatorOption::new("a").label("A").value("0-1").into(),
            PaginatorOption::new("b").label("B").into(),
            PaginatorOption::new("c").label("C").value("0-1-1").into(),
        ];
        let selects = build_selects(pages, 25, false).unwrap();
        let values: Vec<_> = selects[0].iter().map(|option| option.value.as_str()).collect();

        assert_eq!(values, ["0-1", "0-1-1", "0-2"]);
    }

    #[test]
    fn select_menu_marks_the_chosen_option() {
        let selects = build_selects(loose(3), 25, false).unwrap();
        let Component::SelectMenu(menu) = select_menu(4, &selects[0], 1, "Page 1 of 1", false) else {
            panic!("expected a select menu");
        };

        assert_eq!(menu.custom_id, "pgn:4:select");
        assert_eq!(menu.placeholder.as_deref(), Some("Select a page | Page 1 of 1"));
        let defaults: Vec<_> = menu.options.unwrap().iter().map(|option| option.default).collect();
        assert_eq!(defaults, [false, true, false]);
    }

    #[test]
    fn page_select_lists_the_current_block() {
        let mut nav = Navigation::new(30, 1, false).unwrap();
        nav.goto(27);
        let Component::SelectMenu(menu) = page_select_menu(1, &nav, false) else {
            panic!("expected a select menu");
        };

        let options = menu.options.unwrap();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0].label, "Page 26");
        assert!(options[2].default);
    }
}
