//! Content normalization into the render bag handed to send/edit calls.

use tracing::debug;
use twilight_model::{
    channel::message::{
        AllowedMentions, MessageFlags,
        component::{Component, TextDisplay},
        embed::Embed,
    },
    http::attachment::Attachment,
};

use crate::embed::{apply_page_footer, decoration_embed};
use crate::error::PaginatorError;

use super::content::{ContentItem, MessageOverrides, PageFile};

/// Which message layout system a paginator renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Content, embeds and action rows.
    #[default]
    Classic,
    /// Layout components only; text becomes text displays.
    ComponentsV2,
}

/// Accumulated render parameters for one page.
///
/// Built fresh for every render and consumed by exactly one send or edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderKwargs {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub files: Vec<PageFile>,
    pub components: Vec<Component>,
    pub allowed_mentions: Option<AllowedMentions>,
    pub flags: Option<MessageFlags>,
}

/// Normalize a page into a fresh render bag.
pub fn normalize(page: &[ContentItem], mode: RenderMode) -> Result<RenderKwargs, PaginatorError> {
    let mut kwargs = RenderKwargs::default();
    for item in page {
        kwargs.push(item, mode)?;
    }

    Ok(kwargs)
}

impl RenderKwargs {
    /// Fold one content item into the bag, recursing into nested items.
    pub fn push(&mut self, item: &ContentItem, mode: RenderMode) -> Result<(), PaginatorError> {
        match item {
            ContentItem::Text(text) => match mode {
                RenderMode::Classic => match self.content.as_mut() {
                    Some(content) => content.push_str(text),
                    None => self.content = Some(text.clone()),
                },
                RenderMode::ComponentsV2 => self.components.push(text_display(text)),
            },
            ContentItem::Embed(embed) => {
                if mode == RenderMode::ComponentsV2 {
                    return Err(PaginatorError::IncompatibleV2Content("embeds"));
                }
                self.embeds.push(embed.clone());
            }
            ContentItem::File(file) => self.files.push(file.clone()),
            ContentItem::Attachment(attachment) => match attachment.cached_file() {
                Some(file) => self.files.push(file),
                None => debug!(url = %attachment.url, "skipping attachment that was never downloaded"),
            },
            ContentItem::Overrides(overrides) => self.merge(overrides, mode)?,
            ContentItem::Component(component) => {
                if mode == RenderMode::ComponentsV2
                    && matches!(component, Component::Button(_) | Component::SelectMenu(_))
                {
                    return Err(PaginatorError::IncompatibleV2Content(
                        "buttons or select menus outside an action row",
                    ));
                }
                self.components.push(component.clone());
            }
            ContentItem::Nested(items) => {
                for nested in items {
                    self.push(nested, mode)?;
                }
            }
        }

        Ok(())
    }

    fn merge(&mut self, overrides: &MessageOverrides, mode: RenderMode) -> Result<(), PaginatorError> {
        if mode == RenderMode::ComponentsV2 {
            if overrides.content.is_some() {
                return Err(PaginatorError::IncompatibleV2Content("content overrides"));
            }
            if overrides.embeds.is_some() {
                return Err(PaginatorError::IncompatibleV2Content("embeds"));
            }
        }

        if let Some(content) = &overrides.content {
            self.content = Some(content.clone());
        }
        if let Some(embeds) = &overrides.embeds {
            self.embeds = embeds.clone();
        }
        if let Some(files) = &overrides.files {
            self.files = files.clone();
        }
        if let Some(allowed_mentions) = &overrides.allowed_mentions {
            self.allowed_mentions = Some(allowed_mentions.clone());
        }
        if let Some(flags) = overrides.flags {
            self.flags = Some(flags);
        }

        Ok(())
    }

    /// Add a paginator-wide title and description to the rendered page.
    pub fn decorate(&mut self, title: Option<&str>, description: Option<&str>, mode: RenderMode) {
        if title.is_none() && description.is_none() {
            return;
        }

        if mode == RenderMode::ComponentsV2 {
            let header = [title, description]
                .into_iter()
                .flatten()
                .map(text_display)
                .collect::<Vec<_>>();
            let body = std::mem::take(&mut self.components);
            self.components = header;
            self.components.extend(body);
            return;
        }

        if let Some(content) = self.content.as_mut().filter(|content| !content.is_empty()) {
            if let Some(title) = title {
                *content = format!("**{title}**\n{content}");
            }
            if let Some(description) = description {
                *content = format!("{description}\n{content}");
            }
        } else if let Some(embed) = self.embeds.first_mut() {
            if let Some(title) = title {
                embed.title = Some(title.to_owned());
            }
            if let Some(description) = description {
                embed.description = Some(description.to_owned());
            }
        } else {
            self.embeds.push(decoration_embed(title, description));
        }
    }

    /// Add the `Page X of Y` marker.
    ///
    /// Goes to the first embed's footer, else after the text, else becomes the text.
    pub fn apply_page_marker(&mut self, page_string: &str, mode: RenderMode) {
        if mode == RenderMode::ComponentsV2 {
            self.components.push(text_display(page_string));
            return;
        }

        if let Some(embed) = self.embeds.first_mut() {
            apply_page_footer(embed, page_string);
        } else if let Some(content) = self.content.as_mut().filter(|content| !content.is_empty()) {
            content.push('\n');
            content.push_str(page_string);
        } else {
            self.content = Some(page_string.to_owned());
        }
    }

    /// Fresh uploads for every file in the bag.
    pub fn attachments(&self) -> Vec<Attachment> {
        self.files
            .iter()
            .enumerate()
            .map(|(id, file)| file.to_attachment(id as u64))
            .collect()
    }

    /// Message flags for the final send/edit call.
    pub fn message_flags(&self, mode: RenderMode) -> Option<MessageFlags> {
        match mode {
            RenderMode::Classic => self.flags,
            RenderMode::ComponentsV2 => {
                Some(self.flags.unwrap_or_else(MessageFlags::empty) | MessageFlags::IS_COMPONENTS_V2)
            }
        }
    }
}

pub(crate) fn text_display(content: &str) -> Component {
    Component::TextDisplay(TextDisplay {
        id: None,
        content: content.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

    use super::*;

    fn embed(title: &str) -> Embed {
        EmbedBuilder::new().title(title).build()
    }

    #[test]
    fn nested_pages_flatten() {
        let flat = [
            ContentItem::text("a"),
            ContentItem::from(embed("b")),
            ContentItem::text("c"),
        ];
        let nested = [
            ContentItem::text("a"),
            ContentItem::nested([
                ContentItem::from(embed("b")),
                ContentItem::nested([ContentItem::text("c")]),
            ]),
        ];

        assert_eq!(
            normalize(&flat, RenderMode::Classic).unwrap(),
            normalize(&nested, RenderMode::Classic).unwrap()
        );
    }

    #[test]
    fn text_accumulates() {
        let kwargs = normalize(
            &[ContentItem::text("one"), ContentItem::text("two")],
            RenderMode::Classic,
        ).unwrap();
        assert_eq!(kwargs.content.as_deref(), Some("onetwo"));
    }

    #[test]
    fn overrides_merge_shallowly() {
        let overrides = MessageOverrides {
            content: Some("replaced".to_owned()),
            flags: Some(MessageFlags::SUPPRESS_EMBEDS),
            ..MessageOverrides::default()
        };
        let page = [
            ContentItem::text("original"),
            ContentItem::from(embed("kept")),
            ContentItem::from(overrides),
        ];

        let kwargs = normalize(&page, RenderMode::Classic).unwrap();

        assert_eq!(kwargs.content.as_deref(), Some("replaced"));
        assert_eq!(kwargs.embeds.len(), 1);
        assert_eq!(kwargs.flags, Some(MessageFlags::SUPPRESS_EMBEDS));
    }

    #[test]
    fn files_materialize_the_same_upload_every_time() {
        let page = [ContentItem::from(PageFile::new("notes.txt", b"hello".to_vec()))];
        let kwargs = normalize(&page, RenderMode::Classic).unwrap();

        let first = kwargs.attachments();
        let second = kwargs.attachments();
        let rerendered = normalize(&page, RenderMode::Classic).unwrap().attachments();

        assert_eq!(first[0].file, b"hello");
        assert_eq!(first[0].file, second[0].file);
        assert_eq!(first[0].file, rerendered[0].file);
        assert_eq!(first[0].filename, rerendered[0].filename);
    }

    #[test]
    fn components_v2_rejects_embeds() {
        let err = normalize(&[ContentItem::from(embed("nope"))], RenderMode::ComponentsV2).unwrap_err();
        assert_eq!(err, PaginatorError::IncompatibleV2Content("embeds"));
    }

    #[test]
    fn components_v2_turns_text_into_text_displays() {
        let kwargs = normalize(&[ContentItem::text("hello")], RenderMode::ComponentsV2).unwrap();

        assert!(kwargs.content.is_none());
        assert!(matches!(
            kwargs.components.as_slice(),
            [Component::TextDisplay(display)] if display.content == "hello"
        ));
        assert!(
            kwargs
                .message_flags(RenderMode::ComponentsV2)
                .unwrap()
                .contains(MessageFlags::IS_COMPONENTS_V2)
        );
    }

    #[test]
    fn page_marker_prefers_the_first_embed() {
        let mut kwargs = normalize(
            &[
                ContentItem::text("text"),
                ContentItem::from(embed("one")),
                ContentItem::from(embed("two")),
            ],
            RenderMode::Classic,
        )
        .unwrap();
        kwargs.apply_page_marker("Page 1 of 2", RenderMode::Classic);

        assert_eq!(kwargs.content.as_deref(), Some("text"));
        assert_eq!(kwargs.embeds[0].footer.as_ref().unwrap().text, "Page 1 of 2");
        assert!(kwargs.embeds[1].footer.is_none());
    }

    #[test]
    fn page_marker_falls_back_to_text() {
        let mut with_text = normalize(&[ContentItem::text("body")], RenderMode::Classic).unwrap();
        with_text.apply_page_marker("Page 2 of 2", RenderMode::Classic);
        assert_eq!(with_text.content.as_deref(), Some("body\nPage 2 of 2"));

        let mut empty = normalize(&[ContentItem::from(PageFile::new("a", vec![1]))], RenderMode::Classic).unwrap();
        empty.apply_page_marker("Page 1 of 1", RenderMode::Classic);
        assert_eq!(empty.content.as_deref(), Some("Page 1 of 1"));
    }

    #[test]
    fn page_marker_keeps_existing_footer_text() {
        let footed = EmbedBuilder::new()
            .title("t")
            .footer(EmbedFooterBuilder::new("source").build())
            .build();
        let mut kwargs = normalize(&[ContentItem::from(footed)], RenderMode::Classic).unwrap();
        kwargs.apply_page_marker("Page 3 of 4", RenderMode::Classic);

        assert_eq!(kwargs.embeds[0].footer.as_ref().unwrap().text, "source | Page 3 of 4");
    }

    #[test]
    fn decoration_prefixes_text() {
        let mut kwargs = normalize(&[ContentItem::text("body")], RenderMode::Classic).unwrap();
        kwargs.decorate(Some("Title"), Some("About"), RenderMode::Classic);

        assert_eq!(kwargs.content.as_deref(), Some("About\n**Title**\nbody"));
    }

    #[test]
    fn decoration_adds_an_embed_when_page_has_none() {
        let mut kwargs = normalize(&[ContentItem::from(PageFile::new("a", vec![1]))], RenderMode::Classic).unwrap();
        kwargs.decorate(Some("Title"), None, RenderMode::Classic);

        assert_eq!(kwargs.embeds.len(), 1);
        assert_eq!(kwargs.embeds[0].title.as_deref(), Some("Title"));
    }
}
