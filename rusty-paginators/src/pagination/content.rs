//! Content items a paginator page can be built from.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;
use twilight_model::{
    channel::{
        Attachment as ChannelAttachment,
        message::{AllowedMentions, MessageFlags, component::Component, embed::Embed},
    },
    http::attachment::Attachment,
};

/// One atomic piece of page content.
#[derive(Debug, Clone)]
pub enum ContentItem {
    /// Message text, concatenated with other text on the same page.
    Text(String),
    /// A message embed.
    Embed(Embed),
    /// An in-memory file uploaded with the page.
    File(PageFile),
    /// A file already hosted by Discord, downloaded on first render.
    Attachment(RemoteAttachment),
    /// Render parameters merged over whatever the page produced so far.
    Overrides(MessageOverrides),
    /// A raw component, e.g. a components-v2 container or text display.
    Component(Component),
    /// A group of items flattened into the same page.
    Nested(Vec<ContentItem>),
}

impl ContentItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn nested(items: impl IntoIterator<Item = ContentItem>) -> Self {
        Self::Nested(items.into_iter().collect())
    }

    /// First embed found when walking the item depth-first.
    pub(crate) fn first_embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(embed) => Some(embed),
            Self::Nested(items) => items.iter().find_map(Self::first_embed),
            _ => None,
        }
    }

    pub(crate) fn contains_embed(&self) -> bool {
        self.first_embed().is_some()
    }

    pub(crate) fn contains_v2_component(&self) -> bool {
        match self {
            Self::Component(component) => is_v2_component(component),
            Self::Nested(items) => items.iter().any(Self::contains_v2_component),
            _ => false,
        }
    }

    /// Download every remote attachment in this item that is not cached yet.
    pub async fn prefetch(&self, client: &reqwest::Client) -> anyhow::Result<()> {
        match self {
            Self::Attachment(attachment) => {
                attachment.bytes(client).await?;
            }
            Self::Nested(items) => {
                for item in items {
                    Box::pin(item.prefetch(client)).await?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl From<&str> for ContentItem {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ContentItem {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Embed> for ContentItem {
    fn from(value: Embed) -> Self {
        Self::Embed(value)
    }
}

impl From<PageFile> for ContentItem {
    fn from(value: PageFile) -> Self {
        Self::File(value)
    }
}

impl From<RemoteAttachment> for ContentItem {
    fn from(value: RemoteAttachment) -> Self {
        Self::Attachment(value)
    }
}

impl From<MessageOverrides> for ContentItem {
    fn from(value: MessageOverrides) -> Self {
        Self::Overrides(value)
    }
}

impl From<Component> for ContentItem {
    fn from(value: Component) -> Self {
        Self::Component(value)
    }
}

impl From<Vec<ContentItem>> for ContentItem {
    fn from(value: Vec<ContentItem>) -> Self {
        Self::Nested(value)
    }
}

/// Whether a component only exists in the components-v2 layout system.
pub(crate) fn is_v2_component(component: &Component) -> bool {
    !matches!(
        component,
        Component::ActionRow(_)
            | Component::Button(_)
            | Component::SelectMenu(_)
            | Component::TextInput(_)
    )
}

/// An uploadable file whose bytes are shared, so every render can build a fresh upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub filename: String,
    pub description: Option<String>,
    pub spoiler: bool,
    bytes: Arc<[u8]>,
}

impl PageFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            filename: filename.into(),
            description: None,
            spoiler: false,
            bytes: bytes.into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn spoiler(mut self, spoiler: bool) -> Self {
        self.spoiler = spoiler;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Filename as uploaded, with Discord's spoiler prefix when needed.
    pub fn upload_name(&self) -> String {
        if self.spoiler && !self.filename.starts_with("SPOILER_") {
            format!("SPOILER_{}", self.filename)
        } else {
            self.filename.clone()
        }
    }

    /// Build a new upload for this file.
    pub fn to_attachment(&self, id: u64) -> Attachment {
        Attachment {
            description: self.description.clone(),
            file: self.bytes.to_vec(),
            filename: self.upload_name(),
            id,
        }
    }
}

/// A Discord-hosted attachment that is re-uploaded as part of a page.
///
/// The download happens once; every clone shares the cached bytes.
#[derive(Debug, Clone)]
pub struct RemoteAttachment {
    pub filename: String,
    pub url: String,
    pub description: Option<String>,
    cache: Arc<OnceCell<Arc<[u8]>>>,
}

impl RemoteAttachment {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            description: None,
            cache: Arc::new(OnceCell::new()),
        }
    }

    pub async fn bytes(&self, client: &reqwest::Client) -> anyhow::Result<Arc<[u8]>> {
        let bytes = self
            .cache
            .get_or_try_init(|| async {
                debug!(url = %self.url, "downloading paginator attachment");
                let response = client.get(&self.url).send().await?.error_for_status()?;
                let body = response.bytes().await?;
                Ok::<_, anyhow::Error>(Arc::<[u8]>::from(body.as_ref()))
            })
            .await?;

        Ok(Arc::clone(bytes))
    }

    /// The downloaded file, if `prefetch` already ran.
    pub fn cached_file(&self) -> Option<PageFile> {
        let bytes = self.cache.get()?;
        let mut file = PageFile::new(self.filename.clone(), Arc::clone(bytes));
        file.description = self.description.clone();
        Some(file)
    }
}

impl From<&ChannelAttachment> for RemoteAttachment {
    fn from(value: &ChannelAttachment) -> Self {
        let mut attachment = Self::new(value.filename.clone(), value.url.clone());
        attachment.description = value.description.clone();
        attachment
    }
}

/// Typed render overrides; every `Some` field replaces the accumulated value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOverrides {
    pub content: Option<String>,
    pub embeds: Option<Vec<Embed>>,
    pub files: Option<Vec<PageFile>>,
    pub allowed_mentions: Option<AllowedMentions>,
    pub flags: Option<MessageFlags>,
}

#[cfg(test)]
mod tests {
    use twilight_util::builder::embed::EmbedBuilder;

    use super::*;

    #[test]
    fn repeated_materialization_yields_identical_uploads() {
        let file = PageFile::new("report.txt", b"quarterly numbers".to_vec()).description("report");

        let first = file.to_attachment(0);
        let second = file.to_attachment(0);

        assert_eq!(first.file, second.file);
        assert_eq!(first.filename, "report.txt");
        assert_eq!(second.description.as_deref(), Some("report"));
    }

    #[test]
    fn spoiler_files_get_the_prefix_once() {
        let file = PageFile::new("cat.png", vec![1, 2, 3]).spoiler(true);
        assert_eq!(file.upload_name(), "SPOILER_cat.png");

        let already = PageFile::new("SPOILER_cat.png", vec![1]).spoiler(true);
        assert_eq!(already.upload_name(), "SPOILER_cat.png");
    }

    #[test]
    fn remote_attachment_without_download_has_no_file() {
        let attachment = RemoteAttachment::new("a.png", "https://cdn.example/a.png");
        assert!(attachment.cached_file().is_none());
    }

    #[test]
    fn nested_items_report_embeds() {
        let embed = EmbedBuilder::new().title("inner").build();
        let item = ContentItem::nested([
            ContentItem::text("a"),
            ContentItem::nested([ContentItem::Embed(embed)]),
        ]);

        assert!(item.contains_embed());
        assert!(!ContentItem::text("plain").contains_embed());
    }
}
