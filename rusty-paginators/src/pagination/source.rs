//! Where a paginator's pages come from.

use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::error::PaginatorError;
use crate::ttl::TtlPages;

use super::content::ContentItem;
use super::gate::BoxFuture;
use super::select::{ResolvedOption, SelectPage, build_selects};

/// Loads single items on demand for lazily paged content.
pub trait PageLoader: Send + Sync {
    fn load(&self, index: usize) -> BoxFuture<'_, anyhow::Result<ContentItem>>;
}

/// Pages handed to `PaginatorBuilder::new`.
pub enum PageSource {
    /// All items up front, chunked by `per_page`.
    Items(Vec<ContentItem>),
    /// `total_items` items fetched through `loader` and cached for `ttl`.
    Lazy {
        total_items: usize,
        loader: Arc<dyn PageLoader>,
        ttl: Duration,
    },
    /// Select menu options, chunked into selects.
    Options(Vec<SelectPage>),
}

impl PageSource {
    pub fn lazy(total_items: usize, loader: impl PageLoader + 'static, ttl: Duration) -> Self {
        Self::Lazy {
            total_items,
            loader: Arc::new(loader),
            ttl,
        }
    }

    pub(crate) fn contains_v2_component(&self) -> bool {
        match self {
            Self::Items(items) => items.iter().any(ContentItem::contains_v2_component),
            Self::Lazy { .. } => false,
            Self::Options(pages) => pages.iter().any(select_page_has_v2),
        }
    }

    pub(crate) fn contains_embed(&self) -> bool {
        match self {
            Self::Items(items) => items.iter().any(ContentItem::contains_embed),
            Self::Lazy { .. } => false,
            Self::Options(pages) => pages.iter().any(select_page_has_embed),
        }
    }
}

fn select_page_has_v2(page: &SelectPage) -> bool {
    match page {
        SelectPage::Option(option) => option.content.contains_v2_component(),
        SelectPage::Group(group) => group.iter().any(select_page_has_v2),
    }
}

fn select_page_has_embed(page: &SelectPage) -> bool {
    match page {
        SelectPage::Option(option) => option.content.contains_embed(),
        SelectPage::Group(group) => group.iter().any(select_page_has_embed),
    }
}

impl From<Vec<ContentItem>> for PageSource {
    fn from(value: Vec<ContentItem>) -> Self {
        Self::Items(value)
    }
}

impl From<Vec<SelectPage>> for PageSource {
    fn from(value: Vec<SelectPage>) -> Self {
        Self::Options(value)
    }
}

/// Resolved page storage owned by a paginator.
pub(crate) enum PageStore {
    Items(Vec<ContentItem>),
    Lazy {
        total_items: usize,
        loader: Arc<dyn PageLoader>,
        cache: TtlPages<ContentItem>,
    },
    Selects {
        selects: Vec<Vec<ResolvedOption>>,
        option_index: usize,
    },
}

impl PageStore {
    pub(crate) fn from_source(
        source: PageSource,
        per_select: usize,
        add_in_order: bool,
    ) -> Result<Self, PaginatorError> {
        Ok(match source {
            PageSource::Items(items) => Self::Items(items),
            PageSource::Lazy {
                total_items,
                loader,
                ttl,
            } => Self::Lazy {
                total_items,
                loader,
                cache: TtlPages::new(ttl),
            },
            PageSource::Options(pages) => Self::Selects {
                selects: build_selects(pages, per_select, add_in_order)?,
                option_index: 0,
            },
        })
    }

    pub(crate) fn total_items(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Lazy { total_items, .. } => *total_items,
            Self::Selects { selects, .. } => selects.len(),
        }
    }

    /// Items of the page covering `start..end`; a select page is its chosen option.
    pub(crate) async fn page(&mut self, start: usize, end: usize) -> anyhow::Result<Vec<ContentItem>> {
        match self {
            Self::Items(items) => Ok(items[start..end].to_vec()),
            Self::Lazy { loader, cache, .. } => {
                let mut page = Vec::with_capacity(end - start);
                for index in start..end {
                    if let Some(item) = cache.get(index) {
                        page.push(item.clone());
                        continue;
                    }

                    debug!(index, "loading lazy page item");
                    let item = loader.load(index).await?;
                    cache.insert(index, item.clone());
                    page.push(item);
                }
                Ok(page)
            }
            Self::Selects {
                selects,
                option_index,
            } => Ok(selects
                .get(start)
                .and_then(|options| options.get(*option_index))
                .map(|option| vec![option.content.clone()])
                .unwrap_or_default()),
        }
    }
}
