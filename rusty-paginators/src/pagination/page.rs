//! Pure pagination math and the navigation state machine.

use crate::error::PaginatorError;

/// Compute the number of pages for a paginated list.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

/// Return start/end indices for a zero-based page window.
pub fn page_window(total_items: usize, per_page: usize, page_index: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = page_index.saturating_mul(safe_per_page);
    let end = start.saturating_add(safe_per_page).min(total_items);
    (start.min(total_items), end)
}

/// Human readable page marker, e.g. `Page 2 of 5`.
pub fn page_string(page_index: usize, max_pages: usize) -> String {
    format!("Page {} of {}", page_index + 1, max_pages.max(1))
}

/// Reject `per_page` values that cannot produce at least one full page.
pub fn validate_per_page(per_page: usize, total_items: usize) -> Result<(), PaginatorError> {
    if total_items == 0 {
        return Err(PaginatorError::NoPages);
    }

    if per_page == 0 {
        return Err(PaginatorError::InvalidPerPage);
    }

    if per_page > total_items {
        return Err(PaginatorError::PerPageExceedsItems {
            per_page,
            items: total_items,
        });
    }

    Ok(())
}

/// A page switch that actually moved the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub before: usize,
    pub after: usize,
}

/// Navigation state for one paginator.
///
/// `current` always satisfies `current < max_pages()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    current: usize,
    per_page: usize,
    total_items: usize,
    loop_pages: bool,
}

impl Navigation {
    pub fn new(total_items: usize, per_page: usize, loop_pages: bool) -> Result<Self, PaginatorError> {
        validate_per_page(per_page, total_items)?;

        Ok(Self {
            current: 0,
            per_page,
            total_items,
            loop_pages,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn loop_pages(&self) -> bool {
        self.loop_pages
    }

    pub fn set_loop_pages(&mut self, loop_pages: bool) {
        self.loop_pages = loop_pages;
    }

    pub fn max_pages(&self) -> usize {
        total_pages(self.total_items, self.per_page)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.max_pages()
    }

    pub fn page_string(&self) -> String {
        page_string(self.current, self.max_pages())
    }

    /// Item range of the current page.
    pub fn window(&self) -> (usize, usize) {
        page_window(self.total_items, self.per_page, self.current)
    }

    /// Resolve any signed target into a valid index.
    ///
    /// Clamps into `[0, max_pages)`, or wraps modulo `max_pages` when looping.
    pub fn resolve(&self, target: i64) -> usize {
        let max = self.max_pages().max(1) as i64;

        if self.loop_pages {
            target.rem_euclid(max) as usize
        } else {
            target.clamp(0, max - 1) as usize
        }
    }

    pub fn goto(&mut self, target: i64) -> Option<PageChange> {
        let before = self.current;
        let after = self.resolve(target);
        if before == after {
            return None;
        }

        self.current = after;
        Some(PageChange { before, after })
    }

    pub fn first(&mut self) -> Option<PageChange> {
        self.goto(0)
    }

    pub fn previous(&mut self) -> Option<PageChange> {
        self.goto(self.current as i64 - 1)
    }

    pub fn next(&mut self) -> Option<PageChange> {
        self.goto(self.current as i64 + 1)
    }

    pub fn last(&mut self) -> Option<PageChange> {
        self.goto(self.max_pages() as i64 - 1)
    }

    /// Replace the item count, keeping the current index inside the new range.
    pub fn set_total_items(&mut self, total_items: usize) -> Result<(), PaginatorError> {
        validate_per_page(self.per_page, total_items)?;

        self.total_items = total_items;
        self.current = self.current.min(self.max_pages() - 1);
        Ok(())
    }

    pub fn set_per_page(&mut self, per_page: usize) -> Result<(), PaginatorError> {
        validate_per_page(per_page, self.total_items)?;

        self.per_page = per_page;
        self.current = self.current.min(self.max_pages() - 1);
        Ok(())
    }
}

/// Parse a one-based page number typed by a user.
///
/// Returns the zero-based index when the value is inside `1..=max_pages`.
pub fn parse_one_based_page(raw: &str, max_pages: usize) -> Option<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|page| (1..=max_pages).contains(page))
        .map(|page| page - 1)
}
