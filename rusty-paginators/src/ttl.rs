//! Index keyed cache whose entries expire lazily.

use std::{collections::HashMap, time::Duration};

use tokio::time::Instant;

/// Loaded pages keyed by item index.
///
/// Expiry is checked on access. Nothing runs in the background.
#[derive(Debug, Clone)]
pub struct TtlPages<T> {
    ttl: Duration,
    entries: HashMap<usize, (Instant, T)>,
}

impl<T> TtlPages<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&mut self, index: usize, value: T) {
        self.entries.insert(index, (Instant::now(), value));
    }

    /// Live value at `index`; an expired entry is removed and reported missing.
    pub fn get(&mut self, index: usize) -> Option<&T> {
        let expired = self
            .entries
            .get(&index)
            .is_some_and(|(stored_at, _)| stored_at.elapsed() >= self.ttl);
        if expired {
            self.entries.remove(&index);
            return None;
        }

        self.entries.get(&index).map(|(_, value)| value)
    }

    pub fn contains(&mut self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.entries.remove(&index).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries held right now, including ones that expired but were not touched yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_on_access() {
        let mut pages = TtlPages::new(Duration::from_secs(30));
        pages.insert(0, "first");

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(pages.get(0), Some(&"first"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.get(0), None);
        assert!(pages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reinsert_refreshes_the_timestamp() {
        let mut pages = TtlPages::new(Duration::from_secs(10));
        pages.insert(3, 1);

        tokio::time::advance(Duration::from_secs(8)).await;
        pages.insert(3, 2);
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(pages.get(3), Some(&2));
        assert_eq!(pages.remove(3), Some(2));
        assert!(!pages.contains(3));
    }
}
