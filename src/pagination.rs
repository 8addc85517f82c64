//! Pagination utilities for CMDB table reads.
//!
//! CMDB tables page by offset: `start` is the index of the first entry and
//! `count` the maximum number returned.

use serde::Serialize;

/// A page of entries from a CMDB table.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The entries on this page.
    pub items: Vec<T>,
    /// Index of the first entry on this page.
    pub start: u32,
    /// Requested page size.
    pub count: u32,
    /// Total number of matching entries (if the device reports it).
    pub total: Option<u64>,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    ///
    /// With a known total the page is followed by another while
    /// `start + items < total`; otherwise a full page suggests more.
    #[must_use]
    pub fn new(items: Vec<T>, start: u32, count: u32, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => (u64::from(start) + items.len() as u64) < t,
            None => count > 0 && items.len() >= count as usize,
        };
        Self {
            items,
            start,
            count,
            total,
            has_more,
        }
    }

    /// Index to request for the next page.
    #[must_use]
    pub fn next_start(&self) -> u32 {
        self.start.saturating_add(self.items.len() as u32)
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            start: self.start,
            count: self.count,
            total: self.total,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
