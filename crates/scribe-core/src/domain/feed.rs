use chrono::{DateTime, Utc};

/// Number of posts per feed page.
pub const PAGE_SIZE: u64 = 10;

/// Which posts a feed query selects.
///
/// Stores must order matches by `pub_date` descending, then id descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedFilter {
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    /// When set, only posts publicly visible at this instant match.
    pub visible_at: Option<DateTime<Utc>>,
}

impl FeedFilter {
    /// Posts anyone may read at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    /// Every post of one author, hidden ones included.
    pub fn everything_by(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    /// Page `number` of a fixed-size feed.
    pub fn feed(number: u64) -> Self {
        Self {
            number,
            size: PAGE_SIZE,
        }
    }

    /// Rows to skip before this page, or `None` when the page lies beyond any
    /// addressable row.
    pub fn offset(&self) -> Option<u64> {
        self.number.saturating_sub(1).checked_mul(self.size)
    }
}

/// One window of a result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// A page exists if it is page 1, or falls within the result set.
    pub fn in_range(&self) -> bool {
        self.number == 1 || (self.number >= 1 && self.number <= self.total_pages())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u64, total_items: u64) -> Page<()> {
        Page {
            items: vec![],
            number,
            size: PAGE_SIZE,
            total_items,
        }
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::feed(1).offset(), Some(0));
        assert_eq!(PageRequest::feed(3).offset(), Some(20));
    }

    #[test]
    fn test_offset_of_huge_page_is_none() {
        assert_eq!(PageRequest::feed(u64::MAX).offset(), None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(page(1, 0).total_pages(), 0);
        assert_eq!(page(1, 10).total_pages(), 1);
        assert_eq!(page(1, 11).total_pages(), 2);
    }

    #[test]
    fn test_first_page_of_empty_feed_is_in_range() {
        assert!(page(1, 0).in_range());
        assert!(!page(2, 0).in_range());
        assert!(!page(0, 5).in_range());
    }

    #[test]
    fn test_navigation_flags() {
        let p = page(2, 25);
        assert!(p.has_next());
        assert!(p.has_previous());
        assert!(!page(3, 25).has_next());
    }
}
