//! Splits a listing into fixed-size pages. [`Paginator`] never fails: page
//! numbers are clamped and out-of-range pages are simply empty.

use std::convert::TryFrom;
use std::num::NonZeroUsize;

/// A view of one page of `items`. Construct one per render with
/// [`Paginator::new`]; it borrows the listing and holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: NonZeroUsize,
    page: usize,
}

impl<'a, T> Paginator<'a, T> {
    /// Creates a paginator over `items` showing `page` (1-based). A `page` of
    /// 0 is treated as 1. Pages past [`Paginator::max_page`] are allowed and
    /// yield no items.
    pub fn new(items: &'a [T], page_size: NonZeroUsize, page: usize) -> Self {
        Paginator {
            items,
            page_size,
            page: page.max(1),
        }
    }

    /// The page in effect (always at least 1).
    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// `ceil(len / page_size)`, but never less than 1 so that an empty
    /// listing still has a (blank) first page.
    pub fn max_page(&self) -> usize {
        let size = self.page_size.get();
        let pages = match self.items.len() % size {
            0 => self.items.len() / size,
            _ => self.items.len() / size + 1,
        };
        pages.max(1)
    }

    /// The items on the current page.
    pub fn current_data(&self) -> &'a [T] {
        let size = self.page_size.get();
        let begin = match (self.page - 1).checked_mul(size) {
            Some(begin) if begin < self.items.len() => begin,
            _ => return &[],
        };
        let end = begin.saturating_add(size).min(self.items.len());
        &self.items[begin..end]
    }

    /// The following page number, clamped to [`Paginator::max_page`].
    pub fn next(&self) -> usize {
        self.page.saturating_add(1).min(self.max_page())
    }

    /// The preceding page number, clamped to 1.
    pub fn previous(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    /// Returns a paginator over the same listing showing `page` instead.
    pub fn with_page(&self, page: usize) -> Self {
        Paginator::new(self.items, self.page_size, page)
    }
}

/// Parses a raw page number as it arrives from navigation state. Anything
/// that isn't a positive integer (empty, garbage, zero, negative) becomes 1.
pub fn parse_page(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => 1,
    }
}

/// Reads the `page` parameter out of a URL query string such as `page=2` or
/// `?tag=rust&page=2`. A missing parameter means page 1; see [`parse_page`]
/// for how the value itself is interpreted.
pub fn page_from_query(query: &str) -> usize {
    let query = query.trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| parse_page(&value))
        .unwrap_or(1)
}

#[cfg(test)]
mod test {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn seven() -> Vec<u32> {
        (1..=7).collect()
    }

    #[test]
    fn test_first_of_two_pages() {
        let items = seven();
        let p = Paginator::new(&items, size(5), 1);
        assert_eq!(&[1, 2, 3, 4, 5], p.current_data());
        assert_eq!(2, p.max_page());
        assert_eq!(2, p.next());
        assert_eq!(1, p.previous());
    }

    #[test]
    fn test_last_partial_page() {
        let items = seven();
        let p = Paginator::new(&items, size(5), 2);
        assert_eq!(&[6, 7], p.current_data());
        assert_eq!(2, p.next());
        assert_eq!(1, p.previous());
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let p = Paginator::new(&items, size(5), 1);
        assert!(p.current_data().is_empty());
        assert_eq!(1, p.max_page());
        assert_eq!(1, p.next());
        assert_eq!(1, p.previous());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items = seven();
        let p = Paginator::new(&items, size(5), 9);
        assert!(p.current_data().is_empty());
        assert_eq!(2, p.next());
        assert_eq!(8, p.previous());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let items = seven();
        let p = Paginator::new(&items, size(5), usize::MAX);
        assert!(p.current_data().is_empty());
        assert_eq!(2, p.next());
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        let items = seven();
        let p = Paginator::new(&items, size(5), 0);
        assert_eq!(1, p.current_page());
        assert_eq!(&[1, 2, 3, 4, 5], p.current_data());
    }

    #[test]
    fn test_max_page_is_ceiling() {
        for len in 0..40usize {
            for page_size in 1..9usize {
                let items: Vec<usize> = (0..len).collect();
                let p = Paginator::new(&items, size(page_size), 1);
                let wanted = std::cmp::max(1, (len + page_size - 1) / page_size);
                assert_eq!(wanted, p.max_page(), "len={} size={}", len, page_size);
            }
        }
    }

    #[test]
    fn test_pages_reconstruct_listing() {
        for len in 0..23usize {
            for page_size in 1..6usize {
                let items: Vec<usize> = (0..len).collect();
                let first = Paginator::new(&items, size(page_size), 1);
                let mut joined = Vec::new();
                for page in 1..=first.max_page() {
                    joined.extend_from_slice(first.with_page(page).current_data());
                }
                assert_eq!(items, joined, "len={} size={}", len, page_size);
            }
        }
    }

    #[test]
    fn test_boundaries_are_idempotent() {
        let items = seven();
        let first = Paginator::new(&items, size(3), 1);
        let last = first.with_page(first.max_page());
        assert_eq!(1, first.previous());
        assert_eq!(first.max_page(), last.next());
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(3, parse_page("3"));
        assert_eq!(3, parse_page(" 3 "));
        assert_eq!(1, parse_page("0"));
        assert_eq!(1, parse_page("-4"));
        assert_eq!(1, parse_page(""));
        assert_eq!(1, parse_page("two"));
    }

    #[test]
    fn test_page_from_query() {
        assert_eq!(2, page_from_query("page=2"));
        assert_eq!(4, page_from_query("?tag=rust&page=4"));
        assert_eq!(1, page_from_query("tag=rust"));
        assert_eq!(1, page_from_query(""));
        assert_eq!(1, page_from_query("page=abc"));
        assert_eq!(1, page_from_query("page=-1"));
    }
}
