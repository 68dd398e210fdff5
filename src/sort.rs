//! Ordering of posts by publication date. See [`sort_by_date`].

use chrono::NaiveDate;

/// Anything with a publication date. [`crate::post::Post`] is the main
/// implementor; the trait keeps [`sort_by_date`] usable for other listings.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// Returns references to `items` ordered by date, most recent first. The
/// input slice is left untouched. The relative order of items that share a
/// date is unspecified.
pub fn sort_by_date<T: Dated>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str, NaiveDate);

    impl Dated for Item {
        fn date(&self) -> NaiveDate {
            self.1
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sort_most_recent_first() {
        let items = vec![
            Item("b", ymd(2023, 5, 1)),
            Item("c", ymd(2024, 1, 9)),
            Item("a", ymd(2021, 12, 31)),
        ];
        let names: Vec<&str> =
            sort_by_date(&items).iter().map(|item| item.0).collect();
        assert_eq!(vec!["c", "b", "a"], names);
    }

    #[test]
    fn test_sort_leaves_input_untouched() {
        let items = vec![Item("old", ymd(2020, 1, 1)), Item("new", ymd(2022, 1, 1))];
        let _ = sort_by_date(&items);
        assert_eq!("old", items[0].0);
        assert_eq!("new", items[1].0);
    }

    #[test]
    fn test_sort_is_non_increasing() {
        let items: Vec<Item> = [3, 17, 3, 28, 1, 9, 9, 14]
            .iter()
            .map(|d| Item("x", ymd(2022, 2, *d)))
            .collect();
        let sorted = sort_by_date(&items);
        assert_eq!(items.len(), sorted.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].date() >= pair[1].date());
        }
    }

    #[test]
    fn test_sort_empty() {
        let items: Vec<Item> = Vec::new();
        assert!(sort_by_date(&items).is_empty());
    }
}
