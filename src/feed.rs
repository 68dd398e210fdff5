//! Support for creating Atom feeds from a list of posts.

use crate::config::Author;
use crate::post::Post;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s sorted most recent first, and writes the result to a
/// [`std::io::Write`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[&Post], w: W) -> Result<()> {
    feed(config, posts).write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, posts: &[&Post]) -> Feed {
    // Posts are sorted, so the first one is the latest change to the site.
    let updated = match posts.first() {
        Some(post) => midnight_utc(post.date),
        None => Utc::now().into(),
    };

    let mut feed = Feed::default();
    feed.set_entries(feed_entries(&config, posts));
    feed.set_title(Text::plain(config.title));
    feed.set_id(config.id);
    feed.set_updated(updated);
    feed.set_authors(author_to_people(config.author));
    feed.set_links(vec![alternate_link(config.home_page.as_str())]);
    feed
}

fn feed_entries(config: &FeedConfig, posts: &[&Post]) -> Vec<Entry> {
    posts
        .iter()
        .map(|post| {
            let date = midnight_utc(post.date);
            let mut entry = Entry::default();
            entry.set_id(post.url.to_string());
            entry.set_title(Text::plain(post.title.clone()));
            entry.set_updated(date);
            entry.set_published(Some(date));
            entry.set_authors(author_to_people(config.author.clone()));
            entry.set_links(vec![alternate_link(post.url.as_str())]);
            if !post.description.is_empty() {
                entry.set_summary(Some(Text::plain(post.description.clone())));
            }
            entry
        })
        .collect()
}

// Posts only carry a date, so entries are stamped at midnight UTC.
fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc).into()
}

fn alternate_link(href: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => {
            let mut person = Person::default();
            person.set_name(author.name);
            person.set_email(author.email);
            vec![person]
        }
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// A failure serializing or writing `feed.atom`.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Atom(AtomError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(slug: &str, description: &str, date: &str) -> Post {
        Post {
            title: slug.to_owned(),
            description: description.to_owned(),
            slug: slug.to_owned(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            url: Url::parse(&format!("https://example.org/blogs/{}.html", slug)).unwrap(),
            body: String::new(),
        }
    }

    fn config() -> FeedConfig {
        FeedConfig {
            title: String::from("Syntax Error"),
            id: String::from("https://example.org/index.html"),
            author: Some(Author {
                name: String::from("Ada"),
                email: None,
            }),
            home_page: Url::parse("https://example.org/index.html").unwrap(),
        }
    }

    #[test]
    fn test_feed_entries_follow_post_order() {
        let newer = post("newer", "fresh", "2024-02-01");
        let older = post("older", "", "2023-11-30");
        let feed = feed(config(), &[&newer, &older]);

        let ids: Vec<&str> = feed.entries().iter().map(|e| e.id()).collect();
        assert_eq!(
            vec![
                "https://example.org/blogs/newer.html",
                "https://example.org/blogs/older.html"
            ],
            ids
        );
        assert_eq!(midnight_utc(newer.date), *feed.updated());
        assert_eq!(Some("fresh"), feed.entries()[0].summary().map(|s| s.value.as_str()));
        assert!(feed.entries()[1].summary().is_none());
        assert_eq!("Ada", feed.authors()[0].name());
    }

    #[test]
    fn test_write_feed() -> Result<()> {
        let only = post("only", "the one", "2024-02-01");
        let mut out = Vec::new();
        write_feed(config(), &[&only], &mut out)?;
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("Syntax Error"));
        assert!(xml.contains("https://example.org/blogs/only.html"));
        assert!(xml.contains("2024-02-01T00:00:00"));
        Ok(())
    }
}
