//! Plain-text views of a project's posts, as printed by the `list` and `show`
//! subcommands.

use crate::config::Config;
use crate::paginate::{page_from_query, parse_page, Paginator};
use crate::parser::{find_post, Parser};
use crate::post::Post;
use crate::sort::sort_by_date;
use anyhow::{anyhow, Result};
use std::fmt::Write;

/// Picks the requested index page from a raw `--page` value or, failing
/// that, a `--query` string. Neither means page 1.
pub fn requested_page(page: Option<&str>, query: Option<&str>) -> usize {
    match (page, query) {
        (Some(page), _) => parse_page(page),
        (None, Some(query)) => page_from_query(query),
        (None, None) => 1,
    }
}

/// Renders page `page` of the blog index: one `date\ttitle\turl` line per
/// post, then a `page X of Y (previous: P, next: N)` line.
pub fn list_page(config: &Config, page: usize) -> Result<String> {
    let posts = load_posts(config)?;
    let sorted = sort_by_date(&posts);
    let paginator = Paginator::new(&sorted, config.index_page_size, page);

    let mut out = String::new();
    for post in paginator.current_data() {
        writeln!(out, "{}\t{}\t{}", post.formatted_date(), post.title, post.url)?;
    }
    writeln!(
        out,
        "page {} of {} (previous: {}, next: {})",
        paginator.current_page(),
        paginator.max_page(),
        paginator.previous(),
        paginator.next()
    )?;
    Ok(out)
}

/// Renders the post whose slug is `slug`: title, description (if any), date
/// and URL, then the HTML body. An unknown slug is an error.
pub fn show_post(config: &Config, slug: &str) -> Result<String> {
    let posts = load_posts(config)?;
    let post = find_post(&posts, slug).ok_or_else(|| anyhow!("no post with slug `{}`", slug))?;

    let mut out = String::new();
    writeln!(out, "{}", post.title)?;
    if !post.description.is_empty() {
        writeln!(out, "{}", post.description)?;
    }
    writeln!(out, "{}\t{}\n", post.formatted_date(), post.url)?;
    out.push_str(&post.body);
    Ok(out)
}

fn load_posts(config: &Config) -> Result<Vec<Post>> {
    Ok(Parser::new(&config.blogs_url).parse_posts(&config.posts_source_directory)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    fn demo() -> Result<Config> {
        let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demo");
        Config::from_directory(&demo, None)
    }

    #[test]
    fn test_requested_page() {
        assert_eq!(1, requested_page(None, None));
        assert_eq!(2, requested_page(Some("2"), None));
        assert_eq!(1, requested_page(Some("-4"), None));
        assert_eq!(1, requested_page(None, Some("page=-3")));
        assert_eq!(2, requested_page(None, Some("?page=2")));
        assert_eq!(3, requested_page(Some("3"), Some("page=2")));
    }

    #[test]
    fn test_list_negative_query_is_first_page() -> Result<()> {
        let listing = list_page(&demo()?, requested_page(None, Some("page=-3")))?;
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(6, lines.len());
        assert_eq!(
            "February 27, 2024\tError handling without tears\t\
             https://example.org/blogs/error-handling.html",
            lines[0]
        );
        assert_eq!("page 1 of 2 (previous: 1, next: 2)", lines[5]);
        Ok(())
    }

    #[test]
    fn test_list_last_page() -> Result<()> {
        let listing = list_page(&demo()?, requested_page(Some("2"), None))?;
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(3, lines.len());
        assert!(lines[1].contains("Hello, world!"));
        assert_eq!("page 2 of 2 (previous: 1, next: 2)", lines[2]);
        Ok(())
    }

    #[test]
    fn test_list_page_past_the_end_is_empty() -> Result<()> {
        let listing = list_page(&demo()?, requested_page(Some("9"), None))?;
        assert_eq!("page 9 of 2 (previous: 8, next: 2)\n", listing);
        Ok(())
    }

    #[test]
    fn test_show_post() -> Result<()> {
        let shown = show_post(&demo()?, "hello-world")?;
        let mut lines = shown.lines();
        assert_eq!(Some("Hello, world!"), lines.next());
        assert_eq!(Some("The obligatory first post."), lines.next());
        assert_eq!(
            Some("January 15, 2023\thttps://example.org/blogs/hello-world.html"),
            lines.next()
        );
        assert!(shown.contains("<p>Welcome to the blog."));
        Ok(())
    }

    #[test]
    fn test_show_unknown_slug() -> Result<()> {
        let err = match show_post(&demo()?, "no-such-post") {
            Ok(_) => panic!("unknown slug was found"),
            Err(err) => err,
        };
        assert_eq!("no post with slug `no-such-post`", err.to_string());
        Ok(())
    }
}
