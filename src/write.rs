//! Templating and writing of HTML pages: the home page, the paginated blog
//! index, and one page per [`Post`].

use crate::paginate::Paginator;
use crate::post::Post;
use gtmpl::{Template, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use url::Url;

/// Responsible for paginating, templating, and writing HTML pages to disk from
/// [`Post`] sources.
pub struct Writer<'a> {
    /// The template for the home page.
    pub home_template: &'a Template,

    /// The template for index pages.
    pub index_template: &'a Template,

    /// The template for post pages.
    pub posts_template: &'a Template,

    /// The site title, exposed to every template as `site.title`.
    pub title: &'a str,

    /// The site description, exposed to every template as
    /// `site.description`.
    pub description: &'a str,

    /// Lines of hero text for the home page.
    pub tagline: &'a [String],

    /// The URL for the site's home page.
    pub home_page: &'a Url,

    /// The base URL for the blog. The first index page is
    /// `{blogs_url}index.html`, later ones are `{blogs_url}page/{n}.html`, and
    /// posts are `{blogs_url}{slug}.html`.
    pub blogs_url: &'a Url,

    /// The URL for the static assets, typically used for the theme's
    /// stylesheet.
    pub static_url: &'a Url,

    /// The URL of the Atom feed.
    pub atom_url: &'a Url,

    /// The directory in which the home page is written.
    pub root_output_directory: &'a Path,

    /// The directory in which index and post pages are written. Mirrors the
    /// layout of [`Writer::blogs_url`].
    pub blogs_output_directory: &'a Path,

    /// The number of posts per index page.
    pub index_page_size: NonZeroUsize,

    /// The number of most recent posts featured on the home page.
    pub trending_count: usize,
}

impl<'a> Writer<'a> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert("site".to_owned(), self.site_value());
        }
        page.template.execute(
            &mut std::fs::File::create(&page.file_path)?,
            &gtmpl::Context::from(value)?,
        )?;
        debug!("wrote {}", page.file_path.display());
        Ok(())
    }

    /// Takes posts sorted most recent first (see
    /// [`crate::sort::sort_by_date`]) and writes the home page, the index
    /// pages, and the post pages to disk. Returns the number of pages
    /// written.
    pub fn write_posts(&self, posts: &[&Post]) -> Result<usize> {
        use std::collections::HashSet;
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        let pages = self.pages(posts)?;
        for page in pages.iter() {
            if let Some(dir) = page.file_path.parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    std::fs::create_dir_all(dir)?;
                }
            }
            self.write_page(page)?;
        }
        Ok(pages.len())
    }

    /// Values shared by every page, exposed to templates as `site`.
    fn site_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.to_owned()));
        m.insert(
            "description".to_owned(),
            Value::String(self.description.to_owned()),
        );
        m.insert("home_page".to_owned(), url_value(self.home_page));
        m.insert("blogs_url".to_owned(), url_value(self.blogs_url));
        m.insert("static_url".to_owned(), url_value(self.static_url));
        m.insert("feed_url".to_owned(), url_value(self.atom_url));
        Value::Object(m)
    }

    /// Creates every [`Page`] of the site: the home page, then the index
    /// pages, then the post pages.
    fn pages(&self, posts: &[&Post]) -> Result<Vec<Page<'a>>> {
        let mut pages = vec![self.home_page(posts)];
        pages.extend(self.index_pages(posts)?);
        pages.extend(self.post_pages(posts));
        Ok(pages)
    }

    /// Creates the home page, which features the `trending_count` most recent
    /// posts.
    fn home_page(&self, posts: &[&Post]) -> Page<'a> {
        let tagline = self
            .tagline
            .iter()
            .map(|line| Value::String(line.clone()))
            .collect();
        Page {
            item: Value::Array(
                posts
                    .iter()
                    .take(self.trending_count)
                    .map(|p| p.summarize())
                    .collect(),
            ),
            file_path: self.root_output_directory.join("index.html"),
            prev: None,
            next: None,
            extra: vec![("tagline", Value::Array(tagline))],
            template: self.home_template,
        }
    }

    /// Creates one index [`Page`] per page of the [`Paginator`]. An empty
    /// blog still gets a single, empty index page. The `prev` and `next`
    /// links are clamped, so the first page's `prev` is itself and the last
    /// page's `next` is itself; `has_prev` and `has_next` tell templates
    /// whether a link actually goes anywhere.
    fn index_pages(&self, posts: &[&Post]) -> Result<Vec<Page<'a>>> {
        let first = Paginator::new(posts, self.index_page_size, 1);
        (1..=first.max_page())
            .map(|n| -> Result<Page<'a>> {
                let paginator = first.with_page(n);
                Ok(Page {
                    item: Value::Array(
                        paginator
                            .current_data()
                            .iter()
                            .map(|p| p.summarize())
                            .collect(),
                    ),
                    file_path: self.index_file_path(n),
                    prev: Some(self.index_url(paginator.previous())?),
                    next: Some(self.index_url(paginator.next())?),
                    extra: vec![
                        ("page", Value::from(n as u64)),
                        ("max_page", Value::from(paginator.max_page() as u64)),
                        ("has_prev", Value::Bool(paginator.previous() != n)),
                        ("has_next", Value::Bool(paginator.next() != n)),
                    ],
                    template: self.index_template,
                })
            })
            .collect()
    }

    /// Creates all of the post [`Page`]s.
    fn post_pages(&self, posts: &[&Post]) -> Vec<Page<'a>> {
        posts
            .iter()
            .map(|post| Page {
                item: post.to_value(),
                file_path: self
                    .blogs_output_directory
                    .join(format!("{}.html", post.slug)),
                prev: None,
                next: None,
                extra: Vec::new(),
                template: self.posts_template,
            })
            .collect()
    }

    /// The URL of index page `n` (1-based).
    pub fn index_url(&self, n: usize) -> std::result::Result<Url, url::ParseError> {
        match n {
            0 | 1 => self.blogs_url.join("index.html"),
            _ => self.blogs_url.join(&format!("page/{}.html", n)),
        }
    }

    /// The output file of index page `n` (1-based).
    fn index_file_path(&self, n: usize) -> PathBuf {
        match n {
            0 | 1 => self.blogs_output_directory.join("index.html"),
            _ => self
                .blogs_output_directory
                .join("page")
                .join(format!("{}.html", n)),
        }
    }
}

fn url_value(url: &Url) -> Value {
    Value::String(url.to_string())
}

/// An object representing an output HTML file. A [`Page`] can be converted to a
/// [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The main item for the page: a post, or an array of post cards.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The URL for the previous page, if any.
    prev: Option<Url>,

    /// The URL for the next page, if any.
    next: Option<Url>,

    /// Additional top-level fields for the template.
    extra: Vec<(&'static str, Value)>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a [`Value::Object`]
    /// with fields `item`, `prev`, and `next` plus the page's extra fields.
    fn to_value(&self) -> Value {
        let option_to_value = |opt: &Option<Url>| match opt {
            Some(url) => url_value(url),
            None => Value::Nil,
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("item".to_owned(), self.item.clone());
        m.insert("prev".to_owned(), option_to_value(&self.prev));
        m.insert("next".to_owned(), option_to_value(&self.next));
        for (key, value) in self.extra.iter() {
            m.insert((*key).to_owned(), value.clone());
        }
        Value::Object(m)
    }
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error building a page URL.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

// gtmpl reports execution and context errors as strings.
impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}
