//! Defines the [`Parser`] and [`Error`] types: the logic for loading
//! [`Post`]s from the file system into memory.

use std::{
    collections::HashSet,
    fmt,
    fs::{read_dir, File},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate};
use log::debug;
use pulldown_cmark::{html, Options, Parser as MarkdownParser};
use serde::Deserialize;
use url::Url;

use crate::post::Post;

const MARKDOWN_EXTENSION: &str = "md";

// `blogs/index.html` is the first index page.
const RESERVED_SLUGS: &[&str] = &["index"];

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `posts_url` is the base URL for post pages. It's used to prefix post
    /// page URLs (i.e., the URL for a post is `{posts_url}/{slug}.html`).
    posts_url: &'a Url,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(posts_url: &'a Url) -> Parser<'a> {
        Parser { posts_url }
    }

    /// Searches `source_directory` for post files (extension = `.md`) and
    /// returns the parsed [`Post`]s ordered by slug. Ordering by date is the
    /// job of [`crate::sort::sort_by_date`]. Each post file must be
    /// structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `Title`, `Date`, and optionally
    ///    `Description` and `Slug`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Markdown post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Description: The obligatory first post.
    /// Date: 2021-04-16
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let mut slugs = HashSet::new();
        for result in read_dir(source_directory)? {
            let path = result?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str())
                    != Some(MARKDOWN_EXTENSION)
            {
                continue;
            }

            let post = self.parse_post(&path)?;
            if !slugs.insert(post.slug.clone()) {
                return Err(Error::DuplicateSlug {
                    slug: post.slug,
                    path,
                });
            }
            debug!("parsed post `{}` from {}", post.slug, path.display());
            posts.push(post);
        }

        posts.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(posts)
    }

    /// Parses a single [`Post`] from the file at `path`, annotating any error
    /// with the path.
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        match self._parse_post(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?;
        self.parse_str(stem, &contents)
    }

    /// Parses a [`Post`] from the contents of a source file. `stem` is the
    /// file name less its extension, used as the slug when the frontmatter
    /// doesn't name one.
    pub fn parse_str(&self, stem: &str, input: &str) -> Result<Post> {
        // A fence is a line holding nothing but `---`.
        fn is_fence(line: &str) -> bool {
            line.trim_end_matches('\n').trim_end_matches('\r') == "---"
        }

        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            let mut lines = input.split_inclusive('\n');
            let yaml_start = match lines.next() {
                Some(line) if is_fence(line) => line.len(),
                _ => return Err(Error::FrontmatterMissingStartFence),
            };
            let mut offset = yaml_start;
            for line in lines {
                if is_fence(line) {
                    return Ok((yaml_start, offset, offset + line.len()));
                }
                offset += line.len();
            }
            Err(Error::FrontmatterMissingEndFence)
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let slug = slug::slugify(frontmatter.slug.as_deref().unwrap_or(stem));
        if slug.is_empty() {
            return Err(Error::EmptySlug);
        }
        if RESERVED_SLUGS.contains(&slug.as_str()) {
            return Err(Error::ReservedSlug(slug));
        }

        Ok(Post {
            url: self.posts_url.join(&format!("{}.html", slug))?,
            date: parse_date(&frontmatter.date)?,
            title: frontmatter.title,
            description: frontmatter.description,
            slug,
            body: markdown_to_html(&input[body_start..]),
        })
    }
}

/// Returns the post whose slug is `slug`, if any.
pub fn find_post<'p>(posts: &'p [Post], slug: &str) -> Option<&'p Post> {
    posts.iter().find(|post| post.slug == slug)
}

/// Parses a frontmatter date. Accepts a plain date (`2024-03-01`) or an RFC
/// 3339 timestamp, in which case only the date part is kept.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => match DateTime::parse_from_rfc3339(input) {
            Ok(datetime) => Ok(datetime.date_naive()),
            Err(err) => Err(Error::InvalidDate {
                input: input.to_owned(),
                err,
            }),
        },
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, MarkdownParser::new_ext(markdown, options));
    body
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    #[serde(rename = "Title")]
    pub title: String,

    /// A short summary of the post.
    #[serde(default, rename = "Description")]
    pub description: String,

    /// The date of the post. Kept as a string so that both plain dates and
    /// timestamps can be accepted; see [`parse_date`].
    #[serde(rename = "Date")]
    pub date: String,

    /// Overrides the slug that is otherwise derived from the file name.
    #[serde(default, rename = "Slug")]
    pub slug: Option<String>,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when the first line isn't `---`.
    FrontmatterMissingStartFence,

    /// Returned when no later line closes the frontmatter.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the `Date` field is neither a date nor a timestamp.
    InvalidDate {
        input: String,
        err: chrono::ParseError,
    },

    /// Returned when the slug slugifies to nothing (e.g. `Slug: "!!!"`).
    EmptySlug,

    /// Returned when the slug would overwrite a generated page, e.g. `index`.
    ReservedSlug(String),

    /// Returned when two posts resolve to the same slug.
    DuplicateSlug { slug: String, path: PathBuf },

    /// Returned when there is a problem parsing URLs.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "post must open with a `---` line")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "frontmatter has no closing `---` line")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidDate { input, err } => {
                write!(f, "invalid date `{}`: {}", input, err)
            }
            Error::EmptySlug => write!(f, "slug is empty"),
            Error::ReservedSlug(slug) => {
                write!(f, "slug `{}` is reserved for generated pages", slug)
            }
            Error::DuplicateSlug { slug, path } => write!(
                f,
                "duplicate slug `{}` in `{}`",
                slug,
                path.display()
            ),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidDate { input: _, err } => Some(err),
            Error::EmptySlug => None,
            Error::ReservedSlug(_) => None,
            Error::DuplicateSlug { .. } => None,
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
