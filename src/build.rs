//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the posts
//! ([`crate::parser`]), sorting them ([`crate::sort`]), rendering the home,
//! index, and post pages ([`crate::write`]), copying the static source
//! directory into the static output directory, and generating the Atom feed.

use crate::config::Config;
use crate::feed::{Error as FeedError, *};
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::sort::sort_by_date;
use crate::util::{copy_dir, remove_path};
use crate::write::{Error as WriteError, *};
use gtmpl::Template;
use log::{info, warn};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub static_files: usize,
}

/// Builds the site from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`], [`sort_by_date`], [`Writer::write_posts`], and
/// [`write_feed`] which do the heavy-lifting. This function also copies the
/// static assets from source directory to the output directory.
pub fn build_site(config: Config) -> Result<BuildReport> {
    let post_parser = PostParser::new(&config.blogs_url);

    // collect all posts, most recent first
    let posts = post_parser.parse_posts(&config.posts_source_directory)?;
    let sorted = sort_by_date(&posts);
    info!(
        "parsed {} posts from {}",
        posts.len(),
        config.posts_source_directory.display()
    );

    // Parse the template files.
    let home_template = parse_template(config.home_template.iter())?;
    let index_template = parse_template(config.index_template.iter())?;
    let posts_template = parse_template(config.posts_template.iter())?;

    // Only remove what a build creates; the output directory itself may
    // hold other files.
    for path in [
        config.blogs_output_directory.clone(),
        config.static_output_directory.clone(),
        config.root_output_directory.join("index.html"),
        config.root_output_directory.join("feed.atom"),
    ]
    .iter()
    {
        remove_path(path).map_err(|err| Error::Clean {
            path: path.to_owned(),
            err,
        })?;
    }
    std::fs::create_dir_all(&config.root_output_directory)?;

    // write the home, index, and post pages
    let writer = Writer {
        home_template: &home_template,
        index_template: &index_template,
        posts_template: &posts_template,
        title: &config.title,
        description: &config.description,
        tagline: &config.tagline,
        home_page: &config.home_page,
        blogs_url: &config.blogs_url,
        static_url: &config.static_url,
        atom_url: &config.atom_url,
        root_output_directory: &config.root_output_directory,
        blogs_output_directory: &config.blogs_output_directory,
        index_page_size: config.index_page_size,
        trending_count: config.trending_count,
    };
    let pages = writer.write_posts(&sorted)?;
    info!(
        "wrote {} pages to {}",
        pages,
        config.root_output_directory.display()
    );

    // copy static directory
    let static_files = if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?
    } else {
        warn!(
            "no static directory at {}; skipping",
            config.static_source_directory.display()
        );
        0
    };

    // create the atom feed
    write_feed(
        FeedConfig {
            title: config.title.clone(),
            id: config.home_page.to_string(),
            author: config.author.clone(),
            home_page: config.home_page.clone(),
        },
        &sorted,
        File::create(config.root_output_directory.join("feed.atom"))?,
    )?;
    info!("wrote feed {}", config.atom_url);

    Ok(BuildReport {
        posts: posts.len(),
        pages,
        static_files,
    })
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// Anything that stops [`build_site`].
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Write(WriteError),

    /// Removing the previous build's output at `path` failed.
    Clean { path: PathBuf, err: std::io::Error },

    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// gtmpl reports template syntax errors as plain strings.
    ParseTemplate(String),

    Feed(FeedError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "removing old output `{}`: {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "opening template `{}`: {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
