//! Loads a project's `curio.yaml` and its theme's `theme.yaml` into a
//! [`Config`].

use crate::util::open;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "curio.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(5)
    }
}

#[derive(Deserialize)]
struct TrendingCount(usize);
impl Default for TrendingCount {
    fn default() -> Self {
        TrendingCount(3)
    }
}

#[derive(Deserialize)]
struct Project {
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub site_root: Url,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub tagline: Vec<String>,

    #[serde(default)]
    pub index_page_size: PageSize,

    #[serde(default)]
    pub trending_count: TrendingCount,
}

#[derive(Deserialize)]
struct Theme {
    home_template: Vec<PathBuf>,
    index_template: Vec<PathBuf>,
    posts_template: Vec<PathBuf>,
}

/// The author of the site, credited in the Atom feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Everything needed to build a site. Built by [`Config::from_directory`]
/// or [`Config::from_project_file`].
pub struct Config {
    pub title: String,
    pub description: String,
    pub author: Option<Author>,
    pub tagline: Vec<String>,

    pub home_page: Url,
    pub blogs_url: Url,
    pub static_url: Url,
    pub atom_url: Url,

    pub home_template: Vec<PathBuf>,
    pub index_template: Vec<PathBuf>,
    pub posts_template: Vec<PathBuf>,

    pub posts_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub root_output_directory: PathBuf,
    pub blogs_output_directory: PathBuf,
    pub static_output_directory: PathBuf,

    pub index_page_size: NonZeroUsize,
    pub trending_count: usize,
}

impl Config {
    /// Looks for `curio.yaml` in `dir` and then in each of its ancestors.
    /// `output_directory` overrides the default of `{project}/_output`.
    pub fn from_directory(
        dir: &Path,
        output_directory: Option<&Path>,
    ) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .context("Loading configuration")
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(
        path: &Path,
        output_directory: Option<&Path>,
    ) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)
            .with_context(|| format!("Parsing `{}`", path.display()))?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let theme_dir = project_root.join("theme");
        let theme_path = theme_dir.join("theme.yaml");
        let theme: Theme = serde_yaml::from_reader(open(&theme_path, "theme")?)
            .with_context(|| format!("Parsing `{}`", theme_path.display()))?;
        let in_theme = |relpaths: &[PathBuf]| -> Vec<PathBuf> {
            relpaths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        let output_directory = match output_directory {
            Some(dir) => dir.to_owned(),
            None => project_root.join("_output"),
        };
        check_output_directory(project_root, &output_directory)?;

        let index_page_size = NonZeroUsize::new(project.index_page_size.0)
            .ok_or_else(|| anyhow!("`index_page_size` must be at least 1"))?;

        let site_root = directory_url(project.site_root);
        Ok(Config {
            title: project.title,
            description: project.description,
            author: project.author,
            tagline: project.tagline,
            home_page: site_root.join("index.html")?,
            blogs_url: site_root.join("blogs/")?,
            static_url: site_root.join("static/")?,
            atom_url: site_root.join("feed.atom")?,
            home_template: in_theme(&theme.home_template),
            index_template: in_theme(&theme.index_template),
            posts_template: in_theme(&theme.posts_template),
            posts_source_directory: project_root.join("posts"),
            static_source_directory: project_root.join("static"),
            blogs_output_directory: output_directory.join("blogs"),
            static_output_directory: output_directory.join("static"),
            root_output_directory: output_directory,
            index_page_size,
            trending_count: project.trending_count.0,
        })
    }
}

// A build deletes `blogs/` and `static/` under the output directory and copies
// `static/` into it, so the output may neither hold the project's sources nor
// sit inside its static directory.
fn check_output_directory(project_root: &Path, output_directory: &Path) -> Result<()> {
    let project_root = absolute(project_root)?;
    let output_directory = absolute(output_directory)?;
    if project_root.starts_with(&output_directory) {
        return Err(anyhow!(
            "Output directory `{}` contains the project at `{}`",
            output_directory.display(),
            project_root.display()
        ));
    }
    let static_source = project_root.join("static");
    if output_directory.starts_with(&static_source) {
        return Err(anyhow!(
            "Output directory `{}` is inside the static directory `{}`",
            output_directory.display(),
            static_source.display()
        ));
    }
    Ok(())
}

// Resolves as much of `path` as exists; the output directory may not yet.
fn absolute(path: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return Ok(resolved);
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            Ok(absolute(parent)?.join(name))
        }
        _ if path.is_absolute() => Ok(path.to_owned()),
        _ => Ok(std::env::current_dir()?.join(path)),
    }
}

// `Url::join` drops the last path segment unless it ends in a slash, so
// `https://example.org/blog` has to become `https://example.org/blog/`.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
