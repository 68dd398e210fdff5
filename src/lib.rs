//! The library code for the `curio` static blog generator. The architecture
//! can be generally broken down into three steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`])
//! 2. Ordering them most recent first ([`crate::sort`])
//! 3. Converting the posts into output files on disk ([`crate::write`])
//!
//! The third step is itself composed of three sub-steps:
//!
//! 1. Building the home page, which features the most recent posts
//! 2. Building index pages
//! 3. Building post pages
//!
//! Index pages are produced by walking a [`paginate::Paginator`] over the
//! sorted posts from the first page to the last. Each index page links to its
//! neighbours through the paginator's clamped `previous`/`next` page numbers.
//!
//! [`build::build_site`] drives the whole thing from a [`config::Config`] and
//! also copies static assets and writes an Atom feed ([`crate::feed`]).
//! [`crate::listing`] renders the same index pages and posts as plain text.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod listing;
pub mod paginate;
pub mod parser;
pub mod post;
pub mod sort;
mod util;
pub mod write;
