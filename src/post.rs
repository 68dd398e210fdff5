//! Defines the [`Post`] type and its conversions into template values.

use crate::sort::Dated;
use chrono::NaiveDate;
use gtmpl::Value;
use std::collections::HashMap;
use url::Url;

/// Represents a single article. Posts are produced by
/// [`crate::parser::Parser`] and are read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The title of the post.
    pub title: String,

    /// A one or two sentence summary shown on cards and in the feed.
    pub description: String,

    /// The slugified identifier of the post. Unique within a site and used
    /// as the post's file name (`{slug}.html`).
    pub slug: String,

    /// The publication date of the post.
    pub date: NaiveDate,

    /// The URL of the post's page.
    pub url: Url,

    /// The HTML body of the post.
    pub body: String,
}

impl Dated for Post {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Post {
    /// The publication date in long US form, e.g. `March 1, 2024`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Converts the post into a card [`Value`] for home and index pages. The
    /// result is a [`Value::Object`] with the fields `title`, `description`,
    /// `slug`, `url`, `date` (see [`Post::formatted_date`]), and `datetime`
    /// (`YYYY-MM-DD`, suitable for a `<time>` element).
    pub fn summarize(&self) -> Value {
        Value::Object(self.card())
    }

    /// Converts the post into a [`Value`] for its own page. Contains every
    /// field of [`Post::summarize`] plus `body`.
    pub fn to_value(&self) -> Value {
        let mut m = self.card();
        m.insert("body".to_owned(), Value::String(self.body.clone()));
        Value::Object(m)
    }

    fn card(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("url".to_owned(), Value::String(self.url.to_string()));
        m.insert("date".to_owned(), Value::String(self.formatted_date()));
        m.insert(
            "datetime".to_owned(),
            Value::String(self.date.format("%Y-%m-%d").to_string()),
        );
        m
    }
}
