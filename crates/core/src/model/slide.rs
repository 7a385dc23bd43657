use serde::{Deserialize, Serialize};

use crate::time::parse_timestamp_millis;

/// News item a slide was written from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Headline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One educational slide as served by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    /// Body text; paragraphs are separated by newlines.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub headline: Option<Headline>,
}

impl Slide {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            headline: None,
        }
    }

    #[must_use]
    pub fn with_headline(mut self, headline: Headline) -> Self {
        self.headline = Some(headline);
        self
    }

    /// Headline timestamp in epoch millis, if present and parsable.
    #[must_use]
    pub fn headline_timestamp_millis(&self) -> Option<i64> {
        self.headline
            .as_ref()
            .and_then(|headline| headline.timestamp.as_deref())
            .and_then(parse_timestamp_millis)
    }

    /// Non-empty, trimmed paragraphs of the body text.
    #[must_use]
    pub fn sections(&self) -> Vec<String> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|section| !section.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Content version of a slide set: the newest headline timestamp.
///
/// Returns 0 for an empty set or when no slide carries a usable timestamp.
#[must_use]
pub fn content_timestamp(slides: &[Slide]) -> i64 {
    slides
        .iter()
        .map(|slide| slide.headline_timestamp_millis().unwrap_or(0))
        .max()
        .unwrap_or(0)
        .max(0)
}
