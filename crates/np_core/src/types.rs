use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content kind of an article, used as the payout rate key.
///
/// Categories compare by exact string match; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const NEWS: &'static str = "news";
    pub const BLOG: &'static str = "blog";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn news() -> Self {
        Self::new(Self::NEWS)
    }

    pub fn blog() -> Self {
        Self::new(Self::BLOG)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Column label used in reports, e.g. `news` -> `News`.
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Category {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "type")]
    pub category: Category,
    #[serde(default, alias = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Article {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            url: String::new(),
            author: author.into(),
            category: category.into(),
            published_at: None,
            thumbnail: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// An article can be priced only when it names both an author and a category.
    pub fn is_well_formed(&self) -> bool {
        !self.author.trim().is_empty() && !self.category.is_empty()
    }
}
