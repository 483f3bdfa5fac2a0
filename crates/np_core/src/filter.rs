use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Article, Category};

pub const DEFAULT_PER_PAGE: usize = 10;

/// Article list filter. Every unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFilter {
    /// Case-insensitive substring of the title or the author
    pub keyword: Option<String>,
    pub author: Option<String>,
    pub category: Option<Category>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Calendar-day bounds; `to` covers the whole of its day.
    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());
        self.to = to.and_then(|d| d.checked_add_days(Days::new(1))).map(|d| {
            d.and_time(chrono::NaiveTime::MIN).and_utc() - chrono::Duration::nanoseconds(1)
        });
        self
    }

    pub fn matches(&self, article: &Article) -> bool {
        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            let keyword = keyword.to_lowercase();
            if !article.title.to_lowercase().contains(&keyword)
                && !article.author.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }

        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            if article.author != author {
                return false;
            }
        }

        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            if &article.category != category {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(published) = article.published_at else {
                return false;
            };
            if self.from.is_some_and(|from| published < from) {
                return false;
            }
            if self.to.is_some_and(|to| published > to) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let page = page.max(1);
    let total_items = items.len();
    let start = (page - 1).saturating_mul(per_page);

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    }
}
