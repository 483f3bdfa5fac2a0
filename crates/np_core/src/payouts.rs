//! Per-author payout aggregation.
//!
//! [`aggregate`] is a pure function of its inputs: every call groups the
//! articles afresh and prices them with the rates it is given, so a change of
//! rates is reflected on the next call without any invalidation step.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::rates::RateConfig;
use crate::types::{Article, Category};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub author: String,
    pub counts: Vec<CategoryCount>,
    pub payout: f64,
}

impl AuthorSummary {
    pub fn count(&self, category: &str) -> u64 {
        self.counts
            .iter()
            .find(|c| c.category == *category)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn article_count(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutReport {
    /// Column order for counts, taken from the rate configuration
    pub categories: Vec<Category>,
    pub summaries: Vec<AuthorSummary>,
    pub total: f64,
    /// Malformed articles left out of the aggregation
    pub skipped: usize,
}

impl PayoutReport {
    pub fn empty(categories: Vec<Category>) -> Self {
        Self {
            categories,
            summaries: Vec::new(),
            total: 0.0,
            skipped: 0,
        }
    }

    pub fn recomputed_total(&self) -> f64 {
        self.summaries.iter().map(|s| s.payout).sum()
    }

    pub fn article_count(&self) -> u64 {
        self.summaries.iter().map(AuthorSummary::article_count).sum()
    }

    pub fn summary_for(&self, author: &str) -> Option<&AuthorSummary> {
        self.summaries.iter().find(|s| s.author == author)
    }
}

/// Group `articles` by author and price each group with `rates`.
///
/// Summaries come out in order of each author's first appearance. Articles
/// without an author or category are skipped with a warning. A category with
/// no configured rate, or an invalid rate, fails the whole call.
pub fn aggregate(articles: &[Article], rates: &RateConfig) -> Result<PayoutReport> {
    rates.validate()?;

    let categories = rates.categories();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<(&str, Vec<u64>)> = Vec::new();
    let mut skipped = 0;

    for article in articles {
        if !article.is_well_formed() {
            warn!(
                "Skipping malformed article {:?}: author={:?} category={:?}",
                article.id, article.author, article.category
            );
            skipped += 1;
            continue;
        }

        let column = categories
            .iter()
            .position(|c| c == &article.category)
            .ok_or_else(|| Error::MissingRate(article.category.to_string()))?;

        let slot = *index.entry(article.author.as_str()).or_insert_with(|| {
            buckets.push((article.author.as_str(), vec![0; categories.len()]));
            buckets.len() - 1
        });
        buckets[slot].1[column] += 1;
    }

    let summaries: Vec<AuthorSummary> = buckets
        .into_iter()
        .map(|(author, counts)| price(author, &categories, counts, rates))
        .collect();
    let total = summaries.iter().map(|s| s.payout).sum();

    debug!(
        "Aggregated {} articles into {} authors (skipped {})",
        articles.len() - skipped,
        summaries.len(),
        skipped
    );

    Ok(PayoutReport {
        categories,
        summaries,
        total,
        skipped,
    })
}

fn price(author: &str, categories: &[Category], counts: Vec<u64>, rates: &RateConfig) -> AuthorSummary {
    let mut payout = 0.0;
    let counts = categories
        .iter()
        .zip(counts)
        .map(|(category, count)| {
            payout += count as f64 * rates.get(category).unwrap_or_default();
            CategoryCount {
                category: category.clone(),
                count,
            }
        })
        .collect();

    AuthorSummary {
        author: author.to_string(),
        counts,
        payout,
    }
}

/// Amount formatting shared by every report view.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
