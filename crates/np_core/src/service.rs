use std::sync::Arc;

use tracing::info;

use crate::access::{AccessPolicy, Principal};
use crate::filter::ArticleFilter;
use crate::payouts::{aggregate, PayoutReport};
use crate::rates::{self, RateConfig};
use crate::storage::{ArticleSource, KeyValueStore};
use crate::types::{Article, Category};
use crate::{Error, Result};

/// Ties the article source, the rate store and the access policy together.
///
/// Nothing is cached: rates are read from the store and articles from the
/// source on every report, so the figures always follow the current inputs.
#[derive(Clone)]
pub struct PayoutService {
    source: Arc<dyn ArticleSource>,
    store: Arc<dyn KeyValueStore>,
    policy: AccessPolicy,
    defaults: RateConfig,
}

impl PayoutService {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        store: Arc<dyn KeyValueStore>,
        policy: AccessPolicy,
        defaults: RateConfig,
    ) -> Self {
        Self {
            source,
            store,
            policy,
            defaults,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub async fn load_rates(&self) -> Result<RateConfig> {
        rates::load_rates(self.store.as_ref(), &self.defaults).await
    }

    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let articles = self.source.fetch_articles().await?;
        info!("📰 Fetched {} articles from {}", articles.len(), self.source.name());
        Ok(articles)
    }

    pub async fn articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let articles = self.fetch_articles().await?;
        Ok(articles.into_iter().filter(|a| filter.matches(a)).collect())
    }

    pub async fn report(&self) -> Result<PayoutReport> {
        let articles = self.fetch_articles().await?;
        let rates = self.load_rates().await?;
        let report = aggregate(&articles, &rates)?;
        info!(
            "💰 Payout report: {} authors, total {:.2}",
            report.summaries.len(),
            report.total
        );
        Ok(report)
    }

    /// Change one category's rate on behalf of `principal`.
    ///
    /// Only categories known to the defaults can be set, so every persisted
    /// key is read back on the next load.
    pub async fn update_rate(
        &self,
        principal: &Principal,
        category: &Category,
        rate: f64,
    ) -> Result<RateConfig> {
        self.policy.require_admin(principal)?;
        if self.defaults.get(category).is_none() {
            return Err(Error::MissingRate(category.to_string()));
        }
        rates::save_rate(self.store.as_ref(), category, rate).await?;
        info!("✏️ {} set rate for {} to {}", principal.email, category, rate);
        self.load_rates().await
    }
}
