use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::types::Category;
use crate::{Error, Result};

const KEY_PREFIX: &str = "rate_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub category: Category,
    pub rate: f64,
}

/// Per-article payout rate for each category.
///
/// Categories keep insertion order, which is also the column order of every
/// report built from this configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateConfig {
    rates: Vec<Rate>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::new()
            .with_rate(Category::news(), 5.0)
            .with_rate(Category::blog(), 10.0)
    }
}

impl RateConfig {
    pub fn new() -> Self {
        Self { rates: Vec::new() }
    }

    pub fn with_rate(mut self, category: impl Into<Category>, rate: f64) -> Self {
        self.set(category, rate);
        self
    }

    /// Insert or replace a rate. Replacing keeps the category's position.
    pub fn set(&mut self, category: impl Into<Category>, rate: f64) {
        let category = category.into();
        match self.rates.iter_mut().find(|r| r.category == category) {
            Some(existing) => existing.rate = rate,
            None => self.rates.push(Rate { category, rate }),
        }
    }

    pub fn get(&self, category: &Category) -> Option<f64> {
        self.rates
            .iter()
            .find(|r| &r.category == category)
            .map(|r| r.rate)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.rates.iter().map(|r| r.category.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rate> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        for (i, rate) in self.rates.iter().enumerate() {
            validate_rate(&rate.category, rate.rate)?;
            if self.rates[..i].iter().any(|r| r.category == rate.category) {
                return Err(Error::Config(format!(
                    "rate for {} is listed more than once",
                    rate.category
                )));
            }
        }
        Ok(())
    }
}

pub fn validate_rate(category: &Category, rate: f64) -> Result<()> {
    if category.is_empty() {
        return Err(Error::Config("rate category must not be empty".to_string()));
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(Error::InvalidRate {
            category: category.to_string(),
            rate,
        });
    }
    Ok(())
}

/// Storage key for a category's rate, e.g. `rate_news`.
pub fn rate_key(category: &Category) -> String {
    format!("{}{}", KEY_PREFIX, category)
}

/// Load the persisted rate for every category in `defaults`.
///
/// Absent, unparsable, negative or non-finite values fall back to the default.
pub async fn load_rates(store: &dyn KeyValueStore, defaults: &RateConfig) -> Result<RateConfig> {
    let mut rates = RateConfig::new();
    for default in defaults.iter() {
        let key = rate_key(&default.category);
        let stored = store.get(&key).await?;
        let rate = match stored.as_deref().map(str::trim) {
            None => default.rate,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if validate_rate(&default.category, value).is_ok() => value,
                _ => {
                    warn!("Ignoring stored value {:?} for {}, using default {}", raw, key, default.rate);
                    default.rate
                }
            },
        };
        debug!("Loaded {} = {}", key, rate);
        rates.set(default.category.clone(), rate);
    }
    Ok(rates)
}

pub async fn save_rate(store: &dyn KeyValueStore, category: &Category, rate: f64) -> Result<()> {
    validate_rate(category, rate)?;
    store.set(&rate_key(category), &rate.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct MapStore(RwLock<HashMap<String, String>>);

    #[async_trait]
    impl KeyValueStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.write().await.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_default_rates() {
        let rates = RateConfig::default();
        assert_eq!(rates.get(&Category::news()), Some(5.0));
        assert_eq!(rates.get(&Category::blog()), Some(10.0));
        assert_eq!(rates.categories(), vec![Category::news(), Category::blog()]);
    }

    #[test]
    fn test_set_keeps_position() {
        let mut rates = RateConfig::default();
        rates.set("news", 7.5);
        assert_eq!(rates.categories()[0], Category::news());
        assert_eq!(rates.get(&Category::news()), Some(7.5));
        assert_eq!(rates.len(), 2);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        assert!(RateConfig::default().with_rate("news", -1.0).validate().is_err());
        assert!(RateConfig::default().with_rate("blog", f64::NAN).validate().is_err());
        assert!(RateConfig::default().with_rate("blog", 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_repeated_category() {
        let json = r#"[{"category": "news", "rate": 5}, {"category": "news", "rate": 8}]"#;
        let rates: RateConfig = serde_json::from_str(json).unwrap();
        let err = rates.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("news")));
    }

    #[tokio::test]
    async fn test_load_uses_defaults_when_absent_or_garbage() {
        let store = MapStore::default();
        store.set("rate_blog", "not a number").await.unwrap();

        let rates = load_rates(&store, &RateConfig::default()).await.unwrap();
        assert_eq!(rates, RateConfig::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MapStore::default();
        save_rate(&store, &Category::news(), 12.0).await.unwrap();
        assert_eq!(store.get("rate_news").await.unwrap().as_deref(), Some("12"));

        let rates = load_rates(&store, &RateConfig::default()).await.unwrap();
        assert_eq!(rates.get(&Category::news()), Some(12.0));
        assert_eq!(rates.get(&Category::blog()), Some(10.0));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_rate() {
        let store = MapStore::default();
        let err = save_rate(&store, &Category::blog(), -3.0).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(store.get("rate_blog").await.unwrap().is_none());
    }
}
