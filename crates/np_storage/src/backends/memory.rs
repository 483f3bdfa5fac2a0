use async_trait::async_trait;
use np_core::{Article, ArticleSource, KeyValueStore, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local key-value store; contents are lost on exit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Article source backed by a vector, for fixtures and tests.
#[derive(Clone, Default)]
pub struct MemorySource {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemorySource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(RwLock::new(articles)),
        }
    }

    pub async fn replace(&self, articles: Vec<Article>) {
        *self.articles.write().await = articles;
    }
}

#[async_trait]
impl ArticleSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.clone())
    }
}
