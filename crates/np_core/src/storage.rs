use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch the full article collection
    async fn fetch_articles(&self) -> Result<Vec<Article>>;
}
