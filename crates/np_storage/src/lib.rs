use std::path::Path;
use std::sync::Arc;

use np_core::{ArticleSource, Error, KeyValueStore, Result};

pub mod backends;

pub use backends::*;

/// Build the rate store named on the command line or in configuration.
pub async fn create_store(kind: &str, path: Option<&Path>) -> Result<Arc<dyn KeyValueStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let path = path.ok_or_else(|| {
                Error::Storage("file store requires a path".to_string())
            })?;
            Ok(Arc::new(JsonFileStore::open(path).await?))
        }
        other => Err(Error::Storage(format!("Unknown store type: {}", other))),
    }
}

/// Build the article source; without a path the source is empty.
pub fn create_source(path: Option<&Path>) -> Arc<dyn ArticleSource> {
    match path {
        Some(path) => Arc::new(JsonFileSource::new(path)),
        None => Arc::new(MemorySource::default()),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_source, create_store};
}
