pub mod access;
pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod payouts;
pub mod rates;
pub mod service;
pub mod storage;
pub mod types;

pub use access::{AccessPolicy, Principal, Role};
pub use config::{DashboardConfig, ReportSettings};
pub use error::{Error, Result};
pub use filter::{paginate, ArticleFilter, Page};
pub use payouts::{aggregate, format_amount, AuthorSummary, CategoryCount, PayoutReport};
pub use rates::RateConfig;
pub use service::PayoutService;
pub use storage::{ArticleSource, KeyValueStore};
pub use types::{Article, Category};

pub mod prelude {
    pub use crate::{
        aggregate, Article, ArticleFilter, Category, Error, PayoutReport, PayoutService, RateConfig,
        Result,
    };
}
