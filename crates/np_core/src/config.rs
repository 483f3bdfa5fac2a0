use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::access::AccessPolicy;
use crate::filter::DEFAULT_PER_PAGE;
use crate::rates::RateConfig;
use crate::{Error, Result};

fn default_title() -> String {
    "Article Payout Report".to_string()
}

fn default_rows_per_page() -> usize {
    40
}

fn default_include_total() -> bool {
    true
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_articles_per_page() -> usize {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_include_total")]
    pub include_total: bool,
    /// Data rows per document page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_total: default_include_total(),
            rows_per_page: default_rows_per_page(),
        }
    }
}

/// Settings for the whole dashboard; every field has a default so a partial
/// JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rates used when the store has no valid value for a category
    #[serde(default)]
    pub default_rates: RateConfig,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default = "default_articles_per_page")]
    pub articles_per_page: usize,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_rates: RateConfig::default(),
            access: AccessPolicy::default(),
            articles_per_page: default_articles_per_page(),
            report: ReportSettings::default(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_rates.is_empty() {
            return Err(Error::Config("at least one default rate is required".to_string()));
        }
        self.default_rates.validate()?;
        if self.report.rows_per_page == 0 {
            return Err(Error::Config("report.rows_per_page must be positive".to_string()));
        }
        Ok(())
    }
}
