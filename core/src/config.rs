use crate::{
    error::{DashError, DashResult},
    query::MAX_TOP_PRODUCTS,
};
use serde::{Deserialize, Serialize};

/// What to do with rows that carry no customer identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerIdPolicy {
    /// Remove them from the dataset before any aggregate sees them.
    Drop,
    /// Keep them; they count like any other row.
    Retain,
}

/// Granularity of the revenue-over-time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Day,
    /// Weeks closing on Monday (Tuesday..Monday), labelled by that Monday.
    Week,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_policy")]
    pub customer_id_policy: CustomerIdPolicy,
    #[serde(default = "default_true")]
    pub exclude_unspecified_country: bool,
    #[serde(default = "default_country")]
    pub default_country: Option<String>,
    #[serde(default = "default_top_products")]
    pub top_products: usize,
    #[serde(default = "default_top_countries")]
    pub top_countries: usize,
    #[serde(default = "default_series_bucket")]
    pub series_bucket: TimeBucket,
    #[serde(default = "default_overview_bucket")]
    pub overview_bucket: TimeBucket,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_policy() -> CustomerIdPolicy { CustomerIdPolicy::Drop }
fn default_true() -> bool { true }
fn default_country() -> Option<String> { Some("United Kingdom".into()) }
fn default_top_products() -> usize { 10 }
fn default_top_countries() -> usize { 10 }
fn default_series_bucket() -> TimeBucket { TimeBucket::Day }
fn default_overview_bucket() -> TimeBucket { TimeBucket::Week }
fn default_currency() -> String { "£".into() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            customer_id_policy: default_policy(),
            exclude_unspecified_country: default_true(),
            default_country: default_country(),
            top_products: default_top_products(),
            top_countries: default_top_countries(),
            series_bucket: default_series_bucket(),
            overview_bucket: default_overview_bucket(),
            currency_symbol: default_currency(),
        }
    }
}

impl DashboardConfig {
    /// Load `{data_dir}/dashboard.json`. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dashboard.json");
        if !std::path::Path::new(&path).exists() {
            log::info!("config: {path} not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        log::info!("config: loaded {path}");
        Ok(config)
    }

    pub fn from_json(content: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.top_products == 0 {
            return Err(DashError::InvalidConfig {
                reason: "top_products must be at least 1".into(),
            });
        }
        if self.top_products > MAX_TOP_PRODUCTS {
            return Err(DashError::InvalidConfig {
                reason: format!(
                    "top_products must be at most {MAX_TOP_PRODUCTS}, got {}",
                    self.top_products
                ),
            });
        }
        if self.top_countries == 0 {
            return Err(DashError::InvalidConfig {
                reason: "top_countries must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Defaults with no preferred country, used by tests so the control
    /// defaults depend only on the data.
    pub fn default_test() -> Self {
        Self {
            default_country: None,
            ..Self::default()
        }
    }
}
