//! The dashboard session. Owns the dataset for the life of the process.
//!
//! RULES:
//!   - The dataset is loaded once and never mutated afterwards.
//!   - Every interaction recomputes its views from scratch; nothing is
//!     cached between interactions.
//!   - Callers hand the session around explicitly; there is no global.

use crate::{
    command::{DashCommand, DashReply},
    config::DashboardConfig,
    dataset::Dataset,
    query::{self, DashboardViews, Overview, ViewFilter, ViewOptions},
    types::Country,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The JSON answer to one input line, and whether the session should end.
#[derive(Debug, Clone, PartialEq)]
pub struct LineReply {
    pub json: String,
    pub quit: bool,
}

/// What the filter widgets offer, and what they start on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterControls {
    pub countries: Vec<Country>,
    pub default_country: Option<Country>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        log::info!(
            "dashboard: {} rows, {} countries",
            dataset.len(),
            dataset.countries().len()
        );
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn controls(&self) -> FilterControls {
        let countries = self
            .dataset
            .filterable_countries(self.config.exclude_unspecified_country);
        let default_country = self
            .config
            .default_country
            .as_ref()
            .filter(|c| countries.contains(*c))
            .or_else(|| countries.first())
            .cloned();
        let bounds = self.dataset.date_bounds();

        FilterControls {
            countries,
            default_country,
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
        }
    }

    /// The filter the widgets show before the user touches them.
    /// `None` when the dataset has no filterable rows.
    pub fn default_filter(&self) -> Option<ViewFilter> {
        let controls = self.controls();
        Some(ViewFilter::new(
            controls.default_country?,
            controls.min_date?,
            controls.max_date?,
        ))
    }

    pub fn overview(&self) -> Overview {
        query::overview(&self.dataset, &self.config)
    }

    pub fn apply(&self, filter: &ViewFilter) -> DashboardViews {
        query::compute_views(&self.dataset, filter, &ViewOptions::from(&self.config))
    }

    pub fn handle(&self, command: DashCommand) -> DashReply {
        match command {
            DashCommand::GetControls => DashReply::Controls(self.controls()),
            DashCommand::GetOverview => DashReply::Overview(self.overview()),
            DashCommand::ApplyFilter {
                country,
                start_date,
                end_date,
            } => {
                let filter = ViewFilter::new(country, start_date, end_date);
                let views = self.apply(&filter);
                DashReply::Views { filter, views }
            }
            DashCommand::Quit => DashReply::Bye,
        }
    }

    /// Handle one line of the JSON-lines protocol. Blank lines get no reply;
    /// unreadable ones get `{"error": ...}` and the session carries on.
    pub fn handle_line(&self, line: &str) -> Option<LineReply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command: DashCommand = match serde_json::from_str(line) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("dashboard: unreadable command: {e}");
                return Some(LineReply {
                    json: error_json(&e),
                    quit: false,
                });
            }
        };

        let reply = self.handle(command);
        let quit = reply == DashReply::Bye;
        let json = serde_json::to_string(&reply).unwrap_or_else(|e| error_json(&e));
        Some(LineReply { json, quit })
    }
}

fn error_json(e: &serde_json::Error) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}
