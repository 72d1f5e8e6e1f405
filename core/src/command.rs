use crate::{
    dashboard::FilterControls,
    query::{DashboardViews, Overview, ViewFilter},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Commands a UI collaborator sends, one JSON object per line.
/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashCommand {
    GetControls,
    GetOverview,
    /// Dates are `YYYY-MM-DD`.
    ApplyFilter {
        country: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Quit,
}

impl DashCommand {
    pub fn apply_filter(filter: ViewFilter) -> Self {
        DashCommand::ApplyFilter {
            country: filter.country,
            start_date: filter.start_date,
            end_date: filter.end_date,
        }
    }
}

/// One reply per command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashReply {
    Controls(FilterControls),
    Overview(Overview),
    Views {
        filter: ViewFilter,
        views: DashboardViews,
    },
    Bye,
}
