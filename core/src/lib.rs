//! Retail transaction dashboard: dataset loading, persistence, and the
//! filter-and-aggregate query layer behind every chart.

pub mod command;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod query;
pub mod record;
pub mod rng;
pub mod sample;
pub mod store;
pub mod types;
