//! Sports event playlist aggregator
//!
//! Builds an IPTV playlist from a sports feed snapshot and keeps a same-day
//! history of each event's lifecycle (upcoming, live, ended) across runs.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod feed;
pub mod models;
pub mod playlist;
pub mod scheduler;
pub mod service;
pub mod store;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use service::{FeedInputs, RefreshService, RefreshSummary};
