//! Centralized error handling for the sports-webcast application
//!
//! The playlist merge engine itself never fails: malformed input degrades to
//! a best-effort result. Errors only surface at the edges, where the
//! application reads configuration, loads producer documents, persists the
//! playlist, or drives the schedule.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: unreadable or invalid `config.toml` / env overrides
//! - **Feed Errors**: missing or malformed feed snapshot and resolved-stream documents
//! - **Store Errors**: failures writing the persisted playlist
//! - **Schedule Errors**: invalid cron expressions
//!
//! # Usage
//!
//! ```rust
//! use sports_webcast::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("missing feed section"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Feed Results
pub type FeedResult<T> = Result<T, FeedError>;

/// Convenience type alias for Store Results
pub type StoreResult<T> = Result<T, StoreError>;
