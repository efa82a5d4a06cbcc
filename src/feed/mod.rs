//! Feed snapshot ingestion
//!
//! The event feed and the stream resolver run out of process and leave JSON
//! documents on disk. This module reads them and selects the events that
//! belong in today's playlist.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::catalog::CategoryCatalog;
use crate::config::FeedConfig;
use crate::errors::{FeedError, FeedResult};
use crate::models::{CandidateEvent, EventStatus, ResolvedStreamRecord, ResolvedStreams};

const UNNAMED_EVENT: &str = "Unnamed Event";
const DISPLAY_TIME_FORMAT: &str = "%b %d @ %I:%M %p";

/// Feed document: events grouped by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default)]
    pub streams: Vec<FeedCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedCategory {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub streams: Vec<FeedEvent>,
}

/// One feed event. Timestamps are unix seconds, as numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iframe: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub starts_at: Option<Value>,
    #[serde(default)]
    pub ends_at: Option<Value>,
}

pub fn load_snapshot(path: &Path) -> FeedResult<FeedSnapshot> {
    let contents = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: FeedSnapshot =
        serde_json::from_str(&contents).map_err(|source| FeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Loaded feed snapshot {} with {} categories",
        path.display(),
        snapshot.streams.len()
    );
    Ok(snapshot)
}

/// Read the resolver output: a JSON array of `{name, category, source, urls}`
pub fn load_resolved(path: &Path) -> FeedResult<ResolvedStreams> {
    let contents = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<ResolvedStreamRecord> =
        serde_json::from_str(&contents).map_err(|source| FeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let streams: ResolvedStreams = records.into_iter().collect();
    debug!("Loaded resolved streams for {} events", streams.len());
    Ok(streams)
}

/// Picks the events that belong in the playlist window
#[derive(Debug, Clone)]
pub struct FeedSelector {
    timezone: Tz,
    settings: FeedConfig,
}

impl FeedSelector {
    pub fn new(settings: FeedConfig) -> FeedResult<Self> {
        let timezone = settings.reference_timezone()?;
        Ok(Self { timezone, settings })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Events starting between local midnight today and `lookahead_days`
    /// later, with display names and statuses as of `now`.
    ///
    /// Ordered LIVE, UPCOMING, ENDED, then by start time.
    pub fn select(
        &self,
        snapshot: &FeedSnapshot,
        now: DateTime<Utc>,
        catalog: &CategoryCatalog,
    ) -> Vec<CandidateEvent> {
        let window_start = self.start_of_day(now);
        let window_end = window_start
            .checked_add_signed(Duration::days(i64::from(self.settings.lookahead_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let default_duration = Duration::from_std(self.settings.default_event_duration)
            .unwrap_or_else(|_| Duration::hours(4));

        let mut candidates = Vec::new();
        for category in &snapshot.streams {
            let raw_category = category.category.trim();
            if self.is_skipped(raw_category) {
                debug!("Skipping category '{}'", raw_category);
                continue;
            }

            for event in &category.streams {
                let name = event
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(UNNAMED_EVENT);

                let Some(starts_at) = timestamp(event.starts_at.as_ref(), name, "starts_at") else {
                    continue;
                };
                if starts_at < window_start || starts_at >= window_end {
                    continue;
                }
                let ends_at = timestamp(event.ends_at.as_ref(), name, "ends_at")
                    .or_else(|| starts_at.checked_add_signed(default_duration))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);

                candidates.push(CandidateEvent {
                    name: self.display_name(name, starts_at, event.tag.as_deref()),
                    category: catalog.classify(raw_category, name),
                    source: event.iframe.clone().unwrap_or_default(),
                    poster: event.poster.clone(),
                    status: status_at(now, starts_at, ends_at),
                    starts_at,
                    ends_at,
                });
            }
        }

        candidates.sort_by_key(|candidate| (candidate.status.display_rank(), candidate.starts_at));
        info!(
            "Selected {} events between {} and {}",
            candidates.len(),
            window_start,
            window_end
        );
        candidates
    }

    fn is_skipped(&self, category: &str) -> bool {
        self.settings
            .skipped_category_markers
            .iter()
            .any(|marker| category.contains(marker.as_str()))
    }

    fn start_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now
            .with_timezone(&self.timezone)
            .date_naive()
            .and_time(NaiveTime::MIN);
        self.timezone
            .from_local_datetime(&midnight)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or(now)
    }

    /// `Name (Jan 05 @ 07:00 PM PHT) [tag]`
    fn display_name(&self, name: &str, starts_at: DateTime<Utc>, tag: Option<&str>) -> String {
        let local = starts_at.with_timezone(&self.timezone);
        let mut display = format!(
            "{name} ({} {})",
            local.format(DISPLAY_TIME_FORMAT),
            self.settings.timezone_label
        );
        if let Some(tag) = tag.map(str::trim).filter(|tag| !tag.is_empty()) {
            display.push_str(&format!(" [{tag}]"));
        }
        display
    }
}

/// LIVE while `starts_at <= now < ends_at`, ENDED once `ends_at <= now`
pub fn status_at(
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> EventStatus {
    if ends_at <= now {
        EventStatus::Ended
    } else if starts_at <= now {
        EventStatus::Live
    } else {
        EventStatus::Upcoming
    }
}

/// Unix seconds from a number or numeric string; zero and null mean unset
fn timestamp(value: Option<&Value>, name: &str, field: &str) -> Option<DateTime<Utc>> {
    let seconds = match value? {
        Value::Null => return None,
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    match seconds {
        Some(0) => None,
        Some(seconds) => {
            let parsed = Utc.timestamp_opt(seconds, 0).single();
            if parsed.is_none() {
                warn!("Event '{}' has out-of-range {}: {}", name, field, seconds);
            }
            parsed
        }
        None => {
            warn!("Event '{}' has malformed {}, skipping value", name, field);
            None
        }
    }
}
