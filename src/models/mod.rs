use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle status of an event entry
///
/// Encoded inline in the entry header as the suffix of the `tvg-id`
/// attribute (`Base.Id|STATUS`), never inside the display name.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EventStatus {
    #[default]
    Upcoming,
    Live,
    Ended,
    NoStream,
}

impl EventStatus {
    /// Display bucket: live first, then anything still pending, then ended
    pub fn display_rank(self) -> u8 {
        match self {
            EventStatus::Live => 0,
            EventStatus::Upcoming | EventStatus::NoStream => 1,
            EventStatus::Ended => 2,
        }
    }

    pub fn is_ended(self) -> bool {
        matches!(self, EventStatus::Ended)
    }
}

/// Identity of a candidate event for stream URL lookup
///
/// Compared field by field, so the producer and the playlist builder cannot
/// drift apart on a string key format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventIdentity {
    pub name: String,
    pub category: String,
    pub source: String,
}

impl EventIdentity {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            source: source.into(),
        }
    }
}

/// Event selected from the feed for the current playlist run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    /// Display name, already carrying the formatted start time and `[tag]`
    pub name: String,
    pub category: String,
    /// Iframe / embed reference the media URLs were discovered from
    pub source: String,
    pub poster: Option<String>,
    pub status: EventStatus,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl CandidateEvent {
    pub fn identity(&self) -> EventIdentity {
        EventIdentity::new(&self.name, &self.category, &self.source)
    }
}

/// One producer record of discovered media URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedStreamRecord {
    #[serde(flatten)]
    pub identity: EventIdentity,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Media URLs discovered per event, keyed by [`EventIdentity`]
#[derive(Debug, Clone, Default)]
pub struct ResolvedStreams {
    urls: HashMap<EventIdentity, Vec<String>>,
}

impl ResolvedStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a URL for an event, ignoring exact duplicates
    pub fn insert(&mut self, identity: EventIdentity, url: impl Into<String>) {
        let url = url.into();
        let entry = self.urls.entry(identity).or_default();
        if !entry.contains(&url) {
            entry.push(url);
        }
    }

    /// URLs for an event, empty when nothing was resolved
    pub fn get(&self, identity: &EventIdentity) -> &[String] {
        self.urls.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl FromIterator<ResolvedStreamRecord> for ResolvedStreams {
    fn from_iter<I: IntoIterator<Item = ResolvedStreamRecord>>(iter: I) -> Self {
        let mut streams = ResolvedStreams::new();
        for record in iter {
            if record.urls.is_empty() {
                streams.urls.entry(record.identity).or_default();
                continue;
            }
            for url in record.urls {
                streams.insert(record.identity.clone(), url);
            }
        }
        streams
    }
}
