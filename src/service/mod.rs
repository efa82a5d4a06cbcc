//! One refresh run: feed snapshot in, merged playlist file out

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::catalog::CategoryCatalog;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::feed::{self, FeedSelector, FeedSnapshot};
use crate::models::{EventStatus, ResolvedStreams};
use crate::playlist::{
    EntryBlock, EntryNormalizer, MergeOutcome, PlaylistBuilder, Reconciler, load_prior_state,
    parse_blocks, serialize, sort_for_display, today,
};
use crate::store::PlaylistStore;

/// Locations of the producer documents
#[derive(Debug, Clone)]
pub struct FeedInputs {
    pub snapshot: PathBuf,
    /// Resolver output; without it every event is written as NO_STREAM
    pub resolved: Option<PathBuf>,
}

/// What a run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub date: NaiveDate,
    pub candidates: usize,
    pub entries: usize,
    pub live: usize,
    pub upcoming: usize,
    pub no_stream: usize,
    pub ended: usize,
    pub merge: MergeOutcome,
}

impl RefreshSummary {
    fn new(
        date: NaiveDate,
        candidates: usize,
        blocks: &[EntryBlock],
        merge: MergeOutcome,
    ) -> Self {
        let mut summary = Self {
            date,
            candidates,
            entries: blocks.len(),
            live: 0,
            upcoming: 0,
            no_stream: 0,
            ended: 0,
            merge,
        };
        for block in blocks {
            match block.status() {
                EventStatus::Live => summary.live += 1,
                EventStatus::Upcoming => summary.upcoming += 1,
                EventStatus::NoStream => summary.no_stream += 1,
                EventStatus::Ended => summary.ended += 1,
            }
        }
        summary
    }
}

impl fmt::Display for RefreshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} entries ({} live, {} upcoming, {} no stream, {} ended)",
            self.date, self.entries, self.live, self.upcoming, self.no_stream, self.ended
        )
    }
}

pub struct RefreshService {
    selector: FeedSelector,
    catalog: CategoryCatalog,
    builder: PlaylistBuilder,
    normalizer: EntryNormalizer,
    reconciler: Reconciler,
    store: PlaylistStore,
    header: String,
    inputs: FeedInputs,
}

impl RefreshService {
    pub fn new(config: &Config, inputs: FeedInputs) -> AppResult<Self> {
        let catalog = CategoryCatalog::from_config(&config.catalog);
        let normalizer = EntryNormalizer::new(&config.normalizer)
            .map_err(|e| AppError::configuration(format!("Invalid normalizer markers: {e}")))?;

        Ok(Self {
            selector: FeedSelector::new(config.feed.clone())?,
            builder: PlaylistBuilder::new(catalog.clone(), config.playlist.clone()),
            catalog,
            normalizer,
            reconciler: Reconciler::new(config.playlist.ended_group.clone()),
            store: PlaylistStore::new(config.playlist.output_path.clone()),
            header: config.playlist.header.clone(),
            inputs,
        })
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// Read the producer documents, merge with the persisted playlist and
    /// replace it. A missing or invalid feed snapshot fails the run before
    /// anything is written.
    pub fn run_once(&self, now: DateTime<Utc>) -> AppResult<RefreshSummary> {
        let snapshot = feed::load_snapshot(&self.inputs.snapshot)?;
        let resolved = match &self.inputs.resolved {
            Some(path) => feed::load_resolved(path)?,
            None => {
                warn!("No resolved streams given, every event will be written as NO_STREAM");
                ResolvedStreams::new()
            }
        };

        let previous = self.store.load();
        let (contents, summary) = self.refresh(&snapshot, &resolved, previous.as_deref(), now);
        self.store.save(&contents)?;

        info!("Playlist refreshed for {}", summary);
        Ok(summary)
    }

    /// Pure core of a run: the next file contents given the previous ones
    pub fn refresh(
        &self,
        snapshot: &FeedSnapshot,
        resolved: &ResolvedStreams,
        previous: Option<&str>,
        now: DateTime<Utc>,
    ) -> (String, RefreshSummary) {
        let candidates = self.selector.select(snapshot, now, &self.catalog);
        let fresh_lines = self.builder.build(&candidates, resolved);
        let fresh = parse_blocks(fresh_lines.iter().map(String::as_str), &self.normalizer);

        let today = today(&self.selector.timezone(), now);
        let prior = load_prior_state(previous, today, &self.normalizer);
        debug!("Merging {} fresh entries into {} prior entries", fresh.len(), prior.len());

        let (merged, outcome) = self.reconciler.merge(prior, fresh);
        if outcome.status_rewrite_failures > 0 {
            warn!(
                "{} carried entries could not be marked ENDED",
                outcome.status_rewrite_failures
            );
        }
        info!(
            "Merge: {} added, {} refreshed, {} carried, {} newly ended",
            outcome.added, outcome.refreshed, outcome.carried, outcome.newly_ended
        );

        let ordered = sort_for_display(merged);
        let summary = RefreshSummary::new(today, candidates.len(), &ordered, outcome);
        let contents = serialize(&self.header, today, &ordered).join("\n");
        (contents, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedCategory, FeedEvent};
    use chrono::{Duration, TimeZone};
    use serde_json::Value;

    // 11:00 in Manila
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 3, 0, 0).unwrap()
    }

    fn service() -> RefreshService {
        let inputs = FeedInputs {
            snapshot: PathBuf::from("unused.json"),
            resolved: None,
        };
        RefreshService::new(&Config::default(), inputs).unwrap()
    }

    fn feed(events: &[(&str, i64)]) -> FeedSnapshot {
        FeedSnapshot {
            streams: vec![FeedCategory {
                category: "Darts".to_string(),
                streams: events
                    .iter()
                    .map(|(name, offset)| FeedEvent {
                        name: Some(name.to_string()),
                        iframe: Some(format!("https://embed/{name}")),
                        starts_at: Some(Value::from((now() + Duration::hours(*offset)).timestamp())),
                        ..FeedEvent::default()
                    })
                    .collect(),
            }],
        }
    }

    fn resolve_all(
        service: &RefreshService,
        snapshot: &FeedSnapshot,
        at: DateTime<Utc>,
    ) -> ResolvedStreams {
        let mut resolved = ResolvedStreams::new();
        for candidate in service.selector.select(snapshot, at, &service.catalog) {
            let url = format!("https://cdn/{}/index.m3u8", candidate.name.len());
            resolved.insert(candidate.identity(), url);
        }
        resolved
    }

    #[test]
    fn test_first_run_writes_header_and_date() {
        let service = service();
        let snapshot = feed(&[("Alpha", 1), ("Bravo", -1)]);
        let resolved = resolve_all(&service, &snapshot, now());

        let (contents, summary) = service.refresh(&snapshot, &resolved, None, now());
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("#EXTM3U url-tvg="));
        assert_eq!(lines[1], "#DATE: 2025-01-05");
        assert!(lines[2].contains("|LIVE") && lines[2].ends_with(",Bravo (Jan 05 @ 10:00 AM PHT)"));
        assert!(!contents.ends_with('\n'));
        assert_eq!((summary.live, summary.upcoming, summary.entries), (1, 1, 2));
    }

    #[test]
    fn test_rerun_without_feed_change_is_stable() {
        let service = service();
        let snapshot = feed(&[("Alpha", 1), ("Bravo", -1)]);
        let resolved = resolve_all(&service, &snapshot, now());

        let (first, _) = service.refresh(&snapshot, &resolved, None, now());
        let (second, summary) = service.refresh(&snapshot, &resolved, Some(&first), now());
        assert_eq!(first, second);
        assert_eq!(summary.merge.newly_ended, 0);
    }

    #[test]
    fn test_dropped_event_is_kept_as_ended() {
        let service = service();
        let morning = feed(&[("Alpha", 1), ("Bravo", -1)]);
        let resolved = resolve_all(&service, &morning, now());
        let (first, _) = service.refresh(&morning, &resolved, None, now());

        let later = now() + Duration::hours(2);
        let afternoon = feed(&[("Alpha", 1)]);
        let (second, summary) = service.refresh(&afternoon, &resolved, Some(&first), later);

        let last = second.lines().filter(|line| line.starts_with("#EXTINF")).last().unwrap();
        assert!(last.contains("|ENDED") && last.contains(r#"group-title="Ended Games""#));
        assert!(last.contains("Bravo"));
        assert_eq!(summary.merge.newly_ended, 1);
        assert_eq!(summary.ended, 1);
    }

    #[test]
    fn test_new_day_discards_history() {
        let service = service();
        let snapshot = feed(&[("Alpha", 1), ("Bravo", -1)]);
        let resolved = resolve_all(&service, &snapshot, now());
        let (first, _) = service.refresh(&snapshot, &resolved, None, now());

        let tomorrow = now() + Duration::days(1);
        let empty = FeedSnapshot::default();
        let (second, summary) = service.refresh(&empty, &resolved, Some(&first), tomorrow);
        assert_eq!(second, format!("{}\n#DATE: 2025-01-06", service.header));
        assert_eq!(summary.entries, 0);
    }
}
