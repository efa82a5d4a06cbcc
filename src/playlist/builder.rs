//! Rendering of candidate events into playlist lines

use std::collections::HashSet;
use tracing::debug;

use super::extinf::{ExtInf, GROUP_TITLE, TVG_ID, TVG_LOGO};
use crate::catalog::CategoryCatalog;
use crate::config::PlaylistConfig;
use crate::models::{CandidateEvent, EventStatus, ResolvedStreams};

const INDEX_PLAYLIST: &str = "index.m3u8";
const TRACKS_PLAYLIST: &str = "tracks-v1a1/mono.ts.m3u8";

/// Builds the fresh playlist for one run
#[derive(Debug, Clone)]
pub struct PlaylistBuilder {
    catalog: CategoryCatalog,
    settings: PlaylistConfig,
}

impl PlaylistBuilder {
    pub fn new(catalog: CategoryCatalog, settings: PlaylistConfig) -> Self {
        Self { catalog, settings }
    }

    /// Render candidates as playlist lines, starting with the `#EXTM3U` header.
    ///
    /// Each resolved URL gets its own header; an event without URLs gets a
    /// single NO_STREAM entry pointing at the unavailable placeholder.
    /// Candidates whose name repeats (case-insensitively) are skipped.
    pub fn build(&self, candidates: &[CandidateEvent], resolved: &ResolvedStreams) -> Vec<String> {
        let mut lines = vec![self.settings.header.clone()];
        let mut seen = HashSet::new();

        for candidate in candidates {
            let name = candidate.name.trim();
            if !seen.insert(name.to_lowercase()) {
                debug!("Skipping duplicate event '{}'", name);
                continue;
            }

            let category = self.catalog.classify(&candidate.category, name);
            let group = self.catalog.group(&category);
            let logo = self.catalog.logo(&category, candidate.poster.as_deref());
            let base_id = self.catalog.tvg_id(&category);

            let urls = resolved.get(&candidate.identity());
            if urls.is_empty() {
                debug!("No stream resolved for '{}'", name);
                let title = format!("{}{}", self.settings.no_stream_prefix, name);
                let header = entry_header(title, base_id, EventStatus::NoStream, &logo, &group);
                self.push_entry(&mut lines, &header, &self.settings.unavailable_url);
                continue;
            }

            let header = entry_header(name, base_id, candidate.status, &logo, &group);
            for url in urls {
                self.push_entry(&mut lines, &header, &self.rewrite_url(url));
            }
        }

        lines
    }

    fn push_entry(&self, lines: &mut Vec<String>, header: &ExtInf, url: &str) {
        lines.push(header.render());
        lines.extend(self.settings.vlc_options.iter().cloned());
        lines.push(url.to_string());
    }

    /// Point HLS master playlists at the mono transport-stream rendition
    fn rewrite_url(&self, url: &str) -> String {
        if !self.settings.rewrite_index_playlists {
            return url.to_string();
        }
        match url.strip_suffix(INDEX_PLAYLIST) {
            Some(base) => format!("{base}{TRACKS_PLAYLIST}"),
            None => url.to_string(),
        }
    }
}

fn entry_header(
    title: impl Into<String>,
    base_id: &str,
    status: EventStatus,
    logo: &str,
    group: &str,
) -> ExtInf {
    ExtInf::new(title)
        .with_attribute(TVG_ID, format!("{base_id}|{status}"))
        .with_attribute(TVG_LOGO, logo)
        .with_attribute(GROUP_TITLE, group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventIdentity;
    use chrono::{TimeZone, Utc};

    fn candidate(name: &str, category: &str, status: EventStatus) -> CandidateEvent {
        let starts_at = Utc.with_ymd_and_hms(2025, 1, 5, 11, 0, 0).unwrap();
        CandidateEvent {
            name: name.to_string(),
            category: category.to_string(),
            source: format!("https://embed/{}", name.len()),
            poster: None,
            status,
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(4),
        }
    }

    fn builder() -> PlaylistBuilder {
        PlaylistBuilder::new(CategoryCatalog::default(), PlaylistConfig::default())
    }

    #[test]
    fn test_one_header_per_resolved_url() {
        let event = candidate("Lakers vs Celtics (Jan 05 @ 07:00 PM PHT)", "NBA", EventStatus::Live);
        let mut resolved = ResolvedStreams::new();
        resolved.insert(event.identity(), "https://cdn/a/index.m3u8");
        resolved.insert(event.identity(), "https://cdn/b/playlist.m3u8");

        let lines = builder().build(&[event], &resolved);
        let header = r#"#EXTINF:-1 tvg-id="NBA.Basketball.Dummy.us|LIVE" tvg-logo="http://drewlive24.duckdns.org:9000/Logos/NBA.png" group-title="NBA Games",Lakers vs Celtics (Jan 05 @ 07:00 PM PHT)"#;

        assert_eq!(lines.len(), 1 + 2 * 5);
        assert!(lines[0].starts_with("#EXTM3U"));
        assert_eq!(lines[1], header);
        assert!(lines[2].starts_with("#EXTVLCOPT:http-origin="));
        assert_eq!(lines[5], "https://cdn/a/tracks-v1a1/mono.ts.m3u8");
        assert_eq!(lines[6], header);
        assert_eq!(lines[10], "https://cdn/b/playlist.m3u8");
    }

    #[test]
    fn test_unresolved_event_gets_placeholder() {
        let mut event = candidate("Rugby Final", "Rugby", EventStatus::Upcoming);
        event.poster = Some("https://img/poster.jpg".to_string());

        let lines = builder().build(&[event], &ResolvedStreams::new());
        assert_eq!(
            lines[1],
            r#"#EXTINF:-1 tvg-id="Misc.Dummy.us|NO_STREAM" tvg-logo="https://img/poster.jpg" group-title="PPVLand - Rugby",❌ NO STREAM - Rugby Final"#
        );
        assert_eq!(lines.last().map(String::as_str), Some("https://example.com/stream_unavailable.m3u8"));
    }

    #[test]
    fn test_duplicate_names_are_skipped() {
        let first = candidate("Game One", "Darts", EventStatus::Live);
        let mut second = candidate("GAME ONE ", "Darts", EventStatus::Upcoming);
        second.source = "https://embed/other".to_string();

        let lines = builder().build(&[first, second], &ResolvedStreams::new());
        assert_eq!(lines.iter().filter(|line| line.starts_with("#EXTINF")).count(), 1);
    }

    #[test]
    fn test_lookup_uses_full_identity() {
        let event = candidate("Game", "Darts", EventStatus::Live);
        let mut resolved = ResolvedStreams::new();
        resolved.insert(EventIdentity::new("Game", "Darts", "https://embed/elsewhere"), "https://cdn/x");

        let lines = builder().build(&[event], &resolved);
        assert!(lines[1].contains("|NO_STREAM"));
    }

    #[test]
    fn test_index_rewrite_can_be_disabled() {
        let settings = PlaylistConfig {
            rewrite_index_playlists: false,
            vlc_options: Vec::new(),
            ..PlaylistConfig::default()
        };
        let builder = PlaylistBuilder::new(CategoryCatalog::default(), settings);
        let event = candidate("Game", "Darts", EventStatus::Live);
        let mut resolved = ResolvedStreams::new();
        resolved.insert(event.identity(), "https://cdn/index.m3u8");

        let lines = builder.build(&[event], &resolved);
        assert_eq!(lines, [
            lines[0].clone(),
            r#"#EXTINF:-1 tvg-id="Darts.Dummy.us|LIVE" tvg-logo="http://drewlive24.duckdns.org:9000/Logos/Darts.png" group-title="Darts",Game"#.to_string(),
            "https://cdn/index.m3u8".to_string(),
        ]);
    }
}
