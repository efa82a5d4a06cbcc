//! Daily history reset
//!
//! The persisted playlist only carries state forward while its `#DATE:` marker
//! matches today's date in the feed's reference timezone.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{debug, info};

use super::document::{BlockMap, PlaylistDocument};
use super::normalizer::EntryNormalizer;

/// Calendar date of `now` in the reference timezone
pub fn today<Tz: TimeZone>(timezone: &Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(timezone).date_naive()
}

/// Blocks of the persisted playlist that may be reused today.
///
/// A missing file, a missing or unreadable date marker, or a marker for any
/// other day all yield an empty map.
pub fn load_prior_state(
    contents: Option<&str>,
    today: NaiveDate,
    normalizer: &EntryNormalizer,
) -> BlockMap {
    let Some(contents) = contents else {
        debug!("No persisted playlist, starting fresh");
        return BlockMap::new();
    };

    let document = PlaylistDocument::parse(contents, normalizer);
    match document.date {
        Some(date) if date == today => {
            debug!("Reusing {} entries from {}", document.blocks.len(), date);
            document.blocks
        }
        Some(date) => {
            info!("Persisted playlist is from {}, resetting history for {}", date, today);
            BlockMap::new()
        }
        None => {
            info!("Persisted playlist has no date marker, resetting history");
            BlockMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizerConfig;
    use chrono_tz::Asia::Manila;
    use chrono_tz::America::Los_Angeles;

    const PLAYLIST: &str = "#EXTM3U
#DATE: 2025-01-05
#EXTINF:-1 tvg-id=\"A|ENDED\" group-title=\"Ended Games\",Finished Game
https://cdn/finished.m3u8";

    fn normalizer() -> EntryNormalizer {
        EntryNormalizer::new(&NormalizerConfig::default()).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_today_follows_reference_timezone() {
        // 2025-01-05 17:30 UTC is already the 6th in Manila, still the 5th in Los Angeles
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 17, 30, 0).unwrap();
        assert_eq!(today(&Manila, now), date(6));
        assert_eq!(today(&Los_Angeles, now), date(5));
    }

    #[test]
    fn test_same_day_state_is_kept() {
        let blocks = load_prior_state(Some(PLAYLIST), date(5), &normalizer());
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_yesterday_is_discarded() {
        let blocks = load_prior_state(Some(PLAYLIST), date(6), &normalizer());
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_missing_or_malformed_marker_is_discarded() {
        let normalizer = normalizer();
        assert!(load_prior_state(None, date(5), &normalizer).is_empty());

        let undated = PLAYLIST.replace("#DATE: 2025-01-05\n", "");
        assert!(load_prior_state(Some(&undated), date(5), &normalizer).is_empty());

        let garbled = PLAYLIST.replace("2025-01-05", "05/01/2025");
        assert!(load_prior_state(Some(&garbled), date(5), &normalizer).is_empty());

        assert!(load_prior_state(Some(""), date(5), &normalizer).is_empty());
    }

    #[test]
    fn test_marker_must_lead_the_file() {
        // A date line buried among entries is not a day marker
        let buried = "#EXTM3U\n#EXTINF:-1,Solo\n#DATE: 2025-01-05\nhttps://solo.m3u8";
        assert!(load_prior_state(Some(buried), date(5), &normalizer()).is_empty());
    }
}
