use chrono_tz::Tz;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult, FeedError};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Prefix for environment overrides, e.g. `SPORTS_WEBCAST_PLAYLIST__OUTPUT_PATH`
pub const ENV_PREFIX: &str = "SPORTS_WEBCAST_";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// How the feed snapshot is windowed and labelled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Reference timezone for "today" and for displayed start times
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Suffix appended to displayed start times (e.g. "PHT", "PT")
    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,
    /// Number of calendar days, starting today, that events are selected from
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    /// Assumed event length when the feed omits `ends_at`
    #[serde(default = "default_event_duration", with = "duration_serde::duration")]
    pub default_event_duration: Duration,
    /// Categories whose name contains any of these markers are skipped
    #[serde(default = "default_skipped_category_markers")]
    pub skipped_category_markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// First line of the written playlist, passed through verbatim
    #[serde(default = "default_playlist_header")]
    pub header: String,
    /// Group label given to entries that fell out of the feed
    #[serde(default = "default_ended_group")]
    pub ended_group: String,
    /// Placeholder emitted when no media URL was resolved
    #[serde(default = "default_unavailable_url")]
    pub unavailable_url: String,
    #[serde(default = "default_no_stream_prefix")]
    pub no_stream_prefix: String,
    /// Auxiliary `#EXTVLCOPT:` lines written after every header
    #[serde(default = "default_vlc_options")]
    pub vlc_options: Vec<String>,
    /// Rewrite `.../index.m3u8` to `.../tracks-v1a1/mono.ts.m3u8`
    #[serde(default = "default_rewrite_index_playlists")]
    pub rewrite_index_playlists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Status glyphs stripped anywhere in a title
    #[serde(default = "default_status_glyphs")]
    pub status_glyphs: Vec<String>,
    /// Status words stripped when they lead a title as "<word> - "
    #[serde(default = "default_legacy_prefixes")]
    pub legacy_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_tvg_id")]
    pub default_tvg_id: String,
    #[serde(default = "default_fallback_group_prefix")]
    pub fallback_group_prefix: String,
    #[serde(default = "default_unknown_category")]
    pub unknown_category: String,
    /// Team names that mark a basketball event as NBA
    #[serde(default = "default_nba_teams")]
    pub nba_teams: Vec<String>,
    /// College nicknames that mark a basketball event as NCAA
    #[serde(default = "default_ncaa_keywords")]
    pub ncaa_keywords: Vec<String>,
    #[serde(default = "default_category_logo_map")]
    pub logos: BTreeMap<String, String>,
    #[serde(default = "default_category_tvg_id_map")]
    pub tvg_ids: BTreeMap<String, String>,
    #[serde(default = "default_category_group_map")]
    pub groups: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first)
    #[serde(default = "default_cron")]
    pub cron: String,
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

// Feed defaults
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_timezone_label() -> String {
    DEFAULT_TIMEZONE_LABEL.to_string()
}

fn default_lookahead_days() -> u32 {
    DEFAULT_LOOKAHEAD_DAYS
}

fn default_event_duration() -> Duration {
    humantime::parse_duration(DEFAULT_EVENT_DURATION).unwrap_or(Duration::from_secs(4 * 3600))
}

fn default_skipped_category_markers() -> Vec<String> {
    to_owned_list(DEFAULT_SKIPPED_CATEGORY_MARKERS)
}

// Playlist defaults
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_playlist_header() -> String {
    DEFAULT_PLAYLIST_HEADER.to_string()
}

fn default_ended_group() -> String {
    DEFAULT_ENDED_GROUP.to_string()
}

fn default_unavailable_url() -> String {
    DEFAULT_UNAVAILABLE_URL.to_string()
}

fn default_no_stream_prefix() -> String {
    DEFAULT_NO_STREAM_PREFIX.to_string()
}

fn default_vlc_options() -> Vec<String> {
    to_owned_list(DEFAULT_VLC_OPTIONS)
}

fn default_rewrite_index_playlists() -> bool {
    DEFAULT_REWRITE_INDEX_PLAYLISTS
}

// Normalizer defaults
fn default_status_glyphs() -> Vec<String> {
    to_owned_list(DEFAULT_STATUS_GLYPHS)
}

fn default_legacy_prefixes() -> Vec<String> {
    to_owned_list(DEFAULT_LEGACY_PREFIXES)
}

// Catalog defaults
fn default_tvg_id() -> String {
    DEFAULT_TVG_ID.to_string()
}

fn default_fallback_group_prefix() -> String {
    DEFAULT_FALLBACK_GROUP_PREFIX.to_string()
}

fn default_unknown_category() -> String {
    DEFAULT_UNKNOWN_CATEGORY.to_string()
}

fn default_category_logo_map() -> BTreeMap<String, String> {
    default_category_logos()
        .into_iter()
        .map(|(category, logo)| (category.to_string(), logo))
        .collect()
}

fn default_category_tvg_id_map() -> BTreeMap<String, String> {
    to_owned_map(DEFAULT_CATEGORY_TVG_IDS)
}

fn default_category_group_map() -> BTreeMap<String, String> {
    to_owned_map(DEFAULT_CATEGORY_GROUPS)
}

fn default_nba_teams() -> Vec<String> {
    to_owned_list(DEFAULT_NBA_TEAMS)
}

fn default_ncaa_keywords() -> Vec<String> {
    to_owned_list(DEFAULT_NCAA_KEYWORDS)
}

// Schedule defaults
fn default_cron() -> String {
    DEFAULT_CRON.to_string()
}

fn default_run_on_start() -> bool {
    DEFAULT_RUN_ON_START
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn to_owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            timezone_label: default_timezone_label(),
            lookahead_days: default_lookahead_days(),
            default_event_duration: default_event_duration(),
            skipped_category_markers: default_skipped_category_markers(),
        }
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            header: default_playlist_header(),
            ended_group: default_ended_group(),
            unavailable_url: default_unavailable_url(),
            no_stream_prefix: default_no_stream_prefix(),
            vlc_options: default_vlc_options(),
            rewrite_index_playlists: default_rewrite_index_playlists(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            status_glyphs: default_status_glyphs(),
            legacy_prefixes: default_legacy_prefixes(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_tvg_id: default_tvg_id(),
            fallback_group_prefix: default_fallback_group_prefix(),
            unknown_category: default_unknown_category(),
            logos: default_category_logo_map(),
            tvg_ids: default_category_tvg_id_map(),
            groups: default_category_group_map(),
            nba_teams: default_nba_teams(),
            ncaa_keywords: default_ncaa_keywords(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            run_on_start: default_run_on_start(),
        }
    }
}

impl FeedConfig {
    /// Parse the configured reference timezone
    pub fn reference_timezone(&self) -> Result<Tz, FeedError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| FeedError::InvalidTimezone(self.timezone.clone()))
    }
}

impl Config {
    /// Load defaults, then the TOML file, then `SPORTS_WEBCAST_*` env overrides.
    ///
    /// A missing file is created from the defaults so operators have a template.
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        let path = Path::new(config_file);
        if !path.exists() {
            let contents = toml::to_string_pretty(&Self::default())
                .map_err(|e| AppError::configuration(format!("Failed to render defaults: {e}")))?;
            std::fs::write(path, contents).map_err(|e| {
                AppError::configuration(format!("Failed to create {config_file}: {e}"))
            })?;
            info!("Created default config file: {}", config_file);
        }

        let config = Self::figment(path).extract::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> AppResult<()> {
        self.feed.reference_timezone()?;
        if !(1..=MAX_LOOKAHEAD_DAYS).contains(&self.feed.lookahead_days) {
            return Err(AppError::configuration(format!(
                "feed.lookahead_days must be between 1 and {MAX_LOOKAHEAD_DAYS}"
            )));
        }
        if self.playlist.ended_group.trim().is_empty() {
            return Err(AppError::configuration(
                "playlist.ended_group must not be empty",
            ));
        }
        if !self.playlist.header.starts_with("#EXTM3U") {
            return Err(AppError::configuration(
                "playlist.header must start with #EXTM3U",
            ));
        }
        Ok(())
    }
}
