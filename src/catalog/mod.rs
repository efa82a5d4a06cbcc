//! Category lookup tables for playlist rendering
//!
//! The catalog is built once from [`CatalogConfig`] and passed by reference to
//! the feed selector and the playlist builder, so each feed can carry its own
//! logos, EPG ids and group labels.

use std::collections::BTreeMap;

use crate::config::CatalogConfig;

const BASKETBALL: &str = "Basketball";
const AMERICAN_FOOTBALL: &str = "American Football";
const COLLEGE_FOOTBALL: &str = "College Football";
const NBA: &str = "NBA";
const NCAA: &str = "NCAA";

#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    default_tvg_id: String,
    fallback_group_prefix: String,
    unknown_category: String,
    logos: BTreeMap<String, String>,
    tvg_ids: BTreeMap<String, String>,
    groups: BTreeMap<String, String>,
    nba_teams: Vec<String>,
    ncaa_keywords: Vec<String>,
}

impl CategoryCatalog {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            default_tvg_id: config.default_tvg_id.clone(),
            fallback_group_prefix: config.fallback_group_prefix.clone(),
            unknown_category: config.unknown_category.clone(),
            logos: config.logos.clone(),
            tvg_ids: config.tvg_ids.clone(),
            groups: config.groups.clone(),
            nba_teams: lowercase_all(&config.nba_teams),
            ncaa_keywords: lowercase_all(&config.ncaa_keywords),
        }
    }

    /// Refine a feed category using the event name.
    ///
    /// Basketball splits into NBA, NCAA or plain Basketball by team keyword;
    /// American Football with "college" in the name becomes College Football.
    /// A blank category maps to the configured unknown category.
    pub fn classify(&self, category: &str, name: &str) -> String {
        let category = category.trim();
        if category.is_empty() {
            return self.unknown_category.clone();
        }

        let name_lower = name.to_lowercase();
        if category.eq_ignore_ascii_case(BASKETBALL) {
            return self.classify_basketball(&name_lower).to_string();
        }
        if category.eq_ignore_ascii_case(AMERICAN_FOOTBALL) && name_lower.contains("college") {
            return COLLEGE_FOOTBALL.to_string();
        }
        category.to_string()
    }

    fn classify_basketball(&self, name_lower: &str) -> &'static str {
        if self.nba_teams.iter().any(|team| name_lower.contains(team.as_str())) {
            NBA
        } else if self
            .ncaa_keywords
            .iter()
            .any(|keyword| name_lower.contains(keyword.as_str()))
        {
            NCAA
        } else {
            BASKETBALL
        }
    }

    /// Group label shown by players, `<prefix><category>` when unmapped
    pub fn group(&self, category: &str) -> String {
        self.groups
            .get(category)
            .cloned()
            .unwrap_or_else(|| format!("{}{}", self.fallback_group_prefix, category))
    }

    /// Logo for an entry; an event poster takes precedence over the category logo
    pub fn logo(&self, category: &str, poster: Option<&str>) -> String {
        match poster.map(str::trim).filter(|p| !p.is_empty()) {
            Some(poster) => poster.to_string(),
            None => self.logos.get(category).cloned().unwrap_or_default(),
        }
    }

    /// Base EPG id, before the `|STATUS` suffix is appended
    pub fn tvg_id(&self, category: &str) -> &str {
        self.tvg_ids
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_tvg_id)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Basketball", "Lakers vs Celtics", "NBA")]
    #[case("basketball", "Duke Blue Devils vs Tar Heels", "NCAA")]
    #[case("Basketball", "Team A vs Team B", "Basketball")]
    #[case("American Football", "College Gameday: Ohio vs Michigan", "College Football")]
    #[case("American Football", "Chiefs vs Bills", "American Football")]
    #[case("Ice Hockey", "Leafs vs Habs", "Ice Hockey")]
    #[case("  ", "Anything", "Misc")]
    fn test_classify(#[case] category: &str, #[case] name: &str, #[case] expected: &str) {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.classify(category, name), expected);
    }

    #[test]
    fn test_group_falls_back_to_prefixed_category() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.group("NBA"), "NBA Games");
        assert_eq!(catalog.group("Rugby"), "PPVLand - Rugby");
    }

    #[test]
    fn test_poster_wins_over_category_logo() {
        let catalog = CategoryCatalog::default();
        assert_eq!(
            catalog.logo("NBA", Some("https://img/poster.png")),
            "https://img/poster.png"
        );
        assert!(catalog.logo("NBA", None).ends_with("/NBA.png"));
        assert!(catalog.logo("NBA", Some("  ")).ends_with("/NBA.png"));
        assert_eq!(catalog.logo("Rugby", None), "");
    }

    #[test]
    fn test_tvg_id_defaults() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.tvg_id("Darts"), "Darts.Dummy.us");
        assert_eq!(catalog.tvg_id("Rugby"), "Misc.Dummy.us");
    }

    #[test]
    fn test_injected_tables_replace_defaults() {
        let config = CatalogConfig {
            nba_teams: vec!["Sonics".to_string()],
            ..CatalogConfig::default()
        };
        let catalog = CategoryCatalog::from_config(&config);
        assert_eq!(catalog.classify("Basketball", "SONICS at Blazers"), "NBA");
    }
}
