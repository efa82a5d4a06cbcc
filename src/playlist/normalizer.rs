//! Identity keys for playlist entries
//!
//! Entries are matched across runs by a key derived from the display title:
//! status markers, bracketed tags and parenthesised start times are dropped so
//! the same event keeps its key while its title decorations change.

use regex::Regex;
use std::fmt;

use super::extinf::display_title;
use crate::config::NormalizerConfig;

/// Canonical, case- and punctuation-insensitive event identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct EntryNormalizer {
    glyphs: Option<Regex>,
    legacy_prefix: Option<Regex>,
    parenthesised: Regex,
    bracketed: Regex,
    disallowed: Regex,
    whitespace: Regex,
}

impl EntryNormalizer {
    /// Compile the stripping rules for the configured glyphs and prefixes
    pub fn new(config: &NormalizerConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            glyphs: alternation(&config.status_glyphs)
                .map(|pattern| Regex::new(&pattern))
                .transpose()?,
            legacy_prefix: alternation(&config.legacy_prefixes)
                .map(|pattern| Regex::new(&format!(r"^(?:{pattern})\s*-\s*")))
                .transpose()?,
            parenthesised: Regex::new(r"\(.*?\)")?,
            bracketed: Regex::new(r"\[.*?\]")?,
            disallowed: Regex::new(r"[^a-z0-9\s]")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Derive the identity key of a header line. Never fails; input without
    /// a title comma is treated as a bare title.
    pub fn normalize(&self, line: &str) -> NormalizedKey {
        let mut name = display_title(line).to_lowercase();

        if let Some(glyphs) = &self.glyphs {
            name = glyphs.replace_all(&name, "").into_owned();
        }
        if let Some(prefix) = &self.legacy_prefix {
            name = prefix.replace(name.trim_start(), "").into_owned();
        }

        let name = self.parenthesised.replace_all(&name, "");
        let name = self.bracketed.replace_all(&name, "");
        let name = self.disallowed.replace_all(&name, " ");
        let name = self.whitespace.replace_all(&name, " ");

        NormalizedKey(name.trim().to_string())
    }
}

/// `a|b|c` of the escaped, lowercased items; `None` when there are none
fn alternation(items: &[String]) -> Option<String> {
    let escaped: Vec<String> = items
        .iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .map(|item| regex::escape(&item))
        .collect();
    (!escaped.is_empty()).then(|| escaped.join("|"))
}
