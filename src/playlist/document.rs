//! Line-level playlist parsing and serialization

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use super::block::{EntryBlock, EntryHeader};
use super::extinf::EXTINF_TAG;
use super::normalizer::{EntryNormalizer, NormalizedKey};

pub const PLAYLIST_TAG: &str = "#EXTM3U";
pub const DATE_TAG: &str = "#DATE:";
const DATE_FORMAT: &str = "%Y-%m-%d";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Insertion-ordered map of entry blocks keyed by normalized title.
///
/// Inserting an existing key replaces the block but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockMap {
    entries: Vec<(NormalizedKey, EntryBlock)>,
    index: HashMap<NormalizedKey, usize>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite in place, returning the replaced block
    pub fn insert(&mut self, key: NormalizedKey, block: EntryBlock) -> Option<EntryBlock> {
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, block)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, block));
                None
            }
        }
    }

    pub fn get(&self, key: &NormalizedKey) -> Option<&EntryBlock> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &NormalizedKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NormalizedKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &EntryBlock)> {
        self.entries.iter().map(|(key, block)| (key, block))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&NormalizedKey, &mut EntryBlock)> {
        self.entries.iter_mut().map(|(key, block)| (&*key, block))
    }
}

impl IntoIterator for BlockMap {
    type Item = (NormalizedKey, EntryBlock);
    type IntoIter = std::vec::IntoIter<(NormalizedKey, EntryBlock)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Group playlist lines into keyed blocks.
///
/// An `#EXTINF` line opens a block that runs to the next `#EXTINF`. Playlist
/// header and date marker lines are skipped, as is anything before the first
/// entry. Later blocks with the same key overwrite earlier ones.
pub fn parse_blocks<'a, I>(lines: I, normalizer: &EntryNormalizer) -> BlockMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blocks = BlockMap::new();
    let mut current: Option<(NormalizedKey, EntryBlock)> = None;
    let mut skipped = 0usize;

    for line in lines {
        if line.starts_with(PLAYLIST_TAG) || line.starts_with(DATE_TAG) {
            continue;
        }
        if line.starts_with(EXTINF_TAG) {
            if let Some((key, block)) = current.take() {
                blocks.insert(key, block);
            }
            current = Some((normalizer.normalize(line), EntryBlock::new(EntryHeader::parse(line))));
            continue;
        }
        match current.as_mut() {
            Some((_, block)) => block.push_line(line),
            None => skipped += 1,
        }
    }
    if let Some((key, block)) = current {
        blocks.insert(key, block);
    }

    if skipped > 0 {
        debug!("Ignored {} line(s) before the first playlist entry", skipped);
    }
    blocks
}

/// Header, date marker and blocks as lines, in the given block order
pub fn serialize<'a, I>(header: &str, date: NaiveDate, blocks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a EntryBlock>,
{
    let mut lines = vec![header.to_string(), date_marker(date)];
    for block in blocks {
        lines.extend(block.lines().map(|line| line.into_owned()));
    }
    lines
}

pub fn date_marker(date: NaiveDate) -> String {
    format!("{DATE_TAG} {}", date.format(DATE_FORMAT))
}

/// Date carried by a `#DATE: YYYY-MM-DD` line
pub fn parse_date_marker(line: &str) -> Option<NaiveDate> {
    let value = line.trim().strip_prefix(DATE_TAG)?.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// A whole playlist file
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDocument {
    /// `#EXTM3U` line, passed through as-is
    pub header: Option<String>,
    pub date: Option<NaiveDate>,
    pub blocks: BlockMap,
}

impl PlaylistDocument {
    /// Parse file contents leniently; nothing here can fail.
    ///
    /// The date marker is the first non-empty line after the `#EXTM3U` header,
    /// or the first non-empty line when the header is missing. A leading byte
    /// order mark is ignored.
    pub fn parse(contents: &str, normalizer: &EntryNormalizer) -> Self {
        let contents = contents.strip_prefix(BYTE_ORDER_MARK).unwrap_or(contents);
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty()).peekable();

        let header = lines
            .next_if(|line| line.starts_with(PLAYLIST_TAG))
            .map(str::to_string);
        let date = lines.peek().and_then(|line| parse_date_marker(line));

        Self {
            header,
            date,
            blocks: parse_blocks(contents.lines(), normalizer),
        }
    }
}
