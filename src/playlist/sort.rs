use super::block::EntryBlock;
use super::document::BlockMap;

/// Order blocks for display: LIVE, then UPCOMING and NO_STREAM, then ENDED.
///
/// Within a bucket blocks are ordered by normalized key; the sort is stable.
pub fn sort_for_display(blocks: BlockMap) -> Vec<EntryBlock> {
    let mut entries: Vec<_> = blocks.into_iter().collect();
    entries.sort_by_cached_key(|(key, block)| (block.status().display_rank(), key.clone()));
    entries.into_iter().map(|(_, block)| block).collect()
}
