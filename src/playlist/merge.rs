//! Reconciliation of the persisted playlist with a fresh build

use std::collections::HashSet;
use tracing::{debug, warn};

use super::document::BlockMap;
use super::extinf::StatusUpdate;
use super::normalizer::NormalizedKey;
use crate::models::EventStatus;

/// Counters describing what a merge did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Old entries absent from the fresh build
    pub carried: usize,
    /// Old entries replaced by a fresh block
    pub refreshed: usize,
    /// Fresh entries with no old counterpart
    pub added: usize,
    /// Carried entries moved to ENDED by this merge
    pub newly_ended: usize,
    /// Carried entries whose header has no `tvg-id` to hold a status
    pub status_rewrite_failures: usize,
}

/// Merges old and new block maps
#[derive(Debug, Clone)]
pub struct Reconciler {
    ended_group: String,
}

impl Reconciler {
    pub fn new(ended_group: impl Into<String>) -> Self {
        Self {
            ended_group: ended_group.into(),
        }
    }

    /// Combine the old and new maps.
    ///
    /// Every old block is kept; new blocks overwrite old ones with the same key
    /// and are appended otherwise. Old blocks missing from `new` are marked
    /// ENDED and moved to the ended group. Nothing ever leaves ENDED here.
    pub fn merge(&self, old: BlockMap, new: BlockMap) -> (BlockMap, MergeOutcome) {
        let mut outcome = MergeOutcome::default();
        let fresh: HashSet<NormalizedKey> = new.keys().cloned().collect();

        let mut merged = old;
        for (key, block) in new {
            match merged.insert(key, block) {
                Some(_) => outcome.refreshed += 1,
                None => outcome.added += 1,
            }
        }

        for (key, block) in merged.iter_mut() {
            if fresh.contains(key) {
                continue;
            }
            outcome.carried += 1;
            if block.status().is_ended() {
                continue;
            }

            let header = block.header_mut();
            let update = header.set_status(EventStatus::Ended);
            header.set_group(&self.ended_group);
            match update {
                StatusUpdate::Applied => {
                    outcome.newly_ended += 1;
                    debug!("Marked '{}' as ended", key);
                }
                StatusUpdate::MissingIdentifier => {
                    outcome.status_rewrite_failures += 1;
                    warn!("Entry '{}' has no tvg-id, its status cannot be set to ENDED", key);
                }
            }
        }

        (merged, outcome)
    }
}
