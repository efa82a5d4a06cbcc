//! Playlist state merge engine
//!
//! Turns a fresh build and the persisted playlist into the next playlist file:
//! entries are keyed by [`NormalizedKey`], merged with [`Reconciler`], gated on
//! the day marker and ordered by [`sort_for_display`]. Nothing in this module
//! does I/O or returns an error.

pub mod block;
pub mod builder;
pub mod document;
pub mod extinf;
pub mod gate;
pub mod merge;
pub mod normalizer;
pub mod sort;

pub use block::{EntryBlock, EntryHeader};
pub use builder::PlaylistBuilder;
pub use document::{BlockMap, PlaylistDocument, parse_blocks, serialize};
pub use extinf::{ExtInf, StatusUpdate, get_status, set_status};
pub use gate::{load_prior_state, today};
pub use merge::{MergeOutcome, Reconciler};
pub use normalizer::{EntryNormalizer, NormalizedKey};
pub use sort::sort_for_display;
