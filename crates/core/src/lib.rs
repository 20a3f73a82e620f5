//! `melorate-core`: contest entries, ratings and the id/normalization
//! helpers every other crate compares entries with.

pub mod ids;
pub mod model;

pub use ids::{create_entry_id, fold_text, normalize_text, word_tokens};
pub use model::{
    CanonicalEntry, CategoryKey, CategoryRating, Entry, MigratedEntry, Profile, StoredEntry,
    UserRating,
};
