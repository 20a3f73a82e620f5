use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::create_entry_id;

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// The six scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Song,
    Clothes,
    Scenography,
    Vocals,
    Lyrics,
    Postcard,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 6] = [
        CategoryKey::Song,
        CategoryKey::Clothes,
        CategoryKey::Scenography,
        CategoryKey::Vocals,
        CategoryKey::Lyrics,
        CategoryKey::Postcard,
    ];
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Song => write!(f, "song"),
            Self::Clothes => write!(f, "clothes"),
            Self::Scenography => write!(f, "scenography"),
            Self::Vocals => write!(f, "vocals"),
            Self::Lyrics => write!(f, "lyrics"),
            Self::Postcard => write!(f, "postcard"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRating {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// One profile's scores for one entry.
///
/// `total_score` must equal the sum of the category ratings. Writers keep it
/// in sync; migration carries it over untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    pub profile_id: String,
    pub profile_name: String,
    #[serde(default)]
    pub ratings: BTreeMap<CategoryKey, CategoryRating>,
    #[serde(default)]
    pub total_score: u32,
}

impl UserRating {
    pub fn new(
        profile_id: impl Into<String>,
        profile_name: impl Into<String>,
        ratings: BTreeMap<CategoryKey, CategoryRating>,
    ) -> Self {
        let mut rating = Self {
            profile_id: profile_id.into(),
            profile_name: profile_name.into(),
            ratings,
            total_score: 0,
        };
        rating.recompute_total();
        rating
    }

    pub fn computed_total(&self) -> u32 {
        self.ratings.values().map(|r| u32::from(r.rating)).sum()
    }

    pub fn is_total_consistent(&self) -> bool {
        self.total_score == self.computed_total()
    }

    pub fn recompute_total(&mut self) {
        self.total_score = self.computed_total();
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A contest entry as persisted, with the ratings attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub number: i64,
    pub artist: String,
    pub song: String,
    pub heat: String,
    pub heat_date: String,
    #[serde(default)]
    pub user_ratings: Vec<UserRating>,
}

/// An entry loaded from a previous app version.
pub type StoredEntry = Entry;

/// An entry rebuilt from the canonical roster. Only `user_ratings` ever
/// comes from stored data.
pub type MigratedEntry = Entry;

impl Entry {
    /// `"{artist} - {song}"`, used in user-facing reports.
    pub fn label(&self) -> String {
        format!("{} - {}", self.artist, self.song)
    }

    pub fn rating_count(&self) -> usize {
        self.user_ratings.len()
    }
}

/// An entry of the roster shipped with the current app version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    pub number: u32,
    pub artist: String,
    pub song: String,
    pub heat: String,
    pub heat_date: NaiveDate,
}

impl CanonicalEntry {
    pub fn id(&self) -> String {
        create_entry_id(&self.artist, &self.song)
    }

    /// Fresh entry with no ratings.
    pub fn to_entry(&self) -> MigratedEntry {
        Entry {
            id: self.id(),
            number: i64::from(self.number),
            artist: self.artist.clone(),
            song: self.song.clone(),
            heat: self.heat.clone(),
            heat_date: self.heat_date.format("%Y-%m-%d").to_string(),
            user_ratings: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// A named rating identity. Ratings reference it by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
}
