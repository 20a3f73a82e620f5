use std::collections::BTreeSet;

use melorate_core::{normalize_text, word_tokens, MigratedEntry, StoredEntry};

use crate::config::{MatchStrategy, MatchingConfig, WordOverlapMode};
use crate::model::MatchHit;

/// Resolves stored entries against the fresh canonical entry list.
///
/// Strategies run in configured order. The first strategy with any hit
/// wins, and within a strategy the first candidate in canonical order wins.
/// There is no scoring across strategies.
#[derive(Debug, Clone)]
pub struct Matcher {
    strategies: Vec<MatchStrategy>,
    word_overlap: WordOverlapMode,
    min_shared_tokens: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

impl Matcher {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            strategies: config.strategies.clone(),
            word_overlap: config.word_overlap,
            min_shared_tokens: config.min_shared_tokens,
        }
    }

    pub fn strategies(&self) -> &[MatchStrategy] {
        &self.strategies
    }

    pub fn find_match(&self, stored: &StoredEntry, candidates: &[MigratedEntry]) -> Option<MatchHit> {
        self.strategies.iter().find_map(|&strategy| {
            candidates
                .iter()
                .position(|candidate| self.matches(strategy, stored, candidate))
                .map(|index| MatchHit { index, strategy })
        })
    }

    /// Whether a single strategy accepts `candidate` for `stored`.
    pub fn matches(&self, strategy: MatchStrategy, stored: &StoredEntry, candidate: &MigratedEntry) -> bool {
        match strategy {
            MatchStrategy::ExactId => match_exact_id(stored, candidate),
            MatchStrategy::NormalizedArtistSong => match_normalized_artist_song(stored, candidate),
            MatchStrategy::NormalizedSong => match_normalized_song(stored, candidate),
            MatchStrategy::WordOverlap => {
                match_word_overlap(stored, candidate, self.word_overlap, self.min_shared_tokens)
            }
            MatchStrategy::Position => match_position(stored, candidate),
        }
    }
}

pub fn match_exact_id(stored: &StoredEntry, candidate: &MigratedEntry) -> bool {
    !stored.id.is_empty() && stored.id == candidate.id
}

/// Empty keys never match: a name made only of punctuation or non-Latin
/// script normalizes to nothing.
fn same_key(a: &str, b: &str) -> bool {
    let a = normalize_text(a);
    !a.is_empty() && a == normalize_text(b)
}

pub fn match_normalized_artist_song(stored: &StoredEntry, candidate: &MigratedEntry) -> bool {
    same_key(&stored.artist, &candidate.artist) && same_key(&stored.song, &candidate.song)
}

pub fn match_normalized_song(stored: &StoredEntry, candidate: &MigratedEntry) -> bool {
    same_key(&stored.song, &candidate.song)
}

fn words(text: &str, mode: WordOverlapMode) -> BTreeSet<String> {
    match mode {
        WordOverlapMode::Tokens => word_tokens(text),
        WordOverlapMode::LegacyCollapsed => {
            let key = normalize_text(text);
            if key.is_empty() {
                BTreeSet::new()
            } else {
                BTreeSet::from([key])
            }
        }
    }
}

/// Shared words reach `min(min_shared, stored word count)`.
fn enough_overlap(stored: &str, candidate: &str, mode: WordOverlapMode, min_shared: usize) -> bool {
    let stored_words = words(stored, mode);
    if stored_words.is_empty() {
        return false;
    }
    let candidate_words = words(candidate, mode);
    let shared = stored_words.intersection(&candidate_words).count();
    shared >= min_shared.min(stored_words.len())
}

pub fn match_word_overlap(
    stored: &StoredEntry,
    candidate: &MigratedEntry,
    mode: WordOverlapMode,
    min_shared: usize,
) -> bool {
    enough_overlap(&stored.artist, &candidate.artist, mode, min_shared)
        || enough_overlap(&stored.song, &candidate.song, mode, min_shared)
}

pub fn match_position(stored: &StoredEntry, candidate: &MigratedEntry) -> bool {
    stored.number == candidate.number && stored.heat == candidate.heat
}
