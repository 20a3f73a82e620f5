use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::MigrateError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MigrateConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub collisions: CollisionConfig,
}

impl MigrateConfig {
    pub fn from_toml(s: &str) -> Result<Self, MigrateError> {
        let config: Self = toml::from_str(s).map_err(|e| MigrateError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MigrateError> {
        let strategies = &self.matching.strategies;
        if strategies.is_empty() {
            return Err(MigrateError::ConfigValidation(
                "matching.strategies must list at least one strategy".into(),
            ));
        }

        let mut seen = HashSet::new();
        for s in strategies {
            if !seen.insert(*s) {
                return Err(MigrateError::ConfigValidation(format!(
                    "matching.strategies lists '{s}' more than once"
                )));
            }
        }

        if self.matching.min_shared_tokens == 0 {
            return Err(MigrateError::ConfigValidation(
                "matching.min_shared_tokens must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// One tier of the matching cascade. Tiers are tried in list order and the
/// first tier with a hit decides the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// `stored.id == candidate.id`
    ExactId,
    /// Normalized artist and normalized song both equal.
    NormalizedArtistSong,
    /// Normalized song equal, artist ignored.
    NormalizedSong,
    /// Enough shared artist words or shared song words.
    WordOverlap,
    /// Same running number in the same heat.
    Position,
}

impl MatchStrategy {
    pub const CASCADE: [MatchStrategy; 5] = [
        MatchStrategy::ExactId,
        MatchStrategy::NormalizedArtistSong,
        MatchStrategy::NormalizedSong,
        MatchStrategy::WordOverlap,
        MatchStrategy::Position,
    ];
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactId => write!(f, "exact_id"),
            Self::NormalizedArtistSong => write!(f, "normalized_artist_song"),
            Self::NormalizedSong => write!(f, "normalized_song"),
            Self::WordOverlap => write!(f, "word_overlap"),
            Self::Position => write!(f, "position"),
        }
    }
}

/// How names are split into words for [`MatchStrategy::WordOverlap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordOverlapMode {
    /// Split on whitespace first, then normalize each word.
    #[default]
    Tokens,
    /// Normalize the whole name first. Every name collapses to a single
    /// word, so overlap degrades to whole-name equality on either side.
    LegacyCollapsed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_strategies")]
    pub strategies: Vec<MatchStrategy>,
    #[serde(default)]
    pub word_overlap: WordOverlapMode,
    #[serde(default = "default_min_shared_tokens")]
    pub min_shared_tokens: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            word_overlap: WordOverlapMode::default(),
            min_shared_tokens: default_min_shared_tokens(),
        }
    }
}

fn default_strategies() -> Vec<MatchStrategy> {
    MatchStrategy::CASCADE.to_vec()
}

fn default_min_shared_tokens() -> usize {
    2
}

// ---------------------------------------------------------------------------
// Collisions
// ---------------------------------------------------------------------------

/// What happens when a second stored entry resolves to a canonical entry
/// that already received ratings in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the first claim; the later entry's ratings are counted lost.
    #[default]
    Reject,
    /// Later claim replaces the earlier one; the displaced ratings are
    /// counted lost.
    Overwrite,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollisionConfig {
    #[serde(default)]
    pub policy: CollisionPolicy,
}
