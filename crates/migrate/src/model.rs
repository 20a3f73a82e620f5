use serde::Serialize;

use melorate_core::MigratedEntry;

use crate::config::MatchStrategy;

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// A resolved candidate: its index in the fresh entry list and the tier
/// that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchHit {
    pub index: usize,
    pub strategy: MatchStrategy,
}

/// Trace of one stored entry whose ratings were reattached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub stored_label: String,
    pub canonical_id: String,
    pub strategy: MatchStrategy,
    pub rating_count: usize,
}

// ---------------------------------------------------------------------------
// Migration output
// ---------------------------------------------------------------------------

/// Counts for one migration pass.
///
/// Every rating on a stored entry ends up in exactly one of
/// `migrated_count` or `lost_count`, so the two always sum to
/// `total_ratings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub migrated_count: usize,
    pub lost_count: usize,
    pub total_ratings: usize,
    /// `"{artist} - {song}"` for every stored entry whose ratings were lost.
    pub unmatched_entries: Vec<String>,
    /// Labels of stored entries that lost ratings because another stored
    /// entry resolved to the same canonical entry.
    pub collided_entries: Vec<String>,
    pub matches: Vec<MatchRecord>,
}

impl MigrationResult {
    pub fn is_balanced(&self) -> bool {
        self.migrated_count + self.lost_count == self.total_ratings
    }
}

#[derive(Debug, Clone)]
pub struct MigrationOutput {
    pub entries: Vec<MigratedEntry>,
    pub result: MigrationResult,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}
