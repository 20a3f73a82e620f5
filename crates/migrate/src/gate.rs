//! Decides at startup whether stored entries must be migrated.
//!
//! The data version is computed from the roster itself, so adding,
//! removing or renumbering entries invalidates stored data without anyone
//! having to bump a constant.

use serde::Serialize;

use crate::roster::Roster;

/// `entry_count * 1000 + sum of entry numbers`.
pub fn data_version(roster: &Roster) -> u64 {
    let count = roster.len() as u64;
    let numbers: u64 = roster.entries().iter().map(|e| u64::from(e.number)).sum();
    count * 1000 + numbers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Stored data already matches the current roster.
    Skip,
    /// Nothing stored yet.
    MigrateEmptyStore,
    /// Stored version is missing or differs from the roster's version.
    MigrateVersionMismatch { stored: Option<u64>, current: u64 },
}

impl GateDecision {
    pub fn needs_migration(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

pub fn check(stored_entry_count: usize, stored_version: Option<u64>, roster: &Roster) -> GateDecision {
    if stored_entry_count == 0 {
        return GateDecision::MigrateEmptyStore;
    }
    let current = data_version(roster);
    if stored_version != Some(current) {
        return GateDecision::MigrateVersionMismatch {
            stored: stored_version,
            current,
        };
    }
    GateDecision::Skip
}
