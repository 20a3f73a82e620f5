//! The canonical roster: the authoritative entry list for this release.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Deserialize;

use melorate_core::{CanonicalEntry, MigratedEntry};

use crate::error::MigrateError;

const BUILTIN_ROSTER: &str = include_str!("../data/roster.toml");

#[derive(Debug, Deserialize)]
struct RosterFile {
    label: String,
    /// Expected entry count per heat. Heats not listed here are unchecked.
    #[serde(default)]
    heats: BTreeMap<String, usize>,
    #[serde(default)]
    entries: Vec<CanonicalEntry>,
}

/// Entries of one heat, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatSummary {
    pub name: String,
    pub date: NaiveDate,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub label: String,
    entries: Vec<CanonicalEntry>,
}

impl Roster {
    /// Build a roster from entries already in canonical order. No checks are
    /// run; use [`Roster::from_toml`] for authored data.
    pub fn new(label: impl Into<String>, entries: Vec<CanonicalEntry>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }

    pub fn from_toml(s: &str) -> Result<Self, MigrateError> {
        let file: RosterFile = toml::from_str(s).map_err(|e| MigrateError::RosterParse(e.to_string()))?;

        let problems = check_roster(&file);
        if !problems.is_empty() {
            return Err(MigrateError::RosterValidation(problems));
        }

        Ok(Self {
            label: file.label,
            entries: file.entries,
        })
    }

    /// The roster compiled into this release.
    pub fn builtin() -> Result<Self, MigrateError> {
        Self::from_toml(BUILTIN_ROSTER)
    }

    pub fn entries(&self) -> &[CanonicalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One empty-rated entry per canonical entry, in canonical order.
    pub fn fresh_entries(&self) -> Vec<MigratedEntry> {
        self.entries.iter().map(CanonicalEntry::to_entry).collect()
    }

    /// Heats in order of first appearance.
    pub fn heats(&self) -> Vec<HeatSummary> {
        let mut heats: Vec<HeatSummary> = Vec::new();
        for entry in &self.entries {
            match heats.iter_mut().find(|h| h.name == entry.heat) {
                Some(heat) => heat.entry_count += 1,
                None => heats.push(HeatSummary {
                    name: entry.heat.clone(),
                    date: entry.heat_date,
                    entry_count: 1,
                }),
            }
        }
        heats
    }
}

fn check_roster(file: &RosterFile) -> Vec<String> {
    let mut problems = Vec::new();
    let mut numbers = HashSet::new();
    let mut ids = HashSet::new();
    let mut heat_dates: HashMap<&str, NaiveDate> = HashMap::new();
    let mut heat_sizes: HashMap<&str, usize> = HashMap::new();

    if file.entries.is_empty() {
        problems.push("roster has no entries".to_string());
    }

    for entry in &file.entries {
        if entry.number == 0 {
            problems.push(format!("entry '{}' has number 0", entry.song));
        } else if !numbers.insert(entry.number) {
            problems.push(format!("number {} is used more than once", entry.number));
        }

        if entry.artist.trim().is_empty() || entry.song.trim().is_empty() {
            problems.push(format!("entry {} is missing artist or song", entry.number));
        }
        if entry.heat.trim().is_empty() {
            problems.push(format!("entry {} has no heat", entry.number));
        }

        let id = entry.id();
        if !ids.insert(id.clone()) {
            problems.push(format!("entry id '{id}' is used more than once"));
        }

        let date = *heat_dates.entry(&entry.heat).or_insert(entry.heat_date);
        if date != entry.heat_date {
            problems.push(format!(
                "heat '{}' has conflicting dates {} and {}",
                entry.heat, date, entry.heat_date
            ));
        }
        *heat_sizes.entry(&entry.heat).or_insert(0) += 1;
    }

    for (heat, expected) in &file.heats {
        let actual = heat_sizes.get(heat.as_str()).copied().unwrap_or(0);
        if actual != *expected {
            problems.push(format!("heat '{heat}' expects {expected} entries, found {actual}"));
        }
    }

    problems
}
