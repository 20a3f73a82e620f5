use std::collections::HashSet;

use melorate_core::MigratedEntry;

use crate::model::ValidationReport;

/// Structural checks over a migrated entry list. All violations are
/// collected, in entry order.
pub fn validate(entries: &[MigratedEntry]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.id.is_empty() {
            errors.push(format!("Entry at index {i} is missing an id"));
        } else if !seen_ids.insert(entry.id.as_str()) {
            errors.push(format!("Duplicate entry id: {}", entry.id));
        }

        let name = if entry.id.is_empty() {
            format!("#{i}")
        } else {
            entry.id.clone()
        };

        if entry.artist.is_empty() || entry.song.is_empty() {
            errors.push(format!("Entry {name} is missing artist or song"));
        }
        if entry.heat.is_empty() || entry.heat_date.is_empty() {
            errors.push(format!("Entry {name} is missing heat or heatDate"));
        }
        if entry.number < 1 {
            errors.push(format!("Entry {name} has invalid number {}", entry.number));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
