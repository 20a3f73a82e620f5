use serde::Serialize;

use crate::model::MigrationResult;

/// How a migration pass should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// No stored entry carried ratings.
    NothingToMigrate,
    /// Every rating was reattached.
    Complete,
    /// Some ratings could not be reattached.
    Partial { lost: usize },
}

impl MigrationOutcome {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

/// Classify a result for the caller's notification.
pub fn classify(result: &MigrationResult) -> MigrationOutcome {
    if result.total_ratings == 0 {
        MigrationOutcome::NothingToMigrate
    } else if result.lost_count == 0 {
        MigrationOutcome::Complete
    } else {
        MigrationOutcome::Partial {
            lost: result.lost_count,
        }
    }
}

const MAX_LISTED: usize = 5;

/// One-line human summary of a migration pass.
pub fn describe(result: &MigrationResult) -> String {
    match classify(result) {
        MigrationOutcome::NothingToMigrate => "no ratings to migrate".to_string(),
        MigrationOutcome::Complete => {
            format!("migrated all {} ratings", result.migrated_count)
        }
        MigrationOutcome::Partial { lost } => {
            let mut line = format!(
                "migrated {} of {} ratings, {lost} lost",
                result.migrated_count, result.total_ratings
            );
            // Under Reject a collided label is already unmatched; list the
            // overwritten ones only.
            let overwritten: Vec<String> = result
                .collided_entries
                .iter()
                .filter(|label| !result.unmatched_entries.contains(*label))
                .cloned()
                .collect();

            let mut groups = Vec::new();
            if !result.unmatched_entries.is_empty() {
                groups.push(format!("lost: {}", list_labels(&result.unmatched_entries)));
            }
            if !overwritten.is_empty() {
                groups.push(format!("overwritten: {}", list_labels(&overwritten)));
            }
            if !groups.is_empty() {
                line.push_str(&format!(" ({})", groups.join("; ")));
            }
            line
        }
    }
}

fn list_labels(labels: &[String]) -> String {
    let mut list = labels
        .iter()
        .take(MAX_LISTED)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if labels.len() > MAX_LISTED {
        list.push_str(&format!(", and {} more", labels.len() - MAX_LISTED));
    }
    list
}
