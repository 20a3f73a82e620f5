use log::{debug, info, warn};

use melorate_core::StoredEntry;

use crate::config::{CollisionPolicy, MigrateConfig};
use crate::error::MigrateError;
use crate::matcher::Matcher;
use crate::model::{MatchRecord, MigrationOutput, MigrationResult};
use crate::roster::Roster;

/// Rebuild the entry list from `roster` and reattach the ratings of every
/// stored entry the matcher can resolve. Never fails: every outcome is in
/// the returned result.
pub fn run(roster: &Roster, stored: &[StoredEntry], config: &MigrateConfig) -> MigrationOutput {
    let matcher = Matcher::new(&config.matching);
    let mut entries = roster.fresh_entries();
    let mut result = MigrationResult::default();

    // Index into `stored` of the entry that currently owns each candidate.
    let mut claimed_by: Vec<Option<usize>> = vec![None; entries.len()];

    for (si, entry) in stored.iter().enumerate() {
        let count = entry.rating_count();
        if count == 0 {
            continue;
        }
        result.total_ratings += count;

        let Some(hit) = matcher.find_match(entry, &entries) else {
            warn!("no canonical entry for '{}' ({count} ratings lost)", entry.label());
            result.lost_count += count;
            result.unmatched_entries.push(entry.label());
            continue;
        };

        let canonical_id = entries[hit.index].id.clone();

        if let Some(owner) = claimed_by[hit.index] {
            match config.collisions.policy {
                CollisionPolicy::Reject => {
                    warn!(
                        "'{}' resolves to '{canonical_id}' already claimed by '{}' ({count} ratings lost)",
                        entry.label(),
                        stored[owner].label()
                    );
                    result.lost_count += count;
                    result.unmatched_entries.push(entry.label());
                    result.collided_entries.push(entry.label());
                    continue;
                }
                CollisionPolicy::Overwrite => {
                    let displaced = &stored[owner];
                    let displaced_count = displaced.rating_count();
                    warn!(
                        "'{}' replaces ratings of '{}' on '{canonical_id}' ({displaced_count} ratings lost)",
                        entry.label(),
                        displaced.label()
                    );
                    result.migrated_count -= displaced_count;
                    result.lost_count += displaced_count;
                    result.collided_entries.push(displaced.label());
                    result.matches.retain(|m| m.canonical_id != canonical_id);
                }
            }
        }

        debug!(
            "'{}' -> '{canonical_id}' via {} ({count} ratings)",
            entry.label(),
            hit.strategy
        );
        entries[hit.index].user_ratings = entry.user_ratings.clone();
        claimed_by[hit.index] = Some(si);
        result.migrated_count += count;
        result.matches.push(MatchRecord {
            stored_label: entry.label(),
            canonical_id,
            strategy: hit.strategy,
            rating_count: count,
        });
    }

    info!(
        "migration against roster '{}': {} of {} ratings migrated, {} lost",
        roster.label, result.migrated_count, result.total_ratings, result.lost_count
    );

    MigrationOutput { entries, result }
}

/// Migrate against the built-in roster with the default config.
pub fn migrate(stored: &[StoredEntry]) -> Result<MigrationOutput, MigrateError> {
    let roster = Roster::builtin()?;
    Ok(run(&roster, stored, &MigrateConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use melorate_core::{CanonicalEntry, CategoryKey, CategoryRating, Entry, UserRating};
    use std::collections::BTreeMap;

    use crate::config::MatchStrategy;

    fn canonical(number: u32, artist: &str, song: &str, heat: &str) -> CanonicalEntry {
        CanonicalEntry {
            number,
            artist: artist.into(),
            song: song.into(),
            heat: heat.into(),
            heat_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        }
    }

    fn roster() -> Roster {
        Roster::new(
            "test",
            vec![
                canonical(1, "Greczula", "Half of Me", "Deltävling 1"),
                canonical(2, "Lisa Ajax", "Släpp taget", "Deltävling 1"),
                canonical(3, "Echo Park", "Satellite", "Deltävling 1"),
            ],
        )
    }

    fn rating(profile: &str, score: u8) -> UserRating {
        let ratings: BTreeMap<_, _> = CategoryKey::ALL
            .iter()
            .map(|k| (*k, CategoryRating { rating: score, comment: String::new() }))
            .collect();
        UserRating::new(profile, profile.to_uppercase(), ratings)
    }

    fn stored(number: i64, artist: &str, song: &str, heat: &str, ratings: usize) -> Entry {
        Entry {
            id: melorate_core::create_entry_id(artist, song),
            number,
            artist: artist.into(),
            song: song.into(),
            heat: heat.into(),
            heat_date: "2026-01-31".into(),
            user_ratings: (0..ratings).map(|i| rating(&format!("p{i}"), 3)).collect(),
        }
    }

    #[test]
    fn exact_entry_migrates() {
        let input = vec![stored(1, "Greczula", "Half of Me", "Deltävling 1", 2)];
        let out = run(&roster(), &input, &MigrateConfig::default());
        assert_eq!(out.result.migrated_count, 2);
        assert_eq!(out.result.lost_count, 0);
        assert_eq!(out.entries[0].user_ratings.len(), 2);
        assert_eq!(out.result.matches[0].strategy, MatchStrategy::ExactId);
    }

    #[test]
    fn unknown_entry_is_lost() {
        let input = vec![stored(99, "Totally Wrong", "Not Real", "Deltävling 1", 2)];
        let out = run(&roster(), &input, &MigrateConfig::default());
        assert_eq!(out.result.lost_count, 2);
        assert_eq!(out.result.unmatched_entries, vec!["Totally Wrong - Not Real"]);
        assert!(out.entries.iter().all(|e| e.user_ratings.is_empty()));
    }

    #[test]
    fn empty_input_gives_fresh_roster() {
        let out = run(&roster(), &[], &MigrateConfig::default());
        assert_eq!(out.entries.len(), 3);
        assert!(out.entries.iter().all(|e| e.user_ratings.is_empty()));
        assert_eq!(out.result, MigrationResult::default());
    }

    #[test]
    fn zero_rating_entries_are_skipped() {
        let input = vec![stored(99, "Totally Wrong", "Not Real", "Deltävling 1", 0)];
        let out = run(&roster(), &input, &MigrateConfig::default());
        assert_eq!(out.result.total_ratings, 0);
        assert!(out.result.unmatched_entries.is_empty());
    }

    #[test]
    fn canonical_fields_replace_stored_fields() {
        let mut old = stored(7, "LISA AJAX", "Slapp Taget", "Semifinal", 1);
        old.heat_date = "2025-03-01".into();
        let out = run(&roster(), &[old], &MigrateConfig::default());
        let e = &out.entries[1];
        assert_eq!(e.id, "lisa-ajax-släpp-taget");
        assert_eq!(e.number, 2);
        assert_eq!(e.artist, "Lisa Ajax");
        assert_eq!(e.heat, "Deltävling 1");
        assert_eq!(e.heat_date, "2026-01-31");
        assert_eq!(e.user_ratings.len(), 1);
    }

    #[test]
    fn reject_policy_counts_second_claim_as_lost() {
        let input = vec![
            stored(1, "Greczula", "Half of Me", "Deltävling 1", 2),
            stored(8, "Greczula!", "Half Of Me", "Old heat", 3),
        ];
        let out = run(&roster(), &input, &MigrateConfig::default());
        assert_eq!(out.result.total_ratings, 5);
        assert_eq!(out.result.migrated_count, 2);
        assert_eq!(out.result.lost_count, 3);
        assert_eq!(out.result.collided_entries, vec!["Greczula! - Half Of Me"]);
        assert_eq!(out.result.unmatched_entries, vec!["Greczula! - Half Of Me"]);
        assert_eq!(out.entries[0].user_ratings.len(), 2);
        assert!(out.result.is_balanced());
    }

    #[test]
    fn overwrite_policy_counts_displaced_ratings_as_lost() {
        let mut config = MigrateConfig::default();
        config.collisions.policy = CollisionPolicy::Overwrite;
        let input = vec![
            stored(1, "Greczula", "Half of Me", "Deltävling 1", 2),
            stored(8, "Greczula!", "Half Of Me", "Old heat", 3),
        ];
        let out = run(&roster(), &input, &config);
        assert_eq!(out.result.migrated_count, 3);
        assert_eq!(out.result.lost_count, 2);
        assert_eq!(out.result.collided_entries, vec!["Greczula - Half of Me"]);
        assert!(out.result.unmatched_entries.is_empty());
        assert_eq!(out.result.matches.len(), 1);
        assert_eq!(out.result.matches[0].stored_label, "Greczula! - Half Of Me");
        assert_eq!(out.entries[0].user_ratings.len(), 3);
        assert!(out.result.is_balanced());
    }

    #[test]
    fn remigration_is_idempotent() {
        let input = vec![
            stored(1, "Greczula", "Half of Me", "Deltävling 1", 2),
            stored(3, "Echo Park", "Satellite", "Deltävling 1", 1),
        ];
        let first = run(&roster(), &input, &MigrateConfig::default());
        let second = run(&roster(), &first.entries, &MigrateConfig::default());
        assert_eq!(second.result.migrated_count, second.result.total_ratings);
        assert_eq!(second.result.lost_count, 0);
        assert!(second.result.unmatched_entries.is_empty());
        assert_eq!(second.entries, first.entries);
    }

    #[test]
    fn builtin_migrate() {
        let input = vec![stored(1, "Greczula", "Half of Me", "Deltävling 1", 2)];
        let out = migrate(&input).unwrap();
        assert_eq!(out.entries.len(), 30);
        assert_eq!(out.result.migrated_count, 2);
    }
}
