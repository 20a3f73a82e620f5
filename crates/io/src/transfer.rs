//! Export/import documents for moving ratings between devices.
//!
//! Entries are keyed by entry id on both sides, so importing is unaffected
//! by roster changes as long as the ids survive. Profile ids are local to a
//! device and get re-keyed by nickname on import.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use melorate_core::{Entry, Profile, UserRating};

use crate::error::TransferError;

pub const EXPORT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub format_version: u32,
    pub data_version: u64,
    /// RFC 3339, UTC.
    pub exported_at: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

pub fn export_document(entries: &[Entry], profiles: &[Profile], data_version: u64) -> ExportDocument {
    ExportDocument {
        format_version: EXPORT_FORMAT_VERSION,
        data_version,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        profiles: profiles.to_vec(),
        entries: entries.to_vec(),
    }
}

pub fn to_json(doc: &ExportDocument) -> Result<String, TransferError> {
    serde_json::to_string_pretty(doc).map_err(|e| TransferError::Json(e.to_string()))
}

pub fn from_json(s: &str) -> Result<ExportDocument, TransferError> {
    let doc: ExportDocument = serde_json::from_str(s).map_err(|e| TransferError::Json(e.to_string()))?;
    if doc.format_version > EXPORT_FORMAT_VERSION {
        return Err(TransferError::UnsupportedFormat(doc.format_version));
    }
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Local entries with the imported ratings merged in.
    pub entries: Vec<Entry>,
    pub imported_ratings: usize,
    /// Ratings not merged: no local profile, no local entry, or a second
    /// rating for a (entry, local profile) pair already written by this
    /// import. `imported_ratings + skipped_ratings` is every exported rating.
    pub skipped_ratings: usize,
    /// Exported entries with ratings but no local entry of the same id.
    pub skipped_entries: Vec<String>,
    /// Of `skipped_ratings`, the ones that lost to an earlier rating that
    /// resolved to the same local profile on the same entry.
    pub collided_ratings: usize,
}

fn nickname_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Local profile for an exported rating: nickname first, then profile id.
///
/// The nickname is the exported profile's name when the document lists the
/// profile, otherwise the name carried on the rating itself.
fn resolve_profile<'a>(rating: &UserRating, exported: &[Profile], local: &'a [Profile]) -> Option<&'a Profile> {
    let nickname = exported
        .iter()
        .find(|p| p.id == rating.profile_id)
        .map_or(rating.profile_name.as_str(), |p| p.name.as_str());
    let key = nickname_key(nickname);

    local
        .iter()
        .find(|p| !key.is_empty() && nickname_key(&p.name) == key)
        .or_else(|| local.iter().find(|p| p.id == rating.profile_id))
}

/// Merge the ratings of `doc` into `local_entries`.
///
/// A rating replaces any local rating by the same (re-keyed) profile on the
/// same entry; all other local ratings are kept. Within one document only
/// the first rating per (entry, local profile) is taken. `local_data_version`
/// is only compared for logging: entries are matched by id either way.
pub fn import_document(
    doc: &ExportDocument,
    local_profiles: &[Profile],
    local_entries: &[Entry],
    local_data_version: Option<u64>,
) -> ImportOutcome {
    if local_data_version != Some(doc.data_version) {
        warn!(
            "export has data version {} but local data is {:?}; matching by entry id",
            doc.data_version, local_data_version
        );
    }

    let mut outcome = ImportOutcome {
        entries: local_entries.to_vec(),
        ..ImportOutcome::default()
    };
    let mut written: HashSet<(String, String)> = HashSet::new();

    for exported in &doc.entries {
        if exported.user_ratings.is_empty() {
            continue;
        }
        let Some(target) = outcome.entries.iter_mut().find(|e| e.id == exported.id) else {
            warn!("no local entry '{}'; {} ratings skipped", exported.id, exported.rating_count());
            outcome.skipped_ratings += exported.rating_count();
            outcome.skipped_entries.push(exported.label());
            continue;
        };

        for rating in &exported.user_ratings {
            let Some(local) = resolve_profile(rating, &doc.profiles, local_profiles) else {
                outcome.skipped_ratings += 1;
                continue;
            };
            if !written.insert((target.id.clone(), local.id.clone())) {
                warn!(
                    "'{}' rates '{}' again as local profile '{}'; keeping the first",
                    rating.profile_name, target.id, local.name
                );
                outcome.skipped_ratings += 1;
                outcome.collided_ratings += 1;
                continue;
            }

            let mut rekeyed = rating.clone();
            rekeyed.profile_id = local.id.clone();
            rekeyed.profile_name = local.name.clone();

            match target.user_ratings.iter_mut().find(|r| r.profile_id == local.id) {
                Some(existing) => *existing = rekeyed,
                None => target.user_ratings.push(rekeyed),
            }
            outcome.imported_ratings += 1;
        }
    }

    info!(
        "imported {} ratings ({} skipped, {} collided)",
        outcome.imported_ratings, outcome.skipped_ratings, outcome.collided_ratings
    );
    outcome
}
