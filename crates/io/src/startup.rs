//! App-start migration flow: gate, migrate, validate, persist.

use log::{error, info, warn};
use serde::Serialize;

use melorate_core::StoredEntry;
use melorate_migrate::gate::{self, GateDecision};
use melorate_migrate::summary::{classify, describe, MigrationOutcome};
use melorate_migrate::{data_version, run, validate, MigrateConfig, MigrationResult, Roster};

use crate::error::StartupError;
use crate::store::{KvStore, DATA_VERSION_KEY, ENTRIES_KEY};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartupReport {
    /// Stored entries already match the roster.
    UpToDate { data_version: u64 },
    /// Entries were rebuilt and persisted.
    Migrated {
        decision: GateDecision,
        outcome: MigrationOutcome,
        result: MigrationResult,
        data_version: u64,
    },
}

impl StartupReport {
    /// Line suitable for a toast or a terminal.
    pub fn message(&self) -> String {
        match self {
            Self::UpToDate { data_version } => format!("entries up to date (data version {data_version})"),
            Self::Migrated { result, .. } => describe(result),
        }
    }
}

/// Run the startup gate against `store` and migrate when required.
///
/// Validation failures abort before anything is written. On success the
/// whole entry list is replaced, then the data version; the version goes
/// last so an interrupted write re-runs the migration on next start.
pub fn run_startup<S: KvStore>(
    store: &mut S,
    roster: &Roster,
    config: &MigrateConfig,
) -> Result<StartupReport, StartupError> {
    let stored: Vec<StoredEntry> = store.get_or_default(ENTRIES_KEY)?;
    let stored_version: Option<u64> = store.get(DATA_VERSION_KEY)?;
    let current = data_version(roster);

    let decision = gate::check(stored.len(), stored_version, roster);
    if !decision.needs_migration() {
        info!("stored entries match data version {current}");
        return Ok(StartupReport::UpToDate { data_version: current });
    }
    info!("migrating {} stored entries: {decision:?}", stored.len());

    let output = run(roster, &stored, config);

    let report = validate(&output.entries);
    if !report.valid {
        error!("migrated entries failed validation; store left untouched");
        return Err(StartupError::Validation { errors: report.errors });
    }

    store.set(ENTRIES_KEY, &output.entries)?;
    store.set(DATA_VERSION_KEY, &current)?;

    let outcome = classify(&output.result);
    if outcome.is_warning() {
        warn!("{}", describe(&output.result));
    }

    Ok(StartupReport::Migrated {
        decision,
        outcome,
        result: output.result,
        data_version: current,
    })
}
