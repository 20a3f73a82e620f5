//! `melorate startup`, `export` and `import`: commands that work on a store
//! directory.

use std::path::PathBuf;

use melorate_core::{Entry, Profile};
use melorate_io::transfer::{from_json, to_json};
use melorate_io::{
    export_document, import_document, run_startup, FileStore, KvStore, StartupError, StartupReport, StoreError,
    DATA_VERSION_KEY, ENTRIES_KEY, PROFILES_KEY,
};
use melorate_migrate::summary::MigrationOutcome;

use crate::exit_codes::{EXIT_MIGRATE_PARTIAL, EXIT_VALIDATION};
use crate::{load_config, load_roster, CliError};

fn open_store(dir: Option<PathBuf>) -> Result<FileStore, CliError> {
    let dir = match dir {
        Some(d) => d,
        None => dirs::data_dir()
            .map(|d| d.join("melorate"))
            .ok_or_else(|| CliError::usage("no platform data directory").with_hint("pass --store DIR"))?,
    };
    log::info!("store: {}", dir.display());
    Ok(FileStore::new(dir))
}

fn store_err(e: StoreError) -> CliError {
    CliError::parse(e.to_string())
}

pub fn cmd_startup(
    store_dir: Option<PathBuf>,
    roster_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let roster = load_roster(roster_path.as_deref())?;
    let config = load_config(config_path.as_deref())?;
    let mut store = open_store(store_dir)?;

    let report = match run_startup(&mut store, &roster, &config) {
        Ok(report) => report,
        Err(StartupError::Validation { errors }) => {
            for e in &errors {
                eprintln!("  {e}");
            }
            return Err(CliError::new(EXIT_VALIDATION, "migrated entries failed validation; store unchanged"));
        }
        Err(StartupError::Store(e)) => return Err(store_err(e)),
    };

    eprintln!("{}", report.message());
    match report {
        StartupReport::Migrated {
            outcome: MigrationOutcome::Partial { .. },
            ..
        } => Err(CliError::new(EXIT_MIGRATE_PARTIAL, "")),
        _ => Ok(()),
    }
}

pub fn cmd_export(store_dir: Option<PathBuf>, output: PathBuf) -> Result<(), CliError> {
    let store = open_store(store_dir)?;
    let entries: Vec<Entry> = store.get_or_default(ENTRIES_KEY).map_err(store_err)?;
    let profiles: Vec<Profile> = store.get_or_default(PROFILES_KEY).map_err(store_err)?;
    let version: u64 = store.get(DATA_VERSION_KEY).map_err(store_err)?.unwrap_or(0);

    let doc = export_document(&entries, &profiles, version);
    let json = to_json(&doc).map_err(|e| CliError::general(e.to_string()))?;
    std::fs::write(&output, json)
        .map_err(|e| CliError::parse(format!("cannot write {}: {e}", output.display())))?;

    let ratings: usize = entries.iter().map(Entry::rating_count).sum();
    eprintln!("exported {} entries, {ratings} ratings to {}", entries.len(), output.display());
    Ok(())
}

pub fn cmd_import(file: PathBuf, store_dir: Option<PathBuf>, dry_run: bool) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(&file)
        .map_err(|e| CliError::parse(format!("cannot read {}: {e}", file.display())))?;
    let doc = from_json(&contents).map_err(|e| CliError::parse(e.to_string()))?;

    let mut store = open_store(store_dir)?;
    let entries: Vec<Entry> = store.get_or_default(ENTRIES_KEY).map_err(store_err)?;
    let profiles: Vec<Profile> = store.get_or_default(PROFILES_KEY).map_err(store_err)?;
    let version: Option<u64> = store.get(DATA_VERSION_KEY).map_err(store_err)?;

    if entries.is_empty() {
        return Err(CliError::usage("store has no entries to import into").with_hint("run `melorate startup` first"));
    }

    let outcome = import_document(&doc, &profiles, &entries, version);
    for label in &outcome.skipped_entries {
        eprintln!("  skipped: {label}");
    }
    eprintln!(
        "imported {} ratings, skipped {}",
        outcome.imported_ratings, outcome.skipped_ratings
    );

    if dry_run {
        eprintln!("dry run: store unchanged");
        return Ok(());
    }
    store.set(ENTRIES_KEY, &outcome.entries).map_err(store_err)
}
