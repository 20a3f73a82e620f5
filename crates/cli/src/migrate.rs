//! `melorate migrate`, `validate` and `version`.

use std::path::PathBuf;

use melorate_core::{Entry, StoredEntry};
use melorate_migrate::summary::{classify, describe};
use melorate_migrate::{data_version, run, validate};

use crate::exit_codes::{EXIT_MIGRATE_PARTIAL, EXIT_VALIDATION};
use crate::{load_config, load_roster, read_json, write_json, CliError};

pub fn cmd_migrate(
    stored_path: PathBuf,
    roster_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let roster = load_roster(roster_path.as_deref())?;
    let config = load_config(config_path.as_deref())?;
    let stored: Vec<StoredEntry> = read_json(&stored_path)?;

    let output = run(&roster, &stored, &config);

    let report = validate(&output.entries);
    if !report.valid {
        for e in &report.errors {
            eprintln!("  {e}");
        }
        return Err(CliError::new(
            EXIT_VALIDATION,
            format!("migrated entries failed validation ({} problems)", report.errors.len()),
        )
        .with_hint("the roster produced duplicate or incomplete entries"));
    }

    if let Some(ref path) = output_file {
        write_json(path, &output.entries)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let json = serde_json::to_string_pretty(&output.result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else {
        for m in &output.result.matches {
            eprintln!("  {:<40} -> {} ({}, {})", m.stored_label, m.canonical_id, m.strategy, m.rating_count);
        }
        for label in &output.result.unmatched_entries {
            eprintln!("  {label:<40} -> (lost)");
        }
    }

    eprintln!("roster {}: {}", roster.label, describe(&output.result));

    if classify(&output.result).is_warning() {
        return Err(CliError::new(EXIT_MIGRATE_PARTIAL, ""));
    }
    Ok(())
}

pub fn cmd_validate(entries_path: PathBuf) -> Result<(), CliError> {
    let entries: Vec<Entry> = read_json(&entries_path)?;
    let report = validate(&entries);

    if report.valid {
        eprintln!("{} entries OK", entries.len());
        return Ok(());
    }
    for e in &report.errors {
        eprintln!("  {e}");
    }
    Err(CliError::new(
        EXIT_VALIDATION,
        format!("{} problems in {}", report.errors.len(), entries_path.display()),
    ))
}

pub fn cmd_version(roster_path: Option<PathBuf>) -> Result<(), CliError> {
    let roster = load_roster(roster_path.as_deref())?;

    println!("roster:       {}", roster.label);
    println!("entries:      {}", roster.len());
    println!("data version: {}", data_version(&roster));
    for heat in roster.heats() {
        println!("  {:<20} {}  {} entries", heat.name, heat.date, heat.entry_count);
    }
    Ok(())
}
