// melorate - entry migration debug harness
// Runs the same migration the app performs at startup, against files on disk.

mod exit_codes;
mod migrate;
mod store;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::de::DeserializeOwned;

use exit_codes::{EXIT_ERROR, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use melorate_migrate::{MigrateConfig, Roster};

#[derive(Parser)]
#[command(name = "melorate")]
#[command(about = "Migrate stored contest ratings onto the current entry roster")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a stored entries file onto a roster
    #[command(after_help = "\
Examples:
  melorate migrate entries.json
  melorate migrate entries.json --roster roster-2026.toml --json
  melorate migrate entries.json --config migrate.toml --output migrated.json")]
    Migrate {
        /// Stored entries (JSON array)
        stored: PathBuf,

        /// Roster TOML (defaults to the built-in roster)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Migration config TOML
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the migration result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write migrated entries to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check an entries file for structural problems
    #[command(after_help = "\
Examples:
  melorate validate migrated.json")]
    Validate {
        /// Entries (JSON array)
        entries: PathBuf,
    },

    /// Show the data version and heats of a roster
    #[command(after_help = "\
Examples:
  melorate version
  melorate version --roster roster-2026.toml")]
    Version {
        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Run the startup migration gate against a store directory
    #[command(after_help = "\
Examples:
  melorate startup
  melorate startup --store ./data --roster roster-2026.toml -v")]
    Startup {
        /// Store directory (defaults to the platform data dir)
        #[arg(long, env = "MELORATE_STORE")]
        store: Option<PathBuf>,

        #[arg(long)]
        roster: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Export entries and profiles from a store
    #[command(after_help = "\
Examples:
  melorate export --output ratings.json
  melorate export --store ./data -o ratings.json")]
    Export {
        #[arg(long, env = "MELORATE_STORE")]
        store: Option<PathBuf>,

        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Merge ratings from an export document into a store
    #[command(after_help = "\
Examples:
  melorate import ratings.json
  melorate import ratings.json --store ./data --dry-run")]
    Import {
        /// Export document
        file: PathBuf,

        #[arg(long, env = "MELORATE_STORE")]
        store: Option<PathBuf>,

        /// Report what would be imported without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
        "\nexport format: 1",
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Migrate { stored, roster, config, json, output } => {
            migrate::cmd_migrate(stored, roster, config, json, output)
        }
        Commands::Validate { entries } => migrate::cmd_validate(entries),
        Commands::Version { roster } => migrate::cmd_version(roster),
        Commands::Startup { store, roster, config } => store::cmd_startup(store, roster, config),
        Commands::Export { store, output } => store::cmd_export(store, output),
        Commands::Import { file, store, dry_run } => store::cmd_import(file, store, dry_run),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(EXIT_PARSE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared loaders
// ============================================================================

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::parse(format!("cannot read {}: {e}", path.display())))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::parse(format!("{}: {e}", path.display())))
}

pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
    std::fs::write(path, json).map_err(|e| CliError::parse(format!("cannot write {}: {e}", path.display())))
}

pub(crate) fn load_roster(path: Option<&Path>) -> Result<Roster, CliError> {
    let roster = match path {
        Some(p) => Roster::from_toml(&read_file(p)?),
        None => Roster::builtin(),
    };
    roster.map_err(|e| {
        let err = CliError::parse(e.to_string());
        match path {
            Some(p) => err.with_hint(format!("check roster file {}", p.display())),
            None => err,
        }
    })
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<MigrateConfig, CliError> {
    match path {
        Some(p) => MigrateConfig::from_toml(&read_file(p)?).map_err(|e| CliError::parse(e.to_string())),
        None => Ok(MigrateConfig::default()),
    }
}
