//! `melorate-migrate`: entry reconciliation engine.
//!
//! Pure engine crate: receives previously stored entries, returns the
//! entry list rebuilt from the canonical roster with ratings reattached.
//! No storage or CLI dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod model;
pub mod roster;
pub mod summary;
pub mod validate;

pub use config::{CollisionPolicy, MatchStrategy, MigrateConfig, WordOverlapMode};
pub use engine::{migrate, run};
pub use error::MigrateError;
pub use gate::{data_version, GateDecision};
pub use matcher::Matcher;
pub use model::{MatchRecord, MigrationOutput, MigrationResult, ValidationReport};
pub use roster::Roster;
pub use summary::{describe, MigrationOutcome};
pub use validate::validate;
