//! CLI exit code registry.
//!
//! Single source of truth for `melorate` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error                                    |
//! | 2    | Usage error (bad arguments)                      |
//! | 3    | Migration finished but some ratings were lost    |
//! | 4    | Entries failed validation                        |
//! | 5    | Could not read, parse or write an input/output   |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Migration ran and was persisted, but ratings were lost.
pub const EXIT_MIGRATE_PARTIAL: u8 = 3;

/// Entry list failed validation.
pub const EXIT_VALIDATION: u8 = 4;

/// File missing, unreadable, malformed, or not writable.
pub const EXIT_PARSE: u8 = 5;
