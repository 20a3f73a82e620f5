use std::fmt;

#[derive(Debug)]
pub enum MigrateError {
    /// TOML parse / deserialization error in the engine config.
    ConfigParse(String),
    /// Config validation error (empty strategy list, duplicates, bad threshold).
    ConfigValidation(String),
    /// TOML parse / deserialization error in a roster file.
    RosterParse(String),
    /// Roster is structurally unusable. One message per violation.
    RosterValidation(Vec<String>),
}

impl fmt::Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::RosterParse(msg) => write!(f, "roster parse error: {msg}"),
            Self::RosterValidation(problems) => {
                write!(f, "roster validation failed: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for MigrateError {}
