//! Runtime configuration for the command line front end.

use std::path::PathBuf;

use time::Date;

use crate::{Error, timezone::today_in};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// How command output is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned plain-text tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// File path to the application SQLite database.
    pub db_path: PathBuf,
    /// Canonical name of the timezone that decides what "today" is.
    pub timezone: String,
    /// How to print results.
    pub output: OutputFormat,
}

impl AppConfig {
    /// Create a config, falling back to [DEFAULT_TIMEZONE] when `timezone` is `None`.
    pub fn new(db_path: impl Into<PathBuf>, timezone: Option<&str>, output: OutputFormat) -> Self {
        Self {
            db_path: db_path.into(),
            timezone: timezone.unwrap_or(DEFAULT_TIMEZONE).to_owned(),
            output,
        }
    }

    /// Today's date in the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the configured timezone is not recognised.
    pub fn today(&self) -> Result<Date, Error> {
        today_in(&self.timezone)
    }
}

#[cfg(test)]
mod config_tests {
    use crate::Error;

    use super::{AppConfig, DEFAULT_TIMEZONE, OutputFormat};

    #[test]
    fn timezone_defaults_to_utc() {
        let config = AppConfig::new("bookkeeper.db", None, OutputFormat::Table);

        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert!(config.today().is_ok());
    }

    #[test]
    fn invalid_timezone_fails_today() {
        let config = AppConfig::new("bookkeeper.db", Some("Not/AZone"), OutputFormat::Json);

        assert_eq!(
            config.today(),
            Err(Error::InvalidTimezone("Not/AZone".to_owned()))
        );
    }
}
