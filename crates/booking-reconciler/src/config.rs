//! Engine configuration.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{BookingError, Result};

/// The zone the source deployment's venue sits in.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// IANA name of the venue's local timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl EngineConfig {
    /// Resolve the configured timezone.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidTimezone` if the name is not a valid IANA identifier.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| BookingError::InvalidTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timezone_falls_back_to_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.tz().unwrap(), chrono_tz::America::New_York);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config: EngineConfig = serde_json::from_str(r#"{"timezone":"Nowhere/Else"}"#).unwrap();
        assert!(matches!(config.tz(), Err(BookingError::InvalidTimezone(name)) if name == "Nowhere/Else"));
    }
}
