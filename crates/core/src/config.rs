//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services, so that
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_HISTORY_LIMIT, DEFAULT_HISTORY_TIMEOUT_MS};
use crate::error::{CoreResult, TriageError};
use crate::history::{EmergencyHistory, EmptyHistory, JsonFileHistory};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct TriageConfig {
    history_file: Option<PathBuf>,
    history_limit: usize,
    history_timeout: Duration,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_timeout: Duration::from_millis(DEFAULT_HISTORY_TIMEOUT_MS),
        }
    }
}

impl TriageConfig {
    /// Create a new `TriageConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if `history_limit` or `history_timeout` is zero, or
    /// if `history_file` is set but is not an existing file.
    pub fn new(
        history_file: Option<PathBuf>,
        history_limit: usize,
        history_timeout: Duration,
    ) -> CoreResult<Self> {
        if history_limit == 0 {
            return Err(TriageError::InvalidInput(
                "history limit must be greater than zero".into(),
            ));
        }
        if history_timeout.is_zero() {
            return Err(TriageError::InvalidInput(
                "history timeout must be greater than zero".into(),
            ));
        }
        if let Some(path) = &history_file {
            if !path.is_file() {
                return Err(TriageError::InvalidInput(format!(
                    "history file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            history_file,
            history_limit,
            history_timeout,
        })
    }

    /// Resolve configuration from optional raw environment values.
    ///
    /// Missing or blank values fall back to the defaults.
    pub fn from_env_values(
        history_file: Option<String>,
        history_limit: Option<String>,
        history_timeout_ms: Option<String>,
    ) -> CoreResult<Self> {
        let history_file = non_blank(history_file).map(PathBuf::from);
        let history_limit = parse_number("TRIAGE_HISTORY_LIMIT", history_limit)?
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        let history_timeout = parse_number("TRIAGE_HISTORY_TIMEOUT_MS", history_timeout_ms)?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_HISTORY_TIMEOUT_MS));

        Self::new(history_file, history_limit, history_timeout)
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_env_values(
            std::env::var("TRIAGE_HISTORY_FILE").ok(),
            std::env::var("TRIAGE_HISTORY_LIMIT").ok(),
            std::env::var("TRIAGE_HISTORY_TIMEOUT_MS").ok(),
        )
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn history_timeout(&self) -> Duration {
        self.history_timeout
    }

    /// Opens the configured history store, or an empty one if none is configured.
    pub fn open_history(&self) -> Arc<dyn EmergencyHistory> {
        match &self.history_file {
            Some(path) => Arc::new(JsonFileHistory::new(path.clone())),
            None => Arc::new(EmptyHistory),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: Option<String>) -> CoreResult<Option<u64>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                TriageError::InvalidInput(format!("{name} must be a non-negative integer, got '{v}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_values_missing_or_blank() {
        let cfg = TriageConfig::from_env_values(None, Some("  ".into()), None).unwrap();
        assert!(cfg.history_file.is_none());
        assert_eq!(cfg.history_limit(), 120);
        assert_eq!(cfg.history_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn parses_overrides() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = TriageConfig::from_env_values(
            Some(file.path().display().to_string()),
            Some("50".into()),
            Some("200".into()),
        )
        .unwrap();
        assert_eq!(cfg.history_file.as_deref(), Some(file.path()));
        assert_eq!(cfg.history_limit(), 50);
        assert_eq!(cfg.history_timeout(), Duration::from_millis(200));
    }

    #[test]
    fn rejects_zero_limit_and_timeout() {
        let err = TriageConfig::from_env_values(None, Some("0".into()), None)
            .expect_err("zero limit");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("limit")));

        let err = TriageConfig::from_env_values(None, None, Some("0".into()))
            .expect_err("zero timeout");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("timeout")));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let err = TriageConfig::from_env_values(None, Some("many".into()), None)
            .expect_err("not a number");
        assert!(
            matches!(err, TriageError::InvalidInput(msg) if msg.contains("TRIAGE_HISTORY_LIMIT"))
        );
    }

    #[test]
    fn rejects_missing_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("emergencies.json");
        let err = TriageConfig::from_env_values(Some(missing.display().to_string()), None, None)
            .expect_err("missing file");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("does not exist")));
    }
}
