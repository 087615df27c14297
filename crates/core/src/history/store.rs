//! Read port onto the emergency history store, plus the adapters shipped with the core.
//!
//! The emergency records themselves are owned by the intake CRUD layer. The triage engine only
//! ever needs one read: the most recent emergencies that carry both an alert code and a
//! description, newest first.

use crate::error::{CoreResult, TriageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One historical emergency as seen by the history suggester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEmergency {
    pub alert_code: String,
    pub description: String,
}

/// An emergency record as stored by the intake layer; code and description may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEmergency {
    #[serde(default)]
    pub alert_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-only access to recent emergencies.
///
/// Implementations must return at most `limit` records, newest first, each with a non-null
/// alert code and description. Snapshot consistency is sufficient.
pub trait EmergencyHistory: Send + Sync {
    fn list_recent_with_alert_code(&self, limit: usize) -> CoreResult<Vec<HistoricalEmergency>>;
}

/// Store with no records, used when no history source is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHistory;

impl EmergencyHistory for EmptyHistory {
    fn list_recent_with_alert_code(&self, _limit: usize) -> CoreResult<Vec<HistoricalEmergency>> {
        Ok(Vec::new())
    }
}

/// In-memory store, mainly for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistory {
    records: Vec<StoredEmergency>,
}

impl InMemoryHistory {
    pub fn new(records: Vec<StoredEmergency>) -> Self {
        Self { records }
    }
}

impl EmergencyHistory for InMemoryHistory {
    fn list_recent_with_alert_code(&self, limit: usize) -> CoreResult<Vec<HistoricalEmergency>> {
        Ok(select_recent(self.records.iter().cloned(), limit))
    }
}

/// Store backed by a JSON array of [`StoredEmergency`] records.
///
/// The file is read on every call, so the owner may replace it at any time.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EmergencyHistory for JsonFileHistory {
    fn list_recent_with_alert_code(&self, limit: usize) -> CoreResult<Vec<HistoricalEmergency>> {
        let contents = fs::read_to_string(&self.path).map_err(TriageError::FileRead)?;
        let records: Vec<StoredEmergency> =
            serde_json::from_str(&contents).map_err(TriageError::Deserialization)?;
        Ok(select_recent(records, limit))
    }
}

/// Keeps records with both fields present, newest first, capped at `limit`.
fn select_recent(
    records: impl IntoIterator<Item = StoredEmergency>,
    limit: usize,
) -> Vec<HistoricalEmergency> {
    let mut usable: Vec<(DateTime<Utc>, HistoricalEmergency)> = records
        .into_iter()
        .filter_map(|r| match (r.alert_code, r.description) {
            (Some(alert_code), Some(description)) => Some((
                r.created_at,
                HistoricalEmergency {
                    alert_code,
                    description,
                },
            )),
            _ => None,
        })
        .collect();

    usable.sort_by(|a, b| b.0.cmp(&a.0));
    usable.truncate(limit);
    usable.into_iter().map(|(_, e)| e).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn stored(code: Option<&str>, desc: Option<&str>, minute: u32) -> StoredEmergency {
        StoredEmergency {
            alert_code: code.map(str::to_string),
            description: desc.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 8, minute, 0).unwrap(),
        }
    }

    #[test]
    fn in_memory_orders_newest_first_and_caps() {
        let store = InMemoryHistory::new(vec![
            stored(Some("verde"), Some("a"), 1),
            stored(Some("rosso"), Some("c"), 3),
            stored(Some("giallo"), Some("b"), 2),
        ]);

        let out = store.list_recent_with_alert_code(2).unwrap();
        let descriptions: Vec<&str> = out.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["c", "b"]);
    }

    #[test]
    fn skips_records_missing_code_or_description() {
        let store = InMemoryHistory::new(vec![
            stored(None, Some("senza codice"), 1),
            stored(Some("giallo"), None, 2),
            stored(Some(""), Some("codice vuoto"), 3),
        ]);

        let out = store.list_recent_with_alert_code(120).unwrap();
        assert_eq!(
            out,
            vec![HistoricalEmergency {
                alert_code: "".into(),
                description: "codice vuoto".into(),
            }]
        );
    }

    #[test]
    fn json_file_store_reads_and_filters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
  {{"alert_code": "giallo", "description": "dolore addominale", "created_at": "2026-10-01T08:00:00Z"}},
  {{"alert_code": null, "description": "tosse", "created_at": "2026-10-02T08:00:00Z"}},
  {{"description": "senza codice", "created_at": "2026-10-03T08:00:00Z"}},
  {{"alert_code": "rosso", "description": "dolore toracico", "created_at": "2026-10-04T08:00:00Z"}}
]"#
        )
        .unwrap();

        let store = JsonFileHistory::new(file.path());
        let out = store.list_recent_with_alert_code(120).unwrap();
        let codes: Vec<&str> = out.iter().map(|e| e.alert_code.as_str()).collect();
        assert_eq!(codes, vec!["rosso", "giallo"]);
    }

    #[test]
    fn json_file_store_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistory::new(dir.path().join("missing.json"));
        let err = store
            .list_recent_with_alert_code(120)
            .expect_err("file does not exist");
        assert!(matches!(err, TriageError::FileRead(_)));
    }

    #[test]
    fn json_file_store_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let store = JsonFileHistory::new(file.path());
        let err = store
            .list_recent_with_alert_code(120)
            .expect_err("malformed file");
        assert!(matches!(err, TriageError::Deserialization(_)));
    }
}
