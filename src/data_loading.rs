use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Lookup failures against the session store. `SessionNotFound` maps to the
/// caller's "no data" condition, `IncompleteData` to "malformed data".
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("no session data found at index {0}")]
    SessionNotFound(usize),

    #[error("incomplete data for session {index}: missing or empty field {field:?}")]
    IncompleteData {
        index: usize,
        field: &'static str,
    },
}

/// One raw record as stored upstream. Field names follow the upstream
/// store's casing; every field is optional until validated.
#[derive(Debug, Deserialize)]
pub struct SessionRecord {
    pub name: Option<String>,
    #[serde(rename = "BeatTimings")]
    pub beat_timings: Option<Vec<i64>>,
    #[serde(rename = "Spo2")]
    pub spo2: Option<Vec<f64>>,
    #[serde(rename = "heartBPM")]
    pub heart_bpm: Option<Vec<f64>>,
}

/// A validated session: all fields present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub name: String,
    pub beat_timings: Vec<i64>,
    pub spo2: Vec<f64>,
    pub heart_bpm: Vec<f64>,
}

/// In-memory view of the JSON session store: an array of session records,
/// possibly with null holes. Constructed explicitly at startup and passed
/// by reference to whoever needs a session.
#[derive(Debug)]
pub struct SessionStore {
    records: Vec<Option<SessionRecord>>,
}

impl SessionStore {
    /// Loads the store from a JSON file holding an array of records.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening session store {}", path.display()))?;
        let records: Vec<Option<SessionRecord>> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing session store {}", path.display()))?;
        debug!("loaded {} session records", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the validated session at `index`, distinguishing an absent
    /// record from a present-but-incomplete one.
    pub fn session(&self, index: usize) -> Result<SessionData, DataError> {
        let record = self
            .records
            .get(index)
            .and_then(|r| r.as_ref())
            .ok_or(DataError::SessionNotFound(index))?;

        let name = record
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(DataError::IncompleteData {
                index,
                field: "name",
            })?;
        let beat_timings = record
            .beat_timings
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(DataError::IncompleteData {
                index,
                field: "BeatTimings",
            })?;
        let spo2 = record
            .spo2
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(DataError::IncompleteData {
                index,
                field: "Spo2",
            })?;
        let heart_bpm = record
            .heart_bpm
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(DataError::IncompleteData {
                index,
                field: "heartBPM",
            })?;

        Ok(SessionData {
            name,
            beat_timings,
            spo2,
            heart_bpm,
        })
    }
}
