use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Origin tag written into every descriptor: Irecê (BA), municipal official diary.
pub const ORIGIN_TAG: &str = "Irece-BA/DOM";

/// One published edition as reported by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionRef {
    pub edition: String,
    pub date: NaiveDate,
}

impl EditionRef {
    pub fn new(edition: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            edition: edition.into(),
            date,
        }
    }
}

/// Outcome of a single document retrieval. `path` is `None` when the
/// retrieval failed for any reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub edition: String,
    pub path: Option<PathBuf>,
}

impl FetchResult {
    pub fn success(edition: impl Into<String>, path: PathBuf) -> Self {
        Self {
            edition: edition.into(),
            path: Some(path),
        }
    }

    pub fn failure(edition: impl Into<String>) -> Self {
        Self {
            edition: edition.into(),
            path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }
}

/// Metadata persisted next to every downloaded document.
///
/// The field names are part of the on-disk format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub path: String,
    pub name: String,
    pub date: String,
    pub origin: String,
}

impl Descriptor {
    pub fn new(path: impl Into<String>, edition: &str, date: NaiveDate) -> Self {
        Self {
            path: path.into(),
            name: edition.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            origin: ORIGIN_TAG.to_string(),
        }
    }
}
