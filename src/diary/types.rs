//! Wire types of the publisher's index API

use crate::models::EditionRef;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

/// Body returned by the index endpoint on success
#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    /// Editions published in the requested window
    #[serde(default)]
    pub diaries: Vec<DiaryEntry>,
}

/// One edition listed by the index
#[derive(Debug, Deserialize, Clone)]
pub struct DiaryEntry {
    /// Edition number
    #[serde(rename = "edicao")]
    pub edition: EditionId,

    /// Publication date
    #[serde(rename = "data")]
    pub date: String,
}

/// Edition numbers arrive either as JSON strings or as JSON numbers
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum EditionId {
    Text(String),
    Number(u64),
}

impl EditionId {
    pub fn into_string(self) -> String {
        match self {
            EditionId::Text(s) => s.trim().to_string(),
            EditionId::Number(n) => n.to_string(),
        }
    }
}

impl IndexResponse {
    /// Convert into edition references, skipping entries with unreadable dates
    pub fn into_editions(self) -> Vec<EditionRef> {
        self.diaries
            .into_iter()
            .filter_map(|entry| match parse_publication_date(&entry.date) {
                Some(date) => Some(EditionRef::new(entry.edition.into_string(), date)),
                None => {
                    warn!(
                        "Skipping edition {:?} with unreadable date '{}'",
                        entry.edition, entry.date
                    );
                    None
                }
            })
            .collect()
    }
}

/// Parse a publication date as sent by the publisher.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part, and `DD/MM/YYYY`.
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(raw);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

/// Index API constants
pub struct DiaryApi;

impl DiaryApi {
    /// Statuses the publisher uses to signal throttling / temporary unavailability
    pub const TRANSIENT_STATUSES: [u16; 2] = [400, 429];
    /// Date format of the `start_date` / `end_date` form fields
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    pub fn is_transient(status: reqwest::StatusCode) -> bool {
        Self::TRANSIENT_STATUSES.contains(&status.as_u16())
    }
}
