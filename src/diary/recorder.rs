//! JSON descriptors for downloaded editions

use crate::diary::DiaryError;
use crate::models::Descriptor;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one `<edition>.json` descriptor per downloaded document
#[derive(Debug, Clone)]
pub struct MetadataRecorder {
    root_dir: PathBuf,
    out_dir: PathBuf,
}

impl MetadataRecorder {
    /// `root_dir` is the base that descriptor `path` fields are made relative to.
    pub fn new(root_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Location of the descriptor for `edition`
    pub fn descriptor_path(&self, edition: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", edition))
    }

    /// Record a downloaded document.
    ///
    /// A failed download (`pdf_path == None`) writes nothing and returns
    /// `Ok(None)`. An existing descriptor for the same edition is replaced.
    pub fn record(
        &self,
        pdf_path: Option<&Path>,
        edition: &str,
        date: NaiveDate,
    ) -> Result<Option<PathBuf>, DiaryError> {
        let Some(pdf_path) = pdf_path else {
            return Ok(None);
        };

        if edition.is_empty() || edition.contains(['/', '\\']) || edition.starts_with('.') {
            return Err(DiaryError::InvalidEdition(edition.to_string()));
        }

        let relative = pdf_path.strip_prefix(&self.root_dir).unwrap_or(pdf_path);
        let descriptor = Descriptor::new(relative.to_string_lossy(), edition, date);

        let output_path = self.descriptor_path(edition);
        std::fs::write(&output_path, to_pretty_json(&descriptor)?)?;

        debug!("Wrote descriptor {}", output_path.display());
        Ok(Some(output_path))
    }

    /// Read back the descriptor for `edition`
    pub fn load(&self, edition: &str) -> Result<Descriptor, DiaryError> {
        let content = std::fs::read_to_string(self.descriptor_path(edition))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Four-space indented JSON; non-ASCII text is written as-is.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, DiaryError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
