//! Irecê official diary (Diário Oficial do Município) module
//!
//! This module talks to the publisher: it queries the index of editions for a
//! date window, downloads the edition PDFs concurrently and records a JSON
//! descriptor for every document that was retrieved.

pub mod types;
pub mod errors;
pub mod index;
pub mod fetcher;
pub mod recorder;

pub use types::*;
pub use errors::DiaryError;

pub use index::IndexClient;
pub use fetcher::{document_url, BatchFetcher};
pub use recorder::MetadataRecorder;
