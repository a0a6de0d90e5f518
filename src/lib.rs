//! Downloader for the Irecê (BA) municipal official diary.
//!
//! The crate queries the publisher's index for the editions released in a
//! date window, downloads every edition's PDF concurrently and writes one JSON
//! descriptor per document that was retrieved.

pub mod config;
pub mod diary;
pub mod downloader;
pub mod models;
pub mod retry;
pub mod window;

pub use config::Config;
pub use diary::DiaryError;
pub use downloader::JournalDownloader;
pub use models::{Descriptor, EditionRef, FetchResult};
