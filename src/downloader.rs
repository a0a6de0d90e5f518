//! Day / month / year download runs

use crate::config::Config;
use crate::diary::{BatchFetcher, DiaryError, IndexClient, MetadataRecorder};
use crate::window::DateWindow;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

/// Directory, under the root, that holds the downloaded PDFs
pub const PDFS_DIR: &str = "pdfs";
/// Directory, under the root, that holds the JSON descriptors
pub const OUT_DIR: &str = "out";

/// Downloads every edition published in a window and records its descriptor.
///
/// Each run returns one entry per edition listed by the index, in index
/// order: the descriptor path, or `None` when that edition's PDF could not be
/// retrieved.
pub struct JournalDownloader {
    pdfs_dir: PathBuf,
    index: IndexClient,
    fetcher: BatchFetcher,
    recorder: MetadataRecorder,
    today: NaiveDate,
}

impl JournalDownloader {
    /// Create the downloader, making sure `pdfs/` and `out/` exist under the root
    pub fn new(config: &Config) -> Result<Self, DiaryError> {
        let pdfs_dir = config.pdfs_dir();
        let out_dir = config.out_dir();
        std::fs::create_dir_all(&pdfs_dir)?;
        std::fs::create_dir_all(&out_dir)?;

        let client = config.http_client()?;

        Ok(Self {
            pdfs_dir,
            index: IndexClient::new(client.clone(), config),
            fetcher: BatchFetcher::new(client, config),
            recorder: MetadataRecorder::new(&config.root_dir, out_dir),
            today: Local::now().date_naive(),
        })
    }

    /// Override the reference date used to reject future windows
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn by_day(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<Option<PathBuf>>, DiaryError> {
        let window = DateWindow::day(year, month, day, self.today)?;
        self.download_window(window).await
    }

    pub async fn by_month(&self, year: i32, month: u32) -> Result<Vec<Option<PathBuf>>, DiaryError> {
        let window = DateWindow::month(year, month, self.today)?;
        self.download_window(window).await
    }

    pub async fn by_year(&self, year: i32) -> Result<Vec<Option<PathBuf>>, DiaryError> {
        let window = DateWindow::year(year, self.today)?;
        self.download_window(window).await
    }

    /// Fetch the index for `window`, download all editions in one batch and
    /// record a descriptor for each one that arrived.
    pub async fn download_window(
        &self,
        window: DateWindow,
    ) -> Result<Vec<Option<PathBuf>>, DiaryError> {
        let editions = self.index.fetch_editions(window.start, window.end).await?;
        if editions.is_empty() {
            info!("No editions published from {} to {}", window.start, window.end);
            return Ok(Vec::new());
        }

        let ids: Vec<String> = editions.iter().map(|e| e.edition.clone()).collect();
        let targets: Vec<PathBuf> = (0..editions.len())
            .map(|i| self.pdfs_dir.join(format!("{}.pdf", i)))
            .collect();

        let fetched = self.fetcher.fetch_all(&ids, &targets).await?;

        let mut descriptors = Vec::with_capacity(editions.len());
        for (edition, result) in editions.iter().zip(fetched) {
            descriptors.push(self.recorder.record(
                result.path.as_deref(),
                &edition.edition,
                edition.date,
            )?);
        }

        let recorded = descriptors.iter().filter(|d| d.is_some()).count();
        info!(
            "Recorded {}/{} editions from {} to {}",
            recorded,
            descriptors.len(),
            window.start,
            window.end
        );

        Ok(descriptors)
    }
}
