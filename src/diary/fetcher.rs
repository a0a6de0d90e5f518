//! Concurrent download of edition PDFs

use crate::config::Config;
use crate::diary::DiaryError;
use crate::models::FetchResult;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Build the download URL of an edition: `<prefix><edition:04>.pdf`.
///
/// Returns `None` when the edition id is not a number.
pub fn document_url(prefix: &str, edition: &str) -> Option<String> {
    let number: u64 = edition.trim().parse().ok()?;
    Some(format!("{}{:04}.pdf", prefix, number))
}

/// Downloads a batch of editions with bounded parallelism
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    client: Client,
    document_url_prefix: String,
    max_concurrent: usize,
}

impl BatchFetcher {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            document_url_prefix: config.source.document_url_prefix.clone(),
            max_concurrent: config.max_concurrent_downloads.max(1),
        }
    }

    /// Download `editions[i]` into `paths[i]` for every `i`.
    ///
    /// The returned vector has one entry per requested edition and
    /// `result[i]` always describes `editions[i]`, whatever order the
    /// downloads finish in. A failed download is reported with `path: None`
    /// and never aborts the rest of the batch.
    pub async fn fetch_all(
        &self,
        editions: &[String],
        paths: &[PathBuf],
    ) -> Result<Vec<FetchResult>, DiaryError> {
        if editions.len() != paths.len() {
            return Err(DiaryError::LengthMismatch {
                editions: editions.len(),
                paths: paths.len(),
            });
        }

        // Slot i belongs to request i; tasks write back by slot, not by edition id.
        let mut results: Vec<FetchResult> = editions
            .iter()
            .map(|edition| FetchResult::failure(edition.clone()))
            .collect();

        let mut completed = stream::iter(editions.iter().zip(paths).enumerate())
            .map(|(slot, (edition, path))| async move { (slot, self.fetch_one(edition, path).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((slot, result)) = completed.next().await {
            results[slot] = result;
        }

        let downloaded = results.iter().filter(|r| r.is_success()).count();
        info!("Downloaded {}/{} editions", downloaded, results.len());

        Ok(results)
    }

    async fn fetch_one(&self, edition: &str, path: &Path) -> FetchResult {
        match self.download(edition, path).await {
            Ok(()) => {
                info!("✓ Edition {} saved to {}", edition, path.display());
                FetchResult::success(edition, path.to_path_buf())
            }
            Err(e) => {
                warn!("✗ Failed to download edition {}: {}", edition, e);
                FetchResult::failure(edition)
            }
        }
    }

    async fn download(&self, edition: &str, path: &Path) -> Result<(), DiaryError> {
        let url = document_url(&self.document_url_prefix, edition)
            .ok_or_else(|| DiaryError::InvalidEdition(edition.to_string()))?;

        debug!("Downloading edition {} from: {}", edition, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(DiaryError::DocumentUnavailable {
                edition: edition.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.bytes().await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Stage next to the target so a failed write never leaves a truncated PDF.
        let staging = path.with_extension("pdf.part");
        let written = match tokio::fs::write(&staging, &content).await {
            Ok(()) => tokio::fs::rename(&staging, path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(server: &MockServer, max_concurrent: usize) -> BatchFetcher {
        let config = Config {
            source: crate::config::SourceConfig {
                document_url_prefix: format!("{}/pub/Ed-", server.uri()),
                ..Default::default()
            },
            max_concurrent_downloads: max_concurrent,
            ..Config::default()
        };
        BatchFetcher::new(Client::new(), &config)
    }

    async fn mount_pdf(server: &MockServer, edition: &str, body: &[u8], delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/pub/Ed-{}.pdf", edition)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(body.to_vec())
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(server)
            .await;
    }

    fn ids(editions: &[&str]) -> Vec<String> {
        editions.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_document_url_zero_pads_to_four_digits() {
        let prefix = crate::config::DEFAULT_DOCUMENT_URL_PREFIX;
        assert_eq!(
            document_url(prefix, "42").unwrap(),
            "http://procedebahia.com.br/irece/publicacoes/Diario%20Oficial%20-%20PREFEITURA%20MUNICIPAL%20DE%20IRECE%20-%20Ed%200042.pdf"
        );
        assert_eq!(document_url("x/", "1234").unwrap(), "x/1234.pdf");
        assert_eq!(document_url("x/", "12345").unwrap(), "x/12345.pdf");
        assert_eq!(document_url("x/", "007").unwrap(), "x/0007.pdf");
        assert!(document_url("x/", "12a").is_none());
    }

    #[tokio::test]
    async fn test_results_follow_request_order_not_completion_order() {
        let mock_server = MockServer::start().await;
        // The first request finishes last.
        mount_pdf(&mock_server, "0001", b"one", 300).await;
        mount_pdf(&mock_server, "0002", b"two", 150).await;
        mount_pdf(&mock_server, "0003", b"three", 0).await;

        let temp_dir = TempDir::new().unwrap();
        let editions = ids(&["1", "2", "3"]);
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| temp_dir.path().join(format!("{}.pdf", i)))
            .collect();

        let fetcher = test_fetcher(&mock_server, 10);
        let results = fetcher.fetch_all(&editions, &paths).await.unwrap();

        assert_eq!(results.len(), editions.len());
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.edition, editions[i]);
            assert_eq!(result.path.as_ref(), Some(&paths[i]));
        }
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"one");
        assert_eq!(std::fs::read(&paths[2]).unwrap(), b"three");
    }

    #[tokio::test]
    async fn test_failed_download_yields_marker_and_no_file() {
        let mock_server = MockServer::start().await;
        mount_pdf(&mock_server, "0010", b"%PDF-1.4", 0).await;
        Mock::given(method("GET"))
            .and(path("/pub/Ed-0011.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let editions = ids(&["10", "11", "not-a-number"]);
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| temp_dir.path().join(format!("{}.pdf", i)))
            .collect();

        let fetcher = test_fetcher(&mock_server, 2);
        let results = fetcher.fetch_all(&editions, &paths).await.unwrap();

        assert_eq!(results[0], FetchResult::success("10", paths[0].clone()));
        assert_eq!(results[1], FetchResult::failure("11"));
        assert_eq!(results[2], FetchResult::failure("not-a-number"));
        assert!(paths[0].exists());
        assert!(!paths[1].exists());
        assert!(!paths[2].exists());
    }

    #[tokio::test]
    async fn test_duplicate_editions_keep_their_own_slots() {
        let mock_server = MockServer::start().await;
        mount_pdf(&mock_server, "0007", b"seven", 0).await;

        let temp_dir = TempDir::new().unwrap();
        let editions = ids(&["7", "7"]);
        let paths = vec![temp_dir.path().join("a.pdf"), temp_dir.path().join("b.pdf")];

        let fetcher = test_fetcher(&mock_server, 10);
        let results = fetcher.fetch_all(&editions, &paths).await.unwrap();

        assert_eq!(results[0].path.as_ref(), Some(&paths[0]));
        assert_eq!(results[1].path.as_ref(), Some(&paths[1]));
        assert!(paths[0].exists() && paths[1].exists());
    }

    #[tokio::test]
    async fn test_many_editions_with_small_pool() {
        let mock_server = MockServer::start().await;
        let count = 25;
        for i in 0..count {
            mount_pdf(&mock_server, &format!("{:04}", i), b"x", (count - i) as u64).await;
        }

        let temp_dir = TempDir::new().unwrap();
        let editions: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| temp_dir.path().join(format!("{}.pdf", i)))
            .collect();

        let fetcher = test_fetcher(&mock_server, 3);
        let results = fetcher.fetch_all(&editions, &paths).await.unwrap();

        assert_eq!(results.len(), count);
        assert!(results.iter().all(FetchResult::is_success));
        let returned: Vec<&str> = results.iter().map(|r| r.edition.as_str()).collect();
        let expected: Vec<&str> = editions.iter().map(String::as_str).collect();
        assert_eq!(returned, expected);
    }

    #[tokio::test]
    async fn test_pool_bounds_downloads_in_flight() {
        let mock_server = MockServer::start().await;
        let count = 20;
        for i in 0..count {
            mount_pdf(&mock_server, &format!("{:04}", i), b"x", 300).await;
        }

        let temp_dir = TempDir::new().unwrap();
        let editions: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| temp_dir.path().join(format!("{}.pdf", i)))
            .collect();

        // 20 downloads of 300 ms through 10 slots need at least two rounds.
        let fetcher = test_fetcher(&mock_server, 10);
        let started = std::time::Instant::now();
        let results = fetcher.fetch_all(&editions, &paths).await.unwrap();
        let elapsed = started.elapsed();

        assert!(results.iter().all(FetchResult::is_success));
        assert!(
            elapsed >= Duration::from_millis(600),
            "pool of 10 finished 20 downloads in {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let mock_server = MockServer::start().await;
        mount_pdf(&mock_server, "0005", b"%PDF-1.4 body", 0).await;

        let temp_dir = TempDir::new().unwrap();
        // A directory sitting on the target path makes the final rename fail.
        let target = temp_dir.path().join("0.pdf");
        std::fs::create_dir_all(&target).unwrap();

        let fetcher = test_fetcher(&mock_server, 10);
        let results = fetcher
            .fetch_all(&ids(&["5"]), &[target.clone()])
            .await
            .unwrap();

        assert_eq!(results, vec![FetchResult::failure("5")]);
        assert!(target.is_dir());
        assert!(!temp_dir.path().join("0.pdf.part").exists());
    }

    #[tokio::test]
    async fn test_length_mismatch_is_rejected() {
        let mock_server = MockServer::start().await;
        let fetcher = test_fetcher(&mock_server, 10);

        let err = fetcher
            .fetch_all(&ids(&["1", "2"]), &[PathBuf::from("0.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::LengthMismatch { editions: 2, paths: 1 }));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let mock_server = MockServer::start().await;
        let fetcher = test_fetcher(&mock_server, 10);
        let results = fetcher.fetch_all(&[], &[]).await.unwrap();
        assert!(results.is_empty());
    }
}
