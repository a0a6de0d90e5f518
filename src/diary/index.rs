//! Index query: which editions were published in a date window

use crate::config::{Config, RetryConfig};
use crate::diary::{DiaryApi, DiaryError, IndexResponse};
use crate::models::EditionRef;
use crate::retry::{with_retry, IsRetryable};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Client for the publisher's index endpoint
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    index_url: String,
    entity_code: String,
    retry: RetryConfig,
}

impl IndexClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            index_url: config.source.index_url.clone(),
            entity_code: config.source.entity_code.clone(),
            retry: config.retry.clone(),
        }
    }

    /// List the editions published between `start` and `end` (inclusive).
    ///
    /// Throttling responses are retried with backoff; once the retry budget is
    /// spent the call fails with [`DiaryError::RetriesExhausted`]. Any other
    /// non-success status yields an empty list. Transport timeouts and connect
    /// failures are retried the same way and also end in `RetriesExhausted`.
    pub async fn fetch_editions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EditionRef>, DiaryError> {
        info!("Querying diary index from {} to {}", start, end);

        match with_retry(&self.retry, || self.query_once(start, end)).await {
            Ok(editions) => {
                info!("Index lists {} editions from {} to {}", editions.len(), start, end);
                Ok(editions)
            }
            Err(e) if e.is_retryable() => Err(DiaryError::RetriesExhausted {
                attempts: self.retry.max_attempts + 1,
                source: Box::new(e),
            }),
            Err(e) => Err(e),
        }
    }

    async fn query_once(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EditionRef>, DiaryError> {
        let start_date = start.format(DiaryApi::DATE_FORMAT).to_string();
        let end_date = end.format(DiaryApi::DATE_FORMAT).to_string();

        debug!("POST {} start_date={} end_date={}", self.index_url, start_date, end_date);

        let response = self
            .client
            .post(&self.index_url)
            .form(&[
                ("cod_entity", self.entity_code.as_str()),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if DiaryApi::is_transient(status) {
            return Err(DiaryError::Throttled {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            warn!(
                "Index query for {}..{} failed with status {}; treating as no editions",
                start, end, status
            );
            return Ok(Vec::new());
        }

        let response_text = response.text().await?;
        let index: IndexResponse = serde_json::from_str(&response_text)
            .map_err(|e| DiaryError::ApiResponseError { start, end, source: e })?;

        Ok(index.into_editions())
    }
}
