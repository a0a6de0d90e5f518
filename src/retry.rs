//! Retry logic with exponential backoff
//!
//! Used by the index query: throttling responses from the publisher are
//! retried with a growing delay until the configured attempt budget runs out,
//! at which point the last error is handed back to the caller.

use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// Classifies an error as transient (worth another attempt) or permanent
pub trait IsRetryable {
    /// Returns true if the operation should be attempted again
    fn is_retryable(&self) -> bool;
}

/// Run `operation` until it succeeds, fails permanently, or exhausts
/// `config.max_attempts` retries.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                attempt += 1;

                warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed, retrying"
                );

                tokio::time::sleep(delay).await;
                delay = next_delay(config, delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    error!(
                        error = %e,
                        attempts = attempt + 1,
                        "Operation failed after all retry attempts exhausted"
                    );
                }
                return Err(e);
            }
        }
    }
}

fn next_delay(config: &RetryConfig, delay: Duration) -> Duration {
    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier).min(config.max_delay)
}
