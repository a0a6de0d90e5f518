//! Centralized configuration management for irece-dom

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Default publisher index endpoint
pub const DEFAULT_INDEX_URL: &str = "https://engine.procedebahia.com.br/publish/api/diaries";

/// Default document URL prefix; the zero-padded edition number and `.pdf` are appended
pub const DEFAULT_DOCUMENT_URL_PREFIX: &str = "http://procedebahia.com.br/irece/publicacoes/\
Diario%20Oficial%20-%20PREFEITURA%20MUNICIPAL%20DE%20IRECE%20-%20Ed%20";

/// Publisher entity code for the Irecê city hall
pub const DEFAULT_ENTITY_CODE: &str = "50";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory; `pdfs/` and `out/` are created beneath it
    pub root_dir: PathBuf,
    /// Remote endpoints of the publisher
    pub source: SourceConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Backoff policy for the index query
    pub retry: RetryConfig,
    /// Upper bound of document downloads in flight at once
    pub max_concurrent_downloads: usize,
}

/// Publisher endpoints
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Index API endpoint (POST)
    pub index_url: String,
    /// Prefix of the per-edition PDF URL
    pub document_url_prefix: String,
    /// Entity code sent with every index query
    pub entity_code: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

/// Exponential backoff configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling for a single delay
    pub max_delay: Duration,
    /// Factor applied to the delay after every retry
    pub backoff_multiplier: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            document_url_prefix: DEFAULT_DOCUMENT_URL_PREFIX.to_string(),
            entity_code: DEFAULT_ENTITY_CODE.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "irece-dom/0.1.0".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            source: SourceConfig::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            max_concurrent_downloads: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let root_dir = std::env::var("IRECE_DOM_ROOT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.root_dir);

        let source = SourceConfig {
            index_url: std::env::var("IRECE_DOM_INDEX_URL")
                .unwrap_or(defaults.source.index_url),
            document_url_prefix: std::env::var("IRECE_DOM_DOCUMENT_URL_PREFIX")
                .unwrap_or(defaults.source.document_url_prefix),
            entity_code: std::env::var("IRECE_DOM_ENTITY_CODE")
                .unwrap_or(defaults.source.entity_code),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("IRECE_DOM_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("IRECE_DOM_USER_AGENT")
                .unwrap_or(defaults.http.user_agent),
        };

        let retry = RetryConfig {
            max_attempts: parse_env_var("IRECE_DOM_RETRY_MAX_ATTEMPTS")?
                .unwrap_or(defaults.retry.max_attempts),
            initial_delay: parse_env_var("IRECE_DOM_RETRY_INITIAL_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.initial_delay),
            ..defaults.retry
        };

        let max_concurrent_downloads = parse_env_var("IRECE_DOM_MAX_CONCURRENT_DOWNLOADS")?
            .unwrap_or(defaults.max_concurrent_downloads);

        Ok(Config {
            root_dir,
            source,
            http,
            retry,
            max_concurrent_downloads,
        })
    }

    /// Directory holding the downloaded PDFs
    pub fn pdfs_dir(&self) -> PathBuf {
        self.root_dir.join(crate::downloader::PDFS_DIR)
    }

    /// Directory holding the JSON descriptors
    pub fn out_dir(&self) -> PathBuf {
        self.root_dir.join(crate::downloader::OUT_DIR)
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Build the shared HTTP client
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.http.user_agent)
            .timeout(self.http_timeout())
            .build()
            .context("Failed to build HTTP client")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_downloads == 0 {
            return Err(anyhow::anyhow!("max_concurrent_downloads must be at least 1"));
        }

        if self.retry.backoff_multiplier < 1.0 {
            return Err(anyhow::anyhow!(
                "Backoff multiplier must be >= 1.0, got {}",
                self.retry.backoff_multiplier
            ));
        }

        // Check if root directory can be created
        std::fs::create_dir_all(&self.root_dir)
            .with_context(|| format!("Cannot create root directory: {}", self.root_dir.display()))?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
