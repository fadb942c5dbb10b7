use std::time::Duration;

use newswire_core::error::AppError;
use newswire_core::traits::Fetcher;
use reqwest::Client;

/// Sent on every attempt so targets see a consistent client identity.
const USER_AGENT: &str = "newswire/0.3 (article pipeline)";

/// Total attempts per fetch, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Statuses worth retrying; everything else fails on the first response.
/// Classification is by status code only; response bodies are never
/// inspected to decide retryability.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// HTTP fetcher using reqwest.
///
/// Downloads raw content with a fixed User-Agent, follows redirects, and
/// bounds the whole request (redirects included) with a single timeout.
/// Transient failures (the retryable status set and connection-level
/// errors) are retried with exponential backoff up to [`MAX_ATTEMPTS`]
/// total attempts.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    backoff_base: Duration,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Override the backoff base (the delay before the second attempt).
    /// Tests use this to keep retries fast.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| AppError::NetworkError(format!("Failed to read response body: {e}")))
    }
}

/// Connection-level errors and the retryable status set are transient.
/// The unified timeout is terminal and is not retried.
fn is_transient(error: &AppError) -> bool {
    match error {
        AppError::NetworkError(_) => true,
        AppError::HttpStatus(code) => RETRYABLE_STATUSES.contains(code),
        _ => false,
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_fetch(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < MAX_ATTEMPTS && is_transient(&e) => {
                    let delay = self.backoff_base * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        %url,
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Transient fetch failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
