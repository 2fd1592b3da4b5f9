//! Bounded retry with exponential backoff for upstream calls.
//!
//! Applied at individual call sites only; the orchestration state
//! machine never retries. Only errors an adapter classifies as
//! retryable (timeouts, rate limits, 5xx) get another attempt.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY_MS: u64 = 500;

/// Errors that may be worth one more attempt.
pub(crate) trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `call` up to [`MAX_ATTEMPTS`] times, sleeping between attempts.
pub(crate) async fn with_backoff<T, E, F, Fut>(operation: &str, mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < MAX_ATTEMPTS && error.is_retryable() => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt - 1));
                warn!(%operation, %error, attempt, delay_ms = delay.as_millis() as u64, "upstream call failed, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
