//! Retry loop with exponential backoff and jitter (spec §4.6 step 5),
//! grounded on the teacher's `RetryPolicy::call`.

use crate::error::{OrchestratorError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const MAX_BACKOFF: Duration = Duration::from_secs(30);
const JITTER_MIN: f64 = 0.8;
const JITTER_MAX: f64 = 1.2;

/// Runs `attempt` up to `max_retries + 1` times. Sleeps between failures
/// using the provider's `retry_after_seconds` hint when present, else an
/// exponential backoff anchored at `base_delay`, jittered to `[0.8, 1.2]` and
/// capped at 30s. Aborts without a further sleep if `cancellation` fires.
pub async fn with_retry<F, Fut, T>(
    max_retries: u32,
    base_delay: Duration,
    cancellation: &CancellationToken,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts_made = 0u32;
    let mut last_error: Option<OrchestratorError> = None;

    loop {
        if cancellation.is_cancelled() {
            return Err(last_error.unwrap_or(OrchestratorError::UnknownError {
                message: "request cancelled before dispatch".to_string(),
            }));
        }

        attempts_made += 1;
        match attempt().await {
            Ok(value) => {
                if attempts_made > 1 {
                    debug!(attempts = attempts_made, "retry succeeded");
                }
                return Ok(value);
            }
            Err(error) => {
                let retryable = error.is_retryable();
                let retries_used = attempts_made - 1;

                if !retryable || retries_used >= max_retries {
                    if retries_used >= max_retries && retryable {
                        return Err(OrchestratorError::MaxRetriesExceeded {
                            attempts: attempts_made,
                            last_error: error.to_string(),
                        });
                    }
                    return Err(error);
                }

                let delay = next_delay(&error, base_delay, retries_used);
                warn!(
                    attempt = attempts_made,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying after provider failure"
                );
                last_error = Some(error);

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancellation.cancelled() => {
                        return Err(last_error.expect("set above"));
                    }
                }
            }
        }
    }
}

fn next_delay(error: &OrchestratorError, base_delay: Duration, retries_used: u32) -> Duration {
    let base_ms = match error.retry_after_seconds() {
        Some(seconds) => seconds * 1_000,
        None => base_delay.as_millis() as u64 * 2u64.saturating_pow(retries_used.max(1) - 1).max(1),
    };

    let jitter = JITTER_MIN + rand::random::<f64>() * (JITTER_MAX - JITTER_MIN);
    let jittered_ms = (base_ms as f64 * jitter) as u64;
    Duration::from_millis(jittered_ms).min(MAX_BACKOFF)
}
