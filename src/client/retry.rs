//! Bounded retry for submission attempts

use crate::client::error::{SubmitError, SubmitResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Total attempts for one submission: the first try plus three retries
pub const DEFAULT_MAX_ATTEMPTS: usize = 4;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: usize,
    /// Base delay for exponential backoff
    #[serde(with = "crate::config::duration_millis")]
    pub base_delay: Duration,
    /// Maximum delay between retries
    #[serde(with = "crate::config::duration_millis")]
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Whether to add jitter to retry delays
    pub jitter_enabled: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_enabled: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom parameters
    pub fn new(
        max_attempts: usize,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
            backoff_multiplier,
            jitter_enabled: true,
        }
    }

    /// Config that never waits between attempts
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter_enabled: false,
        }
    }

    /// Config that performs exactly one attempt
    pub fn no_retry() -> Self {
        Self::immediate(1)
    }
}

/// Statistics about retry attempts
#[derive(Debug, Clone)]
pub struct RetryStats {
    /// Total number of attempts made
    pub total_attempts: usize,
    /// Total time spent waiting between retries
    pub total_delay: Duration,
    /// All errors encountered during retry attempts
    pub errors: Vec<SubmitError>,
    /// Whether the operation ultimately succeeded
    pub success: bool,
}

/// Retry mechanism for submissions
#[derive(Debug, Clone, Default)]
pub struct RetryManager {
    config: RetryConfig,
}

impl RetryManager {
    /// Create a new retry manager
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation, retrying failures that `SubmitError::is_retryable` accepts
    pub async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> SubmitResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SubmitResult<T>>,
    {
        self.execute_with_stats(operation, SubmitError::is_retryable)
            .await
            .0
    }

    /// Execute an operation with an explicit retry predicate and report statistics
    pub async fn execute_with_stats<F, Fut, T, P>(
        &self,
        operation: F,
        is_retryable: P,
    ) -> (SubmitResult<T>, RetryStats)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SubmitResult<T>>,
        P: Fn(&SubmitError) -> bool,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        let mut total_delay = Duration::ZERO;
        let mut errors = Vec::new();

        loop {
            attempt += 1;
            debug!("Submitting contact form (attempt {}/{})", attempt, max_attempts);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Submission succeeded on attempt {}", attempt);
                    }
                    let stats = RetryStats {
                        total_attempts: attempt,
                        total_delay,
                        errors,
                        success: true,
                    };
                    return (Ok(result), stats);
                }
                Err(error) => {
                    errors.push(error.clone());

                    if !is_retryable(&error) {
                        warn!("Submission failed with non-retryable error: {}", error);
                    } else if attempt >= max_attempts {
                        warn!(
                            "Submission failed after {} attempts, last error: {}",
                            attempt, error
                        );
                    } else {
                        let delay = self.calculate_delay(attempt);
                        warn!(
                            "Submission failed (attempt {}), retrying in {:?}: {}",
                            attempt, delay, error
                        );
                        total_delay += delay;
                        sleep(delay).await;
                        continue;
                    }

                    let stats = RetryStats {
                        total_attempts: attempt,
                        total_delay,
                        errors,
                        success: false,
                    };
                    return (Err(error), stats);
                }
            }
        }
    }

    /// Calculate delay for next retry attempt
    fn calculate_delay(&self, attempt: usize) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64
            * self.config.backoff_multiplier.powi((attempt - 1) as i32)) as u64;

        let delay = std::cmp::min(Duration::from_millis(delay_ms), self.config.max_delay);

        if self.config.jitter_enabled {
            self.add_jitter(delay)
        } else {
            delay
        }
    }

    /// Add random jitter to delay to prevent thundering herd
    fn add_jitter(&self, delay: Duration) -> Duration {
        use rand::Rng;

        let jitter_range = delay.as_millis() as f64 * 0.1;
        if jitter_range <= 0.0 {
            return delay;
        }

        let mut rng = rand::thread_rng();
        let jitter = rng.gen_range(-jitter_range..=jitter_range);

        let adjusted_ms = (delay.as_millis() as f64 + jitter).max(0.0) as u64;
        Duration::from_millis(adjusted_ms)
    }
}
