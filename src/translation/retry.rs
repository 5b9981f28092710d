/*!
 * Bounded retry with exponential backoff for a single batch.
 *
 * A batch gets `max_retries + 1` attempts. The wait after failed attempt `k`
 * (1-based) is `base_delay * 2^(k-1)`. When every attempt fails the policy
 * returns empty-string placeholders instead of an error, so one bad batch
 * never aborts the job.
 */

use std::future::Future;
use std::time::Duration;
use log::{error, warn};

use crate::errors::TranslationError;

/// Default base delay between attempts
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Retry settings for one batch call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Wait after the first failed attempt, doubled on every further failure
    pub base_delay: Duration,
}

/// What a retried batch resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A successful attempt, with the number of attempts it took
    Translated { texts: Vec<String>, attempts: u32 },

    /// Every attempt failed; `texts` holds one empty string per input
    Placeholder { texts: Vec<String>, attempts: u32 },
}

impl BatchOutcome {
    /// The per-text results, placeholders included
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Translated { texts, .. } | Self::Placeholder { texts, .. } => texts,
        }
    }

    /// Number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Translated { attempts, .. } | Self::Placeholder { attempts, .. } => *attempts,
        }
    }

    /// Whether retries were exhausted
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry count and base delay
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Total attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Run `operation` until it succeeds or attempts run out
    ///
    /// `operation` receives the 1-based attempt number. Any error counts as a
    /// failed attempt. On exhaustion the result is `batch_len` empty strings.
    pub async fn run<F, Fut>(&self, label: &str, batch_len: usize, mut operation: F) -> BatchOutcome
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Vec<String>, TranslationError>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        while attempt < max_attempts {
            attempt += 1;
            match operation(attempt).await {
                Ok(texts) => return BatchOutcome::Translated { texts, attempts: attempt },
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = self.delay_after_attempt(attempt);
                        warn!(
                            "{} failed (attempt {}/{}): {} - retrying in {:?}",
                            label, attempt, max_attempts, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        error!("{} failed after {} attempts: {}", label, attempt, e);
                    }
                }
            }
        }

        BatchOutcome::Placeholder {
            texts: vec![String::new(); batch_len],
            attempts: attempt,
        }
    }
}
