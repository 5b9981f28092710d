/*!
 * Mock backend implementations for testing.
 *
 * This module provides a scripted backend that simulates different behaviors:
 * - `MockBackend::working()` - Always answers with a well-formed translation list
 * - `MockBackend::fail_first(k)` - Fails the first `k` calls, then works
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::scripted(..)` - Returns canned raw responses in call order
 *
 * Every clone shares the same counters, so a test can hand one clone to the
 * translation service and inspect the other afterwards.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Backend;
use crate::translation::prompts::TranslationRequest;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation list
    Working,
    /// Fails the first `failures` calls with a 503, then succeeds
    FailFirst { failures: usize },
    /// Fails intermittently (every Nth call)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Call statistics shared between clones
#[derive(Debug, Default)]
struct MockStats {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    payloads: Mutex<Vec<String>>,
    models: Mutex<Vec<String>>,
    regions: Mutex<Vec<Option<String>>>,
}

/// Mock backend for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Raw responses handed out in call order before falling back to `behavior`
    script: Arc<Mutex<VecDeque<String>>>,
    /// Custom translation of one text (optional)
    custom_response: Option<fn(&str) -> String>,
    /// Fixed per-call delay
    latency: Duration,
    /// Per-call delay derived from the batch texts, overrides `latency`
    delay: Option<fn(&[String]) -> Duration>,
    /// Shared counters
    stats: Arc<MockStats>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            custom_response: None,
            latency: Duration::ZERO,
            delay: None,
            stats: Arc::new(MockStats::default()),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock backend that fails the first `failures` calls
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create an intermittently failing mock backend
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a working mock that first returns the given raw responses
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::working();
        backend.script.lock().extend(responses.into_iter().map(Into::into));
        backend
    }

    /// Set a custom per-text translation
    pub fn with_custom_response(mut self, translate: fn(&str) -> String) -> Self {
        self.custom_response = Some(translate);
        self
    }

    /// Sleep for the same fixed time on every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sleep for a duration computed from the batch texts on every call
    pub fn with_delay(mut self, delay: fn(&[String]) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Every payload received, in arrival order
    pub fn payloads(&self) -> Vec<String> {
        self.stats.payloads.lock().clone()
    }

    /// Every model id received, in arrival order
    pub fn models(&self) -> Vec<String> {
        self.stats.models.lock().clone()
    }

    /// Every region received, in arrival order
    pub fn regions(&self) -> Vec<Option<String>> {
        self.stats.regions.lock().clone()
    }

    /// Default translation of one text
    pub fn translate_text(text: &str) -> String {
        format!("[TRANSLATED] {}", text)
    }

    /// Build a well-formed response for the given texts
    pub fn generate_batch_response(texts: &[String], translate: fn(&str) -> String) -> String {
        let translations: Vec<String> = texts.iter().map(|text| translate(text)).collect();
        serde_json::json!({ "translations": translations }).to_string()
    }

    fn should_fail(&self, call_index: usize) -> bool {
        match self.behavior {
            MockBehavior::Working => false,
            MockBehavior::FailFirst { failures } => call_index < failures,
            MockBehavior::Intermittent { fail_every } => {
                fail_every > 0 && call_index % fail_every == fail_every - 1
            }
            MockBehavior::Failing => true,
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, model_id: &str, region: Option<&str>, payload: &str) -> Result<String, ProviderError> {
        let call_index = self.stats.calls.fetch_add(1, Ordering::SeqCst);
        self.stats.payloads.lock().push(payload.to_string());
        self.stats.models.lock().push(model_id.to_string());
        self.stats.regions.lock().push(region.map(str::to_string));

        let texts = serde_json::from_str::<TranslationRequest>(payload)
            .map(|request| request.texts)
            .map_err(|e| ProviderError::ParseError(format!("Mock backend received an unknown payload: {}", e)))?;

        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = self.delay.map_or(self.latency, |delay| delay(&texts));
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.should_fail(call_index) {
            return Err(ProviderError::ApiError {
                status_code: 503,
                message: format!("Simulated backend failure (call #{})", call_index + 1),
            });
        }

        if let Some(scripted) = self.script.lock().pop_front() {
            return Ok(scripted);
        }

        let translate = self.custom_response.unwrap_or(Self::translate_text);
        Ok(Self::generate_batch_response(&texts, translate))
    }
}
