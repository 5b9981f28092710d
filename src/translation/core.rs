/*!
 * Core translation service implementation.
 *
 * `TranslationService` runs one job: it plans batches from the cue texts,
 * sends every batch through the retry policy to the backend on a bounded
 * pool of workers, and reassembles the results in cue order. A batch that
 * keeps failing contributes empty strings instead of failing the job.
 */

use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::JobConfig;
use crate::errors::TranslationError;
use crate::providers::Backend;
use crate::subtitle_processor::Cue;
use super::batch::{plan_batches, Batch};
use super::concurrency::run_all;
use super::extract::extract_translations;
use super::prompts::TranslationPromptBuilder;
use super::retry::{BatchOutcome, RetryPolicy};

/// Progress callback, called with `(completed_cues, total_cues)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Translation service for one job configuration
#[derive(Clone)]
pub struct TranslationService {
    /// Backend used for every batch; absent only for dry runs
    backend: Option<Arc<dyn Backend>>,

    /// Job options
    config: JobConfig,

    /// Optional progress observer
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl TranslationService {
    /// Create a new translation service
    ///
    /// The configuration is validated here, before any work starts. A
    /// backend is required unless the job is a dry run.
    pub fn new(config: JobConfig, backend: Option<Arc<dyn Backend>>) -> Result<Self, TranslationError> {
        config.validate()?;
        if backend.is_none() && !config.dry_run {
            return Err(TranslationError::Config(
                "a backend is required unless dry_run is set".to_string(),
            ));
        }

        Ok(Self {
            backend,
            config,
            progress: None,
        })
    }

    /// Report progress after each finished batch
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Job options in use
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Translate cues, returning one text per cue in cue order
    pub async fn translate(&self, cues: &[Cue]) -> Result<Vec<String>, TranslationError> {
        let texts = cues.iter().map(Cue::display_text).collect();
        self.translate_texts(texts).await
    }

    /// Translate plain texts, returning one text per input in input order
    pub async fn translate_texts(&self, texts: Vec<String>) -> Result<Vec<String>, TranslationError> {
        let total = texts.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        if self.config.dry_run {
            debug!("Dry run, tagging {} texts without calling the backend", total);
            let tag = &self.config.target_language;
            let tagged: Vec<String> = texts.iter().map(|text| format!("[{}] {}", tag, text)).collect();
            self.report(total, total);
            return Ok(tagged);
        }

        let backend = self.backend.as_ref().ok_or_else(|| {
            TranslationError::Config("a backend is required unless dry_run is set".to_string())
        })?;

        let batches = plan_batches(texts, self.config.batch_size)?;
        let batch_count = batches.len();
        info!(
            "Translating {} cues in {} batches via {} (concurrency {})",
            total,
            batch_count,
            backend.name(),
            self.config.concurrency
        );

        let prompt = TranslationPromptBuilder::new(&self.config.target_language)
            .with_context_hint(self.config.context_hint.as_deref());
        let policy = RetryPolicy::new(
            self.config.retries,
            Duration::from_millis(self.config.retry_backoff_ms),
        );
        let completed = AtomicUsize::new(0);
        let start_time = Instant::now();

        let (prompt, policy, completed) = (&prompt, &policy, &completed);
        let outcomes = run_all(batches, self.config.concurrency, move |_, batch: Batch| async move {
            let outcome = self.translate_batch(backend.as_ref(), prompt, policy, &batch, batch_count).await;
            let done = completed.fetch_add(batch.len(), Ordering::SeqCst) + batch.len();
            self.report(done, total);
            outcome
        })
        .await?;

        let failed_batches = outcomes.iter().filter(|outcome| outcome.is_placeholder()).count();
        if failed_batches > 0 {
            warn!("{} of {} batches could not be translated", failed_batches, batch_count);
        }

        let translations: Vec<String> = outcomes.into_iter().flat_map(BatchOutcome::into_texts).collect();
        if translations.len() != total {
            return Err(TranslationError::LengthMismatch {
                expected: total,
                actual: translations.len(),
            });
        }

        debug!("Translated {} cues in {:?}", total, start_time.elapsed());
        Ok(translations)
    }

    async fn translate_batch(
        &self,
        backend: &dyn Backend,
        prompt: &TranslationPromptBuilder,
        policy: &RetryPolicy,
        batch: &Batch,
        batch_count: usize,
    ) -> BatchOutcome {
        let label = format!("Batch {}/{}", batch.index + 1, batch_count);
        let (label_ref, texts, expected) = (label.as_str(), batch.texts.as_slice(), batch.len());
        let model_id = self.config.model_id.as_str();
        let region = self.config.region.as_deref();

        policy
            .run(&label, expected, move |attempt| async move {
                debug!("{} attempt {} ({} cues)", label_ref, attempt, expected);
                let payload = prompt.build_payload(texts)?;
                let raw = backend.invoke(model_id, region, &payload).await?;
                extract_translations(&raw, expected)
            })
            .await
    }

    fn report(&self, completed: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress(completed, total);
        }
    }
}
