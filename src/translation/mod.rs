/*!
 * Batch translation of subtitle cue texts.
 *
 * This module contains the translation pipeline, split into several submodules:
 *
 * - `core`: The translation service that runs one job end to end
 * - `batch`: Batch planning
 * - `prompts`: The request payload sent to a backend
 * - `extract`: Recovery of the translation list from a raw response
 * - `retry`: Per-batch retry with exponential backoff
 * - `concurrency`: Bounded, order-preserving dispatch of batches
 */

// Re-export main types for easier usage
pub use self::batch::{plan_batches, Batch};
pub use self::core::{ProgressCallback, TranslationService};
pub use self::extract::extract_translations;
pub use self::retry::{BatchOutcome, RetryPolicy};

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder, TranslationRequest};

// Submodules
pub mod batch;
pub mod concurrency;
pub mod core;
pub mod extract;
pub mod prompts;
pub mod retry;
