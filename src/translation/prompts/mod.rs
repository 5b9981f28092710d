/*!
 * Prompt construction for batch subtitle translation.
 *
 * This module provides:
 * - The batch instruction template
 * - The request document sent to a backend
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, TranslationPromptBuilder, TranslationRequest, TranslationResponse};
