/*!
 * Prompt templates for subtitle translation.
 *
 * A batch request is one JSON document carrying the instruction text and
 * the cue texts to translate. The instruction asks for a single JSON object
 * with a `translations` array and for inline tags to stay in place.
 */

use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;
use crate::language_utils::language_display_name;

/// Instruction template for a batch translation request.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default batch instruction.
    pub const BATCH_TRANSLATOR: &'static str = r##"Translate the following subtitle entries to {target_language}.
{file_context}Return ONLY a single valid JSON object with exactly one key named "translations" whose value is an array of strings.
Each translation must preserve any inline HTML-like tags (for example <font color="#fff">...</font>) in-place; translate only the textual content inside tags.
Do not include any extra text, markdown, or explanation. Example output:
{
  "translations": ["translated text 1", "translated text 2"]
}"##;

    /// Context paragraph added when the source file name is known.
    pub const FILE_CONTEXT: &'static str = r#"The file name is "{file_name}". Use this to infer context (show/movie title, characters, specific terminology) to improve translation quality.
Use canonical translations for show-specific catchphrases and terms (e.g. for Star Trek, translate "Captain's Log" as "Diario del capitán" or "Bitácora", not "Registro").
"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default batch translator template.
    pub fn batch_translator() -> Self {
        Self::new(Self::BATCH_TRANSLATOR)
    }

    /// Render the template with the given variables.
    pub fn render(&self, target_language: &str, file_context: &str) -> String {
        self.template
            .replace("{target_language}", target_language)
            .replace("{file_context}", file_context)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::batch_translator()
    }
}

/// Builder for one batch request payload.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    target_language: String,
    context_hint: Option<String>,
    template: PromptTemplate,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder for the given target language.
    pub fn new(target_language: &str) -> Self {
        Self {
            target_language: target_language.to_string(),
            context_hint: None,
            template: PromptTemplate::default(),
        }
    }

    /// Set the source file name used as a context hint.
    pub fn with_context_hint(mut self, hint: Option<&str>) -> Self {
        self.context_hint = hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(str::to_string);
        self
    }

    /// Build the instruction text.
    pub fn build_instruction(&self) -> String {
        let file_context = match &self.context_hint {
            Some(name) => PromptTemplate::FILE_CONTEXT.replace("{file_name}", name),
            None => String::new(),
        };
        self.template
            .render(&language_display_name(&self.target_language), &file_context)
    }

    /// Build the serialized request for a batch of texts.
    pub fn build_payload(&self, texts: &[String]) -> Result<String, TranslationError> {
        let request = TranslationRequest {
            instruction: self.build_instruction(),
            texts: texts.to_vec(),
        };
        serde_json::to_string(&request)
            .map_err(|e| TranslationError::Config(format!("failed to serialize request: {}", e)))
    }
}

/// Request document sent to a backend for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// What the model is asked to do
    pub instruction: String,

    /// Cue texts in batch order
    pub texts: Vec<String>,
}

/// Expected response structure from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Translated texts in request order
    pub translations: Vec<String>,
}
