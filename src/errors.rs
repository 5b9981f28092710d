/*!
 * Error types for the srtai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by a translation backend
///
/// Every variant is treated as transient by the retry layer.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The backend answered with a structured error envelope instead of a payload
    #[error("Backend service error: {0}")]
    ServiceError(String),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Number of translations does not match the number of cues
    #[error("Translations length must match cues length (expected {expected}, got {actual})")]
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Backend output had no usable structure at all
    #[error("Unusable backend response: {0}")]
    ResponseFormat(String),

    /// Assembled output does not line up with the input
    #[error("Translation count mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Invalid job configuration, rejected before any work starts
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}
