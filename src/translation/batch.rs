/*!
 * Batch planning.
 *
 * Splits an ordered list of cue texts into fixed-size, order-preserving
 * batches. Concatenating the batches in index order gives back the input.
 */

use crate::errors::TranslationError;

/// A contiguous group of cue texts submitted together to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in the planned sequence (0-based)
    pub index: usize,

    /// Offset of the first text in the original sequence
    pub offset: usize,

    /// Texts in original order
    pub texts: Vec<String>,
}

impl Batch {
    /// Number of texts in the batch
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the batch holds no texts
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Partition `texts` into batches of at most `batch_size` items
///
/// Batch `k` holds `texts[k * batch_size .. min((k + 1) * batch_size, len)]`.
pub fn plan_batches(texts: Vec<String>, batch_size: usize) -> Result<Vec<Batch>, TranslationError> {
    if batch_size == 0 {
        return Err(TranslationError::Config("batch_size must be greater than zero".to_string()));
    }

    let mut batches = Vec::with_capacity(texts.len().div_ceil(batch_size));
    let mut remaining = texts.into_iter().peekable();
    let mut offset = 0;

    while remaining.peek().is_some() {
        let chunk: Vec<String> = remaining.by_ref().take(batch_size).collect();
        let len = chunk.len();
        batches.push(Batch {
            index: batches.len(),
            offset,
            texts: chunk,
        });
        offset += len;
    }

    Ok(batches)
}
