/*!
 * Common test utilities for the srtai test suite
 */

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use srtai::providers::mock::MockBackend;
use srtai::{Backend, JobConfig};

/// Three short cues with inline markup
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains <i>multiple</i> entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Route library logs to the test output when `RUST_LOG` is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Creates a zip archive holding the given `(name, content)` entries
pub fn create_test_archive(dir: &Path, filename: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut writer = ZipWriter::new(fs::File::create(&path)?);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(content.as_bytes())?;
    }
    writer.finish()?;
    Ok(path)
}

/// `count` numbered cue texts
pub fn numbered_texts(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Line {}", i)).collect()
}

/// Job options with a fast backoff for tests
pub fn test_job(batch_size: usize, concurrency: usize, retries: u32) -> JobConfig {
    JobConfig {
        batch_size,
        concurrency,
        retries,
        retry_backoff_ms: 10,
        ..JobConfig::new("es", "test-model")
    }
}

/// The mock as a shared backend, keeping a handle for inspection
pub fn shared(backend: &MockBackend) -> Option<Arc<dyn Backend>> {
    Some(Arc::new(backend.clone()))
}
