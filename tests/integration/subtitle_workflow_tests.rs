/*!
 * Integration tests for the file and archive workflow
 */

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read};
use std::sync::Arc;
use anyhow::Result;
use zip::ZipArchive;

use srtai::app_controller::{ORIGINALS_FOLDER, TRANSLATED_FOLDER};
use srtai::file_utils::FileManager;
use srtai::providers::mock::MockBackend;
use srtai::subtitle_processor::parse_srt;
use srtai::{Config, Controller};
use crate::common;

fn dry_run_config(target: &str) -> Config {
    let mut config = Config::default();
    config.job.target_language = target.to_string();
    config.job.dry_run = true;
    config
}

fn mock_config() -> Config {
    let mut config = Config::default();
    config.job = common::test_job(2, 2, 1);
    config
}

fn archive_entries(path: &std::path::Path) -> Result<BTreeMap<String, String>> {
    let mut archive = ZipArchive::new(Cursor::new(fs::read(path)?))?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        entries.insert(entry.name().to_string(), content);
    }
    Ok(entries)
}

/// Test a dry run over one subtitle file
#[tokio::test]
async fn test_run_withDryRunSubtitle_shouldWriteTaggedCopy() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.en.srt")?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(dry_run_config("fr"))?;
    let summary = controller.run(&[input], &output_dir).await?;

    let expected_path = output_dir.join("movie.fr.srt");
    assert_eq!(summary.written, vec![expected_path.clone()]);
    assert!(summary.failed.is_empty());

    let cues = parse_srt(&FileManager::read_to_string(&expected_path)?);
    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].text, "[fr] This is a test subtitle.");
    assert_eq!(cues[1].text, "[fr] It contains <i>multiple</i> entries.");
    assert_eq!((cues[2].start_ms, cues[2].end_ms), (10_000, 14_000));
    Ok(())
}

/// Test translating an archive with the mock backend
#[tokio::test]
async fn test_run_withArchive_shouldWriteOriginalsAndTranslations() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_archive(temp_dir.path(), "season1.zip", &[
        ("season1/ep1.en.srt", common::SAMPLE_SRT),
        ("ep2.srt", "1\n00:00:01,000 --> 00:00:02,000\nGood night\n"),
        ("readme.txt", "not a subtitle"),
    ])?;
    let output_dir = temp_dir.path().join("out");
    let backend = MockBackend::working();

    let controller = Controller::with_backend(mock_config(), Arc::new(backend.clone()))?;
    let summary = controller.run(&[input], &output_dir).await?;

    let output_path = output_dir.join("season1.es.translated.zip");
    assert_eq!(summary.written, vec![output_path.clone()]);

    let entries = archive_entries(&output_path)?;
    let names: Vec<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(names, vec![
        "originals/ep2.srt",
        "originals/season1/ep1.en.srt",
        "readme.txt",
        "translated/ep1.es.srt",
        "translated/ep2.es.srt",
    ]);

    assert_eq!(entries[&format!("{}season1/ep1.en.srt", ORIGINALS_FOLDER)], common::SAMPLE_SRT);
    assert_eq!(entries["readme.txt"], "not a subtitle");

    let translated = parse_srt(&entries[&format!("{}ep2.es.srt", TRANSLATED_FOLDER)]);
    assert_eq!(translated.len(), 1);
    assert_eq!(translated[0].text, "[TRANSLATED] Good night");

    // ep1 has three cues in batches of two, ep2 one cue
    assert_eq!(backend.call_count(), 3);
    Ok(())
}

/// Test that a broken input does not stop the others
#[tokio::test]
async fn test_run_withCorruptArchive_shouldRecordFailureAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(temp_dir.path(), "broken.zip", "PK this is not really a zip")?;
    let good = common::create_test_subtitle(temp_dir.path(), "good.srt")?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(dry_run_config("de"))?;
    let summary = controller.run(&[broken.clone(), good], &output_dir).await?;

    assert_eq!(summary.written, vec![output_dir.join("good.de.srt")]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, broken);
    Ok(())
}

/// Test that a directory argument is expanded
#[tokio::test]
async fn test_run_withDirectory_shouldTranslateEverySubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("subs");
    FileManager::ensure_dir(&input_dir)?;
    common::create_test_subtitle(&input_dir, "a.en.srt")?;
    common::create_test_subtitle(&input_dir, "b.en.srt")?;
    common::create_test_file(&input_dir, "notes.txt", "ignored")?;
    let output_dir = temp_dir.path().join("out");

    let backend = MockBackend::working();
    let controller = Controller::with_backend(mock_config(), Arc::new(backend.clone()))?;
    let summary = controller.run(&[input_dir], &output_dir).await?;

    assert_eq!(summary.written, vec![output_dir.join("a.es.srt"), output_dir.join("b.es.srt")]);
    assert!(FileManager::file_exists(output_dir.join("b.es.srt")));
    assert_eq!(backend.call_count(), 4);
    Ok(())
}

/// Test that a permanently failing backend still writes a file with timing intact
#[tokio::test(start_paused = true)]
async fn test_run_withFailingBackend_shouldWriteEmptyCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_backend(mock_config(), Arc::new(MockBackend::failing()))?;
    let summary = controller.run(&[input], &output_dir).await?;

    let cues = parse_srt(&FileManager::read_to_string(&summary.written[0])?);
    assert_eq!(cues.len(), 3);
    assert!(cues.iter().all(|cue| cue.text.is_empty()));
    assert_eq!((cues[1].start_ms, cues[1].end_ms), (5_000, 9_000));
    Ok(())
}

/// Test that a Latin-1 subtitle file is translated instead of rejected
#[tokio::test]
async fn test_run_withNonUtf8Subtitle_shouldDecodeLossily() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("cafe.srt");
    fs::write(&input, b"1\n00:00:01,000 --> 00:00:02,000\nCaf\xe9 noir\n")?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(dry_run_config("es"))?;
    let summary = controller.run(&[input], &output_dir).await?;

    assert!(summary.failed.is_empty());
    let cues = parse_srt(&FileManager::read_to_string(&summary.written[0])?);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "[es] Caf\u{fffd} noir");
    assert_eq!((cues[0].start_ms, cues[0].end_ms), (1_000, 2_000));
    Ok(())
}

/// Test that a missing input path is an error before anything is written
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(dry_run_config("es"))?;

    let result = controller.run(&[temp_dir.path().join("missing.srt")], &temp_dir.path().join("out")).await;

    assert!(result.is_err());
    Ok(())
}
