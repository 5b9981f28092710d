/*!
 * Tests for subtitle processing functionality
 */

use srtai::subtitle_processor::{parse_srt, rebuild_from_translations, serialize_srt, Cue};
use crate::common;

/// Test the three-cue sample document
#[test]
fn test_parseSrt_withSampleDocument_shouldReadEveryCue() {
    let cues = parse_srt(common::SAMPLE_SRT);

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0], Cue::new(1, 1_000, 4_000, "This is a test subtitle."));
    assert_eq!(cues[1].text, "It contains <i>multiple</i> entries.");
    assert_eq!(cues[2].start_ms, 10_000);
    assert_eq!(cues[2].end_ms, 14_000);
}

/// A block without a timing line gets zero times, later blocks are unaffected
#[test]
fn test_parseSrt_withMissingTimingLine_shouldKeepLaterBlocks() {
    let content = "1\nNo timing here\n\n2\n00:00:05,000 --> 00:00:06,500\nSecond\n";
    let cues = parse_srt(content);

    assert_eq!(cues.len(), 2);
    assert_eq!((cues[0].start_ms, cues[0].end_ms), (0, 0));
    assert_eq!(cues[0].text, "No timing here");
    assert_eq!((cues[1].start_ms, cues[1].end_ms), (5_000, 6_500));
    assert_eq!(cues[1].text, "Second");
}

/// Files saved by Windows editors often start with a byte order mark
#[test]
fn test_parseSrt_withByteOrderMark_shouldIgnoreIt() {
    let content = format!("\u{feff}{}", common::SAMPLE_SRT);
    let cues = parse_srt(&content);

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].start_ms, 1_000);
    assert_eq!(cues[0].text, "This is a test subtitle.");
}

/// Empty and whitespace-only documents have no cues
#[test]
fn test_parseSrt_withBlankContent_shouldReturnNoCues() {
    assert!(parse_srt("").is_empty());
    assert!(parse_srt("\n\n  \r\n").is_empty());
}

/// Display text resolves entities but keeps markup
#[test]
fn test_displayText_withEntitiesAndTags_shouldOnlyDecodeEntities() {
    let cue = Cue::new(1, 0, 1_000, "<font color=\"#fff\">Tom &amp; Jerry&#39;s</font>");
    assert_eq!(cue.display_text(), "<font color=\"#fff\">Tom & Jerry's</font>");
}

/// Rebuilding keeps timing and replaces text, then serializes renumbered
#[test]
fn test_rebuildThenSerialize_shouldKeepTimingAndRenumber() {
    let content = "7\n00:00:01,000 --> 00:00:02,000\nHello\n\n9\n00:01:00,000 --> 00:01:02,250\nWorld\n";
    let cues = parse_srt(content);
    let translations = vec!["Hola".to_string(), "Mundo".to_string()];

    let rebuilt = rebuild_from_translations(&cues, &translations).unwrap();
    let output = serialize_srt(&rebuilt);

    assert_eq!(
        output,
        "1\n00:00:01,000 --> 00:00:02,000\nHola\n\n2\n00:01:00,000 --> 00:01:02,250\nMundo\n\n"
    );
}

/// An untranslated cue is written with empty text but keeps its timing
#[test]
fn test_rebuild_withPlaceholderTranslation_shouldKeepTimingSlot() {
    let cues = parse_srt(common::SAMPLE_SRT);
    let translations = vec!["Uno".to_string(), String::new(), "Tres".to_string()];

    let rebuilt = rebuild_from_translations(&cues, &translations).unwrap();

    assert_eq!(rebuilt.len(), 3);
    assert_eq!(rebuilt[1].text, "");
    assert_eq!((rebuilt[1].start_ms, rebuilt[1].end_ms), (5_000, 9_000));
}

/// A translation list of the wrong length is rejected
#[test]
fn test_rebuild_withWrongCount_shouldFail() {
    let cues = parse_srt(common::SAMPLE_SRT);
    assert!(rebuild_from_translations(&cues, &["Solo".to_string()]).is_err());
}
