use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: Subtitle parsing, serialization and text decoding

// @const: Block separator (one or more blank lines)
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").unwrap()
});

// @const: SRT timestamp regex (HH:MM:SS,mmm)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d+):(\d+),(\d+)").unwrap()
});

/// Separator between start and end time on a timing line
pub const TIMING_SEPARATOR: &str = "-->";

// @struct: Single timed subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: 1-based position in parse order
    pub id: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Raw text, may contain inline markup and entities
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(id: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            id,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Text to send to the backend: entities resolved, markup untouched
    pub fn display_text(&self) -> String {
        decode_display_text(&self.text)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} {} {}", self.format_start_time(), TIMING_SEPARATOR, self.format_end_time())?;
        write!(f, "{}", self.text)
    }
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) to milliseconds
///
/// Returns `None` when the value does not contain a recognizable timestamp
/// or its fields do not fit in `u64` milliseconds.
pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
    let caps = TIMESTAMP_REGEX.captures(timestamp.trim())?;
    let field = |idx: usize| -> Option<u64> { caps.get(idx)?.as_str().parse().ok() };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    // Oversized fields make the timestamp unreadable rather than overflowing
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds.checked_mul(1_000)?)?
        .checked_add(millis)
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse raw SRT content into an ordered list of cues
///
/// Parsing never fails. A block whose timing line is missing or unreadable
/// yields a cue timed `0 --> 0` so the rest of the file is still usable.
/// Numeric labels found in the source are skipped; ids follow block order.
pub fn parse_srt(content: &str) -> Vec<Cue> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let blocks = BLOCK_SEPARATOR_REGEX
        .split(content)
        .map(str::trim)
        .filter(|block| !block.is_empty());

    let mut cues = Vec::new();
    for (idx, block) in blocks.enumerate() {
        let id = idx + 1;
        let mut lines = block.lines().peekable();

        // Optional numeric label
        if lines.peek().is_some_and(|line| is_numeric_label(line)) {
            lines.next();
        }

        // Timing line, only consumed when it carries the separator
        let (start_ms, end_ms) = match lines.next_if(|line| line.contains(TIMING_SEPARATOR)) {
            Some(timing_line) => parse_timing_line(timing_line).unwrap_or_else(|| {
                warn!("Unreadable timing line in cue {}: {}", id, timing_line.trim());
                (0, 0)
            }),
            None => {
                warn!("Cue {} has no timing line, defaulting to 00:00:00,000", id);
                (0, 0)
            }
        };

        let text = lines.collect::<Vec<_>>().join("\n");
        cues.push(Cue::new(id, start_ms, end_ms, text));
    }

    debug!("Parsed {} cues", cues.len());
    cues
}

fn is_numeric_label(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a full timing line; either side falls back to 0 when unreadable
fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let (start, end) = line.split_once(TIMING_SEPARATOR)?;
    let start_ms = parse_timestamp(start);
    let end_ms = parse_timestamp(end);

    if start_ms.is_none() && end_ms.is_none() {
        return None;
    }

    Some((start_ms.unwrap_or(0), end_ms.unwrap_or(0)))
}

/// Serialize cues back to SRT text
///
/// Cues are renumbered from 1 regardless of their `id`, separated by a blank
/// line, and the output ends with a trailing blank line.
pub fn serialize_srt(cues: &[Cue]) -> String {
    let mut output = String::new();
    for (i, cue) in cues.iter().enumerate() {
        if i > 0 {
            output.push_str("\n\n");
        }
        output.push_str(&format!(
            "{}\n{} {} {}\n{}",
            i + 1,
            cue.format_start_time(),
            TIMING_SEPARATOR,
            cue.format_end_time(),
            cue.text
        ));
    }
    output.push_str("\n\n");
    output
}

/// Resolve character entities (`&amp;`, `&eacute;`, `&#39;`, legacy `&amp` ...) in cue text
///
/// Decoding covers the full HTML5 entity set. Tag markup such as
/// `<font color="#fff">` is left byte-for-byte intact, as are unknown
/// entities and bare ampersands.
pub fn decode_display_text(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    htmlize::unescape(text).into_owned()
}

/// Replace the text of every cue with its translation
///
/// Timing and ids are kept. Fails when the counts differ.
pub fn rebuild_from_translations(cues: &[Cue], translations: &[String]) -> Result<Vec<Cue>, SubtitleError> {
    if cues.len() != translations.len() {
        return Err(SubtitleError::LengthMismatch {
            expected: cues.len(),
            actual: translations.len(),
        });
    }

    Ok(cues
        .iter()
        .zip(translations)
        .map(|(cue, translation)| Cue {
            text: translation.clone(),
            ..cue.clone()
        })
        .collect())
}
