use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Trailing language tag before the `.srt` extension, e.g. `.en.srt` or `.pt-br.srt`
static SRT_LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.([a-z]{2,3}(?:-[a-z0-9]+)?)\.srt$").expect("valid language tag regex")
});

/// Trailing language tag before the `.zip` extension
static ZIP_LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.([a-z]{2,3}(?:-[a-z0-9]+)?)\.zip$").expect("valid language tag regex")
});

static SRT_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.srt$").expect("valid extension regex"));

static ZIP_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.zip$").expect("valid extension regex"));

/// Magic bytes at the start of every zip archive
pub const ZIP_MAGIC: [u8; 2] = [0x50, 0x4b];

/// Enum representing the kinds of input the tool accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Zip archive holding subtitle files
    Archive,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to a string, replacing invalid UTF-8 sequences
    pub fn read_to_string_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = Self::read_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a file to bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes())
    }

    /// Write bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Whether the file starts with the zip magic bytes
    pub fn is_zip_file<P: AsRef<Path>>(path: P) -> Result<bool> {
        let mut file = fs::File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;
        let mut header = [0u8; 2];
        match file.read_exact(&mut header) {
            Ok(()) => Ok(header == ZIP_MAGIC),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path.as_ref())),
        }
    }

    /// Classify an input file by content
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        if Self::is_zip_file(&path)? {
            Ok(FileType::Archive)
        } else {
            Ok(FileType::Subtitle)
        }
    }

    /// Expand the given paths into the input files to process
    ///
    /// Files are kept as given. Directories are walked recursively for
    /// `.srt` and `.zip` files, sorted by path. Paths that do not exist are
    /// an error.
    pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                inputs.push(path.to_path_buf());
            } else if path.is_dir() {
                let mut found = Vec::new();
                for entry in WalkDir::new(path).follow_links(true) {
                    let entry = entry.context("Failed to read directory entry")?;
                    if entry.file_type().is_file() && is_supported_extension(entry.path()) {
                        found.push(entry.into_path());
                    }
                }
                found.sort();
                inputs.extend(found);
            } else {
                return Err(anyhow::anyhow!("Input path does not exist: {:?}", path));
            }
        }

        Ok(inputs)
    }
}

fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("srt") || ext.eq_ignore_ascii_case("zip")
        })
        .unwrap_or(false)
}

/// Whether an archive entry name looks like a subtitle file
pub fn is_subtitle_entry(name: &str) -> bool {
    SRT_EXTENSION.is_match(name)
}

/// Name of the translated counterpart of `original_name`
///
/// A trailing language tag is replaced (`movie.en.srt` becomes
/// `movie.es.srt`), otherwise the tag is inserted before the extension
/// (`movie.srt` becomes `movie.es.srt`). Archives get a `.translated.zip`
/// suffix (`pack.zip` becomes `pack.es.translated.zip`). A name with an
/// unexpected extension gets the new suffix appended.
pub fn output_filename(original_name: &str, target_language: &str, is_zip: bool) -> String {
    let (language_tag, extension, suffix) = if is_zip {
        (&*ZIP_LANGUAGE_TAG, &*ZIP_EXTENSION, ".translated.zip")
    } else {
        (&*SRT_LANGUAGE_TAG, &*SRT_EXTENSION, ".srt")
    };
    let replacement = format!(".{}{}", target_language, suffix);

    if language_tag.is_match(original_name) {
        return language_tag
            .replace(original_name, regex::NoExpand(&replacement))
            .into_owned();
    }
    if extension.is_match(original_name) {
        return extension
            .replace(original_name, regex::NoExpand(&replacement))
            .into_owned();
    }
    format!("{}{}", original_name, replacement)
}

/// Base name of an archive entry path
pub fn entry_base_name(entry_name: &str) -> &str {
    entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name)
}
