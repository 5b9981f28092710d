use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::app_config::Config;
use crate::file_utils::{self, FileManager, FileType};
use crate::language_utils::language_display_name;
use crate::providers::{self, Backend};
use crate::subtitle_processor::{parse_srt, rebuild_from_translations, serialize_srt};
use crate::translation::concurrency::run_all;
use crate::translation::TranslationService;

// @module: Application controller for subtitle processing

/// Folder inside an output archive holding the untouched subtitle entries
pub const ORIGINALS_FOLDER: &str = "originals/";

/// Folder inside an output archive holding the translated subtitle entries
pub const TRANSLATED_FOLDER: &str = "translated/";

/// Outcome of one controller run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Output files written, in input order
    pub written: Vec<PathBuf>,

    /// Inputs that could not be processed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Archive entries as `(name, data)` pairs
type ArchiveEntries = Vec<(String, Vec<u8>)>;

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Backend shared by every job, absent for dry runs
    backend: Option<Arc<dyn Backend>>,

    // @field: One progress bar per document being translated
    multi_progress: MultiProgress,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let backend = if config.job.dry_run {
            None
        } else {
            Some(providers::create_backend(&config.backend)?)
        };

        Ok(Self {
            config,
            backend,
            multi_progress: MultiProgress::new(),
        })
    }

    /// Create a controller around an existing backend
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Result<Self> {
        config.job.validate()?;

        Ok(Self {
            config,
            backend: Some(backend),
            multi_progress: MultiProgress::new(),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate every input into `output_dir`
    ///
    /// Directories are expanded to the subtitle files and archives they
    /// contain. A failing input is logged and recorded, and the remaining
    /// inputs are still processed.
    pub async fn run(&self, inputs: &[PathBuf], output_dir: &Path) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        FileManager::ensure_dir(output_dir)?;

        let files = FileManager::collect_inputs(inputs)?;
        info!(
            "Translating {} file(s) to {} into {}",
            files.len(),
            language_display_name(&self.config.job.target_language),
            output_dir.display()
        );

        let mut summary = RunSummary::default();
        for file in files {
            info!("Processing file: {}", file.display());
            match self.process_file(&file, output_dir).await {
                Ok(output_path) => {
                    info!("Success: {}", output_path.display());
                    summary.written.push(output_path);
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", file.display(), e);
                    summary.failed.push((file, format!("{:#}", e)));
                }
            }
        }

        info!(
            "Finished {} file(s), {} failed, in {}",
            summary.written.len(),
            summary.failed.len(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    /// Process one input file, returning the path written
    pub async fn process_file(&self, input_file: &Path, output_dir: &Path) -> Result<PathBuf> {
        match FileManager::detect_file_type(input_file)? {
            FileType::Archive => self.process_archive(input_file, output_dir).await,
            FileType::Subtitle => self.process_subtitle_file(input_file, output_dir).await,
        }
    }

    async fn process_subtitle_file(&self, input_file: &Path, output_dir: &Path) -> Result<PathBuf> {
        let file_name = Self::file_name(input_file)?;
        let content = FileManager::read_to_string_lossy(input_file)?;

        let document = self
            .translate_document(&content, &file_name, self.config.job.concurrency)
            .await?;

        let output_name = file_utils::output_filename(&file_name, &self.config.job.target_language, false);
        let output_path = output_dir.join(output_name);
        FileManager::write_to_file(&output_path, &document)?;
        Ok(output_path)
    }

    /// Translate every subtitle entry of an archive into a new archive
    ///
    /// Entries run through the shared dispatcher with `concurrency` workers,
    /// each entry's own job with a single worker so the total number of
    /// requests in flight stays bounded by `concurrency`.
    async fn process_archive(&self, input_file: &Path, output_dir: &Path) -> Result<PathBuf> {
        let file_name = Self::file_name(input_file)?;
        let bytes = FileManager::read_bytes(input_file)?;
        let (subtitles, others) = Self::read_archive_entries(bytes)
            .with_context(|| format!("Failed to open archive: {}", input_file.display()))?;
        debug!(
            "Found {} subtitle entries and {} other entries in {}",
            subtitles.len(),
            others.len(),
            file_name
        );

        let translated = run_all(subtitles, self.config.job.concurrency, move |_, (name, data): (String, Vec<u8>)| async move {
            info!("Translating archive entry: {}", name);
            let text = String::from_utf8_lossy(&data).into_owned();
            let result = self.translate_document(&text, file_utils::entry_base_name(&name), 1).await;
            (name, data, result)
        })
        .await?;

        let target = &self.config.job.target_language;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (name, data) in &others {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }

        for (name, original, result) in translated {
            let document = result.with_context(|| format!("Failed to translate archive entry: {}", name))?;
            let translated_name = file_utils::output_filename(file_utils::entry_base_name(&name), target, false);

            writer.start_file(format!("{}{}", ORIGINALS_FOLDER, name), options)?;
            writer.write_all(&original)?;
            writer.start_file(format!("{}{}", TRANSLATED_FOLDER, translated_name), options)?;
            writer.write_all(document.as_bytes())?;
        }

        let archive_bytes = writer.finish()?.into_inner();
        let output_path = output_dir.join(file_utils::output_filename(&file_name, target, true));
        FileManager::write_bytes(&output_path, &archive_bytes)?;
        Ok(output_path)
    }

    /// Split an archive into subtitle entries and all other entries
    fn read_archive_entries(bytes: Vec<u8>) -> Result<(ArchiveEntries, ArchiveEntries)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut subtitles = Vec::new();
        let mut others = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)
                .with_context(|| format!("Failed to read archive entry: {}", name))?;

            if file_utils::is_subtitle_entry(&name) {
                subtitles.push((name, data));
            } else {
                others.push((name, data));
            }
        }

        Ok((subtitles, others))
    }

    /// Parse, translate and rebuild one subtitle document
    async fn translate_document(&self, content: &str, display_name: &str, concurrency: usize) -> Result<String> {
        let cues = parse_srt(content);
        debug!("Parsed {} cues from {}", cues.len(), display_name);

        let mut job = self.config.job.clone();
        job.context_hint = Some(display_name.to_string());
        job.concurrency = concurrency;

        let progress_bar = self.progress_bar(cues.len() as u64, display_name);
        let bar = progress_bar.clone();
        let service = TranslationService::new(job, self.backend.clone())?
            .with_progress(Arc::new(move |done: usize, _total: usize| bar.set_position(done as u64)));

        let translations = service.translate(&cues).await;
        progress_bar.finish_and_clear();
        self.multi_progress.remove(&progress_bar);
        let translations = translations?;

        let untranslated = cues
            .iter()
            .zip(&translations)
            .filter(|(cue, translation)| !cue.text.trim().is_empty() && translation.trim().is_empty())
            .count();
        if untranslated > 0 {
            warn!("{}: {} of {} cues came back untranslated", display_name, untranslated, cues.len());
        }

        let rebuilt = rebuild_from_translations(&cues, &translations)?;
        Ok(serialize_srt(&rebuilt))
    }

    fn progress_bar(&self, total: u64, name: &str) -> ProgressBar {
        let progress_bar = self.multi_progress.add(ProgressBar::new(total));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cues ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(name.to_string());
        progress_bar
    }

    fn file_name(path: &Path) -> Result<String> {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("Input path has no file name: {:?}", path))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
