use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::formats::{self, SubtitleFormat};
use crate::subtitle_model::Subtitle;

// @module: Application controller for subtitle checking and conversion

/// A subtitle loaded from disk with the diagnostics its parse produced
#[derive(Debug, Clone)]
pub struct LoadedSubtitle {
    // @field: Source path
    pub path: PathBuf,
    pub subtitle: Subtitle,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedSubtitle {
    pub fn error_count(&self) -> usize {
        diagnostics::error_count(&self.diagnostics)
    }
}

/// What happened to one input file during conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// Output written to this path
    Written(PathBuf),
    /// Output already existed and `force` was not set
    Skipped(PathBuf),
}

/// Counts reported after a folder conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a subtitle file and parse it, picking the format from the
    /// extension or, failing that, from the content
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedSubtitle> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(anyhow!("Input file does not exist: {:?}", path));
        }

        let source = FileManager::read_source(path)?;
        let (format, result) = formats::detect(&source.extension, &source.text)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", path))?;

        let diagnostics = result.diagnostics.clone();
        let mut subtitle = result.into_subtitle(source.name, format);
        if self.config.sort_on_load {
            subtitle.data = subtitle.data.sorted();
        }

        debug!(
            "Loaded {:?} as {} with {} cues and {} diagnostics",
            path,
            format,
            subtitle.data.cues.len(),
            diagnostics.len()
        );

        Ok(LoadedSubtitle {
            path: path.to_path_buf(),
            subtitle,
            diagnostics,
        })
    }

    /// Parse a file and log each of its diagnostics
    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadedSubtitle> {
        let loaded = self.load(path)?;
        Self::log_diagnostics(&loaded);

        info!(
            "{}: {} ({} cues, {} errors)",
            loaded.path.display(),
            loaded.subtitle.format,
            loaded.subtitle.data.cues.len(),
            loaded.error_count()
        );

        Ok(loaded)
    }

    /// Check a single file or every subtitle file under a directory.
    /// Returns the total number of error diagnostics found.
    pub fn check_path<P: AsRef<Path>>(&self, input: P) -> Result<usize> {
        let input = input.as_ref();
        let files = Self::collect_inputs(input)?;

        let mut errors = 0;
        for file in files {
            match self.check_file(&file) {
                Ok(loaded) => errors += loaded.error_count(),
                Err(e) => {
                    error!("Error checking file {}: {:#}", file.display(), e);
                    errors += 1;
                }
            }
        }

        Ok(errors)
    }

    /// Convert one file to `format`, writing `<stem><extension>` into `output_dir`
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_file: P1,
        output_dir: P2,
        format: SubtitleFormat,
        force_overwrite: bool,
    ) -> Result<ConvertOutcome> {
        let input_file = input_file.as_ref();
        let output_path = FileManager::generate_output_path(input_file, output_dir, format);

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, output already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(ConvertOutcome::Skipped(output_path));
        }

        let loaded = self.load(input_file)?;
        Self::log_diagnostics(&loaded);

        let errors = loaded.error_count();
        if self.config.strict && errors > 0 {
            return Err(AppError::Diagnostics {
                file: input_file.display().to_string(),
                count: errors,
            }
            .into());
        }

        let converted = loaded.subtitle.with_format(format);
        FileManager::write_to_file(&output_path, &converted.to_text())?;

        info!(
            "Converted {} ({}) -> {} ({})",
            input_file.display(),
            loaded.subtitle.format,
            output_path.display(),
            format
        );

        Ok(ConvertOutcome::Written(output_path))
    }

    /// Convert every subtitle file under `input_dir`, at most
    /// `max_parallel_files` at a time. Outputs keep the input's relative
    /// layout below `output_dir`, or sit next to their input when it is None.
    /// When several inputs map to one output path only the first, in path
    /// order, is converted and the others count as failed.
    pub async fn convert_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        format: SubtitleFormat,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting files");

        // Inputs sharing a stem would write the same output, first one wins
        let mut summary = FolderSummary::default();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut jobs = Vec::with_capacity(files.len());
        for file in files {
            let target_dir = Self::target_dir(&file, &input_dir, output_dir.as_deref());
            let output_path = FileManager::generate_output_path(&file, &target_dir, format);
            if let Some(owner) = claimed.get(&output_path) {
                error!(
                    "Error converting file {}: output {} is already written from {}",
                    file.display(),
                    output_path.display(),
                    owner.display()
                );
                summary.failed += 1;
                folder_pb.inc(1);
                continue;
            }
            claimed.insert(output_path, file.clone());
            jobs.push((file, target_dir));
        }

        let results: Vec<(PathBuf, Result<ConvertOutcome>)> = stream::iter(jobs)
            .map(|(file, target_dir)| {
                let controller = self.clone();
                let progress = folder_pb.clone();
                async move {
                    let outcome = tokio::task::spawn_blocking({
                        let file = file.clone();
                        move || controller.convert_file(&file, &target_dir, format, force_overwrite)
                    })
                    .await
                    .map_err(|e| anyhow!("Conversion task failed: {}", e))
                    .and_then(|result| result);
                    progress.inc(1);
                    (file, outcome)
                }
            })
            .buffer_unordered(self.config.max_parallel_files)
            .collect()
            .await;

        for (file, outcome) in results {
            match outcome {
                Ok(ConvertOutcome::Written(_)) => summary.converted += 1,
                Ok(ConvertOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error converting file {}: {:#}", file.display(), e);
                    summary.failed += 1;
                }
            }
        }

        folder_pb.finish_with_message("Folder conversion complete");

        info!(
            "Folder conversion completed in {}: {} converted, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.converted,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    // Where the output of `file` goes during a folder conversion
    fn target_dir(file: &Path, input_dir: &Path, output_dir: Option<&Path>) -> PathBuf {
        let parent = file.parent().unwrap_or(input_dir);
        match output_dir {
            Some(output_dir) => match parent.strip_prefix(input_dir) {
                Ok(relative) => output_dir.join(relative),
                Err(_) => output_dir.to_path_buf(),
            },
            None => parent.to_path_buf(),
        }
    }

    fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
        if FileManager::dir_exists(input) {
            let files = FileManager::find_subtitle_files(input)?;
            if files.is_empty() {
                return Err(anyhow!("No subtitle files found in directory: {:?}", input));
            }
            Ok(files)
        } else if FileManager::file_exists(input) {
            Ok(vec![input.to_path_buf()])
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input))
        }
    }

    fn log_diagnostics(loaded: &LoadedSubtitle) {
        let file = loaded.path.display();
        for diagnostic in &loaded.diagnostics {
            match diagnostic.kind {
                DiagnosticKind::Info => debug!("{}: {}", file, diagnostic),
                DiagnosticKind::Warning => warn!("{}: {}", file, diagnostic),
                DiagnosticKind::Error | DiagnosticKind::Other => error!("{}: {}", file, diagnostic),
            }
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
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
