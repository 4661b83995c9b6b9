// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subtypo::app_config::{self, Config};
use subtypo::app_controller::{ConvertOutcome, Controller};
use subtypo::file_utils::FileManager;
use subtypo::formats::{SubtitleFormat, ALL_FORMATS};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Vtt,
    Ass,
    Lrc,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Srt => SubtitleFormat::SubRip,
            CliFormat::Vtt => SubtitleFormat::WebVtt,
            CliFormat::Ass => SubtitleFormat::Ass,
            CliFormat::Lrc => SubtitleFormat::Lrc,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file, or every subtitle file in a directory
    Convert {
        /// Input subtitle file or directory
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target format (defaults to the configured output format)
        #[arg(short, long, value_enum)]
        to: Option<CliFormat>,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force: bool,
    },

    /// Parse subtitle files and report their diagnostics
    Check {
        /// Input subtitle file or directory
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// List the supported formats
    Formats,

    /// Generate shell completions for subtypo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// SubTypo - subtitle checking and conversion
///
/// Reads SubRip, WebVTT, ASS and LRC files, reports problems line by line,
/// and converts between the four formats.
#[derive(Parser, Debug)]
#[command(name = "subtypo")]
#[command(version)]
#[command(about = "Subtitle checking and conversion tool")]
#[command(long_about = "SubTypo reads SubRip, WebVTT, ASS and LRC subtitles, reports problems line by line and converts between formats.

EXAMPLES:
    subtypo convert movie.srt --to vtt          # Write movie.vtt next to movie.srt
    subtypo convert /subs --to ass -o /out -f   # Convert a whole directory, overwriting
    subtypo check episode.ass                   # Print diagnostics, fail on errors
    subtypo formats                             # List supported formats
    subtypo completions bash > subtypo.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in <config dir>/subtypo/conf.json by default. You can
    specify a different file with --config. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtypo", &mut std::io::stdout());
            Ok(())
        }
        Commands::Formats => {
            print_formats();
            Ok(())
        }
        Commands::Check { input } => {
            let controller = Controller::with_config(load_config(cli.config.as_deref(), cli.log_level)?)?;
            let errors = controller.check_path(&input)?;
            if errors > 0 {
                return Err(anyhow!("{} error(s) found in {:?}", errors, input));
            }
            info!("No errors found");
            Ok(())
        }
        Commands::Convert {
            input,
            to,
            output_dir,
            force,
        } => {
            let config = load_config(cli.config.as_deref(), cli.log_level)?;
            let format = match to {
                Some(format) => format.into(),
                None => config.output_format()?,
            };
            let controller = Controller::with_config(config)?;
            run_convert(&controller, input, format, output_dir, force).await
        }
    }
}

// Load the config and apply the log level from it unless the CLI set one
fn load_config(path: Option<&Path>, cli_level: Option<CliLogLevel>) -> Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&path)?;

    match cli_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

async fn run_convert(
    controller: &Controller,
    input: PathBuf,
    format: SubtitleFormat,
    output_dir: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    if FileManager::dir_exists(&input) {
        let summary = controller.convert_folder(input, output_dir, format, force).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
        return Ok(());
    }

    if !FileManager::file_exists(&input) {
        return Err(anyhow!("Input path does not exist: {:?}", input));
    }

    let output_dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };

    match controller.convert_file(&input, &output_dir, format, force) {
        Ok(ConvertOutcome::Written(path)) => {
            info!("Success: {}", path.display());
            Ok(())
        }
        Ok(ConvertOutcome::Skipped(_)) => Ok(()),
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            Err(e)
        }
    }
}

fn print_formats() {
    for format in ALL_FORMATS {
        println!(
            "{}  {:<5} {:<27} {}",
            format.id(),
            format.extension(),
            format.name(),
            format.time_format()
        );
    }
}
