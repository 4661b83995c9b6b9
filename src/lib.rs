/*!
 * # SubTypo - subtitle parsing and conversion
 *
 * A Rust library for reading, validating and converting subtitle files.
 *
 * ## Features
 *
 * - Four text dialects behind one data model:
 *   - SubRip (`.srt`)
 *   - WebVTT (`.vtt`)
 *   - Advanced SubStation Alpha (`.ass`)
 *   - LRC lyrics (`.lrc`)
 * - Format auto-detection from extension or content
 * - Tolerant parsing: problems are reported as line-numbered diagnostics
 *   and the rest of the document is still read
 * - Dialect-specific data (ASS sections, WebVTT styles, LRC tags) survives
 *   a parse/serialize round trip
 * - Millisecond time codec shared by every dialect
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_codec`: Millisecond <-> text conversion and validation
 * - `diagnostics`: Line-level parse findings
 * - `subtitle_model`: Cues, documents and parse results
 * - `formats`: Format registry and detection:
 *   - `formats::subrip`: SubRip
 *   - `formats::webvtt`: WebVTT
 *   - `formats::ass`: Advanced SubStation Alpha
 *   - `formats::lrc`: LRC lyrics
 * - `ordering`: Sorting, active-cue lookup and grouping
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Check and convert workflows
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diagnostics;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod ordering;
pub mod subtitle_model;
pub mod time_codec;

// Re-export main types for easier usage
pub use app_config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use errors::{AppError, SubtitleError};
pub use formats::{detect, SubtitleFormat, ALL_FORMATS};
pub use subtitle_model::{Cue, Subtitle, SubtitleData, SubtitleParseResult};
pub use time_codec::{format_time, parse_time, TimePattern};
