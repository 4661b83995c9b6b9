/*!
 * Common test utilities for the subtypo test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SRT_SAMPLE: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains
multiple lines.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

pub const VTT_SAMPLE: &str = "WEBVTT

00:00:01.000 --> 00:00:04.000
Hello

intro
00:00:05.000 --> 00:00:09.000 align:start
World
";

pub const LRC_SAMPLE: &str = "[ti:Test Song]
[ar:Nobody]
[00:10.00] First line
[00:20.50] Second line
[00:31.00] Third line
";

pub const ASS_SAMPLE: &str = "[Script Info]
Title: Sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour
Style: Default,Arial,20,&H00FFFFFF

[Aegisub Project Garbage]
Last Style Storage: Default
Video File: ../movie.mkv

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:04.00,Default,,0,0,0,,First, with a comma
Dialogue: 1,0:00:05.50,0:00:09.00,Default,Ann,0,0,0,,Two\\Nlines
";

/// Routes `log` records to the test output, set RUST_LOG to see them
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample SubRip file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SRT_SAMPLE)
}
