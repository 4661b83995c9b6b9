use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::formats::{SubtitleFormat, ALL_FORMATS};

// @module: File and directory utilities

// @const: UTF-8 byte order mark
const UTF8_BOM: &str = "\u{feff}";

/// A subtitle file read from disk, split into the pieces detection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    // @field: Full path of the file
    pub path: PathBuf,
    // @field: File name without its last extension
    pub name: String,
    // @field: Last extension with a leading dot, empty when there is none
    pub extension: String,
    // @field: Decoded text
    pub text: String,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
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

    /// Read a file as text. A UTF-8 BOM is dropped and invalid bytes are
    /// replaced rather than rejected.
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        let decoded = String::from_utf8_lossy(&bytes);
        let text: &str = &decoded;
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
    }

    /// Read a subtitle file together with its name and claimed extension
    pub fn read_source<P: AsRef<Path>>(path: P) -> Result<SourceFile> {
        let path = path.as_ref();
        let text = Self::read_to_string(path)?;

        Ok(SourceFile {
            path: path.to_path_buf(),
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default(),
            extension: path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
            text,
        })
    }

    /// Write a string to a file through a temporary file in the same
    /// directory, so readers never see a half-written document
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        Ok(())
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Find every file with a registered subtitle extension, sorted by path
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for format in ALL_FORMATS {
            files.append(&mut Self::find_files(dir.as_ref(), format.extension())?);
        }
        files.sort();
        Ok(files)
    }

    // @generates: Output path for a converted subtitle
    // @params: input_file, output_dir, target format
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        format: SubtitleFormat,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(format.extension());

        output_dir.as_ref().join(output_filename)
    }
}
