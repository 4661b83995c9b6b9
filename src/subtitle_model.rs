use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{self, Diagnostic};
use crate::formats::SubtitleFormat;
use crate::ordering;

// @module: Unified subtitle representation shared by every format

/// One timed text unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cue {
    // @field: Start time in ms
    pub start_time: u64,

    // @field: End time in ms, expected >= start_time but never enforced
    pub end_time: u64,

    // @field: Text with `\n` line breaks
    pub text: String,

    // @field: Dialect-specific fields kept for round trips (ASS Layer, Style, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl Cue {
    pub fn new(start_time: u64, end_time: u64, text: impl Into<String>) -> Self {
        Cue {
            start_time,
            end_time,
            text: text.into(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extras(mut self, extras: BTreeMap<String, String>) -> Self {
        self.extras = extras;
        self
    }

    /// Duration in ms, zero when the cue ends before it starts
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// True when `position_ms` lies within the cue, both ends inclusive
    pub fn is_active_at(&self, position_ms: u64) -> bool {
        self.start_time <= position_ms && position_ms <= self.end_time
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

/// Cues in document order plus document-level sections the core does not interpret
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtitleData {
    pub cues: Vec<Cue>,

    /// Section name -> raw section text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl SubtitleData {
    pub fn new(cues: Vec<Cue>) -> Self {
        SubtitleData {
            cues,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extras(cues: Vec<Cue>, extras: BTreeMap<String, String>) -> Self {
        SubtitleData { cues, extras }
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// Copy with the cues stably sorted by start time
    pub fn sorted(&self) -> Self {
        let mut cues = self.cues.clone();
        ordering::sort_by_start_time(&mut cues);
        SubtitleData {
            cues,
            extras: self.extras.clone(),
        }
    }

    /// Copy with `cue` appended
    pub fn with_cue_added(&self, cue: Cue) -> Self {
        let mut data = self.clone();
        data.cues.push(cue);
        data
    }

    /// Copy with the cue at `index` replaced, `None` if out of bounds
    pub fn with_cue_replaced(&self, index: usize, cue: Cue) -> Option<Self> {
        if index >= self.cues.len() {
            return None;
        }
        let mut data = self.clone();
        data.cues[index] = cue;
        Some(data)
    }

    /// Copy without the cue at `index`, `None` if out of bounds
    pub fn with_cue_removed(&self, index: usize) -> Option<Self> {
        if index >= self.cues.len() {
            return None;
        }
        let mut data = self.clone();
        data.cues.remove(index);
        Some(data)
    }
}

/// A named document bound to one format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Logical file name, normally without extension
    pub name: String,
    pub format: SubtitleFormat,
    #[serde(default)]
    pub data: SubtitleData,
}

impl Subtitle {
    pub fn new(name: impl Into<String>, format: SubtitleFormat, data: SubtitleData) -> Self {
        Subtitle {
            name: name.into(),
            format,
            data,
        }
    }

    /// File name with the format extension, appended only if missing
    pub fn full_name(&self) -> String {
        let extension = self.format.extension();
        if self.name.ends_with(extension) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, extension)
        }
    }

    /// Serialize with this subtitle's own format
    pub fn to_text(&self) -> String {
        self.format.to_text(self)
    }

    /// Same document bound to another format, for conversion
    pub fn with_format(&self, format: SubtitleFormat) -> Self {
        Subtitle {
            name: self.name.clone(),
            format,
            data: self.data.clone(),
        }
    }
}

impl Default for Subtitle {
    fn default() -> Self {
        Subtitle {
            name: String::new(),
            format: SubtitleFormat::SubRip,
            data: SubtitleData::default(),
        }
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle")?;
        writeln!(f, "Name: {}", self.full_name())?;
        writeln!(f, "Format: {}", self.format.name())?;
        writeln!(f, "Cues: {}", self.data.cues.len())?;
        Ok(())
    }
}

/// Output of every format's parse operation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtitleParseResult {
    pub diagnostics: Vec<Diagnostic>,
    pub data: SubtitleData,
}

impl SubtitleParseResult {
    pub fn new(diagnostics: Vec<Diagnostic>, data: SubtitleData) -> Self {
        SubtitleParseResult { diagnostics, data }
    }

    /// True if any diagnostic has the kind Error or Other
    pub fn has_errors(&self) -> bool {
        diagnostics::contains_errors(&self.diagnostics)
    }

    /// Bind the parsed data to a name and format
    pub fn into_subtitle(self, name: impl Into<String>, format: SubtitleFormat) -> Subtitle {
        Subtitle::new(name, format, self.data)
    }
}
