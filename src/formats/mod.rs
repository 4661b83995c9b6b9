/*!
 * Subtitle dialects and the format registry.
 *
 * The set of formats is closed: [`SubtitleFormat`] is an enum and each
 * variant dispatches to its own module for parsing and serialization.
 * [`ALL_FORMATS`] fixes both the numeric ids exposed to format pickers and
 * the order in which [`detect`] tries formats when the extension is unknown.
 */

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle_model::{Subtitle, SubtitleParseResult};
use crate::time_codec::TimePattern;

pub mod ass;
pub mod lrc;
pub mod subrip;
pub mod webvtt;

/// One of the supported subtitle dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    SubRip,
    Lrc,
    WebVtt,
    Ass,
}

/// Every registered format, in id and detection order
pub const ALL_FORMATS: [SubtitleFormat; 4] = [
    SubtitleFormat::SubRip,
    SubtitleFormat::Lrc,
    SubtitleFormat::WebVtt,
    SubtitleFormat::Ass,
];

impl SubtitleFormat {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubRip => "SubRip",
            Self::Lrc => "LRC Lyrics",
            Self::WebVtt => "WebVTT",
            Self::Ass => "Advanced SubStation Alpha",
        }
    }

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::SubRip => ".srt",
            Self::Lrc => ".lrc",
            Self::WebVtt => ".vtt",
            Self::Ass => ".ass",
        }
    }

    pub fn is_time_based(&self) -> bool {
        true
    }

    /// Pattern used for this dialect's timestamps
    pub fn time_pattern(&self) -> TimePattern {
        match self {
            Self::SubRip => TimePattern::SubRip,
            Self::Lrc => TimePattern::Lrc,
            Self::WebVtt => TimePattern::WebVtt,
            Self::Ass => TimePattern::AssCentiseconds,
        }
    }

    /// [`Self::time_pattern`] as its pattern string
    pub fn time_format(&self) -> &'static str {
        self.time_pattern().as_str()
    }

    /// Serialize a subtitle's data in this dialect. Never fails.
    pub fn to_text(&self, subtitle: &Subtitle) -> String {
        match self {
            Self::SubRip => subrip::to_text(&subtitle.data),
            Self::Lrc => lrc::to_text(&subtitle.data),
            Self::WebVtt => webvtt::to_text(&subtitle.data),
            Self::Ass => ass::to_text(&subtitle.data),
        }
    }

    /// Parse text in this dialect. Problems become diagnostics, never errors.
    pub fn parse_text(&self, text: &str) -> SubtitleParseResult {
        match self {
            Self::SubRip => subrip::parse_text(text),
            Self::Lrc => lrc::parse_text(text),
            Self::WebVtt => webvtt::parse_text(text),
            Self::Ass => ass::parse_text(text),
        }
    }

    /// Stable position in [`ALL_FORMATS`]
    pub fn id(&self) -> usize {
        match self {
            Self::SubRip => 0,
            Self::Lrc => 1,
            Self::WebVtt => 2,
            Self::Ass => 3,
        }
    }

    pub fn by_id(id: usize) -> Option<Self> {
        ALL_FORMATS.get(id).copied()
    }

    /// Look a format up by extension. The leading dot is optional and the
    /// comparison ignores ASCII case.
    pub fn by_extension(extension: &str) -> Result<Self, SubtitleError> {
        let normalized = normalize_extension(extension);
        ALL_FORMATS
            .iter()
            .copied()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| SubtitleError::UnknownFormat(extension.to_string()))
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_extension(s)
    }
}

/// Pick a format for `text` and parse it.
///
/// A known extension is trusted: the text is parsed with that format and the
/// result is returned as-is, errors included. Otherwise every format is tried
/// in [`ALL_FORMATS`] order and the first one whose result has no Error/Other
/// diagnostics wins.
pub fn detect(
    extension: &str,
    text: &str,
) -> Result<(SubtitleFormat, SubtitleParseResult), SubtitleError> {
    if let Ok(format) = SubtitleFormat::by_extension(extension) {
        debug!("Parsing as {} based on extension '{}'", format, extension);
        return Ok((format, format.parse_text(text)));
    }

    debug!("Unknown extension '{}', trying every format", extension);
    ALL_FORMATS
        .iter()
        .find_map(|format| {
            let result = format.parse_text(text);
            if result.has_errors() {
                trace!("{} rejected: {} diagnostic(s)", format, result.diagnostics.len());
                None
            } else {
                debug!("Detected {} ({} cues)", format, result.data.cues.len());
                Some((*format, result))
            }
        })
        .ok_or_else(|| SubtitleError::UnknownFormat(extension.to_string()))
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().to_ascii_lowercase();
    if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{}", trimmed)
    }
}

/// Source lines with a leading byte-order mark removed. `str::lines` already
/// accepts `\r\n`.
pub(crate) fn source_lines(text: &str) -> Vec<&str> {
    text.strip_prefix('\u{feff}').unwrap_or(text).lines().collect()
}

/// Runs of non-blank lines, each line paired with its 1-based number
pub(crate) fn split_blocks<'a>(lines: &[&'a str]) -> Vec<Vec<(usize, &'a str)>> {
    let mut blocks = Vec::new();
    let mut current: Vec<(usize, &'a str)> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((index + 1, *line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}
