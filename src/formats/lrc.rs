use std::collections::BTreeMap;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::formats::source_lines;
use crate::subtitle_model::{Cue, SubtitleData, SubtitleParseResult};
use crate::time_codec::{format_time, TimePattern, TIME_UNIT_MINUTE, TIME_UNIT_SECOND};

// @module: LRC lyrics (.lrc) parsing and serialization

// @const: Leading [mm:ss.cc] tag
static TIME_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\d{2}):(\d{2})\.(\d{2})\]").unwrap());

// @const: ID tag such as [ti:Title] or [offset:+100]
static ID_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([a-z]+):([^\]]*)\]$").unwrap());

/// Duration given to the last line, which has no successor to end it
pub const LAST_LINE_DURATION_MS: u64 = 1_000;

/// Serialize as `[mm:ss.SS] text` lines, preceded by any ID tags
pub fn to_text(data: &SubtitleData) -> String {
    let mut out = String::new();

    for (tag, value) in data.extras.iter().filter(|(tag, _)| is_id_tag_key(tag)) {
        out.push_str(&format!("[{}:{}]\n", tag, value));
    }

    for cue in &data.cues {
        // One lyric per line: LRC has no multi-line cues
        let text = cue.text.lines().map(str::trim).collect::<Vec<_>>().join(" ");
        out.push_str(&format!("[{}] {}\n", format_time(cue.start_time, TimePattern::Lrc), text));
    }

    out.trim_end().to_string()
}

/// Parse LRC text. Each line ends where the next timestamped line starts.
pub fn parse_text(text: &str) -> SubtitleParseResult {
    let mut diagnostics = Vec::new();
    let mut extras = BTreeMap::new();
    let mut lyrics: Vec<LyricLine> = Vec::new();

    for (index, raw_line) in source_lines(text).into_iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = TIME_TAG_REGEX.captures(line) {
            let minutes: u64 = caps[1].parse().unwrap_or(0);
            let seconds: u64 = caps[2].parse().unwrap_or(0);
            let centis: u64 = caps[3].parse().unwrap_or(0);

            lyrics.push(LyricLine {
                line_number: index + 1,
                source: line,
                start_time: minutes * TIME_UNIT_MINUTE + seconds * TIME_UNIT_SECOND + centis * 10,
                text: line[caps[0].len()..].trim().to_string(),
            });
        } else if let Some(caps) = ID_TAG_REGEX.captures(line) {
            extras.insert(caps[1].to_string(), caps[2].to_string());
        } else {
            diagnostics.push(
                Diagnostic::error("Invalid time format. Expected format: [mm:ss.SS]").at(index + 1, line),
            );
        }
    }

    let mut cues = Vec::with_capacity(lyrics.len());
    for (position, lyric) in lyrics.iter().enumerate() {
        let end_time = lyrics
            .get(position + 1)
            .map(|next| next.start_time)
            .unwrap_or(lyric.start_time + LAST_LINE_DURATION_MS);

        if end_time <= lyric.start_time {
            diagnostics.push(
                Diagnostic::warning("The start time cannot be greater than or equal to the end time.")
                    .at(lyric.line_number, lyric.source),
            );
        }

        cues.push(Cue::new(lyric.start_time, end_time, lyric.text.clone()));
    }

    trace!("LRC: {} cues, {} diagnostics", cues.len(), diagnostics.len());
    SubtitleParseResult::new(diagnostics, SubtitleData::with_extras(cues, extras))
}

struct LyricLine<'a> {
    line_number: usize,
    source: &'a str,
    start_time: u64,
    text: String,
}

// ID tags are lowercase words; other formats' document keys never are
fn is_id_tag_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase())
}
