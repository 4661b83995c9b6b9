use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::formats::{source_lines, split_blocks};
use crate::subtitle_model::{Cue, SubtitleData, SubtitleParseResult};
use crate::time_codec::{format_time, parse_time, TimePattern};

// @module: SubRip (.srt) parsing and serialization

// @const: SRT timing line, comma separator; anything after the end time
// (legacy position coordinates) is ignored
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+:\d{2}:\d{2},\d{1,3})\s*-->\s*(\d+:\d{2}:\d{2},\d{1,3})(?:\s|$)").unwrap()
});

/// Serialize cues as numbered SubRip blocks
pub fn to_text(data: &SubtitleData) -> String {
    let mut out = String::new();
    for (index, cue) in data.cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_time(cue.start_time, TimePattern::SubRip),
            format_time(cue.end_time, TimePattern::SubRip),
            cue.text
        ));
    }
    out.trim_end().to_string()
}

/// Parse SubRip text. Index lines are ignored; a block whose timing line is
/// malformed is dropped and reported.
pub fn parse_text(text: &str) -> SubtitleParseResult {
    let mut cues = Vec::new();
    let mut diagnostics = Vec::new();

    let lines = source_lines(text);
    for block in split_blocks(&lines) {
        if let Some(cue) = parse_block(&block, &mut diagnostics) {
            cues.push(cue);
        }
    }

    trace!("SubRip: {} cues, {} diagnostics", cues.len(), diagnostics.len());
    SubtitleParseResult::new(diagnostics, SubtitleData::new(cues))
}

fn parse_block(block: &[(usize, &str)], diagnostics: &mut Vec<Diagnostic>) -> Option<Cue> {
    let (first_number, first_line) = block[0];

    // The index line is optional
    let timing_row = if first_line.contains("-->") { 0 } else { 1 };

    let Some(&(line_number, timing_line)) = block.get(timing_row) else {
        diagnostics.push(Diagnostic::error("Missing timecode").at(first_number, first_line));
        return None;
    };

    let Some((start_time, end_time)) = parse_timing(timing_line) else {
        diagnostics.push(Diagnostic::error("Invalid timecode format.").at(line_number, timing_line));
        return None;
    };

    if start_time >= end_time {
        diagnostics.push(
            Diagnostic::warning("The start time cannot be greater than or equal to the end time.")
                .at(line_number, timing_line),
        );
    }

    let text = block[timing_row + 1..]
        .iter()
        .map(|(_, line)| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    Some(Cue::new(start_time, end_time, text))
}

fn parse_timing(line: &str) -> Option<(u64, u64)> {
    let caps = TIMECODE_REGEX.captures(line.trim())?;
    let start = parse_time(&caps[1]).ok()?;
    let end = parse_time(&caps[2]).ok()?;
    Some((start, end))
}
