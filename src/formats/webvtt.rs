use std::collections::BTreeMap;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::formats::{source_lines, split_blocks};
use crate::subtitle_model::{Cue, SubtitleData, SubtitleParseResult};
use crate::time_codec::{format_time, parse_time, TimePattern};

// @module: WebVTT (.vtt) parsing and serialization

// @const: One side of a timing line, hours optional
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2}:)?\d{2}:\d{2}\.\d{3}$").unwrap());

/// Document extras key holding the raw header block
pub const HEADER_KEY: &str = "WEBVTT";

/// Cue extras key for the optional cue identifier line
pub const IDENTIFIER_KEY: &str = "identifier";

/// Cue extras key for cue settings following the end timestamp
pub const SETTINGS_KEY: &str = "settings";

// Blocks kept verbatim in document extras, keyed by their keyword
const PRESERVED_BLOCKS: [&str; 2] = ["STYLE", "REGION"];

/// Serialize as a WebVTT document: header, preserved STYLE/REGION blocks, cues
pub fn to_text(data: &SubtitleData) -> String {
    let mut blocks = Vec::with_capacity(data.cues.len() + 1);

    let header = data
        .extra(HEADER_KEY)
        .filter(|header| header.lines().next().is_some_and(|line| is_header(line.trim())))
        .unwrap_or(HEADER_KEY);
    blocks.push(header.to_string());

    for keyword in PRESERVED_BLOCKS {
        if let Some(block) = data.extra(keyword) {
            blocks.push(block.to_string());
        }
    }

    for cue in &data.cues {
        let mut block = String::new();
        if let Some(identifier) = cue.extra(IDENTIFIER_KEY) {
            block.push_str(identifier);
            block.push('\n');
        }
        block.push_str(&format_time(cue.start_time, TimePattern::WebVtt));
        block.push_str(" --> ");
        block.push_str(&format_time(cue.end_time, TimePattern::WebVtt));
        if let Some(settings) = cue.extra(SETTINGS_KEY) {
            block.push(' ');
            block.push_str(settings);
        }
        block.push('\n');
        block.push_str(&cue.text);
        blocks.push(block);
    }

    blocks.join("\n\n")
}

/// Parse WebVTT text.
///
/// A block with an invalid timing line is reported and the rest of the block
/// is consumed as that broken cue's body, so the next block starts cleanly.
pub fn parse_text(text: &str) -> SubtitleParseResult {
    let mut cues = Vec::new();
    let mut diagnostics = Vec::new();
    let mut extras: BTreeMap<String, String> = BTreeMap::new();

    let lines = source_lines(text);
    for (block_index, block) in split_blocks(&lines).iter().enumerate() {
        let (line_number, first_line) = block[0];
        let keyword = first_line.trim();

        if block_index == 0 && is_header(keyword) {
            // A cue written straight under the header, with no blank line
            match block.iter().position(|(_, line)| line.contains("-->")) {
                Some(timing_row) => {
                    let (cue_line, _) = block[timing_row];
                    diagnostics.push(
                        Diagnostic::warning("Missing blank line after the WEBVTT header.").at_line(cue_line),
                    );
                    extras.insert(HEADER_KEY.to_string(), join_block(&block[..timing_row]));
                    if let Some(cue) = parse_cue_block(&block[timing_row..], &mut diagnostics) {
                        cues.push(cue);
                    }
                }
                None => {
                    extras.insert(HEADER_KEY.to_string(), join_block(block));
                }
            }
            continue;
        }

        if keyword == "NOTE" || keyword.starts_with("NOTE ") || keyword.starts_with("NOTE\t") {
            diagnostics.push(Diagnostic::info("Comment block skipped.").at_line(line_number));
            continue;
        }

        if PRESERVED_BLOCKS.contains(&keyword) {
            extras
                .entry(keyword.to_string())
                .and_modify(|existing| {
                    existing.push_str("\n\n");
                    existing.push_str(&join_block(block));
                })
                .or_insert_with(|| join_block(block));
            continue;
        }

        if let Some(cue) = parse_cue_block(block, &mut diagnostics) {
            cues.push(cue);
        }
    }

    trace!("WebVTT: {} cues, {} diagnostics", cues.len(), diagnostics.len());
    SubtitleParseResult::new(diagnostics, SubtitleData::with_extras(cues, extras))
}

fn parse_cue_block(block: &[(usize, &str)], diagnostics: &mut Vec<Diagnostic>) -> Option<Cue> {
    let first_line = block[0].1;

    // An identifier line may precede the timing line
    let (identifier, timing_row) =
        if !first_line.contains("-->") && block.get(1).is_some_and(|(_, line)| line.contains("-->")) {
            (Some(first_line.trim()), 1)
        } else {
            (None, 0)
        };

    let (line_number, timing_line) = block[timing_row];
    let Some(timing) = parse_timing(timing_line) else {
        diagnostics.push(Diagnostic::error("Invalid timecode format.").at(line_number, timing_line));
        return None;
    };

    if timing.start >= timing.end {
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

    let mut extras = BTreeMap::new();
    if let Some(identifier) = identifier {
        extras.insert(IDENTIFIER_KEY.to_string(), identifier.to_string());
    }
    if let Some(settings) = timing.settings {
        extras.insert(SETTINGS_KEY.to_string(), settings.to_string());
    }

    Some(Cue::new(timing.start, timing.end, text).with_extras(extras))
}

struct Timing<'a> {
    start: u64,
    end: u64,
    settings: Option<&'a str>,
}

fn parse_timing(line: &str) -> Option<Timing<'_>> {
    let (start, rest) = line.trim().split_once(" --> ")?;
    if rest.contains("-->") {
        return None;
    }

    let rest = rest.trim_start();
    let (end, settings) = match rest.split_once(char::is_whitespace) {
        Some((end, settings)) => (end, Some(settings.trim()).filter(|s| !s.is_empty())),
        None => (rest, None),
    };

    if !TIMESTAMP_REGEX.is_match(start) || !TIMESTAMP_REGEX.is_match(end) {
        return None;
    }

    Some(Timing {
        start: parse_time(start).ok()?,
        end: parse_time(end).ok()?,
        settings,
    })
}

fn is_header(line: &str) -> bool {
    line == HEADER_KEY || line.starts_with("WEBVTT ") || line.starts_with("WEBVTT\t")
}

fn join_block(block: &[(usize, &str)]) -> String {
    block
        .iter()
        .map(|(_, line)| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
