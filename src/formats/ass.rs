/*!
 * Advanced SubStation Alpha (.ass) parsing and serialization.
 *
 * Only the `Dialogue:` lines of `[Events]` become cues. Every other section
 * is kept verbatim in the document extras, keyed by its bracketed header, and
 * written back unchanged. Dialogue fields other than Start, End and Text are
 * kept in the cue extras under their `Format:` column name.
 */

use std::collections::BTreeMap;

use log::trace;

use crate::diagnostics::Diagnostic;
use crate::formats::source_lines;
use crate::subtitle_model::{Cue, SubtitleData, SubtitleParseResult};
use crate::time_codec::{format_time, parse_ass_time, TimePattern};

pub const SCRIPT_INFO_SECTION: &str = "[Script Info]";
pub const STYLES_SECTION: &str = "[V4+ Styles]";
pub const EVENTS_SECTION: &str = "[Events]";

const DEFAULT_SCRIPT_INFO: &str = "Title: SubTypo Generated Subtitle\n\
ScriptType: v4.00+\n\
WrapStyle: 0\n\
PlayResX: 1280\n\
PlayResY: 720";

const DEFAULT_STYLES: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1";

const DEFAULT_EVENTS_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

const FORMAT_PREFIX: &str = "Format:";
const DIALOGUE_PREFIX: &str = "Dialogue:";

/// Document extras key listing section headers in their original order
pub const SECTION_ORDER_KEY: &str = "Section Order";

const WELL_KNOWN_SECTIONS: [&str; 3] = [SCRIPT_INFO_SECTION, STYLES_SECTION, EVENTS_SECTION];

/// Serialize as an ASS script
pub fn to_text(data: &SubtitleData) -> String {
    section_order(data)
        .iter()
        .map(|header| match header.as_str() {
            EVENTS_SECTION => events_text(data),
            SCRIPT_INFO_SECTION => section_text(header, non_blank_extra(data, header).unwrap_or(DEFAULT_SCRIPT_INFO)),
            STYLES_SECTION => section_text(header, non_blank_extra(data, header).unwrap_or(DEFAULT_STYLES)),
            _ => section_text(header, data.extra(header).unwrap_or_default()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Headers in output order: the recorded order when there is one, with
/// Script Info and Styles always present, unrecorded custom sections placed
/// before Events, and Events always present
fn section_order(data: &SubtitleData) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for header in data.extra(SECTION_ORDER_KEY).unwrap_or_default().lines() {
        let known = data.extras.contains_key(header) || WELL_KNOWN_SECTIONS.contains(&header);
        if known && is_section_header(header) && !order.iter().any(|h| h == header) {
            order.push(header.to_string());
        }
    }

    if !order.iter().any(|h| h == SCRIPT_INFO_SECTION) {
        order.insert(0, SCRIPT_INFO_SECTION.to_string());
    }
    if !order.iter().any(|h| h == STYLES_SECTION) {
        let at = order.iter().position(|h| h == SCRIPT_INFO_SECTION).map_or(0, |i| i + 1);
        order.insert(at, STYLES_SECTION.to_string());
    }

    let custom: Vec<&String> = data
        .extras
        .keys()
        .filter(|header| is_section_header(header) && !WELL_KNOWN_SECTIONS.contains(&header.as_str()))
        .collect();
    for header in custom {
        if !order.contains(header) {
            let at = order.iter().position(|h| h == EVENTS_SECTION).unwrap_or(order.len());
            order.insert(at, header.clone());
        }
    }

    if !order.iter().any(|h| h == EVENTS_SECTION) {
        order.push(EVENTS_SECTION.to_string());
    }
    order
}

fn non_blank_extra<'a>(data: &'a SubtitleData, key: &str) -> Option<&'a str> {
    data.extra(key).filter(|body| !body.trim().is_empty())
}

fn events_text(data: &SubtitleData) -> String {
    let mut out = String::new();
    out.push_str(EVENTS_SECTION);
    out.push('\n');

    let events = data.extra(EVENTS_SECTION).unwrap_or_default();
    let format_line = events
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(FORMAT_PREFIX))
        .unwrap_or(DEFAULT_EVENTS_FORMAT);
    let fields = parse_format_line(format_line);

    out.push_str(format_line);
    out.push('\n');

    // Comments and other non-dialogue event lines
    for line in events.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(FORMAT_PREFIX) || trimmed.starts_with(DIALOGUE_PREFIX) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    for cue in &data.cues {
        let values: Vec<String> = fields
            .iter()
            .map(|field| match field.as_str() {
                "Start" => format_time(cue.start_time, TimePattern::AssCentiseconds),
                "End" => format_time(cue.end_time, TimePattern::AssCentiseconds),
                "Text" => cue.text.replace('\n', "\\N"),
                other => cue
                    .extra(other)
                    .map(str::to_string)
                    .unwrap_or_else(|| default_field_value(other).to_string()),
            })
            .collect();
        out.push_str(DIALOGUE_PREFIX);
        out.push(' ');
        out.push_str(&values.join(","));
        out.push('\n');
    }

    out
}

/// Parse an ASS script
pub fn parse_text(text: &str) -> SubtitleParseResult {
    let mut diagnostics = Vec::new();
    let mut cues = Vec::new();
    let mut sections: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    let mut current_section: Option<String> = None;
    let mut section_order: Vec<String> = Vec::new();
    let mut events_format: Vec<String> = Vec::new();

    let lines = source_lines(text);
    for (index, &line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if is_section_header(trimmed) {
            if !sections.contains_key(trimmed) {
                section_order.push(trimmed.to_string());
            }
            sections.entry(trimmed.to_string()).or_default();
            if trimmed == EVENTS_SECTION {
                events_format.clear();
            }
            current_section = Some(trimmed.to_string());
            continue;
        }

        let Some(section) = current_section.as_deref() else {
            if !trimmed.is_empty() && !trimmed.starts_with(';') {
                diagnostics.push(Diagnostic::error("Line outside of any section.").at(line_number, line));
            }
            continue;
        };

        let in_events = section == EVENTS_SECTION;
        if in_events && trimmed.starts_with(DIALOGUE_PREFIX) {
            // Dialogue lines are regenerated from cues on output
            if let Some(cue) = parse_dialogue(trimmed, line_number, &events_format, &mut diagnostics) {
                cues.push(cue);
            }
            continue;
        }

        if in_events && trimmed.starts_with(FORMAT_PREFIX) {
            events_format = parse_format_line(trimmed);
        }

        if let Some(lines) = sections.get_mut(section) {
            lines.push(line);
        }
    }

    if !sections.contains_key(EVENTS_SECTION) {
        // Only a blank document may lack events
        if lines.iter().all(|line| line.trim().is_empty()) {
            diagnostics.push(Diagnostic::warning("No [Events] section found."));
        } else {
            diagnostics.push(Diagnostic::error("No [Events] section found."));
        }
    }

    let mut extras: BTreeMap<String, String> = sections
        .into_iter()
        .map(|(header, lines)| (header, join_section(&lines)))
        .collect();
    if !section_order.is_empty() {
        extras.insert(SECTION_ORDER_KEY.to_string(), section_order.join("\n"));
    }

    trace!("ASS: {} cues, {} diagnostics", cues.len(), diagnostics.len());
    SubtitleParseResult::new(diagnostics, SubtitleData::with_extras(cues, extras))
}

fn parse_dialogue(
    line: &str,
    line_number: usize,
    format: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Cue> {
    if format.is_empty() {
        diagnostics.push(
            Diagnostic::error("Format line in [Events] section not found or is before Dialogue line.")
                .at(line_number, line),
        );
        return None;
    }

    // Text is the last column and may contain commas, so the split is bounded
    let body = &line[DIALOGUE_PREFIX.len()..];
    let body = body.strip_prefix(' ').unwrap_or(body);
    let values: Vec<&str> = body.splitn(format.len(), ',').collect();
    if values.len() < format.len() {
        diagnostics.push(
            Diagnostic::warning(format!(
                "Dialogue line has {} fields, expected {}.",
                values.len(),
                format.len()
            ))
            .at(line_number, line),
        );
    }

    let mut start_time = 0;
    let mut end_time = 0;
    let mut text = String::new();
    let mut extras = BTreeMap::new();

    for (field, value) in format.iter().zip(values) {
        match field.as_str() {
            "Start" | "End" => {
                let ms = match parse_ass_time(value) {
                    Ok(ms) => ms,
                    Err(e) => {
                        diagnostics.push(Diagnostic::error(e.to_string()).at(line_number, line));
                        return None;
                    }
                };
                if field == "Start" {
                    start_time = ms;
                } else {
                    end_time = ms;
                }
            }
            "Text" => text = value.replace("\\N", "\n"),
            _ => {
                extras.insert(field.clone(), value.trim().to_string());
            }
        }
    }

    if start_time >= end_time {
        diagnostics.push(
            Diagnostic::warning("The start time cannot be greater than or equal to the end time.")
                .at(line_number, line),
        );
    }

    Some(Cue::new(start_time, end_time, text).with_extras(extras))
}

fn parse_format_line(line: &str) -> Vec<String> {
    line.trim()
        .strip_prefix(FORMAT_PREFIX)
        .unwrap_or_default()
        .split(',')
        .map(|field| field.trim().to_string())
        .collect()
}

fn is_section_header(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('[') && line.ends_with(']')
}

fn default_field_value(field: &str) -> &'static str {
    match field {
        "Layer" | "MarginL" | "MarginR" | "MarginV" => "0",
        "Style" => "Default",
        _ => "",
    }
}

// Trailing blank lines belong to the gap before the next section
fn join_section(lines: &[&str]) -> String {
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    lines[..end].join("\n")
}

fn section_text(header: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{}\n", header)
    } else {
        format!("{}\n{}\n", header, body)
    }
}
