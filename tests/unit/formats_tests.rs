/*!
 * Tests for the individual subtitle dialects
 */

use subtypo::diagnostics::DiagnosticKind;
use subtypo::formats::{ass, lrc, subrip, webvtt, SubtitleFormat};
use subtypo::subtitle_model::{Cue, SubtitleData};

use crate::common;

#[test]
fn test_subripParse_withBackwardsTiming_shouldWarnAndKeepCue() {
    let result = subrip::parse_text("00:00:10,000 --> 00:00:05,000\nText");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Warning);
    assert_eq!(result.data.cues, vec![Cue::new(10_000, 5_000, "Text")]);
}

#[test]
fn test_subripParse_withOneBrokenBlock_shouldIsolateTheError() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nOne\n\n\
                 2\n00:00:03,000 -> 00:00:04,000\nTwo\n\n\
                 3\n00:00:05,000 --> 00:00:06,000\nThree";
    let result = subrip::parse_text(input);

    assert_eq!(result.data.cues, vec![Cue::new(1_000, 2_000, "One"), Cue::new(5_000, 6_000, "Three")]);
    assert_eq!(result.diagnostics.len(), 1);

    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::Error);
    assert_eq!(diagnostic.line_number, Some(6));
    assert_eq!(diagnostic.line.as_deref(), Some("00:00:03,000 -> 00:00:04,000"));
}

#[test]
fn test_subripParse_withCrlfAndBom_shouldParseCleanly() {
    let input = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nThere\r\n";
    let result = subrip::parse_text(input);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.data.cues, vec![Cue::new(1_000, 2_000, "Hi"), Cue::new(3_000, 4_000, "There")]);
}

#[test]
fn test_subripParse_withSample_shouldJoinMultilineText() {
    let result = subrip::parse_text(common::SRT_SAMPLE);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.data.cues.len(), 3);
    assert_eq!(result.data.cues[1].text, "It contains\nmultiple lines.");
}

#[test]
fn test_webvttParse_withSample_shouldKeepIdentifierAndSettings() {
    let result = webvtt::parse_text(common::VTT_SAMPLE);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.data.cues.len(), 2);
    assert_eq!(result.data.cues[1].extra(webvtt::IDENTIFIER_KEY), Some("intro"));
    assert_eq!(result.data.cues[1].extra(webvtt::SETTINGS_KEY), Some("align:start"));
}

#[test]
fn test_webvttParse_withCommaTimestamps_shouldReportError() {
    let result = webvtt::parse_text("WEBVTT\n\n00:00:01,000 --> 00:00:02,000\nNope");

    assert!(result.data.cues.is_empty());
    assert!(result.has_errors());
    assert_eq!(result.diagnostics[0].line_number, Some(3));
}

#[test]
fn test_lrcParse_withSample_shouldChainEndTimesAndKeepTags() {
    let result = lrc::parse_text(common::LRC_SAMPLE);

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.data.cues,
        vec![
            Cue::new(10_000, 20_500, "First line"),
            Cue::new(20_500, 31_000, "Second line"),
            Cue::new(31_000, 31_000 + lrc::LAST_LINE_DURATION_MS, "Third line"),
        ]
    );
    assert_eq!(result.data.extra("ti"), Some("Test Song"));
}

#[test]
fn test_lrcToText_withLongTime_shouldDropHours() {
    let data = SubtitleData::new(vec![Cue::new(3_610_000, 3_611_000, "late")]);
    assert_eq!(lrc::to_text(&data), "[00:10.00] late");
}

#[test]
fn test_assParse_withSample_shouldMapFieldsAndKeepSections() {
    let result = ass::parse_text(common::ASS_SAMPLE);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.data.cues.len(), 2);

    let first = &result.data.cues[0];
    assert_eq!(first.text, "First, with a comma");
    assert_eq!((first.start_time, first.end_time), (1_000, 4_000));

    let second = &result.data.cues[1];
    assert_eq!(second.text, "Two\nlines");
    assert_eq!(second.start_time, 5_500);
    assert_eq!(second.extra("Layer"), Some("1"));
    assert_eq!(second.extra("Name"), Some("Ann"));

    assert_eq!(
        result.data.extra("[Aegisub Project Garbage]"),
        Some("Last Style Storage: Default\nVideo File: ../movie.mkv")
    );
}

#[test]
fn test_assToText_withoutExtras_shouldEmitDefaultSections() {
    let data = SubtitleData::new(vec![Cue::new(1_000, 2_000, "a\nb")]);
    let text = ass::to_text(&data);

    assert!(text.starts_with("[Script Info]\n"));
    assert!(text.contains("[V4+ Styles]\n"));
    assert!(text.contains("[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
    assert!(text.ends_with("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,a\\Nb\n"));

    let reparsed = ass::parse_text(&text);
    assert!(reparsed.diagnostics.is_empty());
    assert_eq!(reparsed.data.cues[0].text, "a\nb");
}

#[test]
fn test_assParse_withBadTimestamp_shouldSkipOnlyThatLine() {
    let input = "[Events]\n\
                 Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
                 Dialogue: 0,0:00:01.0,0:00:02.00,Default,,0,0,0,,bad\n\
                 Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,good\n";
    let result = ass::parse_text(input);

    assert_eq!(result.data.cues.len(), 1);
    assert_eq!(result.data.cues[0].text, "good");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Error);
    assert_eq!(result.diagnostics[0].line_number, Some(3));
}

#[test]
fn test_everyFormat_withEmptyText_shouldYieldNoCues() {
    for format in subtypo::ALL_FORMATS {
        let result = format.parse_text("");
        assert!(result.data.cues.is_empty(), "{}", format);
        assert!(!result.has_errors(), "{}", format);
    }
    assert_eq!(SubtitleFormat::SubRip.parse_text("\n\n\n").data.cues.len(), 0);
}
