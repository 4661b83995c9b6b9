/*!
 * Tests for the time codec
 */

use subtypo::errors::SubtitleError;
use subtypo::time_codec::{
    format_time, format_time_str, is_valid_time, is_valid_time_str, parse_ass_time, parse_time,
    shift_time_text, TimePattern,
};

// Upper end of what a two-digit hour group can hold: 99:59:59.999
const MAX_MS: u64 = 359_999_999;

#[test]
fn test_formatTimeStr_withLrcPattern_shouldProduceMinutesSeconds() {
    assert_eq!(format_time_str(10_000, "mm:ss.SS").unwrap(), "00:10.00");
    assert_eq!(parse_time("00:10.00").unwrap(), 10_000);
}

#[test]
fn test_formatTimeStr_withUnknownPattern_shouldFail() {
    assert_eq!(
        format_time_str(1_000, "hh-mm-ss"),
        Err(SubtitleError::UnsupportedTimePattern("hh-mm-ss".to_string()))
    );
    assert!(is_valid_time_str("00:00", "ss").is_err());
}

#[test]
fn test_parseTime_withExactPatterns_shouldInvertFormat() {
    let mut ms = 0;
    while ms <= MAX_MS {
        for pattern in [TimePattern::SubRip, TimePattern::WebVtt] {
            assert_eq!(parse_time(&format_time(ms, pattern)).unwrap(), ms, "{} with {}", ms, pattern);
        }
        ms += 104_729;
    }
    assert_eq!(parse_time(&format_time(MAX_MS, TimePattern::SubRip)).unwrap(), MAX_MS);
}

#[test]
fn test_parseTime_withCentisecondPatterns_shouldInvertToTenMilliseconds() {
    let mut ms = 0;
    while ms <= MAX_MS {
        let expected = ms - ms % 10;
        assert_eq!(parse_time(&format_time(ms, TimePattern::AssCentiseconds)).unwrap(), expected);
        assert_eq!(parse_ass_time(&format_time(ms, TimePattern::AssCentiseconds)).unwrap(), expected);

        // mm:ss.SS has no hour group
        let within_hour = ms % 3_600_000;
        assert_eq!(
            parse_time(&format_time(within_hour, TimePattern::Lrc)).unwrap(),
            within_hour - within_hour % 10
        );
        ms += 104_729;
    }
}

#[test]
fn test_parseTime_withLenientInput_shouldAcceptBothSeparators() {
    assert_eq!(parse_time("00:00:01,5").unwrap(), 1_500);
    assert_eq!(parse_time("00:00:01.5678").unwrap(), 1_567);
    assert_eq!(parse_time(" 1:02:03.004 ").unwrap(), 3_723_004);
    assert_eq!(parse_time("00:75").unwrap(), 75_000);
}

#[test]
fn test_parseTime_withMalformedInput_shouldReturnInvalidTimeFormat() {
    for input in ["", "abc", "1:2:3:4", "00:0a:01,000", "00:00:01,-5", "00"] {
        assert!(
            matches!(parse_time(input), Err(SubtitleError::InvalidTimeFormat(_))),
            "{:?} should be rejected",
            input
        );
    }
}

#[test]
fn test_parseAssTime_withWrongShape_shouldFail() {
    assert_eq!(parse_ass_time("0:00:01.50").unwrap(), 1_500);
    assert!(parse_ass_time("0:00:01.5").is_err());
    assert!(parse_ass_time("00:01.50").is_err());
    assert!(parse_ass_time("0:00:01,50").is_err());
}

#[test]
fn test_isValidTime_shouldCheckWidthsAndRanges() {
    assert!(is_valid_time("01:02:03,456", TimePattern::SubRip));
    assert!(is_valid_time("01:02:03.456", TimePattern::WebVtt));
    assert!(is_valid_time("1:02:03.45", TimePattern::AssCentiseconds));
    assert!(is_valid_time("02:03.45", TimePattern::Lrc));
    assert!(is_valid_time("02:03", TimePattern::MinutesSeconds));
    assert!(is_valid_time("99:59:59", TimePattern::HoursMinutesSeconds));

    assert!(!is_valid_time("01:60:03,456", TimePattern::SubRip));
    assert!(!is_valid_time("1:02:03,456", TimePattern::SubRip));
    assert!(!is_valid_time("01:02:03.45", TimePattern::AssCentiseconds));
    assert!(!is_valid_time("02:03.4", TimePattern::Lrc));
    assert!(!is_valid_time("01:02:03", TimePattern::MinutesSeconds));
}

#[test]
fn test_shiftTimeText_shouldReformatOrLeaveUntouched() {
    assert_eq!(shift_time_text("00:00:01,000", 1_500, TimePattern::SubRip), "00:00:02,500");
    assert_eq!(shift_time_text("00:00:01,000", -2_000, TimePattern::SubRip), "00:00:01,000");
    assert_eq!(shift_time_text("not a time", 1_000, TimePattern::SubRip), "not a time");
    assert_eq!(shift_time_text("0:00:01.00", 250, TimePattern::AssCentiseconds), "0:00:01.25");
}

#[test]
fn test_timePattern_fromStr_shouldAcceptEveryPatternString() {
    for pattern in TimePattern::ALL {
        assert_eq!(pattern.as_str().parse::<TimePattern>().unwrap(), pattern);
    }
}
