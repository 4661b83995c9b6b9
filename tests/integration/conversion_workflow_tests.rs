/*!
 * Integration tests for the check and convert workflows
 */

use std::fs;

use anyhow::Result;
use subtypo::app_config::Config;
use subtypo::app_controller::{ConvertOutcome, Controller, FolderSummary};
use subtypo::errors::AppError;
use subtypo::formats::SubtitleFormat;

use crate::common;

#[test]
fn test_convertFile_fromSubRipToWebVtt_shouldWriteOutput() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let outcome = controller.convert_file(&input, temp_dir.path(), SubtitleFormat::WebVtt, false)?;
    let output = temp_dir.path().join("movie.vtt");
    assert_eq!(outcome, ConvertOutcome::Written(output.clone()));

    let text = fs::read_to_string(&output)?;
    assert!(text.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nThis is a test subtitle."));
    Ok(())
}

#[test]
fn test_convertFile_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "movie.lrc", "keep me")?;
    let controller = Controller::new_for_test()?;

    let skipped = controller.convert_file(&input, temp_dir.path(), SubtitleFormat::Lrc, false)?;
    assert_eq!(skipped, ConvertOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(&existing)?, "keep me");

    let written = controller.convert_file(&input, temp_dir.path(), SubtitleFormat::Lrc, true)?;
    assert_eq!(written, ConvertOutcome::Written(existing.clone()));
    assert!(fs::read_to_string(&existing)?.starts_with("[00:01.00] This is a test subtitle."));
    Ok(())
}

#[test]
fn test_convertFile_inStrictModeWithErrors_shouldRefuse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = "1\n00:00:01,000 --> 00:00:02,000\nOk\n\n2\nnot a timing line\nLost";
    let input = common::create_test_file(temp_dir.path(), "broken.srt", broken)?;

    let lenient = Controller::new_for_test()?;
    let outcome = lenient.convert_file(&input, temp_dir.path(), SubtitleFormat::Ass, false)?;
    assert!(matches!(outcome, ConvertOutcome::Written(_)));

    let strict = Controller::with_config(Config { strict: true, ..Config::default() })?;
    let error = strict
        .convert_file(&input, temp_dir.path(), SubtitleFormat::WebVtt, false)
        .unwrap_err();
    assert!(matches!(
        error.downcast_ref::<AppError>(),
        Some(AppError::Diagnostics { count: 1, .. })
    ));
    assert!(!temp_dir.path().join("broken.vtt").exists());
    Ok(())
}

#[test]
fn test_load_withUnknownExtension_shouldDetectFromContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "song.txt", common::LRC_SAMPLE)?;
    let controller = Controller::new_for_test()?;

    let loaded = controller.load(&input)?;
    assert_eq!(loaded.subtitle.format, SubtitleFormat::Lrc);
    assert_eq!(loaded.subtitle.name, "song");
    assert_eq!(loaded.error_count(), 0);
    Ok(())
}

#[test]
fn test_load_withUndetectableContent_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "plain prose\nnothing timed")?;
    let controller = Controller::new_for_test()?;

    let error = controller.load(&input).unwrap_err();
    assert!(format!("{:#}", error).contains("format is not supported"));
    Ok(())
}

#[test]
fn test_load_withSortOnLoad_shouldOrderCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let unordered = "00:00:05,000 --> 00:00:06,000\nsecond\n\n00:00:01,000 --> 00:00:02,000\nfirst";
    let input = common::create_test_file(temp_dir.path(), "unordered.srt", unordered)?;

    let controller = Controller::with_config(Config { sort_on_load: true, ..Config::default() })?;
    let loaded = controller.load(&input)?;
    assert_eq!(loaded.subtitle.data.cues[0].text, "first");
    Ok(())
}

#[test]
fn test_checkPath_withDirectory_shouldSumErrors() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "good.srt")?;
    common::create_test_file(temp_dir.path(), "bad.lrc", "[00:01.00] ok\nuntimed line\nanother one")?;
    let controller = Controller::new_for_test()?;

    assert_eq!(controller.check_path(temp_dir.path())?, 2);
    assert_eq!(controller.check_path(temp_dir.path().join("good.srt"))?, 0);
    assert!(controller.check_path(temp_dir.path().join("missing.srt")).is_err());
    Ok(())
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let config = Config { max_parallel_files: 0, ..Config::default() };
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_convertFolder_withNestedFiles_shouldMirrorLayout() -> Result<()> {
    common::init_test_logging();
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    common::create_test_subtitle(input_dir.path(), "a.srt")?;
    common::create_test_file(input_dir.path(), "season1/b.vtt", common::VTT_SAMPLE)?;
    common::create_test_file(input_dir.path(), "season1/c.ass", common::ASS_SAMPLE)?;
    common::create_test_file(input_dir.path(), "readme.md", "not a subtitle")?;

    let controller = Controller::new_for_test()?;
    let summary = controller
        .convert_folder(
            input_dir.path().to_path_buf(),
            Some(output_dir.path().to_path_buf()),
            SubtitleFormat::Lrc,
            false,
        )
        .await?;

    assert_eq!(summary, FolderSummary { converted: 3, skipped: 0, failed: 0 });
    assert!(output_dir.path().join("a.lrc").exists());
    assert!(output_dir.path().join("season1").join("b.lrc").exists());
    assert!(output_dir.path().join("season1").join("c.lrc").exists());

    let again = controller
        .convert_folder(
            input_dir.path().to_path_buf(),
            Some(output_dir.path().to_path_buf()),
            SubtitleFormat::Lrc,
            false,
        )
        .await?;
    assert_eq!(again, FolderSummary { converted: 0, skipped: 3, failed: 0 });
    Ok(())
}

#[tokio::test]
async fn test_convertFolder_withSharedStem_shouldConvertOnlyFirstInput() -> Result<()> {
    common::init_test_logging();
    let input_dir = common::create_temp_dir()?;
    common::create_test_file(input_dir.path(), "ep1.srt", common::SRT_SAMPLE)?;
    common::create_test_file(input_dir.path(), "ep1.vtt", common::VTT_SAMPLE)?;

    let controller = Controller::new_for_test()?;
    let summary = controller
        .convert_folder(input_dir.path().to_path_buf(), None, SubtitleFormat::Lrc, true)
        .await?;

    assert_eq!(summary, FolderSummary { converted: 1, skipped: 0, failed: 1 });
    let written = fs::read_to_string(input_dir.path().join("ep1.lrc"))?;
    assert!(written.contains("This is a test subtitle."));
    assert!(!written.contains("Hello"));
    Ok(())
}

#[tokio::test]
async fn test_convertFolder_withEmptyDirectory_shouldFail() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller
        .convert_folder(input_dir.path().to_path_buf(), None, SubtitleFormat::SubRip, false)
        .await;
    assert!(result.is_err());
    Ok(())
}
