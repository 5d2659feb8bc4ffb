/*!
 * Integration tests for the caption file workflow
 */

use anyhow::Result;

use captionsync::app_config::Config;
use captionsync::caption_service::CaptionService;
use captionsync::file_utils::{FileManager, CAPTION_EXTENSION};
use crate::common;

/// Load a track from disk and follow a simulated playback clock
#[tokio::test]
async fn test_caption_workflow_withPlaybackTicks_shouldFollowCaptions() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "lecture.vtt", common::LECTURE_TRACK)?;

    let mut config = Config::default();
    config.parser.extract_speakers = true;
    let service = CaptionService::new(&config);

    let source = FileManager::read_track_file(&path).await?;
    let track = service.parse_track(&source)?;
    let lookup = service.lookup(&track);

    // Playback driver ticking every 250ms
    let mut shown: Vec<Option<String>> = Vec::new();
    for tick in 0..=52 {
        let time = tick as f64 * 0.25;
        let caption = lookup.caption_for_time(time).map(|cue| cue.text.trim().to_string());
        if shown.last() != Some(&caption) {
            shown.push(caption);
        }
    }

    assert_eq!(shown, vec![
        None,
        Some("Welcome to the course.".to_string()),
        None,
        Some("Today we look at ownership and borrowing.".to_string()),
        Some("Will there be exercises?".to_string()),
        None,
        Some("[music]".to_string()),
        None,
    ]);
    Ok(())
}

/// Parse a folder of tracks and write a transcript for each
#[tokio::test]
async fn test_caption_workflow_withFolder_shouldWriteTranscripts() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "intro.vtt", common::SIMPLE_TRACK)?;
    common::create_test_file(temp_dir.path(), "broken.vtt", "WEBVTT\n\nno cues here\n")?;

    let service = CaptionService::default();
    let out_dir = temp_dir.path().join("transcripts");

    for file in FileManager::find_files(temp_dir.path(), CAPTION_EXTENSION)? {
        let source = FileManager::read_track_file(&file).await?;
        let track = service.parse_track(&source)?;
        let title = file.file_stem().unwrap().to_string_lossy().to_string();
        let output = FileManager::generate_output_path(&file, &out_dir, "transcript", "txt");
        FileManager::write_to_file(&output, &track.transcript(&title))?;
    }

    let intro = FileManager::read_to_string(out_dir.join("intro.transcript.txt"))?;
    assert_eq!(
        intro,
        "Video Transcript: intro\n\n[00:00:01.000] Hello world\n[00:00:04.000] Second line\n"
    );

    let broken = FileManager::read_to_string(out_dir.join("broken.transcript.txt"))?;
    assert_eq!(broken, "Video Transcript: broken\n\n");
    Ok(())
}

/// Re-parsing new source text yields a new track and leaves the old one intact
#[test]
fn test_caption_workflow_withReloadedSource_shouldProduceNewTrack() -> Result<()> {
    let service = CaptionService::default();
    let first = service.parse_track(common::SIMPLE_TRACK)?;
    let snapshot = first.clone();

    let edited = common::SIMPLE_TRACK.replace("Hello world", "Hello again");
    let second = service.parse_track(&edited)?;

    assert_eq!(first, snapshot);
    assert_eq!(second.cues()[0].text, "Hello again ");
    assert_eq!(first.cues()[0].text, "Hello world ");
    Ok(())
}
