/*!
 * Tests for playback-time caption lookup
 */

use captionsync::caption_processor::{parse_track, Cue};
use captionsync::cue_index::{active_cues, caption_for_time, position_for_time, CueIndex};
use crate::common;

/// Deterministic track with gaps, overlaps and shared start times
fn overlapping_cues() -> Vec<Cue> {
    (0..200)
        .map(|i| {
            let start = (i * 7 % 50) as f64 * 1.5;
            let length = 0.5 + (i % 9) as f64;
            Cue::new(format!("cue {}", i), start, start + length)
        })
        .collect()
}

/// Test the reference scenario lookups
#[test]
fn test_caption_for_time_withSimpleTrack_shouldFindActiveCue() {
    let track = parse_track(common::SIMPLE_TRACK);

    assert_eq!(caption_for_time(track.cues(), 2.0).map(|c| c.text.as_str()), Some("Hello world "));
    assert_eq!(caption_for_time(track.cues(), 3.5), None);
    assert_eq!(caption_for_time(track.cues(), 5.0).map(|c| c.text.as_str()), Some("Second line "));
}

/// Test that both interval bounds are inclusive
#[test]
fn test_caption_for_time_withBoundaryTimes_shouldIncludeBounds() {
    let cues = vec![Cue::new("a", 1.0, 3.0)];

    assert!(caption_for_time(&cues, 1.0).is_some());
    assert!(caption_for_time(&cues, 3.0).is_some());
    assert!(caption_for_time(&cues, 0.999).is_none());
    assert!(caption_for_time(&cues, 3.001).is_none());
}

/// Test times outside a non-overlapping track
#[test]
fn test_caption_for_time_withTimeOutsideTrack_shouldReturnNone() {
    let track = parse_track(common::SIMPLE_TRACK);

    assert_eq!(caption_for_time(track.cues(), 0.5), None);
    assert_eq!(caption_for_time(track.cues(), 6.01), None);
    assert_eq!(caption_for_time(track.cues(), -1.0), None);
    assert_eq!(caption_for_time(track.cues(), f64::NAN), None);
    assert_eq!(caption_for_time(&[], 1.0), None);
}

/// Test first-in-source-order tie-break for overlaps
#[test]
fn test_caption_for_time_withOverlappingCues_shouldPreferEarlierCue() {
    let cues = vec![Cue::new("outer", 0.0, 10.0), Cue::new("inner", 5.0, 6.0)];
    assert_eq!(caption_for_time(&cues, 5.5).unwrap().text, "outer");

    let cues = vec![Cue::new("inner", 5.0, 6.0), Cue::new("outer", 0.0, 10.0)];
    assert_eq!(caption_for_time(&cues, 5.5).unwrap().text, "inner");
    assert_eq!(caption_for_time(&cues, 2.0).unwrap().text, "outer");
}

/// Test the indexed lookup on the same overlaps
#[test]
fn test_cue_index_withOverlappingCues_shouldPreferEarlierCue() {
    let cues = vec![Cue::new("inner", 5.0, 6.0), Cue::new("outer", 0.0, 10.0)];
    let index = CueIndex::new(&cues);

    assert_eq!(index.caption_for_time(&cues, 5.5).unwrap().text, "inner");
    assert_eq!(index.caption_for_time(&cues, 2.0).unwrap().text, "outer");
    assert_eq!(index.caption_for_time(&cues, 10.5), None);
}

/// Test that the index and the linear scan always agree
#[test]
fn test_cue_index_withGeneratedTrack_shouldMatchLinearScan() {
    let cues = overlapping_cues();
    let index = CueIndex::new(&cues);

    let mut time = -1.0;
    while time < 90.0 {
        assert_eq!(
            index.position_for_time(time),
            position_for_time(&cues, time),
            "mismatch at {}",
            time
        );
        time += 0.25;
    }
}

/// Test fallback when queried with a different slice
#[test]
fn test_cue_index_withMismatchedSlice_shouldFallBackToLinearScan() {
    let built_for = vec![Cue::new("a", 0.0, 1.0)];
    let index = CueIndex::new(&built_for);
    let other = vec![Cue::new("x", 5.0, 6.0), Cue::new("y", 5.5, 7.0)];

    assert_eq!(index.caption_for_time(&other, 5.75).unwrap().text, "x");
}

/// Test listing all active cues
#[test]
fn test_active_cues_withOverlaps_shouldListInSourceOrder() {
    let cues = vec![
        Cue::new("a", 0.0, 10.0),
        Cue::new("b", 20.0, 30.0),
        Cue::new("c", 5.0, 6.0),
    ];

    let texts: Vec<&str> = active_cues(&cues, 5.5).iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "c"]);
    assert!(active_cues(&cues, 15.0).is_empty());
}
