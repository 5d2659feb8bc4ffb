/*!
 * Playback-time caption lookup.
 *
 * Every lookup resolves to the first cue in source order whose closed
 * interval contains the query time, also when cues overlap. The linear
 * functions are enough for ordinary tracks; `CueIndex` gives logarithmic
 * candidate search for long ones while keeping the same tie-break.
 */

use log::{debug, warn};

use crate::caption_processor::Cue;

/// First cue, in source order, whose interval contains `time`
pub fn caption_for_time(cues: &[Cue], time: f64) -> Option<&Cue> {
    cues.iter().find(|cue| cue.contains(time))
}

/// Source position of the cue returned by [`caption_for_time`]
pub fn position_for_time(cues: &[Cue], time: f64) -> Option<usize> {
    cues.iter().position(|cue| cue.contains(time))
}

/// Every cue containing `time`, in source order
pub fn active_cues(cues: &[Cue], time: f64) -> Vec<&Cue> {
    cues.iter().filter(|cue| cue.contains(time)).collect()
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    start: f64,
    end: f64,
    position: usize,
}

/// Start-sorted view of a cue slice.
///
/// The index stores positions, not cues, so it is queried together with
/// the slice it was built from. Cues with a NaN bound are left out since
/// they contain no time at all.
#[derive(Debug, Clone, Default)]
pub struct CueIndex {
    // sorted by (start, position)
    entries: Vec<IndexEntry>,
    // max_end[i] = largest end among entries[..=i]
    max_end: Vec<f64>,
    cue_count: usize,
}

impl CueIndex {
    pub fn new(cues: &[Cue]) -> Self {
        let mut entries: Vec<IndexEntry> = cues
            .iter()
            .enumerate()
            .filter(|(_, cue)| !cue.start_time.is_nan() && !cue.end_time.is_nan())
            .map(|(position, cue)| IndexEntry {
                start: cue.start_time,
                end: cue.end_time,
                position,
            })
            .collect();

        entries.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.position.cmp(&b.position)));

        let mut running = f64::NEG_INFINITY;
        let max_end = entries
            .iter()
            .map(|entry| {
                running = running.max(entry.end);
                running
            })
            .collect();

        debug!("Built cue index over {} of {} cues", entries.len(), cues.len());

        CueIndex {
            entries,
            max_end,
            cue_count: cues.len(),
        }
    }

    /// Number of cues in the slice this index was built from
    pub fn cue_count(&self) -> usize {
        self.cue_count
    }

    /// Lowest source position whose cue contains `time`
    pub fn position_for_time(&self, time: f64) -> Option<usize> {
        if time.is_nan() {
            return None;
        }

        // entries[..upper] all start at or before `time`
        let upper = self.entries.partition_point(|entry| entry.start <= time);

        let mut best: Option<usize> = None;
        for i in (0..upper).rev() {
            if self.max_end[i] < time {
                break;
            }
            let entry = &self.entries[i];
            if entry.end >= time {
                best = Some(best.map_or(entry.position, |b| b.min(entry.position)));
            }
        }
        best
    }

    /// Same result as [`caption_for_time`] on `cues`
    pub fn caption_for_time<'a>(&self, cues: &'a [Cue], time: f64) -> Option<&'a Cue> {
        if cues.len() != self.cue_count {
            warn!(
                "Cue index built for {} cues queried with {}, using linear scan",
                self.cue_count,
                cues.len()
            );
            return caption_for_time(cues, time);
        }
        self.position_for_time(time).and_then(|position| cues.get(position))
    }
}
