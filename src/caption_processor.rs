use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cue_index;
use crate::errors::CaptionError;
use crate::time_codec::{self, TIMESTAMP_PATTERN};

// @module: Caption track parsing and cue records

/// Separator between the two timestamps of a timing line
pub const ARROW_TOKEN: &str = "-->";

/// Literal first line of a WebVTT document
pub const HEADER: &str = "WEBVTT";

/// Prefix of comment blocks
pub const COMMENT_PREFIX: &str = "NOTE";

// @const: Timing line, optional cue settings after the end timestamp
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^({ts})\s*{arrow}\s*({ts})(?:\s.*)?$",
        ts = TIMESTAMP_PATTERN,
        arrow = ARROW_TOKEN
    ))
    .unwrap()
});

// @const: Opening voice span, e.g. `<v Mary>` or `<v.loud Mary>`
static VOICE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<v(?:\.[^\s>]+)?\s+([^>]+)>(.*)$").unwrap()
});

// @struct: Single caption record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    // @field: Accumulated caption text
    pub text: String,

    // @field: Start time in seconds
    pub start_time: f64,

    // @field: End time in seconds
    pub end_time: f64,

    // @field: Voice name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl Cue {
    /// Creates a cue without checking its interval
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Cue {
            text: text.into(),
            start_time,
            end_time,
            speaker: None,
        }
    }

    // @creates: Cue with a checked interval
    // @validates: Both bounds are numbers and start <= end
    pub fn new_validated(text: impl Into<String>, start_time: f64, end_time: f64) -> Result<Self, CaptionError> {
        if start_time.is_nan() || end_time.is_nan() {
            return Err(CaptionError::UnusableTimestamp { line_number: 0 });
        }
        if end_time < start_time {
            return Err(CaptionError::InvertedInterval {
                line_number: 0,
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self::new(text, start_time, end_time))
    }

    /// Attach a speaker name
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Whether `time` lies inside `[start_time, end_time]`, bounds included
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn format_start_time(&self) -> String {
        time_codec::format_timestamp(self.start_time)
    }

    pub fn format_end_time(&self) -> String {
        time_codec::format_timestamp(self.end_time)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}", self.format_start_time(), ARROW_TOKEN, self.format_end_time())?;
        match &self.speaker {
            Some(speaker) => writeln!(f, "<v {}>{}", speaker, self.text.trim()),
            None => writeln!(f, "{}", self.text.trim()),
        }
    }
}

/// Ordered cues of one caption track, in source order.
///
/// A track is built once and not modified afterwards; re-parsing new
/// source text produces a new track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track {
    cues: Vec<Cue>,
}

impl Track {
    pub fn new(cues: Vec<Cue>) -> Self {
        Track { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    /// First cue in source order that contains `time`
    pub fn caption_for_time(&self, time: f64) -> Option<&Cue> {
        cue_index::caption_for_time(&self.cues, time)
    }

    /// Latest end time of any cue, zero for an empty track
    pub fn duration(&self) -> f64 {
        self.cues
            .iter()
            .map(|cue| cue.end_time)
            .filter(|end| end.is_finite())
            .fold(0.0, f64::max)
    }

    /// Plain-text transcript with one timestamped line per cue
    pub fn transcript(&self, title: &str) -> String {
        let mut output = format!("Video Transcript: {}\n\n", title);
        for cue in &self.cues {
            let text = cue.text.trim();
            let line = match &cue.speaker {
                Some(speaker) => format!("[{}] {}: {}\n", cue.format_start_time(), speaker, text),
                None => format!("[{}] {}\n", cue.format_start_time(), text),
            };
            output.push_str(&line);
        }
        output
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;
        for cue in &self.cues {
            writeln!(f)?;
            write!(f, "{}", cue)?;
        }
        Ok(())
    }
}

impl From<Vec<Cue>> for Track {
    fn from(cues: Vec<Cue>) -> Self {
        Track::new(cues)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

/// Parsing behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Reject malformed timing lines and stray text instead of skipping them
    #[serde(default)]
    pub strict: bool,

    /// Read `<v Name>` voice tags into `Cue::speaker`
    #[serde(default)]
    pub extract_speakers: bool,
}

// Cue under construction, local to a single parse call
struct PendingCue {
    line_number: usize,
    start_time: f64,
    end_time: f64,
    text: String,
    speaker: Option<String>,
}

impl PendingCue {
    fn finish(self) -> Result<Cue, CaptionError> {
        let cue = Cue::new_validated(self.text, self.start_time, self.end_time).map_err(|e| match e {
            CaptionError::InvertedInterval { start, end, .. } => CaptionError::InvertedInterval {
                line_number: self.line_number,
                start,
                end,
            },
            _ => CaptionError::UnusableTimestamp { line_number: self.line_number },
        })?;
        Ok(Cue { speaker: self.speaker, ..cue })
    }
}

/// Line-oriented WebVTT parser.
///
/// Holds only its options. In-progress cue state lives inside each
/// `parse` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptionParser {
    options: ParseOptions,
}

impl CaptionParser {
    pub fn new(options: ParseOptions) -> Self {
        CaptionParser { options }
    }

    pub fn strict() -> Self {
        Self::new(ParseOptions {
            strict: true,
            ..ParseOptions::default()
        })
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse caption source text into a track.
    ///
    /// In tolerant mode this never returns `Err`: unrecognised lines are
    /// dropped or read as cue text, and cues with unusable or inverted
    /// intervals are discarded. Strict mode reports the first such problem.
    pub fn parse(&self, source: &str) -> Result<Track, CaptionError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut cues = Vec::new();
        let mut current: Option<PendingCue> = None;

        for (index, raw_line) in source.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if Self::is_skippable(line) {
                continue;
            }

            if let Some(caps) = TIMING_LINE_REGEX.captures(line) {
                let pending = PendingCue {
                    line_number,
                    start_time: time_codec::parse_timestamp(&caps[1]),
                    end_time: time_codec::parse_timestamp(&caps[2]),
                    text: String::new(),
                    speaker: None,
                };
                if self.options.strict {
                    Self::check_interval(&pending)?;
                }
                if let Some(open) = current.replace(pending) {
                    self.push_cue(open, &mut cues)?;
                }
                continue;
            }

            if line.contains(ARROW_TOKEN) {
                if self.options.strict {
                    return Err(Self::unrecognized(line_number, line));
                }
                warn!("Malformed timing line {} handled as text: {}", line_number, line);
            }

            match current.as_mut() {
                Some(open) => self.append_text(open, line),
                None if self.options.strict => {
                    return Err(Self::unrecognized(line_number, line));
                }
                None => debug!("Dropping line {} outside any cue: {}", line_number, line),
            }
        }

        if let Some(open) = current.take() {
            self.push_cue(open, &mut cues)?;
        }

        debug!("Parsed {} cues", cues.len());
        Ok(Track::new(cues))
    }

    // @checks: Header, blank and comment lines
    fn is_skippable(line: &str) -> bool {
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return true;
        }
        match line.strip_prefix(HEADER) {
            Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
            None => false,
        }
    }

    fn check_interval(pending: &PendingCue) -> Result<(), CaptionError> {
        let (start, end) = (pending.start_time, pending.end_time);
        if start.is_nan() || end.is_nan() {
            return Err(CaptionError::UnusableTimestamp { line_number: pending.line_number });
        }
        if end < start {
            return Err(CaptionError::InvertedInterval {
                line_number: pending.line_number,
                start,
                end,
            });
        }
        Ok(())
    }

    fn push_cue(&self, pending: PendingCue, cues: &mut Vec<Cue>) -> Result<(), CaptionError> {
        match pending.finish() {
            Ok(cue) => cues.push(cue),
            Err(e) if self.options.strict => return Err(e),
            Err(e) => warn!("Skipping cue: {}", e),
        }
        Ok(())
    }

    // @appends: Trimmed line plus one separating space
    fn append_text(&self, pending: &mut PendingCue, line: &str) {
        let mut text = line;

        if self.options.extract_speakers {
            if let Some(caps) = VOICE_TAG_REGEX.captures(line) {
                if pending.speaker.is_none() {
                    pending.speaker = Some(caps[1].trim().to_string());
                }
                let body = caps.get(2).map_or("", |m| m.as_str());
                text = body.strip_suffix("</v>").unwrap_or(body).trim();
                if text.is_empty() {
                    return;
                }
            }
        }

        pending.text.push_str(text);
        pending.text.push(' ');
    }

    fn unrecognized(line_number: usize, line: &str) -> CaptionError {
        CaptionError::UnrecognizedLine {
            line_number,
            content: line.to_string(),
        }
    }
}

/// Tolerant parse of caption source text.
///
/// Malformed content degrades the result instead of failing it; the worst
/// case is an empty track.
pub fn parse_track(source: &str) -> Track {
    CaptionParser::default().parse(source).unwrap_or_else(|e| {
        warn!("Tolerant caption parse reported {}, returning empty track", e);
        Track::default()
    })
}
