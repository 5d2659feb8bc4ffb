/*!
 * Caption service: the entry point handed to caption consumers.
 *
 * A `CaptionService` is an ordinary value built from a `Config`. Callers
 * that need captions receive one by argument, so tests and independent
 * players can each run with their own settings.
 */

use log::debug;

use crate::app_config::{Config, LookupConfig};
use crate::caption_processor::{CaptionParser, Cue, ParseOptions, Track};
use crate::cue_index::{self, CueIndex};
use crate::errors::CaptionError;
use crate::time_codec;

/// Caption parsing and lookup with one fixed configuration
#[derive(Debug, Clone, Default)]
pub struct CaptionService {
    parser: CaptionParser,
    lookup: LookupConfig,
}

impl CaptionService {
    /// Create a service from application configuration
    pub fn new(config: &Config) -> Self {
        Self::with_options(config.parser, config.lookup.clone())
    }

    pub fn with_options(options: ParseOptions, lookup: LookupConfig) -> Self {
        Self {
            parser: CaptionParser::new(options),
            lookup,
        }
    }

    pub fn parser(&self) -> &CaptionParser {
        &self.parser
    }

    /// Parse caption source with this service's options
    pub fn parse_track(&self, source: &str) -> Result<Track, CaptionError> {
        self.parser.parse(source)
    }

    /// Seconds for a timestamp, NaN when it cannot be decoded
    pub fn parse_timestamp(&self, timestamp: &str) -> f64 {
        time_codec::parse_timestamp(timestamp)
    }

    pub fn format_timestamp(&self, seconds: f64) -> String {
        time_codec::format_timestamp(seconds)
    }

    /// First cue in source order containing `time`, using the configured strategy
    pub fn caption_for_time<'a>(&self, track: &'a Track, time: f64) -> Option<&'a Cue> {
        self.lookup(track).caption_for_time(time)
    }

    /// Start-sorted index over a track, regardless of the threshold
    pub fn build_index(&self, track: &Track) -> CueIndex {
        CueIndex::new(track.cues())
    }

    /// Lookup handle for repeated queries against one track.
    ///
    /// Builds a `CueIndex` once the track reaches the configured threshold.
    pub fn lookup<'a>(&self, track: &'a Track) -> TrackLookup<'a> {
        if track.len() >= self.lookup.index_threshold {
            debug!("Indexing track of {} cues", track.len());
            TrackLookup::Indexed(track.cues(), self.build_index(track))
        } else {
            TrackLookup::Linear(track.cues())
        }
    }
}

/// Lookup strategy chosen for one track
#[derive(Debug, Clone)]
pub enum TrackLookup<'a> {
    /// Scan the cues in order
    Linear(&'a [Cue]),
    /// Binary-search a start-sorted index
    Indexed(&'a [Cue], CueIndex),
}

impl<'a> TrackLookup<'a> {
    /// First cue in source order containing `time`
    pub fn caption_for_time(&self, time: f64) -> Option<&'a Cue> {
        match self {
            TrackLookup::Linear(cues) => cue_index::caption_for_time(*cues, time),
            TrackLookup::Indexed(cues, index) => index.caption_for_time(*cues, time),
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, TrackLookup::Indexed(..))
    }
}
