/*!
 * # captionsync - caption and transcript synchronization
 *
 * A Rust library that turns WebVTT caption tracks into timed cue records
 * and answers which caption is showing at a given playback time.
 *
 * ## Features
 *
 * - Best-effort WebVTT parsing that degrades instead of failing
 * - Optional strict parsing for validating hand-edited tracks
 * - Voice tag (`<v Name>`) speaker extraction
 * - Timestamp conversion with millisecond rounding and carry
 * - First-match caption lookup, linear or indexed
 * - Transcript and WebVTT rendering of parsed tracks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_codec`: `HH:MM:SS.mmm` <-> seconds
 * - `caption_processor`: cue records, tracks and the parser
 * - `cue_index`: playback-time lookup
 * - `caption_service`: configured entry point handed to consumers
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod caption_processor;
pub mod caption_service;
pub mod cue_index;
pub mod errors;
pub mod file_utils;
pub mod time_codec;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_processor::{parse_track, CaptionParser, Cue, ParseOptions, Track};
pub use caption_service::{CaptionService, TrackLookup};
pub use cue_index::{caption_for_time, CueIndex};
pub use errors::{AppError, CaptionError};
pub use time_codec::{format_timestamp, parse_timestamp, try_parse_timestamp};
