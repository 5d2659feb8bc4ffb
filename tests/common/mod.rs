/*!
 * Common test utilities for the captionsync test suite
 */

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Two-cue track from the reference scenario
pub const SIMPLE_TRACK: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\nHello world\n\n00:00:04.000 --> 00:00:06.000\nSecond line\n";

/// Lecture-style track with comments, settings, voices and a multi-line cue
pub const LECTURE_TRACK: &str = r#"WEBVTT - Introduction to Rust

NOTE Edited by hand after the recording.

00:00:00.500 --> 00:00:02.000 align:start
<v Instructor>Welcome to the course.

00:00:02.500 --> 00:00:05.000
<v Instructor>Today we look at ownership
and borrowing.

00:00:05.000 --> 00:00:08.250
<v.student Sam>Will there be exercises?</v>

00:00:09.000 --> 00:00:12.000
[music]
"#;

/// Absolute tolerance for comparing decoded seconds
pub const EPSILON: f64 = 1e-9;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Whether two second values agree within `EPSILON`
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}
