#![warn(clippy::pedantic)]

//! Shared fixtures for the integration suite.

use std::time::Duration;

use sbr_reader::RecordReader;
use sbr_source::{MemorySource, Throttled};

/// Reader over an in-memory source.
///
/// # Panics
///
/// If the host byte order cannot be classified (never on supported hosts).
#[must_use]
pub fn reader(data: &'static [u8]) -> RecordReader<MemorySource> {
    RecordReader::new(MemorySource::new(data)).unwrap()
}

/// Reader whose source sleeps for `delay_ms` before every fetch. Run it
/// under a paused tokio clock to keep tests instant.
///
/// # Panics
///
/// If the host byte order cannot be classified (never on supported hosts).
#[must_use]
pub fn slow_reader(
    data: &'static [u8],
    delay_ms: u64,
) -> RecordReader<Throttled<MemorySource>> {
    let source = Throttled::new(MemorySource::new(data), Duration::from_millis(delay_ms));
    RecordReader::new(source).unwrap()
}
