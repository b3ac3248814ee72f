#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod memory;
pub mod throttle;

use std::future::Future;

use bytes::Bytes;

pub use error::SourceError;
pub use file::FileSource;
pub use memory::MemorySource;
pub use throttle::Throttled;

/// An addressable, size-bounded provider of raw bytes, read in arbitrary
/// absolute ranges, asynchronously.
///
/// This is the contract the reader consumes. A source may represent data
/// far larger than can be held in memory, or may require an I/O
/// round-trip per chunk — the reader never assumes random access is
/// cheap and only ever keeps one fetch in flight.
///
/// ```text
///   total_size() ──▶ fixed for the lifetime of the source
///   fetch(s, n)  ──▶ exactly n bytes starting at absolute offset s
///   decode_text  ──▶ optional capability, strict UTF-8 by default
/// ```
///
/// Implementations must return exactly `len` bytes from `fetch` and must
/// not reorder or coalesce requests; the reader relies on one in-flight
/// call at a time.
pub trait ByteSource {
    /// Total number of bytes in the source. Fixed for its lifetime.
    fn total_size(&self) -> u64;

    /// Fetch the bytes in `[start, start + len)`.
    ///
    /// # Errors
    ///
    /// [`SourceError::OutOfRange`] if the range extends past the end of
    /// the source, or [`SourceError::Io`] for storage failures.
    fn fetch(
        &mut self,
        start: u64,
        len: u64,
    ) -> impl Future<Output = Result<Bytes, SourceError>> + Send;

    /// Decode a fetched chunk as text.
    ///
    /// The default implementation is strict UTF-8; sources backed by
    /// other encodings can override it.
    ///
    /// # Errors
    ///
    /// [`SourceError::InvalidUtf8`] if `bytes` is not valid UTF-8.
    fn decode_text(&self, bytes: &[u8]) -> Result<String, SourceError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| SourceError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })
    }
}

/// Validate a fetch range against a source's total size.
///
/// Shared by the source implementations so they all reject malformed
/// ranges the same way.
pub(crate) fn check_range(start: u64, len: u64, total: u64) -> Result<(), SourceError> {
    let end = start.checked_add(len);
    match end {
        Some(end) if end <= total => Ok(()),
        _ => Err(SourceError::OutOfRange { start, len, total }),
    }
}
