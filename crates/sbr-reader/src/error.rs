use sbr_codec::CodecError;
use sbr_source::SourceError;

/// Errors that can fail a declared read program.
///
/// All three are unrecoverable at the point of detection: the pending
/// program is discarded, no partial record is delivered, and a commit
/// awaiting the program resolves to this error instead.
///
/// Error hierarchy:
///
/// ```text
///   ReadError
///   ├── BoundsExceeded            ← resolved read extends past total_size
///   ├── Source(SourceError)       ← fetch or text-decode failure
///   │     ├── OutOfRange
///   │     ├── InvalidUtf8
///   │     └── Io(std::io::Error)
///   └── Codec(CodecError)         ← from integer decoding / order probe
///         ├── UnrecognizedEndianness
///         └── LengthMismatch
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
  /// A resolved read would extend past the end of the source.
  ///
  /// Detected synchronously at dequeue time, before any fetch is
  /// issued. This is a programmer error in the declared read program,
  /// not a transient fault — subsequent queued operations do not run.
  #[error(
    "read of {requested} bytes at offset {cursor} exceeds source size {total}"
  )]
  BoundsExceeded {
    cursor: u64,
    requested: u64,
    total: u64,
  },

  /// The byte source failed to produce a requested range, or its text
  /// decoder rejected a fetched chunk. Retry policy, if any, belongs to
  /// the source — the reader never retries.
  #[error(transparent)]
  Source(#[from] SourceError),

  /// Integer decoding failed, or the host byte order could not be
  /// classified at construction time.
  #[error(transparent)]
  Codec(#[from] CodecError),
}
