#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The native-order probe matched neither the little- nor the
    /// big-endian reinterpretation. The host is neither of the two
    /// supported byte orders and decoding cannot continue.
    #[error("unrecognized host byte order: probe read back as {probe:#010X}")]
    UnrecognizedEndianness { probe: u32 },

    /// The raw buffer handed to the integer decoder does not hold a whole
    /// number of elements of the requested width.
    #[error("raw buffer length mismatch: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}
