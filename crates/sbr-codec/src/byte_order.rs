use crate::error::CodecError;

/// The asymmetric probe pattern written into memory to classify the host
/// byte order. Reading it back as a `u32` yields one of two values:
///
/// | Host order | Probe reads back as |
/// |------------|---------------------|
/// | little     | `0x0403_0201`       |
/// | big        | `0x0102_0304`       |
const PROBE: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

/// Byte order of a multi-byte unsigned integer field.
///
/// Three layers of byte order participate in every typed read:
///
/// ```text
///   field override  ──┐
///   stream default  ──┼──▶ resolve() ──▶ effective order
///   native order    ──┘
/// ```
///
/// The *native* order is detected once per reader at construction time
/// (see [`ByteOrder::native`]) and stored as immutable instance state —
/// there is no process-wide mutable singleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Detect the host's native byte order.
    ///
    /// Writes the four-byte probe pattern into memory and reinterprets it
    /// as a `u32` in native memory order, then classifies the result
    /// against the two possible reinterpretations.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnrecognizedEndianness`] if the probe matches
    /// neither pattern. This indicates an unsupported execution
    /// environment, not a data error, and is fatal to the caller.
    pub fn native() -> Result<Self, CodecError> {
        let probe = u32::from_ne_bytes(PROBE);
        if probe == u32::from_le_bytes(PROBE) {
            Ok(ByteOrder::Little)
        } else if probe == u32::from_be_bytes(PROBE) {
            Ok(ByteOrder::Big)
        } else {
            Err(CodecError::UnrecognizedEndianness { probe })
        }
    }

    /// Resolve the effective order for one field.
    ///
    /// Precedence: the field's own override, else the stream-level
    /// default, else the native order. Pure function, no side effects.
    #[must_use]
    pub fn resolve(
        field_override: Option<ByteOrder>,
        stream_default: Option<ByteOrder>,
        native: ByteOrder,
    ) -> ByteOrder {
        field_override.or(stream_default).unwrap_or(native)
    }
}
