use crate::byte_order::ByteOrder;
use crate::error::CodecError;

/// Width of one unsigned integer element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UintWidth {
    U8,
    U16,
    U32,
}

impl UintWidth {
    /// Number of bytes one element of this width occupies.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            UintWidth::U8 => 1,
            UintWidth::U16 => 2,
            UintWidth::U32 => 4,
        }
    }
}

/// Result of decoding one typed integer field.
///
/// A single-element read collapses to `Scalar` rather than a one-element
/// `Array`. The asymmetry is intentional: the common single-field case
/// should not force callers through an extra unwrapping step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UintValue {
    Scalar(u64),
    Array(Vec<u64>),
}

/// Decode `count` consecutive unsigned integers of `width` bytes each
/// from `raw`.
///
/// Elements are interpreted in native memory order first; when
/// `effective != native`, each element's bytes are reversed before
/// interpretation (a no-op at 1-byte width, pairwise reversal at 2,
/// full reversal at 4). The swap operates on an owned copy of each
/// element — `raw` is never mutated and may be shared.
///
/// # Wire examples (little-endian host)
///
/// | Bytes          | Width | Order  | Value   |
/// |----------------|-------|--------|---------|
/// | `[0x01, 0x02]` | 2     | little | `513`   |
/// | `[0x01, 0x02]` | 2     | big    | `258`   |
/// | `[0x08, 0, 0, 0]` | 4  | little | `8`     |
///
/// # Errors
///
/// [`CodecError::LengthMismatch`] if `raw.len() != width.bytes() * count`.
pub fn decode_uints(
    raw: &[u8],
    width: UintWidth,
    count: usize,
    effective: ByteOrder,
    native: ByteOrder,
) -> Result<UintValue, CodecError> {
    if width.bytes().checked_mul(count) != Some(raw.len()) {
        return Err(CodecError::LengthMismatch {
            expected: width.bytes().saturating_mul(count),
            got: raw.len(),
        });
    }

    let swap = effective != native;
    let mut values = Vec::with_capacity(count);
    for chunk in raw.chunks_exact(width.bytes()) {
        values.push(decode_one(chunk, width, swap));
    }

    if count == 1 {
        Ok(UintValue::Scalar(values[0]))
    } else {
        Ok(UintValue::Array(values))
    }
}

/// Decode a single element from its exact-width chunk, byte-swapping
/// the owned copy first when requested.
fn decode_one(chunk: &[u8], width: UintWidth, swap: bool) -> u64 {
    match width {
        UintWidth::U8 => u64::from(chunk[0]),
        UintWidth::U16 => {
            let mut bytes = [chunk[0], chunk[1]];
            if swap {
                bytes.reverse();
            }
            u64::from(u16::from_ne_bytes(bytes))
        }
        UintWidth::U32 => {
            let mut bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
            if swap {
                bytes.reverse();
            }
            u64::from(u32::from_ne_bytes(bytes))
        }
    }
}
