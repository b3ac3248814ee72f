#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sbr_codec::{decode_uints, ByteOrder, UintWidth};

// Fuzz target: typed integer decoding.
//
// Catches bugs in:
// - Length/count mismatch rejection
// - Per-element byte swapping at every width
// - Scalar collapse at count == 1
#[derive(Arbitrary, Debug)]
struct Input<'a> {
    raw: &'a [u8],
    width: u8,
    count: u16,
    big_effective: bool,
}

fuzz_target!(|input: Input<'_>| {
    let width = match input.width % 3 {
        0 => UintWidth::U8,
        1 => UintWidth::U16,
        _ => UintWidth::U32,
    };
    let effective = if input.big_effective {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    let native = ByteOrder::native().unwrap();

    let _ = decode_uints(
        input.raw,
        width,
        usize::from(input.count),
        effective,
        native,
    );
});
