#![no_main]

use libfuzzer_sys::fuzz_target;
use sbr_codec::ByteOrder;
use sbr_reader::RecordReader;
use sbr_source::MemorySource;

// Fuzz target: a representative read program over arbitrary source bytes.
//
// Catches bugs in:
// - Dequeue-time bounds checking (program longer than the source)
// - Cursor arithmetic across mixed op kinds
// - Remainder-length resolution
// - Text decoding of arbitrary (often invalid) UTF-8 tails
fuzz_target!(|data: &[u8]| {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    rt.block_on(async {
        let source = MemorySource::new(data.to_vec());
        let mut reader = match RecordReader::new(source) {
            Ok(reader) => reader,
            Err(_) => return,
        };

        let _ = reader
            .read_u8("tag")
            .read_u16("version")
            .with_order(ByteOrder::Big)
            .skip(1)
            .read_u32("words")
            .with_count(2)
            .read_text_to_end("tail")
            .commit()
            .await;
    });
});
