//! Textual operation specs for the `extract` command.
//!
//! Each `--op` argument declares one operation of the read program, in
//! the order given on the command line:
//!
//! ```text
//!   u8:name[,count][,be|le]     one (or `count`) unsigned 8-bit ints
//!   u16:name[,count][,be|le]    …16-bit…
//!   u32:name[,count][,be|le]    …32-bit…
//!   bytes:name[,len]            `len` opaque bytes (omitted = remainder)
//!   text:name[,len]             `len` bytes of UTF-8 (omitted = remainder)
//!   skip:len                    advance without recording anything
//! ```

use anyhow::{Context, bail};
use sbr_codec::{ByteOrder, UintWidth};
use sbr_reader::RecordReader;
use sbr_source::ByteSource;

/// One parsed `--op` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpSpec {
    Uint {
        width: UintWidth,
        name: String,
        count: usize,
        order: Option<ByteOrder>,
    },
    Bytes {
        name: String,
        len: Option<u64>,
    },
    Text {
        name: String,
        len: Option<u64>,
    },
    Skip {
        len: u64,
    },
}

/// Parse one op spec of the form `kind:args`.
pub fn parse_op(spec: &str) -> anyhow::Result<OpSpec> {
    let (kind, rest) = spec
        .split_once(':')
        .with_context(|| format!("op `{spec}` is missing a `:`"))?;

    match kind {
        "u8" => parse_uint(UintWidth::U8, rest),
        "u16" => parse_uint(UintWidth::U16, rest),
        "u32" => parse_uint(UintWidth::U32, rest),
        "bytes" => {
            let (name, len) = parse_named_len(rest)?;
            Ok(OpSpec::Bytes { name, len })
        }
        "text" => {
            let (name, len) = parse_named_len(rest)?;
            Ok(OpSpec::Text { name, len })
        }
        "skip" => {
            let len = rest
                .parse()
                .with_context(|| format!("skip length `{rest}` is not a number"))?;
            Ok(OpSpec::Skip { len })
        }
        other => bail!("unknown op kind `{other}` (expected u8, u16, u32, bytes, text, skip)"),
    }
}

/// Parse `name[,count][,be|le]` after a `u8:`/`u16:`/`u32:` prefix.
/// Count and order may appear in either position.
fn parse_uint(width: UintWidth, rest: &str) -> anyhow::Result<OpSpec> {
    let mut parts = rest.split(',');
    let name = parts.next().unwrap_or_default().to_string();
    if name.is_empty() {
        bail!("typed reads need a field name");
    }

    let mut count = 1usize;
    let mut order = None;
    for part in parts {
        match part {
            "be" => order = Some(ByteOrder::Big),
            "le" => order = Some(ByteOrder::Little),
            n => {
                count = n
                    .parse()
                    .with_context(|| format!("count `{n}` is not a number"))?;
            }
        }
    }
    Ok(OpSpec::Uint {
        width,
        name,
        count,
        order,
    })
}

/// Parse `name[,len]` for bytes/text ops.
fn parse_named_len(rest: &str) -> anyhow::Result<(String, Option<u64>)> {
    let (name, len) = match rest.split_once(',') {
        Some((name, len)) => {
            let len = len
                .parse()
                .with_context(|| format!("length `{len}` is not a number"))?;
            (name, Some(len))
        }
        None => (rest, None),
    };
    if name.is_empty() {
        bail!("bytes/text reads need a field name");
    }
    Ok((name.to_string(), len))
}

/// Enqueue every parsed op on the reader, preserving command-line order.
pub fn apply<S: ByteSource>(reader: &mut RecordReader<S>, ops: &[OpSpec]) {
    for op in ops {
        match op {
            OpSpec::Uint {
                width,
                name,
                count,
                order,
            } => {
                match width {
                    UintWidth::U8 => reader.read_u8(name.clone()),
                    UintWidth::U16 => reader.read_u16(name.clone()),
                    UintWidth::U32 => reader.read_u32(name.clone()),
                };
                reader.with_count(*count);
                if let Some(order) = order {
                    reader.with_order(*order);
                }
            }
            OpSpec::Bytes { name, len } => {
                match len {
                    Some(len) => reader.read_bytes(name.clone(), *len),
                    None => reader.read_bytes_to_end(name.clone()),
                };
            }
            OpSpec::Text { name, len } => {
                match len {
                    Some(len) => reader.read_text(name.clone(), *len),
                    None => reader.read_text_to_end(name.clone()),
                };
            }
            OpSpec::Skip { len } => {
                reader.skip(*len);
            }
        }
    }
}
