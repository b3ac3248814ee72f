use anyhow::Context;
use sbr_codec::ByteOrder;
use sbr_source::{ByteSource, FileSource};

use crate::InfoArgs;

/// Run `sbr info`: print the source size and the host byte order.
pub async fn run(args: &InfoArgs) -> anyhow::Result<()> {
    let source = FileSource::open(&args.file)
        .await
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let native = match ByteOrder::native()? {
        ByteOrder::Little => "little",
        ByteOrder::Big => "big",
    };

    println!("file:         {}", args.file.display());
    println!("total size:   {} bytes", source.total_size());
    println!("native order: {native}-endian");
    Ok(())
}
