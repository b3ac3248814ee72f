use anyhow::Context;
use sbr_reader::{FieldValue, Record, RecordReader};
use sbr_source::FileSource;

use crate::program::{self, OpSpec};
use crate::ExtractArgs;

/// Run `sbr extract`: declare the read program over the file, commit it,
/// and print the resulting record as JSON on stdout.
pub async fn run(args: &ExtractArgs) -> anyhow::Result<()> {
    let ops: Vec<OpSpec> = args
        .ops
        .iter()
        .map(|spec| program::parse_op(spec))
        .collect::<anyhow::Result<_>>()?;

    let source = FileSource::open(&args.file)
        .await
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let mut reader = match args.order {
        Some(order) => RecordReader::with_default_order(source, order.into())?,
        None => RecordReader::new(source)?,
    };

    program::apply(&mut reader, &ops);
    let record = reader
        .commit()
        .await
        .with_context(|| format!("read program failed over {}", args.file.display()))?;

    println!("{}", serde_json::to_string_pretty(&to_json(&record))?);
    Ok(())
}

/// Render a record as a JSON object with name-sorted keys.
fn to_json(record: &Record) -> serde_json::Value {
    let mut fields: Vec<(&str, &FieldValue)> = record.iter().collect();
    fields.sort_unstable_by_key(|(name, _)| *name);

    let mut object = serde_json::Map::new();
    for (name, field) in fields {
        let value = match field {
            FieldValue::Uint(v) => serde_json::Value::from(*v),
            FieldValue::UintArray(values) => {
                serde_json::Value::from(values.clone())
            }
            FieldValue::Bytes(bytes) => {
                let mut hex = String::with_capacity(2 + bytes.len() * 2);
                hex.push_str("0x");
                for byte in bytes {
                    hex.push_str(&format!("{byte:02x}"));
                }
                serde_json::Value::from(hex)
            }
            FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
        };
        object.insert(name.to_string(), value);
    }
    serde_json::Value::Object(object)
}
