use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

/// One decoded field value.
///
/// Typed integer reads with a count of 1 produce `Uint`, larger counts
/// produce `UintArray` — the scalar collapse is part of the contract, so
/// single-field reads never need unwrapping through a one-element array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
  /// A single unsigned integer (any declared width, widened to u64).
  Uint(u64),
  /// An ordered array of unsigned integers of uniform width.
  UintArray(Vec<u64>),
  /// An opaque byte buffer, exactly as fetched.
  Bytes(Bytes),
  /// Decoded text.
  Text(String),
}

impl FieldValue {
  /// The scalar integer, if this value is one.
  #[must_use]
  pub fn as_uint(&self) -> Option<u64> {
    match self {
      FieldValue::Uint(v) => Some(*v),
      _ => None,
    }
  }

  /// The integer array, if this value is one.
  #[must_use]
  pub fn as_uint_array(&self) -> Option<&[u64]> {
    match self {
      FieldValue::UintArray(v) => Some(v),
      _ => None,
    }
  }

  /// The raw bytes, if this value is an opaque buffer.
  #[must_use]
  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      FieldValue::Bytes(b) => Some(b),
      _ => None,
    }
  }

  /// The text, if this value is one.
  #[must_use]
  pub fn as_text(&self) -> Option<&str> {
    match self {
      FieldValue::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldValue::Uint(v) => write!(f, "{v}"),
      FieldValue::UintArray(values) => {
        write!(f, "[")?;
        for (i, v) in values.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{v}")?;
        }
        write!(f, "]")
      }
      FieldValue::Bytes(bytes) => {
        write!(f, "0x")?;
        for byte in bytes {
          write!(f, "{byte:02x}")?;
        }
        Ok(())
      }
      FieldValue::Text(s) => write!(f, "{s:?}"),
    }
  }
}

/// The result accumulator: a mapping from field name to decoded value.
///
/// Populated by named read operations as they complete, handed to the
/// caller atomically at a commit boundary and reset to empty. Anonymous
/// operations (skips, callback-only reads) never write here. A later
/// write under an existing name overwrites the earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
  fields: HashMap<String, FieldValue>,
}

impl Record {
  /// Look up a field by name.
  #[must_use]
  pub fn get(&self, name: &str) -> Option<&FieldValue> {
    self.fields.get(name)
  }

  /// Whether a field of this name was written.
  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.fields.contains_key(name)
  }

  /// Number of named fields.
  #[must_use]
  pub fn len(&self) -> usize {
    self.fields.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Iterate over `(name, value)` pairs in unspecified order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
    self.fields.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub(crate) fn insert(&mut self, name: String, value: FieldValue) {
    self.fields.insert(name, value);
  }

  /// Hand off the accumulated fields and reset to empty.
  pub(crate) fn take(&mut self) -> Record {
    Record {
      fields: std::mem::take(&mut self.fields),
    }
  }
}

/// Deterministic rendering: one `name = value` line per field, sorted
/// by name. Useful for diagnostics and snapshot assertions.
impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
    names.sort_unstable();
    for (i, name) in names.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{name} = {}", self.fields[*name])?;
    }
    Ok(())
  }
}
