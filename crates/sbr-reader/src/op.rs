use sbr_codec::{ByteOrder, UintWidth};

use crate::record::FieldValue;

/// Callback invoked with an operation's decoded value once it completes.
pub type FieldCallback = Box<dyn FnOnce(&FieldValue) + Send>;

/// Decode kind of one queued operation — a closed set, dispatched by a
/// single `match` in the reader's completion path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpKind {
  /// Opaque bytes, stored or delivered exactly as fetched. An anonymous
  /// `Bytes` op with neither name nor callback is a skip.
  Bytes,
  /// Text, decoded through the source's text capability.
  Text,
  /// `count` unsigned integers of uniform `width`.
  Uint { width: UintWidth, count: usize },
  /// Zero-length commit marker: hands off the accumulator. Queued like
  /// any other op so it orders strictly after every prior read.
  Commit,
}

/// One queued unit of work.
///
/// Created on enqueue, consumed exactly once when dequeued and its fetch
/// completes. `length` is `None` for remainder-of-source reads and is
/// resolved only at dequeue time, since the remaining size depends on
/// every operation dequeued before it.
pub(crate) struct ReadOp {
  pub length: Option<u64>,
  pub kind: OpKind,
  pub order: Option<ByteOrder>,
  pub name: Option<String>,
  pub on_complete: Option<FieldCallback>,
}

impl ReadOp {
  pub(crate) fn bytes(name: Option<String>, length: Option<u64>) -> Self {
    Self {
      length,
      kind: OpKind::Bytes,
      order: None,
      name,
      on_complete: None,
    }
  }

  pub(crate) fn text(name: Option<String>, length: Option<u64>) -> Self {
    Self {
      length,
      kind: OpKind::Text,
      order: None,
      name,
      on_complete: None,
    }
  }

  pub(crate) fn uint(name: String, width: UintWidth) -> Self {
    Self {
      length: None,
      kind: OpKind::Uint { width, count: 1 },
      order: None,
      name: Some(name),
      on_complete: None,
    }
  }

  pub(crate) fn commit() -> Self {
    Self {
      length: Some(0),
      kind: OpKind::Commit,
      order: None,
      name: None,
      on_complete: None,
    }
  }

  /// Resolve this operation's byte count against the source.
  ///
  /// Typed reads derive it from width × count; an absent length means
  /// the remainder of the source from the current cursor. Returns
  /// `None` when width × count does not fit in a `u64` — such a read
  /// can never fit in any source, and the caller rejects it exactly
  /// like a read past the end.
  pub(crate) fn resolved_length(&self, total: u64, cursor: u64) -> Option<u64> {
    match self.kind {
      OpKind::Uint { width, count } => {
        (width.bytes() as u64).checked_mul(count as u64)
      }
      OpKind::Commit => Some(0),
      OpKind::Bytes | OpKind::Text => {
        Some(self.length.unwrap_or_else(|| total.saturating_sub(cursor)))
      }
    }
  }
}
