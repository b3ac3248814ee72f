use std::collections::VecDeque;

use bytes::Bytes;
use sbr_codec::{ByteOrder, UintValue, UintWidth, decode_uints};
use sbr_source::ByteSource;

use crate::error::ReadError;
use crate::op::{OpKind, ReadOp};
use crate::record::{FieldValue, Record};

/// Drain state of one reader.
///
/// ```text
///   Idle ──commit──▶ Draining ──(op done, queue non-empty)──▶ Draining
///                       │
///                       └──(op done, queue empty)──▶ Idle
/// ```
///
/// `Idle` is both the initial state and the resting state between
/// commit-delimited bursts of work; the reader is reusable indefinitely.
/// While `Draining`, exactly one fetch is outstanding at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrainState {
  Idle,
  Draining,
}

/// Ordered asynchronous record reader over a [`ByteSource`].
///
/// Callers declare a read program — a strictly ordered sequence of typed
/// extraction operations — through the chainable builder methods, then
/// [`commit`](Self::commit) it. The reader drains the program against
/// the source one fetch at a time, advancing a monotone cursor, decoding
/// each field with its effective byte order, and accumulating named
/// values into a [`Record`] that is handed over at the commit boundary.
///
/// ```text
///   builders ──▶ ┌───────────────┐     ┌────────────┐
///                │ op queue FIFO │────▶│ drain loop │──▶ ByteSource
///                └───────────────┘     │  (1 fetch  │
///                                      │  in flight)│◀── chunk
///                                      └─────┬──────┘
///                             advance cursor │ decode + accumulate
///                                            ▼
///                                     Record (at commit)
/// ```
///
/// Operations complete, and their named values become visible, in
/// exactly the order they were enqueued — independent of fetch latency.
/// The cursor never rewinds; a read that would extend past the end of
/// the source fails the whole program before any fetch is issued.
///
/// # Usage
///
/// ```rust
/// use sbr_codec::ByteOrder;
/// use sbr_reader::RecordReader;
/// use sbr_source::MemorySource;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sbr_reader::ReadError> {
/// let source = MemorySource::new(&[1u8, 2, 3, 0, 4, 0, 0, 0][..]);
///
/// let record = RecordReader::new(source)?
///     .read_u8("tag")
///     .read_u16("version").with_order(ByteOrder::Little)
///     .skip(1)
///     .read_u32("length").with_order(ByteOrder::Little)
///     .commit()
///     .await?;
///
/// assert_eq!(record.get("tag").unwrap().as_uint(), Some(1));
/// assert_eq!(record.get("version").unwrap().as_uint(), Some(0x0302));
/// assert_eq!(record.get("length").unwrap().as_uint(), Some(4));
/// # Ok(())
/// # }
/// ```
///
/// A reader is single-flow: it owns its queue and accumulator, holds
/// `&mut self` for the whole drain, and is not meant to be shared.
/// Independent readers are fully isolated.
pub struct RecordReader<S> {
  source: S,
  queue: VecDeque<ReadOp>,
  state: DrainState,
  cursor: u64,
  native: ByteOrder,
  default_order: Option<ByteOrder>,
  acc: Record,
}

impl<S: ByteSource> RecordReader<S> {
  /// Create a reader over `source` with no stream-level byte order;
  /// typed reads without an override use the native order.
  ///
  /// # Errors
  ///
  /// [`ReadError::Codec`] if the host byte order cannot be classified.
  pub fn new(source: S) -> Result<Self, ReadError> {
    Self::with_orders(source, None, None)
  }

  /// Create a reader whose typed reads default to `order` unless a
  /// field-level override says otherwise.
  ///
  /// # Errors
  ///
  /// [`ReadError::Codec`] if the host byte order cannot be classified.
  pub fn with_default_order(source: S, order: ByteOrder) -> Result<Self, ReadError> {
    Self::with_orders(source, Some(order), None)
  }

  /// Create a reader with explicit order configuration.
  ///
  /// `native_override` substitutes for the detected host order; it
  /// exists for exercising foreign-host decode paths and should be left
  /// `None` in normal use.
  ///
  /// # Errors
  ///
  /// [`ReadError::Codec`] if no override is given and the host byte
  /// order cannot be classified.
  pub fn with_orders(
    source: S,
    default_order: Option<ByteOrder>,
    native_override: Option<ByteOrder>,
  ) -> Result<Self, ReadError> {
    let native = match native_override {
      Some(order) => order,
      None => ByteOrder::native()?,
    };
    Ok(Self {
      source,
      queue: VecDeque::new(),
      state: DrainState::Idle,
      cursor: 0,
      native,
      default_order,
      acc: Record::default(),
    })
  }

  // ── Introspection ───────────────────────────────────────────────────

  /// Absolute offset of the next unread byte.
  #[must_use]
  pub fn position(&self) -> u64 {
    self.cursor
  }

  /// Bytes left between the cursor and the end of the source.
  #[must_use]
  pub fn remaining(&self) -> u64 {
    self.source.total_size().saturating_sub(self.cursor)
  }

  /// Whether no drain is in progress and no operations are queued.
  #[must_use]
  pub fn is_idle(&self) -> bool {
    self.state == DrainState::Idle && self.queue.is_empty()
  }

  /// Number of declared-but-not-yet-run operations.
  #[must_use]
  pub fn pending_ops(&self) -> usize {
    self.queue.len()
  }

  /// The detected (or overridden) native byte order.
  #[must_use]
  pub fn native_order(&self) -> ByteOrder {
    self.native
  }

  // ── Operation builders ──────────────────────────────────────────────

  /// Read `len` opaque bytes into the field `name`.
  pub fn read_bytes(&mut self, name: impl Into<String>, len: u64) -> &mut Self {
    self.push(ReadOp::bytes(Some(name.into()), Some(len)))
  }

  /// Read every byte from the cursor to the end of the source into the
  /// field `name`. The length is resolved when the operation is
  /// dequeued, after everything queued before it has consumed its share.
  pub fn read_bytes_to_end(&mut self, name: impl Into<String>) -> &mut Self {
    self.push(ReadOp::bytes(Some(name.into()), None))
  }

  /// Read `len` opaque bytes and deliver them only to `cb`; nothing is
  /// written into the record.
  pub fn read_bytes_with(
    &mut self,
    len: u64,
    cb: impl FnOnce(&FieldValue) + Send + 'static,
  ) -> &mut Self {
    let mut op = ReadOp::bytes(None, Some(len));
    op.on_complete = Some(Box::new(cb));
    self.push(op)
  }

  /// Read `len` bytes as text into the field `name`.
  pub fn read_text(&mut self, name: impl Into<String>, len: u64) -> &mut Self {
    self.push(ReadOp::text(Some(name.into()), Some(len)))
  }

  /// Read the remainder of the source as text into the field `name`.
  pub fn read_text_to_end(&mut self, name: impl Into<String>) -> &mut Self {
    self.push(ReadOp::text(Some(name.into()), None))
  }

  /// Read `len` bytes as text and deliver the string only to `cb`.
  pub fn read_text_with(
    &mut self,
    len: u64,
    cb: impl FnOnce(&FieldValue) + Send + 'static,
  ) -> &mut Self {
    let mut op = ReadOp::text(None, Some(len));
    op.on_complete = Some(Box::new(cb));
    self.push(op)
  }

  /// Read one unsigned 8-bit integer into the field `name`.
  pub fn read_u8(&mut self, name: impl Into<String>) -> &mut Self {
    self.push(ReadOp::uint(name.into(), UintWidth::U8))
  }

  /// Read one unsigned 16-bit integer into the field `name`.
  pub fn read_u16(&mut self, name: impl Into<String>) -> &mut Self {
    self.push(ReadOp::uint(name.into(), UintWidth::U16))
  }

  /// Read one unsigned 32-bit integer into the field `name`.
  pub fn read_u32(&mut self, name: impl Into<String>) -> &mut Self {
    self.push(ReadOp::uint(name.into(), UintWidth::U32))
  }

  /// Turn the most recent typed read into an array read of `count`
  /// elements. A count of 1 keeps the scalar collapse. Has no effect on
  /// non-integer operations.
  pub fn with_count(&mut self, count: usize) -> &mut Self {
    if let Some(op) = self.queue.back_mut()
      && let OpKind::Uint { count: c, .. } = &mut op.kind
    {
      *c = count;
    }
    self
  }

  /// Give the most recent operation an explicit byte order, overriding
  /// the stream default and the native order for that field alone.
  pub fn with_order(&mut self, order: ByteOrder) -> &mut Self {
    if let Some(op) = self.queue.back_mut() {
      op.order = Some(order);
    }
    self
  }

  /// Attach a completion callback to the most recent operation. The
  /// callback sees the decoded value after the cursor has advanced and
  /// before the commit that covers it resolves.
  pub fn on_value(&mut self, cb: impl FnOnce(&FieldValue) + Send + 'static) -> &mut Self {
    if let Some(op) = self.queue.back_mut() {
      op.on_complete = Some(Box::new(cb));
    }
    self
  }

  /// Advance the cursor by `len` bytes without recording anything.
  pub fn skip(&mut self, len: u64) -> &mut Self {
    self.push(ReadOp::bytes(None, Some(len)))
  }

  fn push(&mut self, op: ReadOp) -> &mut Self {
    self.queue.push_back(op);
    self
  }

  // ── Commit / drain ──────────────────────────────────────────────────

  /// Run the declared program and hand over the accumulated record.
  ///
  /// Enqueues the zero-length commit marker — it flows through the same
  /// pipeline as every read, so it resolves strictly after every prior
  /// operation's value has been written — then drains the queue, one
  /// fetch in flight at a time.
  ///
  /// # Errors
  ///
  /// Any [`ReadError`]. On error the whole pending program is discarded:
  /// remaining operations do not run, the accumulator is cleared, and no
  /// partial record is delivered. The reader itself stays usable for a
  /// fresh program.
  pub async fn commit(&mut self) -> Result<Record, ReadError> {
    self.queue.push_back(ReadOp::commit());
    let committed = self.drain().await?;
    Ok(committed.unwrap_or_default())
  }

  /// Consume the reader, returning the source.
  pub fn into_source(self) -> S {
    self.source
  }

  /// Drain the queue: pop, resolve length, bounds-check, fetch, then
  /// two-phase completion — the cursor advances (making the next
  /// operation eligible) strictly before the finished operation's own
  /// decode, accumulate, and callback run.
  async fn drain(&mut self) -> Result<Option<Record>, ReadError> {
    self.state = DrainState::Draining;
    let mut committed = None;

    while let Some(op) = self.queue.pop_front() {
      let total = self.source.total_size();

      // A width × count that overflows can never fit in any source; it
      // is rejected like any other out-of-bounds read, reported as the
      // largest representable request.
      let Some(length) = op.resolved_length(total, self.cursor) else {
        let err = ReadError::BoundsExceeded {
          cursor: self.cursor,
          requested: u64::MAX,
          total,
        };
        self.abandon();
        return Err(err);
      };

      if self.cursor.checked_add(length).is_none_or(|end| end > total) {
        let err = ReadError::BoundsExceeded {
          cursor: self.cursor,
          requested: length,
          total,
        };
        self.abandon();
        return Err(err);
      }

      // Zero-length ops (commit markers, empty reads) skip the fetch but
      // still pass through the pipeline so their ordering holds.
      let raw = if length == 0 {
        Bytes::new()
      } else {
        match self.source.fetch(self.cursor, length).await {
          Ok(raw) => raw,
          Err(e) => {
            self.abandon();
            return Err(e.into());
          }
        }
      };

      // Phase one: advance. The operation's own result handling has not
      // run yet, so a slow callback can never stall the cursor.
      self.cursor += length;

      // Phase two: deliver.
      match self.complete(op, raw) {
        Ok(Some(record)) => committed = Some(record),
        Ok(None) => {}
        Err(e) => {
          self.abandon();
          return Err(e);
        }
      }
    }

    self.state = DrainState::Idle;
    Ok(committed)
  }

  /// Decode one completed operation's bytes, write its named value into
  /// the accumulator, and fire its callback. A commit marker instead
  /// hands off the accumulator.
  fn complete(&mut self, op: ReadOp, raw: Bytes) -> Result<Option<Record>, ReadError> {
    let ReadOp {
      kind,
      order,
      name,
      on_complete,
      ..
    } = op;

    let value = match kind {
      OpKind::Commit => return Ok(Some(self.acc.take())),
      OpKind::Bytes => FieldValue::Bytes(raw),
      OpKind::Text => FieldValue::Text(self.source.decode_text(&raw)?),
      OpKind::Uint { width, count } => {
        let effective = ByteOrder::resolve(order, self.default_order, self.native);
        match decode_uints(&raw, width, count, effective, self.native)? {
          UintValue::Scalar(v) => FieldValue::Uint(v),
          UintValue::Array(v) => FieldValue::UintArray(v),
        }
      }
    };

    if let Some(cb) = on_complete {
      cb(&value);
    }
    if let Some(name) = name {
      self.acc.insert(name, value);
    }
    Ok(None)
  }

  /// Discard the failed program: clear the queue and the accumulator so
  /// a later batch cannot observe fields from this one.
  fn abandon(&mut self) {
    self.queue.clear();
    self.acc.take();
    self.state = DrainState::Idle;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::sync::atomic::{AtomicU64, Ordering};

  use sbr_source::MemorySource;

  use super::*;

  fn reader(data: &'static [u8]) -> RecordReader<MemorySource> {
    RecordReader::new(MemorySource::new(data)).unwrap()
  }

  #[tokio::test]
  async fn chained_reads_accumulate_in_order() {
    let mut r = reader(&[1, 2, 0x03, 0x00, 4, 3, 8, 0, 0, 0]);
    let record = r
      .read_u8("pair").with_count(2)
      .read_u16("word").with_order(ByteOrder::Little)
      .read_u8("tag")
      .skip(1)
      .read_u32("len").with_order(ByteOrder::Little)
      .commit()
      .await
      .unwrap();

    assert_eq!(record.get("pair").unwrap().as_uint_array(), Some(&[1u64, 2][..]));
    assert_eq!(record.get("word").unwrap().as_uint(), Some(3));
    assert_eq!(record.get("tag").unwrap().as_uint(), Some(4));
    assert_eq!(record.get("len").unwrap().as_uint(), Some(8));
    assert_eq!(record.len(), 4);
    assert_eq!(r.position(), 10);
    assert!(r.is_idle());
  }

  #[tokio::test]
  async fn bounds_violation_abandons_the_rest_of_the_program() {
    let hit = Arc::new(AtomicU64::new(0));
    let hit2 = Arc::clone(&hit);

    let mut r = reader(&[1, 2, 3]);
    let result = r
      .read_u8("a")
      .read_u32("too_far")
      .read_bytes_with(1, move |_| {
        hit2.fetch_add(1, Ordering::SeqCst);
      })
      .commit()
      .await;

    assert!(matches!(
      result,
      Err(ReadError::BoundsExceeded {
        cursor: 1,
        requested: 4,
        total: 3
      })
    ));
    // Nothing after the violation ran, and the failed program left no
    // accumulator residue behind.
    assert_eq!(hit.load(Ordering::SeqCst), 0);
    assert_eq!(r.pending_ops(), 0);

    let record = r.read_bytes_to_end("rest").commit().await.unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("rest").unwrap().as_bytes(), Some(&[2u8, 3][..]));
  }

  #[tokio::test]
  async fn commit_resets_between_batches() {
    let mut r = reader(&[10, 20]);

    let first = r.read_u8("first").commit().await.unwrap();
    assert_eq!(first.len(), 1);

    let second = r.read_u8("second").commit().await.unwrap();
    assert_eq!(second.len(), 1);
    assert!(!second.contains("first"));
    assert_eq!(second.get("second").unwrap().as_uint(), Some(20));
  }

  #[tokio::test]
  async fn empty_commit_yields_an_empty_record() {
    let mut r = reader(b"anything");
    let record = r.commit().await.unwrap();
    assert!(record.is_empty());
    assert_eq!(r.position(), 0);
  }

  #[tokio::test]
  async fn callbacks_fire_in_enqueue_order() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let mut r = reader(b"abcd");
    let (s1, s2) = (Arc::clone(&seen), Arc::clone(&seen));
    r.read_bytes_with(2, move |v| {
      s1.lock().unwrap().push(v.as_bytes().unwrap().to_vec());
    })
    .read_text_with(2, move |v| {
      s2.lock().unwrap().push(v.as_text().unwrap().as_bytes().to_vec());
    })
    .commit()
    .await
    .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[b"ab".to_vec(), b"cd".to_vec()]);
  }

  #[tokio::test]
  async fn on_value_observes_named_reads() {
    let seen = Arc::new(AtomicU64::new(0));
    let seen2 = Arc::clone(&seen);

    let mut r = reader(&[0x2A]);
    let record = r
      .read_u8("answer")
      .on_value(move |v| seen2.store(v.as_uint().unwrap(), Ordering::SeqCst))
      .commit()
      .await
      .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 42);
    assert_eq!(record.get("answer").unwrap().as_uint(), Some(42));
  }

  #[tokio::test]
  async fn remainder_read_consumes_exactly_what_is_left() {
    let mut r = reader(b"key:value");
    let record = r
      .read_bytes("key", 4)
      .read_text_to_end("value")
      .commit()
      .await
      .unwrap();

    assert_eq!(record.get("value").unwrap().as_text(), Some("value"));
    assert_eq!(r.remaining(), 0);
  }

  #[tokio::test]
  async fn invalid_text_fails_the_program() {
    let mut r = reader(&[0x61, 0xFF, 0x01]);
    let result = r.read_text("t", 2).read_u8("after").commit().await;

    assert!(matches!(
      result,
      Err(ReadError::Source(sbr_source::SourceError::InvalidUtf8 { .. }))
    ));
    assert_eq!(r.pending_ops(), 0);
  }

  #[tokio::test]
  async fn native_override_matching_the_host_changes_nothing() {
    // Substituting the detected order for itself must behave exactly
    // like default construction: an explicit Big field still decodes
    // [0x01, 0x02] as 258 on every host.
    let native = ByteOrder::native().unwrap();
    let source = MemorySource::new(&[0x01u8, 0x02][..]);
    let mut r = RecordReader::with_orders(source, None, Some(native)).unwrap();
    let record = r
      .read_u16("v")
      .with_order(ByteOrder::Big)
      .commit()
      .await
      .unwrap();
    assert_eq!(record.get("v").unwrap().as_uint(), Some(258));
  }
}
