use bytes::Bytes;

use crate::error::SourceError;
use crate::{ByteSource, check_range};

/// In-memory byte source backed by a [`Bytes`] buffer.
///
/// Fetches are zero-copy: each chunk is a reference-counted slice of the
/// backing buffer. This is the source of choice for tests and for data
/// that already lives in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    /// Create a source over the given bytes.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn total_size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn fetch(&mut self, start: u64, len: u64) -> Result<Bytes, SourceError> {
        check_range(start, len, self.total_size())?;
        #[allow(clippy::cast_possible_truncation)]
        let (start, len) = (start as usize, len as usize);
        Ok(self.data.slice(start..start + len))
    }
}
