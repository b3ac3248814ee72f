use std::time::Duration;

use bytes::Bytes;

use crate::error::SourceError;
use crate::ByteSource;

/// Decorator that injects a fixed delay before every fetch.
///
/// Useful for exercising consumers whose correctness must not depend on
/// fetch latency — ordering guarantees in particular. The delay is a
/// plain `tokio::time::sleep`, so tests can run under a paused clock.
#[derive(Debug)]
pub struct Throttled<S> {
    inner: S,
    delay: Duration,
}

impl<S> Throttled<S> {
    /// Wrap `inner`, delaying every fetch by `delay`.
    #[must_use]
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Unwrap, returning the inner source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSource + Send> ByteSource for Throttled<S> {
    fn total_size(&self) -> u64 {
        self.inner.total_size()
    }

    async fn fetch(&mut self, start: u64, len: u64) -> Result<Bytes, SourceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch(start, len).await
    }

    fn decode_text(&self, bytes: &[u8]) -> Result<String, SourceError> {
        self.inner.decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;

    #[tokio::test(start_paused = true)]
    async fn delay_elapses_before_the_inner_fetch() {
        let started = tokio::time::Instant::now();
        let mut source = Throttled::new(
            MemorySource::new(&b"abcd"[..]),
            Duration::from_millis(50),
        );

        let chunk = source.fetch(1, 2).await.unwrap();
        assert_eq!(&chunk[..], b"bc");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn size_and_errors_pass_through() {
        let mut source = Throttled::new(
            MemorySource::new(&b"ab"[..]),
            Duration::from_millis(1),
        );
        assert_eq!(source.total_size(), 2);
        assert!(matches!(
            source.fetch(0, 5).await,
            Err(SourceError::OutOfRange { .. })
        ));
    }
}
