use std::io::SeekFrom;
use std::path::Path;

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::SourceError;
use crate::{ByteSource, check_range};

/// Byte source backed by a file on disk.
///
/// Each fetch is a seek plus an exact-length read, so memory stays
/// bounded to one chunk regardless of file size. The size is captured
/// from metadata at open time and treated as fixed — this source is not
/// meant for files that grow while being read.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    /// Open the file at `path` as a byte source.
    ///
    /// # Errors
    ///
    /// [`SourceError::Io`] if the file cannot be opened or its metadata
    /// cannot be read.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        Ok(Self { file, len })
    }
}

impl ByteSource for FileSource {
    fn total_size(&self) -> u64 {
        self.len
    }

    async fn fetch(&mut self, start: u64, len: u64) -> Result<Bytes, SourceError> {
        check_range(start, len, self.len)?;
        self.file.seek(SeekFrom::Start(start)).await?;

        #[allow(clippy::cast_possible_truncation)]
        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a scratch file under the system temp dir and return its path.
    fn scratch_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("sbr-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn open_reports_the_file_size() {
        let path = scratch_file("size", b"0123456789");
        let source = FileSource::open(&path).await.unwrap();
        assert_eq!(source.total_size(), 10);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn fetches_are_independent_absolute_ranges() {
        let path = scratch_file("ranges", b"0123456789");
        let mut source = FileSource::open(&path).await.unwrap();

        assert_eq!(&source.fetch(4, 3).await.unwrap()[..], b"456");
        assert_eq!(&source.fetch(0, 2).await.unwrap()[..], b"01");
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn range_past_eof_is_rejected_without_reading() {
        let path = scratch_file("eof", b"abc");
        let mut source = FileSource::open(&path).await.unwrap();

        let result = source.fetch(1, 5).await;
        assert!(matches!(result, Err(SourceError::OutOfRange { .. })));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = FileSource::open("/nonexistent/sbr-missing").await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
