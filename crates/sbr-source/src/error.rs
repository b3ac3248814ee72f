#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A requested range extends past the end of the source.
    ///
    /// Callers that track their own position should never trigger this;
    /// it exists so a source can reject a malformed range instead of
    /// returning short data.
    #[error("range [{start}, {start}+{len}) is outside the source (total {total} bytes)")]
    OutOfRange { start: u64, len: u64, total: u64 },

    /// Bytes handed to the text decoder were not valid UTF-8.
    #[error("invalid UTF-8 in text read (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    /// I/O error from the underlying storage.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
