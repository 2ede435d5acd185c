use thiserror::Error;

/// Error type for `SequentialReader`
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The reader has no source attached.
    #[error("{op}: reader has no source")]
    Unbound {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// A multi-byte value was requested but no byte order is set.
    #[error("{op}: byte order is not set")]
    ByteOrderNotSet {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// The source ran out of data before the request could be filled.
    ///
    /// Bytes that were obtained before the source ran dry have still been consumed and are counted
    /// in the reader's position.
    #[error("unexpected end of input: requested {requested} bytes, got {read}")]
    UnexpectedEof {
        /// Length of the request.
        requested: usize,
        /// Bytes actually obtained before the source was exhausted.
        read: usize,
    },

    /// The source reported an error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error type for `SequentialWriter`
#[derive(Error, Debug)]
pub enum WriterError {
    /// The writer has no sink attached.
    #[error("{op}: writer has no sink")]
    Unbound {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// A multi-byte value was written but no byte order is set.
    #[error("{op}: byte order is not set")]
    ByteOrderNotSet {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// A length argument was out of range.
    #[error("{op}({len}): negative length")]
    InvalidLength {
        /// The operation that was attempted.
        op: &'static str,
        /// The rejected length.
        len: i64,
    },

    /// The sink stopped accepting bytes without reporting an error.
    #[error("sink accepted {written} of {requested} bytes")]
    WriteZero {
        /// Length of the request.
        requested: usize,
        /// Bytes the sink accepted before it stalled.
        written: usize,
    },

    /// The sink reported an error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
