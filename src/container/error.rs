/// Structural problems with a container's contents
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The stream ended before a complete API tag could be read
    #[error("empty or truncated file: expected {expected} tag bytes, found {actual}")]
    EmptyOrTruncated {
        /// Tag length in bytes
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// The API tag is not one of the supported versions
    #[error("unknown MCell binary API version {:?}", String::from_utf8_lossy(.0))]
    UnknownVersion(Vec<u8>),

    /// The stream ended inside a header or data payload
    #[error("truncated container while reading {context}")]
    Truncated {
        /// What was being read when the stream ran out
        context: &'static str,
    },

    /// A header field holds a value the decoder cannot interpret
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Two data blocks share the same name
    #[error("duplicate data block name: {0}")]
    DuplicateBlock(String),

    /// A block's sample count disagrees with the header's iteration count
    #[error("block {block} has {actual} samples, expected {expected}")]
    SampleCountMismatch {
        /// Block name
        block: String,
        /// Iteration count from the header
        expected: u64,
        /// Samples present
        actual: u64,
    },
}

/// Errors that can occur while opening or decoding a container
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Open, read or decompression failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decompressed bytes do not form a valid container
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

impl ContainerError {
    /// Returns the format error if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            ContainerError::Format(err) => Some(err),
            ContainerError::Io(_) => None,
        }
    }

    /// True for open/read/decompression failures
    pub fn is_io(&self) -> bool {
        matches!(self, ContainerError::Io(_))
    }
}

/// Maps an end-of-stream I/O error to [`FormatError::Truncated`], keeping any
/// other I/O failure (e.g. a corrupt compressed stream) as an I/O error.
pub(crate) fn truncated(context: &'static str) -> impl Fn(std::io::Error) -> ContainerError {
    move |err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            FormatError::Truncated { context }.into()
        } else {
            ContainerError::Io(err)
        }
    }
}
