use crate::error::StreamError;

/// Chunk size used by [`StreamOptions::default`], in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration options for a [`ChunkedStream`](crate::ChunkedStream).
///
/// The chunk size trades memory overhead against throughput: larger chunks
/// mean fewer allocations and longer contiguous copies, smaller chunks mean
/// less memory held by a mostly drained stream. It never changes what bytes
/// the stream yields.
///
/// # Examples
///
/// ```rust
/// use chunkstream::{ChunkedStream, StreamOptions};
///
/// let options = StreamOptions {
///     chunk_size: 512,
///     ..Default::default()
/// };
/// let stream = ChunkedStream::with_options(options).unwrap();
/// assert_eq!(stream.chunk_size(), 512);
/// ```
///
/// # Default
///
/// `chunk_size` defaults to [`DEFAULT_CHUNK_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamOptions {
    /// Capacity of every chunk, in bytes. Must be non-zero.
    ///
    /// # Default
    ///
    /// `4096`
    pub chunk_size: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StreamOptions {
    /// Checks the options, returning them unchanged when usable.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ContractViolation`] when `chunk_size` is zero.
    pub fn validate(self) -> Result<Self, StreamError> {
        if self.chunk_size == 0 {
            return Err(StreamError::ContractViolation("chunk size must be non-zero"));
        }
        Ok(self)
    }
}
