use thiserror::Error;

/// A chunk could not be obtained from the allocator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The underlying memory allocator refused the request.
    #[error("out of memory allocating a {size}-byte chunk")]
    OutOfMemory {
        /// Requested chunk size in bytes.
        size: usize,
    },
    /// The allocator handed back a chunk whose capacity differs from the
    /// requested size. The chunk was returned to the allocator unused.
    #[error("allocator returned a {actual}-byte chunk, {expected} bytes requested")]
    ChunkSizeMismatch {
        /// Requested chunk size in bytes.
        expected: usize,
        /// Capacity of the chunk actually returned.
        actual: usize,
    },
    /// A chunk budget is exhausted.
    #[error("chunk budget of {limit} exhausted")]
    BudgetExhausted {
        /// Maximum number of live chunks allowed by the budget.
        limit: usize,
    },
}

/// Errors reported by [`ChunkedStream`](crate::ChunkedStream) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// A new chunk was needed but could not be allocated. Buffered content is
    /// left untouched.
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocError),
    /// A single-byte read was requested from an empty stream.
    #[error("stream is empty")]
    EmptyStream,
    /// The caller passed an argument the stream cannot accept.
    #[error("contract violation: {0}")]
    ContractViolation(&'static str),
}
