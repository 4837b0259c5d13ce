//! Where chunks come from and where drained chunks go.
//!
//! A [`ChunkedStream`](crate::ChunkedStream) never allocates chunk memory
//! itself; it asks its [`ChunkAllocator`] for a chunk whenever the tail is
//! full and hands every drained or flushed chunk back through
//! [`ChunkAllocator::release`]. Ownership of a chunk is always held by exactly
//! one side.

use log::{trace, warn};

use crate::{chunk::Chunk, error::AllocError};

/// Source of chunks for a stream.
pub trait ChunkAllocator {
    /// Produces a chunk of exactly `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] when no chunk can be provided. The stream
    /// treats this as recoverable and leaves its content untouched.
    fn allocate(&mut self, size: usize) -> Result<Chunk, AllocError>;

    /// Takes back a chunk the stream no longer needs.
    fn release(&mut self, chunk: Chunk);
}

/// Allocates chunks on the global heap and drops them on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl ChunkAllocator for Global {
    fn allocate(&mut self, size: usize) -> Result<Chunk, AllocError> {
        Chunk::try_new(size)
    }

    fn release(&mut self, chunk: Chunk) {
        drop(chunk);
    }
}

impl<A: ChunkAllocator + ?Sized> ChunkAllocator for &mut A {
    fn allocate(&mut self, size: usize) -> Result<Chunk, AllocError> {
        (**self).allocate(size)
    }

    fn release(&mut self, chunk: Chunk) {
        (**self).release(chunk);
    }
}

/// Counters kept by a [`Budgeted`] allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Chunks handed out so far.
    pub allocated: usize,
    /// Chunks given back so far.
    pub released: usize,
    /// Requests refused because the budget was exhausted.
    pub refused: usize,
}

impl AllocStats {
    /// Chunks currently owned by the stream. Chunks released without having
    /// been allocated here never push this below zero.
    #[must_use]
    pub fn live(&self) -> usize {
        self.allocated.saturating_sub(self.released)
    }
}

/// Caps the number of live chunks obtained from an inner allocator.
///
/// Useful to bound the memory a stream may hold. A refused request is reported
/// as [`AllocError::BudgetExhausted`]; releasing a chunk frees budget again.
///
/// ```rust
/// use chunkstream::{Budgeted, ChunkedStream, StreamOptions};
///
/// let options = StreamOptions { chunk_size: 4 };
/// let mut stream = ChunkedStream::with_allocator(options, Budgeted::new(1)).unwrap();
/// assert_eq!(stream.write(b"abcdef"), Ok(4));
/// assert_eq!(stream.allocator().stats().refused, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Budgeted<A = Global> {
    inner: A,
    limit: usize,
    stats: AllocStats,
}

impl Budgeted<Global> {
    /// Budget of `limit` live chunks on the global heap.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self::wrap(Global, limit)
    }
}

impl<A: ChunkAllocator> Budgeted<A> {
    /// Budget of `limit` live chunks drawn from `inner`.
    pub fn wrap(inner: A, limit: usize) -> Self {
        Self {
            inner,
            limit,
            stats: AllocStats::default(),
        }
    }

    /// Maximum number of live chunks.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the maximum number of live chunks. Lowering the limit below
    /// the live count never reclaims chunks; it only refuses new requests.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Allocation counters since construction.
    #[must_use]
    pub fn stats(&self) -> AllocStats {
        self.stats
    }

    /// Unwraps the inner allocator.
    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: ChunkAllocator> ChunkAllocator for Budgeted<A> {
    fn allocate(&mut self, size: usize) -> Result<Chunk, AllocError> {
        if self.stats.live() >= self.limit {
            self.stats.refused += 1;
            warn!(
                "chunk budget exhausted: {} live of {} allowed",
                self.stats.live(),
                self.limit
            );
            return Err(AllocError::BudgetExhausted { limit: self.limit });
        }
        let chunk = self.inner.allocate(size)?;
        self.stats.allocated += 1;
        trace!("budgeted chunk allocated, {} live", self.stats.live());
        Ok(chunk)
    }

    fn release(&mut self, chunk: Chunk) {
        self.stats.released += 1;
        self.inner.release(chunk);
    }
}
