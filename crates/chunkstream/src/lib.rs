//! An in-memory FIFO byte stream that grows and shrinks in fixed-size chunks.
//!
//! Producers [`write`](ChunkedStream::write) runs of bytes of any length;
//! consumers [`read`](ChunkedStream::read) them back in the same order in runs
//! of any other length, or [`peek`](ChunkedStream::peek) ahead without
//! consuming. Storage is a deque of fixed-size chunks: a chunk is allocated
//! when the tail fills up and released as soon as the head is drained, so the
//! memory held tracks the amount of unread data.
//!
//! Chunks come from a [`ChunkAllocator`]. The default [`Global`] allocator
//! uses the heap and reports exhaustion as an error instead of aborting;
//! [`Budgeted`] caps the number of live chunks.
//!
//! With the `std` feature (on by default) the stream implements
//! `std::io::{Read, Write, BufRead}`.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod allocator;
mod chunk;
mod error;
#[cfg(feature = "std")]
mod io;
mod options;
mod segments;
mod stream;


pub use allocator::{AllocStats, Budgeted, ChunkAllocator, Global};
pub use chunk::Chunk;
pub use error::{AllocError, StreamError};
pub use options::{DEFAULT_CHUNK_SIZE, StreamOptions};
pub use segments::Segments;
pub use stream::ChunkedStream;
