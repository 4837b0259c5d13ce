//! FIFO byte stream over a deque of fixed-size chunks.
//!
//! Layout
//! - `chunks` holds the buffered bytes in write order. Writes append at the
//!   back, reads consume from the front.
//! - `start` is the offset of the next unread byte in the front (head) chunk.
//! - `end` is one past the last written byte in the back (tail) chunk.
//!
//! Invariants
//! - No chunks: `start == end == 0`.
//! - One chunk: the unread bytes are `[start, end)` and `start < end`.
//! - Several chunks: the head holds `[start, chunk_size)`, interior chunks are
//!   full, the tail holds `[0, end)`.
//! - A chunk leaves the deque only once it is the head and fully drained, or
//!   on flush. It then goes straight back to the allocator.
//!
//! Reads move whole contiguous runs out of the head chunk at a time; peeking
//! walks the same runs through [`Segments`] without touching the cursors.

use alloc::collections::VecDeque;
use core::{fmt, mem};

use bstr::BStr;
use log::{debug, trace};

use crate::{
    allocator::{ChunkAllocator, Global},
    chunk::Chunk,
    error::{AllocError, StreamError},
    options::StreamOptions,
    segments::Segments,
};

/// Longest prefix of the head run shown by the `Debug` impl.
const DEBUG_PREVIEW_LEN: usize = 32;

/// An in-memory FIFO byte buffer that grows and shrinks in fixed-size chunks.
///
/// Bytes come back out of [`read`](Self::read) in exactly the order they went
/// into [`write`](Self::write), regardless of how the calls are sized.
///
/// ```rust
/// use chunkstream::ChunkedStream;
///
/// let mut stream = ChunkedStream::new();
/// stream.write(b"hello, ").unwrap();
/// stream.write(b"world").unwrap();
///
/// let mut buf = [0u8; 5];
/// assert_eq!(stream.peek(&mut buf), 5);
/// assert_eq!(&buf, b"hello");
///
/// let mut out = [0u8; 64];
/// let n = stream.read(&mut out);
/// assert_eq!(&out[..n], b"hello, world");
/// assert!(stream.is_empty());
/// ```
pub struct ChunkedStream<A: ChunkAllocator = Global> {
    chunks: VecDeque<Chunk>,
    start: usize,
    end: usize,
    options: StreamOptions,
    allocator: A,
}

impl ChunkedStream<Global> {
    /// Creates an empty stream with default options on the global heap.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(StreamOptions::default(), Global)
    }

    /// Creates an empty stream with the given options on the global heap.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ContractViolation`] if the options are invalid.
    pub fn with_options(options: StreamOptions) -> Result<Self, StreamError> {
        Self::with_allocator(options, Global)
    }
}

impl Default for ChunkedStream<Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ChunkAllocator> ChunkedStream<A> {
    /// Creates an empty stream drawing its chunks from `allocator`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ContractViolation`] if the options are invalid.
    pub fn with_allocator(options: StreamOptions, allocator: A) -> Result<Self, StreamError> {
        Ok(Self::from_parts(options.validate()?, allocator))
    }

    fn from_parts(options: StreamOptions, allocator: A) -> Self {
        Self {
            chunks: VecDeque::new(),
            start: 0,
            end: 0,
            options,
            allocator,
        }
    }

    /// Options the stream was created with.
    #[must_use]
    pub fn options(&self) -> StreamOptions {
        self.options
    }

    /// Capacity of each chunk in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.options.chunk_size
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The allocator chunks are drawn from.
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Mutable access to the allocator, e.g. to adjust a budget.
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        let chunk_size = self.chunk_size();
        match self.chunks.len() {
            0 => 0,
            1 => self.end - self.start,
            n => (chunk_size - self.start) + self.end + (n - 2) * chunk_size,
        }
    }

    /// Whether the stream holds no unread bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Contiguous runs of unread bytes, oldest first.
    #[must_use]
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(self.chunks.iter(), self.start, self.end)
    }

    /// Appends a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Allocation`] if the tail chunk is full and a new
    /// one cannot be obtained, including when the allocator hands back a chunk
    /// of the wrong size. The stream is left as it was.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), StreamError> {
        let spare = self.spare_tail()?;
        let Some(slot) = spare.first_mut() else {
            return Err(StreamError::ContractViolation("tail chunk has no spare room"));
        };
        *slot = byte;
        self.end += 1;
        Ok(())
    }

    /// Appends `data`, returning how many bytes were stored.
    ///
    /// Chunks are obtained as the tail fills up. If an allocation fails before
    /// anything was stored the error is returned; if it fails later the call
    /// returns the number of bytes already stored, which stay buffered.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Allocation`] if not even the first byte of a
    /// non-empty `data` could be stored.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        let mut written = 0;
        while written < data.len() {
            let spare = match self.spare_tail() {
                Ok(spare) => spare,
                Err(err) if written == 0 => return Err(err.into()),
                Err(_) => return Ok(written),
            };
            let n = spare.len().min(data.len() - written);
            spare[..n].copy_from_slice(&data[written..written + n]);
            self.end += n;
            written += n;
        }
        Ok(written)
    }

    /// Removes and returns the oldest unread byte.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::EmptyStream`] if there is nothing to read.
    pub fn read_byte(&mut self) -> Result<u8, StreamError> {
        let byte = *self
            .head_segment()
            .first()
            .ok_or(StreamError::EmptyStream)?;
        self.advance_head(1);
        Ok(byte)
    }

    /// Moves up to `buf.len()` bytes out of the stream into `buf`, returning
    /// how many were moved.
    ///
    /// The count is short only when the stream runs dry, and zero only when it
    /// was already empty (or `buf` is empty).
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut offset = 0;
        while offset < buf.len() {
            let n = self.read_chunk(&mut buf[offset..]);
            if n == 0 {
                break;
            }
            offset += n;
        }
        offset
    }

    /// Copies up to `buf.len()` unread bytes into `buf` without consuming
    /// them, returning how many were copied.
    pub fn peek(&self, buf: &mut [u8]) -> usize {
        let mut copied = 0;
        for segment in self.segments() {
            if copied == buf.len() {
                break;
            }
            let n = segment.len().min(buf.len() - copied);
            buf[copied..copied + n].copy_from_slice(&segment[..n]);
            copied += n;
        }
        copied
    }

    /// Drops up to `len` unread bytes without copying them, returning how
    /// many were dropped.
    pub fn discard(&mut self, len: usize) -> usize {
        let mut discarded = 0;
        while discarded < len {
            let n = self.head_segment().len().min(len - discarded);
            if n == 0 {
                break;
            }
            self.advance_head(n);
            discarded += n;
        }
        discarded
    }

    /// Releases every chunk and returns the stream to its freshly created
    /// state. Buffered bytes are lost.
    pub fn flush(&mut self) {
        let released = self.chunks.len();
        for chunk in self.chunks.drain(..) {
            self.allocator.release(chunk);
        }
        self.chunks = VecDeque::new();
        self.start = 0;
        self.end = 0;
        if released > 0 {
            debug!("stream flushed, {released} chunks released");
        }
    }

    /// Flushes the stream and drops it. Equivalent to letting it go out of
    /// scope.
    pub fn destroy(self) {
        drop(self);
    }

    /// Moves the contiguous run available in the head chunk into `buf`,
    /// releasing the chunk if it drains. Returns the number of bytes moved,
    /// zero once the stream is empty.
    fn read_chunk(&mut self, buf: &mut [u8]) -> usize {
        let run = self.head_segment();
        let n = run.len().min(buf.len());
        buf[..n].copy_from_slice(&run[..n]);
        self.advance_head(n);
        n
    }

    /// Unread bytes in the head chunk.
    pub(crate) fn head_segment(&self) -> &[u8] {
        let head_end = self.head_end();
        self.chunks
            .front()
            .map(|head| &head.as_slice()[self.start..head_end])
            .unwrap_or_default()
    }

    /// Offset one past the last valid byte of the head chunk.
    fn head_end(&self) -> usize {
        if self.chunks.len() > 1 {
            self.chunk_size()
        } else {
            self.end
        }
    }

    /// Consumes `n` bytes of the head run, releasing the head chunk once it is
    /// drained.
    fn advance_head(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let head_end = self.head_end();
        self.start += n;
        debug_assert!(self.start <= head_end, "consumed past the head run");
        if self.start == head_end {
            self.release_head();
        }
    }

    fn release_head(&mut self) {
        if let Some(chunk) = self.chunks.pop_front() {
            self.allocator.release(chunk);
            trace!("head chunk released, {} remaining", self.chunks.len());
        }
        self.start = 0;
        if self.chunks.is_empty() {
            self.end = 0;
        }
    }

    /// Writable bytes at the end of the tail chunk, appending a fresh chunk
    /// first when there is no tail or it is full. Chunks of the wrong size are
    /// handed straight back, so every held chunk is exactly `chunk_size` long
    /// and the slice is never empty on success.
    fn spare_tail(&mut self) -> Result<&mut [u8], AllocError> {
        let chunk_size = self.chunk_size();
        if self.chunks.is_empty() || self.end == chunk_size {
            self.chunks
                .try_reserve(1)
                .map_err(|_| AllocError::OutOfMemory {
                    size: mem::size_of::<Chunk>(),
                })?;
            let chunk = self.allocator.allocate(chunk_size)?;
            if chunk.capacity() != chunk_size {
                let actual = chunk.capacity();
                self.allocator.release(chunk);
                return Err(AllocError::ChunkSizeMismatch {
                    expected: chunk_size,
                    actual,
                });
            }
            self.chunks.push_back(chunk);
            self.end = 0;
            trace!("tail chunk allocated, {} held", self.chunks.len());
        }
        let end = self.end;
        Ok(self
            .chunks
            .back_mut()
            .map(|tail| &mut tail.as_mut_slice()[end..])
            .unwrap_or_default())
    }
}

impl<A: ChunkAllocator> Drop for ChunkedStream<A> {
    fn drop(&mut self) {
        self.flush();
    }
}

impl<A: ChunkAllocator> fmt::Debug for ChunkedStream<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.head_segment();
        f.debug_struct("ChunkedStream")
            .field("len", &self.len())
            .field("chunks", &self.chunks.len())
            .field("chunk_size", &self.chunk_size())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("head", &BStr::new(&head[..head.len().min(DEBUG_PREVIEW_LEN)]))
            .finish()
    }
}
