//! `std::io` adapters.
//!
//! Note that [`io::Write::flush`] is a no-op here: there is nothing downstream
//! to push bytes to. It does not call [`ChunkedStream::flush`], which discards
//! the buffered content.

use std::io;

use crate::{allocator::ChunkAllocator, error::StreamError, stream::ChunkedStream};

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match err {
            StreamError::Allocation(_) => io::ErrorKind::OutOfMemory,
            StreamError::EmptyStream => io::ErrorKind::UnexpectedEof,
            StreamError::ContractViolation(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

impl<A: ChunkAllocator> io::Write for ChunkedStream<A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(ChunkedStream::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<A: ChunkAllocator> io::Read for ChunkedStream<A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(ChunkedStream::read(self, buf))
    }
}

impl<A: ChunkAllocator> io::BufRead for ChunkedStream<A> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.head_segment())
    }

    fn consume(&mut self, amt: usize) {
        self.discard(amt);
    }
}
