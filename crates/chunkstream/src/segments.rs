use alloc::collections::vec_deque;
use core::iter::{Enumerate, FusedIterator};

use crate::chunk::Chunk;

/// Iterator over the contiguous runs of unread bytes in a stream, oldest
/// first.
///
/// Yields one slice per chunk: the head from the read cursor, interior chunks
/// whole, the tail up to the write cursor. Created by
/// [`ChunkedStream::segments`](crate::ChunkedStream::segments).
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    chunks: Enumerate<vec_deque::Iter<'a, Chunk>>,
    last: usize,
    start: usize,
    end: usize,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(chunks: vec_deque::Iter<'a, Chunk>, start: usize, end: usize) -> Self {
        let last = chunks.len().saturating_sub(1);
        Self {
            chunks: chunks.enumerate(),
            last,
            start,
            end,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (index, chunk) = self.chunks.next()?;
        let from = if index == 0 { self.start } else { 0 };
        let to = if index == self.last {
            self.end
        } else {
            chunk.capacity()
        };
        Some(&chunk.as_slice()[from..to])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}
