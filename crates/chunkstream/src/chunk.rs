use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::error::AllocError;

/// A fixed-capacity block of bytes owned by a stream.
///
/// A chunk's length never changes after allocation. Which of its bytes are
/// meaningful is tracked by the stream's cursors, not by the chunk itself.
pub struct Chunk {
    bytes: Box<[u8]>,
}

impl Chunk {
    /// Allocates a zeroed chunk of `size` bytes on the heap.
    ///
    /// Goes through [`Vec::try_reserve_exact`] so that allocator exhaustion
    /// surfaces as an error instead of aborting the process.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::OutOfMemory`] when the heap refuses the request.
    pub fn try_new(size: usize) -> Result<Self, AllocError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| AllocError::OutOfMemory { size })?;
        bytes.resize(size, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Capacity of the chunk in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
