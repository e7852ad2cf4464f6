//! The send queue: outbound byte staging between the protocol layer and the
//! raw channel.

use crate::error::{Error, Result};

/// A write-only buffer accumulating outbound bytes until the next flush.
///
/// Capacity is fixed at creation; outbound application-level writes are
/// expected to be small and frequent, so there is no growth policy. A write
/// that does not fit fails with [`Error::BufferOverflow`].
pub struct SendBuffer {
    storage: Vec<u8>,
    write_mark: usize,
}

impl SendBuffer {
    /// Creates an empty buffer with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity],
            write_mark: 0,
        }
    }

    /// Fixed allocation size chosen at creation.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes staged since the last flush.
    pub fn pending_len(&self) -> usize {
        self.write_mark
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.write_mark == 0
    }

    /// Copies `bytes` in at the write mark.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.storage.len() - self.write_mark {
            return Err(Error::buffer_overflow(
                self.write_mark + bytes.len(),
                self.storage.len(),
            ));
        }
        self.storage[self.write_mark..self.write_mark + bytes.len()].copy_from_slice(bytes);
        self.write_mark += bytes.len();
        Ok(())
    }

    /// Hands the pending region to the flush path and resets the buffer.
    ///
    /// Must be called exactly once per flush: the mark resets immediately, so
    /// the returned view is the only chance to transmit those bytes.
    pub fn take_and_reset(&mut self) -> &[u8] {
        let pending = self.write_mark;
        self.write_mark = 0;
        &self.storage[..pending]
    }
}
