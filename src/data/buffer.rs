//! ScrollingBuffer: fixed-capacity ring buffer for live sample streams.
//!
//! The buffer itself carries no synchronization. Both actors that touch it
//! (the acquisition tick appending samples and the render loop copying
//! snapshots) must hold the owning [`PlotHandler`](crate::handler::PlotHandler)
//! lock; the type only guarantees that, under that lock, `push` is O(1) and
//! allocation-free and `snapshot` yields a consistent contiguous copy.

use crate::error::VarScopeError;

/// Fixed-capacity wraparound buffer holding the last `capacity` samples of
/// one scalar stream. Once full, each push silently evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct ScrollingBuffer<T: Copy + Default> {
    storage: Vec<T>,
    write_index: usize,
    filled: usize,
}

/// A point-in-time copy of a buffer's logical contents.
///
/// `values` holds the window oldest-to-newest. `offset` is the wrap point of
/// the underlying storage (the slot the next push would overwrite), exposed
/// for renderers that index ring storage directly.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSnapshot<T> {
    pub offset: usize,
    pub values: Vec<T>,
}

impl<T> BufferSnapshot<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Copy + Default> ScrollingBuffer<T> {
    /// Create a buffer holding up to `capacity` samples. Storage is allocated
    /// once here; pushes never reallocate.
    pub fn new(capacity: usize) -> Result<Self, VarScopeError> {
        if capacity == 0 {
            return Err(VarScopeError::CapacityMisconfiguration(capacity));
        }
        Ok(Self {
            storage: vec![T::default(); capacity],
            write_index: 0,
            filled: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of samples currently in the logical window.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Append one sample, overwriting the oldest once the buffer is full.
    pub fn push(&mut self, value: T) {
        self.storage[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.storage.len();
        if self.filled < self.storage.len() {
            self.filled += 1;
        }
    }

    /// The most recently pushed sample, if any.
    pub fn last(&self) -> Option<T> {
        if self.filled == 0 {
            return None;
        }
        let idx = (self.write_index + self.storage.len() - 1) % self.storage.len();
        Some(self.storage[idx])
    }

    /// Copy the logical window (oldest to newest) into `dest`, reusing its
    /// allocation. Returns the wrap offset of the underlying storage.
    pub fn snapshot_into(&self, dest: &mut Vec<T>) -> usize {
        dest.clear();
        let cap = self.storage.len();
        let start = (self.write_index + cap - self.filled) % cap;
        for i in 0..self.filled {
            dest.push(self.storage[(start + i) % cap]);
        }
        self.write_index
    }

    /// Copy the logical window into a fresh [`BufferSnapshot`].
    pub fn snapshot(&self) -> BufferSnapshot<T> {
        let mut values = Vec::with_capacity(self.filled);
        let offset = self.snapshot_into(&mut values);
        BufferSnapshot { offset, values }
    }

    /// Forget all samples. Storage stays allocated at full capacity.
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.filled = 0;
    }
}
