// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Line buffer pool for the dispatch path
//!
//! Buffers live on a lock-free free list (`crossbeam-queue`). A buffer taken
//! from the pool is owned exclusively by one emission and goes back to the
//! free list, cleared, when the `PooledBuffer` is dropped, including on
//! error paths.
//!
//! New buffers are allocated with a capacity hint equal to the largest line
//! seen so far. The hint only ever grows, so a burst of large lines followed
//! by small ones does not cause repeated reallocation. Allocation is capped at
//! the retention limit; a line above it grows its own buffer, which is then
//! dropped instead of recycled.

use crossbeam_queue::SegQueue;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Idle buffers kept by default
pub const DEFAULT_MAX_IDLE: usize = 256;

/// Buffers larger than this are dropped instead of recycled
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// A buffer that returns itself to its pool when dropped
pub struct PooledBuffer {
    buf: Vec<u8>,
    pool: Arc<BufferPool>,
}

impl PooledBuffer {
    /// Buffer contents
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently idle in the pool
    pub idle: usize,
    /// Current capacity hint for new buffers
    pub capacity_hint: usize,
    /// Buffers allocated because the free list was empty
    pub allocations: usize,
}

/// Lock-free pool of reusable byte buffers
pub struct BufferPool {
    free: SegQueue<Vec<u8>>,
    capacity_hint: AtomicUsize,
    allocations: AtomicUsize,
    max_idle: usize,
}

impl BufferPool {
    /// Create a pool whose new buffers start at `initial_hint` bytes.
    /// Returns an `Arc` so it can be shared between threads.
    pub fn new(initial_hint: usize) -> Arc<Self> {
        Self::with_max_idle(initial_hint, DEFAULT_MAX_IDLE)
    }

    /// Create a pool retaining at most `max_idle` idle buffers
    pub fn with_max_idle(initial_hint: usize, max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            free: SegQueue::new(),
            capacity_hint: AtomicUsize::new(initial_hint),
            allocations: AtomicUsize::new(0),
            max_idle,
        })
    }

    /// Take an empty buffer, allocating one if the free list is empty
    pub fn acquire(self: &Arc<Self>) -> PooledBuffer {
        let buf = self.free.pop().unwrap_or_else(|| {
            self.allocations.fetch_add(1, Ordering::Relaxed);
            Vec::with_capacity(self.initial_capacity())
        });
        PooledBuffer {
            buf,
            pool: Arc::clone(self),
        }
    }

    /// Raise the capacity hint to `len` if it is larger
    pub fn record(&self, len: usize) {
        self.capacity_hint.fetch_max(len, Ordering::Relaxed);
    }

    /// Current capacity hint
    pub fn capacity_hint(&self) -> usize {
        self.capacity_hint.load(Ordering::Relaxed)
    }

    /// Capacity of a freshly allocated buffer
    fn initial_capacity(&self) -> usize {
        self.capacity_hint().min(MAX_RETAINED_CAPACITY)
    }

    /// Pre-allocate `count` idle buffers
    pub fn prewarm(&self, count: usize) {
        let hint = self.initial_capacity();
        for _ in 0..count {
            if self.free.len() >= self.max_idle {
                break;
            }
            self.free.push(Vec::with_capacity(hint));
        }
    }

    /// Number of idle buffers
    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.available(),
            capacity_hint: self.capacity_hint(),
            allocations: self.allocations.load(Ordering::Relaxed),
        }
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY || self.free.len() >= self.max_idle {
            return;
        }
        buf.clear();
        self.free.push(buf);
    }
}
