//! Reusable byte buffers for rendering log lines
//!
//! Buffers up to `large_threshold` bytes of capacity cycle through a bounded
//! free list. Larger requests are served straight from the heap and dropped on
//! release so one oversized message cannot inflate the pool permanently.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_LARGE_FACTOR: usize = 4;
pub const DEFAULT_MAX_POOLED: usize = 64;

#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    buffer_size: usize,
    large_threshold: usize,
    max_pooled: usize,
    oversized: AtomicU64,
}

impl BufferPool {
    pub fn new(buffer_size: usize, large_factor: usize, max_pooled: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_pooled)),
            buffer_size,
            large_threshold: buffer_size.saturating_mul(large_factor),
            max_pooled,
            oversized: AtomicU64::new(0),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn large_threshold(&self) -> usize {
        self.large_threshold
    }

    /// Number of idle buffers waiting for reuse
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    /// Number of leases served outside the pool
    pub fn oversized_leases(&self) -> u64 {
        self.oversized.load(Ordering::Relaxed)
    }

    /// Borrow an empty buffer with at least `min_size` bytes of capacity
    pub fn lease(&self, min_size: usize) -> BufferLease<'_> {
        BufferLease {
            pool: self,
            buf: Some(self.take(min_size)),
        }
    }

    fn take(&self, min_size: usize) -> Vec<u8> {
        if min_size > self.large_threshold {
            self.oversized.fetch_add(1, Ordering::Relaxed);
            return Vec::with_capacity(min_size);
        }

        let reused = self.free.lock().pop();
        match reused {
            Some(mut buf) => {
                buf.clear();
                buf.reserve(min_size);
                buf
            }
            None => Vec::with_capacity(min_size.max(self.buffer_size)),
        }
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.large_threshold {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_pooled {
            free.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, DEFAULT_LARGE_FACTOR, DEFAULT_MAX_POOLED)
    }
}

/// A buffer on loan from a [`BufferPool`], returned when dropped
#[derive(Debug)]
pub struct BufferLease<'a> {
    pool: &'a BufferPool,
    buf: Option<Vec<u8>>,
}

impl BufferLease<'_> {
    /// Make room for `size` bytes in total, moving the content into a larger
    /// leased buffer when the current one is too small
    pub fn ensure_capacity(&mut self, size: usize) {
        if self.capacity() >= size {
            return;
        }
        let mut larger = self.pool.take(size);
        if let Some(old) = self.buf.take() {
            larger.extend_from_slice(&old);
            self.pool.release(old);
        }
        self.buf = Some(larger);
    }
}

impl Deref for BufferLease<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        // Only emptied in Drop.
        self.buf.as_ref().unwrap_or(&EMPTY)
    }
}

impl DerefMut for BufferLease<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.get_or_insert_with(Vec::new)
    }
}

impl Drop for BufferLease<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

static EMPTY: Vec<u8> = Vec::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_is_empty_with_default_capacity() {
        let pool = BufferPool::default();
        let lease = pool.lease(pool.buffer_size());
        assert!(lease.is_empty());
        assert!(lease.capacity() >= DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_buffer_returns_to_pool() {
        let pool = BufferPool::default();
        {
            let mut lease = pool.lease(16);
            lease.extend_from_slice(b"hello");
        }
        assert_eq!(pool.idle(), 1);

        let lease = pool.lease(16);
        assert!(lease.is_empty(), "reused buffer must be cleared");
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_oversized_buffer_not_pooled() {
        let pool = BufferPool::new(64, 4, 8);
        assert_eq!(pool.large_threshold(), 256);
        {
            let lease = pool.lease(1000);
            assert!(lease.capacity() >= 1000);
        }
        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.oversized_leases(), 1);
    }

    #[test]
    fn test_ensure_capacity_moves_content() {
        let pool = BufferPool::new(64, 4, 8);
        let mut lease = pool.lease(64);
        lease.extend_from_slice(b"prefix");
        lease.ensure_capacity(200);

        assert!(lease.capacity() >= 200);
        assert_eq!(&lease[..], b"prefix");
        // The smaller buffer went back to the pool
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_ensure_capacity_into_oversized() {
        let pool = BufferPool::new(64, 4, 8);
        {
            let mut lease = pool.lease(64);
            lease.extend_from_slice(b"abc");
            lease.ensure_capacity(10_000);
            assert_eq!(&lease[..], b"abc");
        }
        // Only the original small buffer is pooled
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.oversized_leases(), 1);
    }

    #[test]
    fn test_pool_is_bounded() {
        let pool = BufferPool::new(32, 4, 2);
        let leases: Vec<_> = (0..5).map(|_| pool.lease(8)).collect();
        drop(leases);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_concurrent_leases() {
        let pool = std::sync::Arc::new(BufferPool::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = std::sync::Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let mut lease = pool.lease(128);
                        lease.push(i as u8);
                        assert_eq!(lease.len(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert!(pool.idle() <= DEFAULT_MAX_POOLED);
    }
}
