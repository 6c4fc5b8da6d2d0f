//! A sharded pool of byte buffers for string and bulk array I/O.
//!
//! Buffers are handed out as [`PooledBuf`] guards which return the allocation to the pool when
//! they are dropped, so every exit path of a codec gives its buffer back, including early returns
//! through `?`. Each thread is assigned a home shard on first use, which keeps concurrent
//! serializers from contending on a single lock.

use parking_lot::Mutex;
use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use tracing::trace;

static NEXT_SHARD: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static HOME_SHARD: usize = NEXT_SHARD.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of independently locked shards.
    pub shards: usize,
    /// Buffers kept per shard; further returns are dropped.
    pub retained_per_shard: usize,
    /// Buffers whose capacity exceeds this are never retained.
    pub max_buffer_len: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            shards: 8,
            retained_per_shard: 16,
            max_buffer_len: 1 << 20,
        }
    }
}

pub struct BufferPool {
    shards: Box<[Mutex<Vec<Vec<u8>>>]>,
    config: PoolConfig,
}

impl BufferPool {

    pub fn new(config: PoolConfig) -> Self {
        let shards = (0..config.shards.max(1)).map(|_| Mutex::new(Vec::new())).collect();
        BufferPool { shards, config }
    }

    /// The process-wide pool used by the string and array codecs.
    pub fn shared() -> &'static BufferPool {
        static POOL: OnceLock<BufferPool> = OnceLock::new();
        POOL.get_or_init(|| BufferPool::new(PoolConfig::default()))
    }

    /// Rents a buffer of exactly `len` bytes. The contents are unspecified.
    pub fn rent(&self, len: usize) -> PooledBuf<'_> {
        let mut buf = self.take(len);
        if buf.len() < len {
            buf.resize(len, 0);
        }
        PooledBuf { buf, len, pool: self }
    }

    /// Like [`rent`](Self::rent) but reports allocation failure instead of aborting, for lengths
    /// that come off the wire.
    pub fn try_rent(&self, len: usize) -> Result<PooledBuf<'_>, TryReserveError> {
        let mut buf = self.take(len);
        if buf.len() < len {
            buf.try_reserve_exact(len - buf.len())?;
            buf.resize(len, 0);
        }
        Ok(PooledBuf { buf, len, pool: self })
    }

    /// Number of buffers currently parked in the pool.
    pub fn retained(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    fn shard(&self) -> &Mutex<Vec<Vec<u8>>> {
        let home = HOME_SHARD.with(|home| *home);
        &self.shards[home % self.shards.len()]
    }

    fn take(&self, len: usize) -> Vec<u8> {
        let mut shard = self.shard().lock();
        match shard.iter().rposition(|buf| buf.capacity() >= len) {
            Some(i) => shard.swap_remove(i),
            None => {
                trace!(len, "buffer pool miss");
                Vec::new()
            }
        }
    }

    fn give_back(&self, buf: Vec<u8>) {
        if buf.capacity() == 0 {
            return;
        }
        if buf.capacity() > self.config.max_buffer_len {
            trace!(capacity = buf.capacity(), "discarding oversized buffer");
            return;
        }
        let mut shard = self.shard().lock();
        if shard.len() < self.config.retained_per_shard {
            shard.push(buf);
        } else {
            trace!(capacity = buf.capacity(), "buffer pool shard full, discarding");
        }
    }

}

/// A rented buffer. Dereferences to exactly the requested number of bytes.
pub struct PooledBuf<'p> {
    buf: Vec<u8>,
    len: usize,
    pool: &'p BufferPool,
}

impl<'p> Deref for PooledBuf<'p> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<'p> DerefMut for PooledBuf<'p> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }
}

impl<'p> Drop for PooledBuf<'p> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}
