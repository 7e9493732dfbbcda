// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The [`MemoryPool`] allocator abstraction backing every resizable
//! buffer and builder.

use std::fmt::Debug;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use stela_schema::StelaError;

use crate::alloc::ALIGNMENT;
use crate::buffer::dangling_ptr;

/// An allocator that hands out [`ALIGNMENT`]-aligned regions and tracks
/// the bytes it has outstanding.
///
/// Implementations must be safe to share across threads; the buffer and
/// builder types perform no synchronization of their own.
pub trait MemoryPool: Debug + Send + Sync {
    /// Allocates `size` bytes aligned to [`ALIGNMENT`].
    ///
    /// The content of the returned region is unspecified. Fails with
    /// [`StelaError::OutOfMemory`] when the request cannot be satisfied;
    /// never aborts the process.
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, StelaError>;

    /// Returns a region previously obtained from [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this pool's `allocate` with the
    /// same `size`, and must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize);

    /// The number of bytes currently allocated and not yet freed
    fn bytes_allocated(&self) -> usize;
}

/// A [`MemoryPool`] over the global allocator with atomic byte tracking
#[derive(Debug, Default)]
pub struct SystemPool {
    bytes: AtomicUsize,
}

impl MemoryPool for SystemPool {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, StelaError> {
        if size == 0 {
            return Ok(dangling_ptr());
        }
        let layout = std::alloc::Layout::from_size_align(size, ALIGNMENT)
            .map_err(|e| StelaError::Invalid(format!("invalid allocation layout: {e}")))?;
        // Safety: layout has non-zero size
        let raw = unsafe { std::alloc::alloc(layout) };
        match NonNull::new(raw) {
            Some(ptr) => {
                self.bytes.fetch_add(size, Ordering::Relaxed);
                Ok(ptr)
            }
            None => Err(StelaError::OutOfMemory(format!(
                "allocation of {size} bytes failed"
            ))),
        }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }
        let layout = std::alloc::Layout::from_size_align_unchecked(size, ALIGNMENT);
        std::alloc::dealloc(ptr.as_ptr(), layout);
        self.bytes.fetch_sub(size, Ordering::Relaxed);
    }

    fn bytes_allocated(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }
}

/// Returns the process-wide default [`MemoryPool`], created on first use.
///
/// Callers that need isolated accounting should construct their own
/// [`SystemPool`] and pass it to builders explicitly; this singleton is
/// a convenience entry point only.
pub fn default_pool() -> Arc<dyn MemoryPool> {
    static POOL: OnceLock<Arc<SystemPool>> = OnceLock::new();
    let pool: Arc<SystemPool> = POOL.get_or_init(|| Arc::new(SystemPool::default())).clone();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_tracks_bytes() {
        let pool = SystemPool::default();
        assert_eq!(pool.bytes_allocated(), 0);

        let a = pool.allocate(128).unwrap();
        assert_eq!(pool.bytes_allocated(), 128);
        assert_eq!(a.as_ptr() as usize % ALIGNMENT, 0);

        let b = pool.allocate(64).unwrap();
        assert_eq!(pool.bytes_allocated(), 192);

        unsafe {
            pool.free(a, 128);
            pool.free(b, 64);
        }
        assert_eq!(pool.bytes_allocated(), 0);
    }

    #[test]
    fn test_zero_sized_allocation() {
        let pool = SystemPool::default();
        let ptr = pool.allocate(0).unwrap();
        assert_eq!(pool.bytes_allocated(), 0);
        unsafe { pool.free(ptr, 0) };
        assert_eq!(pool.bytes_allocated(), 0);
    }

    #[test]
    fn test_default_pool_is_shared() {
        let before = default_pool().bytes_allocated();
        let ptr = default_pool().allocate(256).unwrap();
        assert_eq!(default_pool().bytes_allocated(), before + 256);
        unsafe { default_pool().free(ptr, 256) };
        assert_eq!(default_pool().bytes_allocated(), before);
    }
}
