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

use std::ptr::NonNull;
use std::sync::Arc;

use stela_schema::StelaError;

use crate::alloc::Deallocation;
use crate::buffer::dangling_ptr;
use crate::bytes::Bytes;
use crate::native::{NativeType, ToByteSlice};
use crate::pool::{default_pool, MemoryPool};
use crate::util::bit_util;
use crate::Buffer;

/// A pool-backed, resizable byte buffer: the mutable stage every
/// [`Buffer`] goes through before it is frozen.
///
/// The logical length and the backing capacity are tracked separately.
/// Growing the length zero-fills the newly exposed bytes; shrinking is
/// logical only and leaves the capacity untouched. Capacity grows in
/// powers of two (with a 64-byte floor), amortizing repeated appends to
/// constant average cost per byte.
///
/// Allocation goes through the buffer's [`MemoryPool`]; failures are
/// reported as [`StelaError::OutOfMemory`] and leave the buffer
/// unchanged.
///
/// # Example
///
/// ```
/// # use stela_buffer::{default_pool, Buffer, MutableBuffer};
/// let mut buffer = MutableBuffer::new(default_pool());
/// buffer.push(256u32).unwrap();
/// buffer.extend_from_slice(&[1u32]).unwrap();
/// let buffer: Buffer = buffer.freeze();
/// assert_eq!(buffer.as_slice(), &[0u8, 1, 0, 0, 1, 0, 0, 0])
/// ```
#[derive(Debug)]
pub struct MutableBuffer {
    // dangling iff capacity = 0
    data: NonNull<u8>,
    // invariant: len <= capacity
    len: usize,
    capacity: usize,
    pool: Arc<dyn MemoryPool>,
}

impl MutableBuffer {
    /// Creates an empty buffer backed by `pool`; no allocation happens
    /// until the first write or reservation
    pub fn new(pool: Arc<dyn MemoryPool>) -> Self {
        Self {
            data: dangling_ptr(),
            len: 0,
            capacity: 0,
            pool,
        }
    }

    /// Creates an empty buffer whose backing allocation can hold at
    /// least `capacity` bytes
    pub fn with_capacity(pool: Arc<dyn MemoryPool>, capacity: usize) -> Result<Self, StelaError> {
        let mut buffer = Self::new(pool);
        buffer.reserve(capacity)?;
        Ok(buffer)
    }

    /// Creates a buffer of `len` zeroed bytes
    pub fn from_len_zeroed(pool: Arc<dyn MemoryPool>, len: usize) -> Result<Self, StelaError> {
        let mut buffer = Self::new(pool);
        buffer.resize(len)?;
        Ok(buffer)
    }

    /// Rebuilds a mutable buffer from a whole-region pool-backed
    /// [`Bytes`]; external regions are handed back in the `Err` variant
    pub(crate) fn from_bytes(bytes: Bytes) -> Result<Self, Bytes> {
        let (pool, capacity) = match bytes.deallocation() {
            Deallocation::Pool { pool, capacity } => (pool.clone(), *capacity),
            Deallocation::External(..) => return Err(bytes),
        };
        let data = bytes.ptr();
        let len = bytes.len();
        std::mem::forget(bytes);
        Ok(Self {
            data,
            len,
            capacity,
            pool,
        })
    }

    /// The number of bytes written so far
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true when no bytes have been written
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The size of the backing allocation, `>= len`
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ensures the buffer can hold `len + additional` bytes without
    /// another allocation.
    ///
    /// A no-op when the current capacity suffices; otherwise the
    /// capacity grows to the next power of two. Previously written
    /// content is preserved. Fails with [`StelaError::OutOfMemory`]
    /// when the pool cannot satisfy the request, leaving the buffer as
    /// it was.
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<(), StelaError> {
        let required = self.len + additional;
        if required > self.capacity {
            self.reallocate(bit_util::round_upto_power_of_2(required))?;
        }
        Ok(())
    }

    #[cold]
    fn reallocate(&mut self, new_capacity: usize) -> Result<(), StelaError> {
        let new_data = self.pool.allocate(new_capacity)?;
        if self.len != 0 {
            // Safety: both regions are valid for len bytes and disjoint
            unsafe {
                std::ptr::copy_nonoverlapping(self.data.as_ptr(), new_data.as_ptr(), self.len)
            };
        }
        if self.capacity != 0 {
            // Safety: data/capacity came from this pool
            unsafe { self.pool.free(self.data, self.capacity) };
        }
        self.data = new_data;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Changes the logical length to `new_len`.
    ///
    /// Growing zero-fills `[len, new_len)`, reallocating if the
    /// capacity is insufficient. Shrinking only lowers the length; use
    /// [`shrink_to_fit`](Self::shrink_to_fit) to reclaim capacity.
    pub fn resize(&mut self, new_len: usize) -> Result<(), StelaError> {
        if new_len > self.len {
            let diff = new_len - self.len;
            self.reserve(diff)?;
            // Safety: capacity now covers new_len
            unsafe { self.data.as_ptr().add(self.len).write_bytes(0, diff) };
        }
        self.len = new_len;
        Ok(())
    }

    /// Shortens the buffer to `len` bytes; no effect when `len` exceeds
    /// the current length
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    /// Reallocates the backing storage down to the smallest aligned
    /// capacity holding the current content
    pub fn shrink_to_fit(&mut self) -> Result<(), StelaError> {
        let new_capacity = bit_util::round_upto_multiple_of_64(self.len);
        if new_capacity < self.capacity {
            if new_capacity == 0 {
                // Safety: data/capacity came from this pool
                unsafe { self.pool.free(self.data, self.capacity) };
                self.data = dangling_ptr();
                self.capacity = 0;
            } else {
                self.reallocate(new_capacity)?;
            }
        }
        Ok(())
    }

    /// Appends `additional` zeroed bytes
    #[inline]
    pub fn extend_zeros(&mut self, additional: usize) -> Result<(), StelaError> {
        self.resize(self.len + additional)
    }

    /// Appends the raw bytes of `items`
    #[inline]
    pub fn extend_from_slice<T: NativeType>(&mut self, items: &[T]) -> Result<(), StelaError> {
        let bytes = items.to_byte_slice();
        self.reserve(bytes.len())?;
        // Safety: reserve guaranteed capacity for len + bytes.len()
        unsafe {
            std::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.data.as_ptr().add(self.len),
                bytes.len(),
            )
        }
        self.len += bytes.len();
        Ok(())
    }

    /// Appends the raw bytes of a single value
    #[inline]
    pub fn push<T: ToByteSlice>(&mut self, item: T) -> Result<(), StelaError> {
        let bytes = item.to_byte_slice();
        self.reserve(bytes.len())?;
        // Safety: reserve guaranteed capacity for len + bytes.len()
        unsafe {
            std::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.data.as_ptr().add(self.len),
                bytes.len(),
            )
        }
        self.len += bytes.len();
        Ok(())
    }

    /// The written bytes as a slice
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // Safety: [0, len) is initialized
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// The written bytes as a mutable slice
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        // Safety: [0, len) is initialized and uniquely borrowed
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }

    /// The pointer to the start of the buffer
    #[inline]
    pub const fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// The pool backing this buffer's allocations
    #[inline]
    pub fn pool(&self) -> &Arc<dyn MemoryPool> {
        &self.pool
    }

    /// Views the written bytes as fixed-width values.
    ///
    /// # Panics
    ///
    /// Panics if the length is not a multiple of `size_of::<T>()`.
    pub fn typed_data<T: NativeType>(&self) -> &[T] {
        let (prefix, values, suffix) = unsafe { self.as_slice().align_to::<T>() };
        assert!(prefix.is_empty() && suffix.is_empty());
        values
    }

    /// Freezes this buffer into an immutable, sharable [`Buffer`].
    ///
    /// The backing allocation moves as-is: no copy, and slack capacity
    /// is retained until the last view drops.
    pub fn freeze(self) -> Buffer {
        // Safety: [0, len) is initialized and owned by the pool
        let bytes = unsafe {
            Bytes::new(
                self.data,
                self.len,
                Deallocation::Pool {
                    pool: self.pool.clone(),
                    capacity: self.capacity,
                },
            )
        };
        std::mem::forget(self);
        Buffer::from_bytes(bytes)
    }
}

impl Default for MutableBuffer {
    fn default() -> Self {
        Self::new(default_pool())
    }
}

impl Drop for MutableBuffer {
    fn drop(&mut self) {
        if self.capacity != 0 {
            // Safety: data/capacity came from this pool
            unsafe { self.pool.free(self.data, self.capacity) };
        }
    }
}

// Safety: like Vec<u8>, the buffer uniquely owns its region
unsafe impl Send for MutableBuffer {}
unsafe impl Sync for MutableBuffer {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SystemPool;

    fn pool() -> Arc<dyn MemoryPool> {
        Arc::new(SystemPool::default())
    }

    #[test]
    fn test_capacity_growth_is_power_of_two() {
        let mut buffer = MutableBuffer::new(pool());
        assert_eq!(buffer.capacity(), 0);

        buffer.reserve(100).unwrap();
        assert_eq!(buffer.capacity(), 128);
        assert_eq!(buffer.len(), 0);

        buffer.reserve(200).unwrap();
        assert_eq!(buffer.capacity(), 256);

        // already satisfied: no change
        buffer.reserve(10).unwrap();
        assert_eq!(buffer.capacity(), 256);
    }

    #[test]
    fn test_resize_zero_fills() {
        let mut buffer = MutableBuffer::new(pool());
        buffer.extend_from_slice(&[0xffu8; 4]).unwrap();
        buffer.resize(8).unwrap();
        assert_eq!(buffer.as_slice(), &[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);

        // shrink is logical only
        let capacity = buffer.capacity();
        buffer.resize(2).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn test_append_preserves_content_across_growth() {
        let mut buffer = MutableBuffer::new(pool());
        for chunk in 0..10u8 {
            buffer.extend_from_slice(&[chunk; 31]).unwrap();
        }
        assert_eq!(buffer.len(), 310);
        for (i, byte) in buffer.as_slice().iter().enumerate() {
            assert_eq!(*byte, (i / 31) as u8);
        }
    }

    #[test]
    fn test_freeze_retains_capacity() {
        let mut buffer = MutableBuffer::new(pool());
        buffer.reserve(100).unwrap();
        buffer.extend_from_slice(&[1u8, 2, 3]).unwrap();

        let frozen = buffer.freeze();
        assert_eq!(frozen.len(), 3);
        assert_eq!(frozen.capacity(), 128);
        assert_eq!(frozen.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_pool_accounting() {
        let pool: Arc<SystemPool> = Arc::new(SystemPool::default());
        let before = pool.bytes_allocated();
        {
            let mut buffer = MutableBuffer::new(pool.clone());
            buffer.resize(1000).unwrap();
            assert_eq!(pool.bytes_allocated(), before + 1024);

            let frozen = buffer.freeze();
            assert_eq!(pool.bytes_allocated(), before + 1024);
            drop(frozen);
        }
        assert_eq!(pool.bytes_allocated(), before);
    }

    #[test]
    fn test_shrink_to_fit() {
        let mut buffer = MutableBuffer::new(pool());
        buffer.reserve(1000).unwrap();
        assert_eq!(buffer.capacity(), 1024);

        buffer.extend_from_slice(&[7u8; 70]).unwrap();
        buffer.shrink_to_fit().unwrap();
        assert_eq!(buffer.capacity(), 128);
        assert_eq!(buffer.as_slice(), &[7u8; 70]);

        buffer.truncate(0);
        buffer.shrink_to_fit().unwrap();
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_push_typed() {
        let mut buffer = MutableBuffer::new(pool());
        buffer.push(1u32).unwrap();
        buffer.push(2u32).unwrap();
        assert_eq!(buffer.typed_data::<u32>(), &[1, 2]);
    }
}
