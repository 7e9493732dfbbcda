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

//! A contiguous immutable memory region that knows how to release
//! itself, [`Bytes`]. This is a low-level building block of the crate;
//! most code works with [`Buffer`](crate::Buffer) instead.

use core::slice;
use std::fmt::{Debug, Formatter};
use std::ptr::NonNull;

use crate::alloc::Deallocation;

/// A fixed-size immutable memory region together with its release
/// strategy.
///
/// Pool-backed regions are returned to their
/// [`MemoryPool`](crate::MemoryPool) with their full capacity on drop;
/// external
/// regions (a mapped file, for instance) are owned elsewhere and merely
/// kept alive through the deallocation's `Arc`.
pub struct Bytes {
    /// The raw pointer to the beginning of the region
    ptr: NonNull<u8>,
    /// The number of bytes visible to this region, always `<= capacity`
    len: usize,
    /// How to release this region
    deallocation: Deallocation,
}

impl Bytes {
    /// Takes ownership of an allocated memory region.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes for the lifetime of
    /// the region described by `deallocation`.
    #[inline]
    pub(crate) unsafe fn new(ptr: NonNull<u8>, len: usize, deallocation: Deallocation) -> Bytes {
        Bytes {
            ptr,
            len,
            deallocation,
        }
    }

    fn as_slice(&self) -> &[u8] {
        self
    }

    /// The visible length of the region in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the region is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The pointer to the start of the region
    #[inline]
    pub fn ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// The capacity of the backing allocation.
    ///
    /// For external regions only the viewed size is known; the owner's
    /// allocation may be larger.
    pub fn capacity(&self) -> usize {
        match self.deallocation {
            Deallocation::Pool { capacity, .. } => capacity,
            Deallocation::External(_, size) => size,
        }
    }

    #[inline]
    pub(crate) fn deallocation(&self) -> &Deallocation {
        &self.deallocation
    }
}

// The only field that is not automatically Send + Sync is the NonNull
// ptr; the region itself is immutable for the lifetime of the value.
unsafe impl Send for Bytes {}
unsafe impl Sync for Bytes {}

impl Drop for Bytes {
    #[inline]
    fn drop(&mut self) {
        match &self.deallocation {
            Deallocation::Pool { pool, capacity } => {
                // Safety: ptr/capacity came from this pool's allocate
                unsafe { pool.free(self.ptr, *capacity) }
            }
            // Dropping the Arc releases the owner's region
            Deallocation::External(_, _) => (),
        }
    }
}

impl std::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Bytes) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Debug for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bytes {{ ptr: {:?}, len: {}, data: ", self.ptr, self.len)?;
        f.debug_list().entries(self.iter()).finish()?;
        write!(f, " }}")
    }
}
