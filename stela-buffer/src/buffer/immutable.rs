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

use std::fmt::Debug;
use std::ptr::NonNull;
use std::sync::Arc;

use stela_schema::StelaError;

use crate::alloc::{Allocation, Deallocation};
use crate::bytes::Bytes;
use crate::native::NativeType;
use crate::util::bit_util;
use crate::MutableBuffer;

/// An immutable, cheaply clonable view over a span of bytes.
///
/// Cloning and slicing share the underlying storage; the storage is
/// released when the last view drops. A buffer either owns pool-backed
/// storage (built by a [`MutableBuffer`] or a builder) or is a weak
/// view into an externally owned region such as a memory-mapped file,
/// in which case the owner is kept alive alongside the view and call
/// sites must not assume exclusive ownership.
#[derive(Clone)]
pub struct Buffer {
    /// The byte region and its release strategy
    data: Arc<Bytes>,
    /// The start of this view within `data`
    ptr: *const u8,
    /// The length of this view in bytes
    length: usize,
}

// Immutable once constructed; the raw view pointer is the only field
// blocking the auto traits.
unsafe impl Send for Buffer {}
unsafe impl Sync for Buffer {}

impl Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.length)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl Buffer {
    /// Creates a buffer from a [`Bytes`] region, viewing it whole
    pub(crate) fn from_bytes(bytes: Bytes) -> Self {
        let ptr = bytes.ptr().as_ptr();
        let length = bytes.len();
        Self {
            data: Arc::new(bytes),
            ptr,
            length,
        }
    }

    /// Copies `items` into a fresh pool allocation from the default pool
    pub fn from_slice_ref<T: NativeType>(items: &[T]) -> Result<Self, StelaError> {
        let mut buffer = MutableBuffer::new(crate::default_pool());
        buffer.extend_from_slice(items)?;
        Ok(buffer.freeze())
    }

    /// Creates a zero-copy view over a region owned by `owner`.
    ///
    /// The owner is retained for as long as any view (or sub-slice of a
    /// view) is alive; the region is never freed by this crate.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes for as long as
    /// `owner` is alive.
    pub unsafe fn from_external(
        owner: Arc<dyn Allocation>,
        ptr: NonNull<u8>,
        len: usize,
    ) -> Self {
        let bytes = Bytes::new(ptr, len, Deallocation::External(owner, len));
        Self::from_bytes(bytes)
    }

    /// The length of this view in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true when this view is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The capacity of the backing allocation, `>= len`
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The bytes of this view
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self
    }

    /// The pointer to the start of this view
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// Returns a view over `[offset, offset + length)` of this view,
    /// sharing the same storage
    ///
    /// # Panics
    ///
    /// Panics if the requested range exceeds this view
    pub fn slice_with_length(&self, offset: usize, length: usize) -> Self {
        assert!(
            offset.saturating_add(length) <= self.length,
            "the offset + length of the sliced Buffer cannot exceed the existing length: \
             slice offset={offset} length={length} selflen={}",
            self.length
        );
        // Safety: bounds checked above
        let ptr = unsafe { self.ptr.add(offset) };
        Self {
            data: self.data.clone(),
            ptr,
            length,
        }
    }

    /// Views this buffer as a slice of fixed-width values.
    ///
    /// # Panics
    ///
    /// Panics if the view is not aligned for `T` or its length is not a
    /// multiple of `size_of::<T>()`.
    pub fn typed_data<T: NativeType>(&self) -> &[T] {
        let (prefix, values, suffix) = unsafe { self.as_slice().align_to::<T>() };
        assert!(
            prefix.is_empty() && suffix.is_empty(),
            "buffer is not aligned for the requested value type"
        );
        values
    }

    /// Compares the first `nbytes` bytes of the two buffers, independent
    /// of their full sizes.
    ///
    /// Returns false when either buffer holds fewer than `nbytes` bytes;
    /// this is how logically equal prefixes are compared when one buffer
    /// carries slack capacity.
    pub fn part_equals(&self, other: &Buffer, nbytes: usize) -> bool {
        self.length >= nbytes
            && other.length >= nbytes
            && self.as_slice()[..nbytes] == other.as_slice()[..nbytes]
    }

    /// Counts the 1-bits in the bit range `[offset, offset + len)`
    pub fn count_set_bits_offset(&self, offset: usize, len: usize) -> usize {
        bit_util::count_set_bits(self.as_slice(), offset, len)
    }

    /// Returns true when both views point at the same storage span
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        self.ptr == other.ptr && self.length == other.length
    }

    /// Converts this buffer back into a [`MutableBuffer`].
    ///
    /// Succeeds only when this is the sole view over a pool-backed
    /// region; otherwise the buffer is returned unchanged in the `Err`
    /// variant. Weak views over external regions never convert.
    pub fn into_mutable(self) -> Result<MutableBuffer, Buffer> {
        let ptr = self.ptr;
        let length = self.length;
        Arc::try_unwrap(self.data)
            .and_then(|bytes| {
                // Only a whole-region view can reuse the allocation
                if bytes.ptr().as_ptr() as *const u8 == ptr && bytes.len() == length {
                    MutableBuffer::from_bytes(bytes).map_err(Arc::new)
                } else {
                    Err(Arc::new(bytes))
                }
            })
            .map_err(|data| Buffer { data, ptr, length })
    }
}

impl std::ops::Deref for Buffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        // Safety: ptr/length describe an initialized range of `data`
        unsafe { std::slice::from_raw_parts(self.ptr, self.length) }
    }
}

/// Buffer equality: equal sizes and equal bytes.
///
/// Use [`Buffer::part_equals`] to compare prefixes of buffers with
/// differing sizes.
impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Buffer {}

impl From<MutableBuffer> for Buffer {
    fn from(buffer: MutableBuffer) -> Self {
        buffer.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_pool;

    #[test]
    fn test_from_slice_ref() {
        let buffer = Buffer::from_slice_ref(&[1u32, 2, 3]).unwrap();
        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer.typed_data::<u32>(), &[1, 2, 3]);
    }

    #[test]
    fn test_equality() {
        let a = Buffer::from_slice_ref(&[1u8, 2, 3]).unwrap();
        let b = Buffer::from_slice_ref(&[1u8, 2, 3]).unwrap();
        let c = Buffer::from_slice_ref(&[1u8, 2, 4]).unwrap();
        let d = Buffer::from_slice_ref(&[1u8, 2]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_part_equals() {
        let a = Buffer::from_slice_ref(&[1u8, 2, 3, 4]).unwrap();
        let b = Buffer::from_slice_ref(&[1u8, 2, 9]).unwrap();

        assert!(a.part_equals(&b, 2));
        assert!(!a.part_equals(&b, 3));
        // requesting more bytes than either side holds is not equality
        assert!(!a.part_equals(&b, 4));
        assert!(a.part_equals(&b, 0));
    }

    #[test]
    fn test_slice_shares_storage() {
        let a = Buffer::from_slice_ref(&[0u8, 1, 2, 3, 4, 5]).unwrap();
        let s = a.slice_with_length(2, 3);
        assert_eq!(s.as_slice(), &[2, 3, 4]);
        drop(a);
        // storage survives through the slice
        assert_eq!(s.as_slice(), &[2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "cannot exceed the existing length")]
    fn test_slice_out_of_bounds() {
        let a = Buffer::from_slice_ref(&[0u8, 1, 2]).unwrap();
        a.slice_with_length(2, 2);
    }

    #[test]
    fn test_into_mutable() {
        let pool = default_pool();
        let mut m = MutableBuffer::new(pool);
        m.extend_from_slice(&[1u8, 2, 3]).unwrap();
        let buffer = m.freeze();

        // a second view blocks the conversion
        let extra = buffer.clone();
        let buffer = buffer.into_mutable().unwrap_err();
        drop(extra);

        let mut m = buffer.into_mutable().unwrap();
        m.extend_from_slice(&[4u8]).unwrap();
        assert_eq!(m.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_external_keeps_owner_alive() {
        let owner: Arc<Vec<u8>> = Arc::new((0..32).collect());
        let ptr = NonNull::new(owner.as_ptr() as *mut u8).unwrap();
        let view = unsafe { Buffer::from_external(owner.clone(), ptr, 32) };
        drop(owner);

        assert_eq!(view.len(), 32);
        assert_eq!(view.as_slice()[31], 31);
        let sliced = view.slice_with_length(16, 8);
        drop(view);
        assert_eq!(sliced.as_slice()[0], 16);
    }
}
