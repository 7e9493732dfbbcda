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

use std::fmt::Formatter;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::native::NativeType;
use crate::Buffer;

/// A strongly-typed [`Buffer`] supporting zero-copy cloning and slicing.
///
/// Think of it as an `Arc<Vec<T>>` whose storage may live in a pool
/// allocation or an externally owned region such as a mapped file.
#[derive(Clone)]
pub struct ScalarBuffer<T: NativeType> {
    buffer: Buffer,
    phantom: PhantomData<T>,
}

impl<T: NativeType> std::fmt::Debug for ScalarBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScalarBuffer").field(&self.as_ref()).finish()
    }
}

impl<T: NativeType> ScalarBuffer<T> {
    /// Create a new [`ScalarBuffer`] from a [`Buffer`], and an `offset`
    /// and `length` in units of `T`
    ///
    /// # Panics
    ///
    /// Panics if `offset` or `len` overflow, if the requested slice
    /// exceeds `buffer`, or if `buffer` is not aligned for `T`
    pub fn new(buffer: Buffer, offset: usize, len: usize) -> Self {
        let size = std::mem::size_of::<T>();
        let byte_offset = offset.checked_mul(size).expect("offset overflow");
        let byte_len = len.checked_mul(size).expect("length overflow");
        buffer.slice_with_length(byte_offset, byte_len).into()
    }

    /// Returns a zero-copy slice of this buffer with length `len` and
    /// starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self::new(self.buffer.clone(), offset, len)
    }

    /// Returns the number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len() / std::mem::size_of::<T>()
    }

    /// Returns true when this buffer holds no values
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the inner [`Buffer`]
    #[inline]
    pub fn inner(&self) -> &Buffer {
        &self.buffer
    }

    /// Returns the inner [`Buffer`], consuming self
    pub fn into_inner(self) -> Buffer {
        self.buffer
    }
}

impl<T: NativeType> Deref for ScalarBuffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        // Safety: alignment verified in From<Buffer>
        unsafe {
            std::slice::from_raw_parts(
                self.buffer.as_ptr() as *const T,
                self.buffer.len() / std::mem::size_of::<T>(),
            )
        }
    }
}

impl<T: NativeType> AsRef<[T]> for ScalarBuffer<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T: NativeType> From<Buffer> for ScalarBuffer<T> {
    fn from(buffer: Buffer) -> Self {
        let align = std::mem::align_of::<T>();
        assert_eq!(
            buffer.as_ptr().align_offset(align),
            0,
            "buffer is not aligned to {align} byte boundary"
        );
        assert_eq!(
            buffer.len() % std::mem::size_of::<T>(),
            0,
            "buffer length is not a multiple of the value width"
        );
        Self {
            buffer,
            phantom: PhantomData,
        }
    }
}

impl<T: NativeType> PartialEq for ScalarBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_view() {
        let buffer = Buffer::from_slice_ref(&[1i32, 2, 3, 4]).unwrap();
        let scalars: ScalarBuffer<i32> = buffer.into();
        assert_eq!(scalars.len(), 4);
        assert_eq!(&scalars[..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_slice() {
        let buffer = Buffer::from_slice_ref(&[1u64, 2, 3, 4]).unwrap();
        let scalars = ScalarBuffer::<u64>::new(buffer, 1, 2);
        assert_eq!(&scalars[..], &[2, 3]);
    }

    #[test]
    #[should_panic(expected = "not a multiple of the value width")]
    fn test_misaligned_length() {
        let buffer = Buffer::from_slice_ref(&[0u8; 5]).unwrap();
        let _: ScalarBuffer<u32> = buffer.into();
    }
}
