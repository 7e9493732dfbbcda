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

//! Buffer builders

mod boolean;
pub use boolean::*;

mod null;
pub use null::*;

use std::marker::PhantomData;
use std::sync::Arc;

use stela_schema::StelaError;

use crate::native::NativeType;
use crate::pool::MemoryPool;
use crate::{Buffer, MutableBuffer};

/// An append-only builder producing an immutable [`Buffer`] of
/// fixed-width values.
///
/// One generic builder serves every scalar kind. Appends grow the
/// backing allocation geometrically, so building a buffer of `n` values
/// costs O(n) regardless of how the appends are batched. The terminal
/// [`finish`](Self::finish) consumes the builder: a finished builder
/// cannot be appended to again without a new allocation, by
/// construction.
///
/// # Example:
///
/// ```
/// # use stela_buffer::{default_pool, BufferBuilder};
/// let mut builder = BufferBuilder::<u16>::new(default_pool());
/// builder.append_slice(&[42, 43, 44]).unwrap();
/// builder.append(45).unwrap();
/// let buffer = builder.finish();
///
/// assert_eq!(buffer.typed_data::<u16>(), &[42, 43, 44, 45]);
/// ```
#[derive(Debug)]
pub struct BufferBuilder<T: NativeType> {
    buffer: MutableBuffer,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: NativeType> BufferBuilder<T> {
    /// Creates an empty builder over `pool`; nothing is allocated until
    /// the first append or reservation
    pub fn new(pool: Arc<dyn MemoryPool>) -> Self {
        Self {
            buffer: MutableBuffer::new(pool),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new builder over `pool` with room for at least
    /// `capacity` values of type `T`
    pub fn with_capacity(pool: Arc<dyn MemoryPool>, capacity: usize) -> Result<Self, StelaError> {
        let buffer = MutableBuffer::with_capacity(pool, capacity * std::mem::size_of::<T>())?;
        Ok(Self {
            buffer,
            len: 0,
            _marker: PhantomData,
        })
    }

    /// The pool backing this builder's allocations
    #[inline]
    pub fn pool(&self) -> &Arc<dyn MemoryPool> {
        self.buffer.pool()
    }

    /// Returns the number of values appended so far
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether no values have been appended
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values the current allocation can hold.
    ///
    /// Growth rounds to powers of two, so this may exceed what was
    /// requested.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity() / std::mem::size_of::<T>()
    }

    /// Ensures the builder can hold at least `n` values in total
    /// without reallocating; never alters appended content.
    ///
    /// Fails with [`StelaError::OutOfMemory`] when the pool cannot
    /// satisfy the request, leaving the builder unchanged.
    pub fn resize(&mut self, n: usize) -> Result<(), StelaError> {
        let target = n * std::mem::size_of::<T>();
        let written = self.buffer.len();
        if target > written {
            self.buffer.reserve(target - written)?;
        }
        Ok(())
    }

    /// Appends `n` zero-initialized values
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<(), StelaError> {
        self.buffer.extend_zeros(n * std::mem::size_of::<T>())?;
        self.len += n;
        Ok(())
    }

    /// Appends a single value, growing the allocation as needed
    #[inline]
    pub fn append(&mut self, v: T) -> Result<(), StelaError> {
        self.buffer.push(v)?;
        self.len += 1;
        Ok(())
    }

    /// Appends a slice of values, growing the allocation as needed
    #[inline]
    pub fn append_slice(&mut self, slice: &[T]) -> Result<(), StelaError> {
        self.buffer.extend_from_slice(slice)?;
        self.len += slice.len();
        Ok(())
    }

    /// Views the appended values as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buffer.typed_data()
    }

    /// Freezes the appended values into an immutable [`Buffer`] whose
    /// size equals the appended byte count; slack capacity is retained
    /// by the allocation.
    ///
    /// Consumes the builder: appending after a finish is a compile
    /// error, not a runtime one.
    #[inline]
    pub fn finish(self) -> Buffer {
        self.buffer.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_pool;

    #[test]
    fn test_builder_capacity_after_resize() {
        let mut builder = BufferBuilder::<u8>::new(default_pool());
        builder.append(10).unwrap();

        builder.resize(100).unwrap();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.capacity(), 128);

        builder.resize(200).unwrap();
        assert_eq!(builder.capacity(), 256);

        let buffer = builder.finish();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.capacity(), 256);
    }

    #[test]
    fn test_finished_bytes_equal_appends() {
        let mut expected = Vec::new();
        let mut builder = BufferBuilder::<u8>::new(default_pool());
        for chunk in 0..7u8 {
            let values: Vec<u8> = (0..chunk + 3).map(|v| v ^ chunk).collect();
            builder.append_slice(&values).unwrap();
            builder.resize(64 * (chunk as usize + 1)).unwrap();
            expected.extend_from_slice(&values);
        }

        let buffer = builder.finish();
        assert_eq!(buffer.len(), expected.len());
        assert_eq!(buffer.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_advance_zeroes() {
        let mut builder = BufferBuilder::<u32>::with_capacity(default_pool(), 4).unwrap();
        builder.append(7).unwrap();
        builder.advance(2).unwrap();
        builder.append(9).unwrap();
        assert_eq!(builder.as_slice(), &[7, 0, 0, 9]);
        assert_eq!(builder.len(), 4);
    }

    #[test]
    fn test_typed_appends() {
        let mut builder = BufferBuilder::<f64>::new(default_pool());
        builder.append_slice(&[1.5, -2.5]).unwrap();
        builder.append(0.25).unwrap();
        assert_eq!(builder.as_slice(), &[1.5, -2.5, 0.25]);

        let buffer = builder.finish();
        assert_eq!(buffer.typed_data::<f64>(), &[1.5, -2.5, 0.25]);
    }
}
