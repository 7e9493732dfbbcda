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

use std::sync::Arc;

use stela_schema::StelaError;

use crate::buffer::BooleanBuffer;
use crate::pool::MemoryPool;
use crate::{Buffer, MutableBuffer};

/// A bit-packed validity mask with a cached null count.
///
/// A `0` bit marks the element at that position as logically null.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NullBuffer {
    buffer: BooleanBuffer,
    null_count: usize,
}

impl NullBuffer {
    /// Create a new [`NullBuffer`], computing the null count
    pub fn new(buffer: BooleanBuffer) -> Self {
        let null_count = buffer.len() - buffer.count_set_bits();
        Self { buffer, null_count }
    }

    /// Create a new [`NullBuffer`] of length `len` where every value is
    /// null
    pub fn new_null(pool: Arc<dyn MemoryPool>, len: usize) -> Result<Self, StelaError> {
        let num_bytes = crate::util::bit_util::ceil(len, 8);
        let buffer = MutableBuffer::from_len_zeroed(pool, num_bytes)?.freeze();
        Ok(Self {
            buffer: BooleanBuffer::new(buffer, 0, len),
            null_count: len,
        })
    }

    /// Create a new [`NullBuffer`] with the provided `buffer` and
    /// `null_count`
    ///
    /// # Safety
    ///
    /// `buffer` must contain exactly `null_count` `0` bits
    pub unsafe fn new_unchecked(buffer: BooleanBuffer, null_count: usize) -> Self {
        Self { buffer, null_count }
    }

    /// Returns the length of this [`NullBuffer`]
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if this [`NullBuffer`] is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the number of logically null positions
    #[inline]
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Returns `true` if the value at `idx` is not null
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        self.buffer.is_set(idx)
    }

    /// Returns `true` if the value at `idx` is null
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        !self.is_valid(idx)
    }

    /// Returns the packed validity bytes, including any offset
    #[inline]
    pub fn validity(&self) -> &[u8] {
        self.buffer.values()
    }

    /// Returns the inner [`BooleanBuffer`]
    #[inline]
    pub fn inner(&self) -> &BooleanBuffer {
        &self.buffer
    }

    /// Returns the underlying [`Buffer`]
    #[inline]
    pub fn buffer(&self) -> &Buffer {
        self.buffer.inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_pool;
    use crate::util::bit_util;

    #[test]
    fn test_null_count_is_cached_at_construction() {
        let mut bytes = vec![0u8; 1];
        bit_util::set_bit(&mut bytes, 0);
        bit_util::set_bit(&mut bytes, 2);
        let buffer = BooleanBuffer::new(Buffer::from_slice_ref(&bytes).unwrap(), 0, 3);

        let nulls = NullBuffer::new(buffer);
        assert_eq!(nulls.len(), 3);
        assert_eq!(nulls.null_count(), 1);
        assert!(nulls.is_valid(0));
        assert!(nulls.is_null(1));
        assert!(nulls.is_valid(2));
    }

    #[test]
    fn test_new_null() {
        let nulls = NullBuffer::new_null(default_pool(), 10).unwrap();
        assert_eq!(nulls.len(), 10);
        assert_eq!(nulls.null_count(), 10);
        assert!((0..10).all(|i| nulls.is_null(i)));
    }
}
