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

use crate::pool::MemoryPool;
use crate::util::bit_util;
use crate::{BooleanBuffer, MutableBuffer};

/// An append-only builder for bit-packed boolean buffers
#[derive(Debug)]
pub struct BooleanBufferBuilder {
    buffer: MutableBuffer,
    len: usize,
}

impl BooleanBufferBuilder {
    /// Creates an empty builder over `pool`; nothing is allocated until
    /// the first append
    pub fn new(pool: Arc<dyn MemoryPool>) -> Self {
        Self {
            buffer: MutableBuffer::new(pool),
            len: 0,
        }
    }

    /// Creates a new builder over `pool` with room for at least
    /// `capacity` bits
    pub fn with_capacity(pool: Arc<dyn MemoryPool>, capacity: usize) -> Result<Self, StelaError> {
        let buffer = MutableBuffer::with_capacity(pool, bit_util::ceil(capacity, 8))?;
        Ok(Self { buffer, len: 0 })
    }

    /// Returns the number of bits appended so far
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether no bits have been appended
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bits the current allocation can hold
    pub fn capacity(&self) -> usize {
        self.buffer.capacity() * 8
    }

    /// Appends a single bit
    #[inline]
    pub fn append(&mut self, v: bool) -> Result<(), StelaError> {
        self.append_n(1, v)
    }

    /// Appends `n` copies of `v`
    pub fn append_n(&mut self, n: usize, v: bool) -> Result<(), StelaError> {
        if n == 0 {
            return Ok(());
        }
        let new_len = self.len + n;
        // newly exposed bytes arrive zeroed, so only 1-bits are written
        self.buffer.resize(bit_util::ceil(new_len, 8))?;
        if v {
            let bits = self.buffer.as_slice_mut();
            for i in self.len..new_len {
                bit_util::set_bit(bits, i);
            }
        }
        self.len = new_len;
        Ok(())
    }

    /// Appends one bit per flag in `slice`
    pub fn append_slice(&mut self, slice: &[bool]) -> Result<(), StelaError> {
        let offset = self.len;
        let new_len = offset + slice.len();
        self.buffer.resize(bit_util::ceil(new_len, 8))?;
        let bits = self.buffer.as_slice_mut();
        for (i, v) in slice.iter().enumerate() {
            if *v {
                bit_util::set_bit(bits, offset + i);
            }
        }
        self.len = new_len;
        Ok(())
    }

    /// Returns the bit at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`
    pub fn get_bit(&self, index: usize) -> bool {
        assert!(index < self.len);
        bit_util::get_bit(self.buffer.as_slice(), index)
    }

    /// Overwrites the bit at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`
    pub fn set_bit(&mut self, index: usize, v: bool) {
        assert!(index < self.len);
        if v {
            bit_util::set_bit(self.buffer.as_slice_mut(), index);
        } else {
            bit_util::unset_bit(self.buffer.as_slice_mut(), index);
        }
    }

    /// Views the packed bits appended so far
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Freezes the appended bits into a [`BooleanBuffer`] and resets
    /// this builder to empty
    pub fn finish(&mut self) -> BooleanBuffer {
        let len = self.len;
        self.len = 0;
        let empty = MutableBuffer::new(self.buffer.pool().clone());
        let buffer = std::mem::replace(&mut self.buffer, empty);
        BooleanBuffer::new(buffer.freeze(), 0, len)
    }
}
