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
use crate::{BooleanBufferBuilder, NullBuffer};

/// Builder for the validity bitmaps attached to arrays.
///
/// The bitmap is only materialized once the first null is appended; an
/// all-valid sequence costs no allocation and
/// [`finish`](Self::finish) returns `None` for it.
#[derive(Debug)]
pub struct NullBufferBuilder {
    /// `Some` once any null has been appended
    bitmap_builder: Option<BooleanBufferBuilder>,
    /// Length of the mask before materializing
    len: usize,
    /// Capacity hint used when the bitmap materializes
    capacity: usize,
    pool: Arc<dyn MemoryPool>,
}

impl NullBufferBuilder {
    /// Creates a new builder over `pool`.
    ///
    /// No memory is allocated until a null arrives; `capacity` is the
    /// bit capacity reserved at that point.
    pub fn new(pool: Arc<dyn MemoryPool>, capacity: usize) -> Self {
        Self {
            bitmap_builder: None,
            len: 0,
            capacity,
            pool,
        }
    }

    /// Appends a valid (non-null) position
    #[inline]
    pub fn append_non_null(&mut self) -> Result<(), StelaError> {
        self.append_n_non_nulls(1)
    }

    /// Appends `n` valid positions
    #[inline]
    pub fn append_n_non_nulls(&mut self, n: usize) -> Result<(), StelaError> {
        if let Some(builder) = self.bitmap_builder.as_mut() {
            builder.append_n(n, true)
        } else {
            self.len += n;
            Ok(())
        }
    }

    /// Appends a null position, materializing the bitmap if this is the
    /// first null
    #[inline]
    pub fn append_null(&mut self) -> Result<(), StelaError> {
        self.append_n_nulls(1)
    }

    /// Appends `n` null positions
    #[inline]
    pub fn append_n_nulls(&mut self, n: usize) -> Result<(), StelaError> {
        self.materialize_if_needed()?;
        self.bitmap_builder.as_mut().unwrap().append_n(n, false)
    }

    /// Appends a position whose validity is `not_null`
    #[inline]
    pub fn append(&mut self, not_null: bool) -> Result<(), StelaError> {
        if not_null {
            self.append_non_null()
        } else {
            self.append_null()
        }
    }

    /// Appends one position per flag in `slice`, where `false` marks a
    /// null
    pub fn append_slice(&mut self, slice: &[bool]) -> Result<(), StelaError> {
        if slice.iter().any(|v| !v) {
            self.materialize_if_needed()?;
        }
        if let Some(builder) = self.bitmap_builder.as_mut() {
            builder.append_slice(slice)
        } else {
            self.len += slice.len();
            Ok(())
        }
    }

    /// Returns whether the position at `index` is valid
    pub fn is_valid(&self, index: usize) -> bool {
        match &self.bitmap_builder {
            Some(builder) => builder.get_bit(index),
            None => true,
        }
    }

    /// Returns the number of positions appended so far
    pub fn len(&self) -> usize {
        self.bitmap_builder.as_ref().map_or(self.len, |b| b.len())
    }

    /// Returns whether no positions have been appended
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Views the packed validity bytes, or `None` while no null has
    /// been appended
    pub fn as_slice(&self) -> Option<&[u8]> {
        Some(self.bitmap_builder.as_ref()?.as_slice())
    }

    /// Builds the [`NullBuffer`] and resets this builder to a fresh
    /// empty state.
    ///
    /// Returns `None` when every appended position was valid.
    pub fn finish(&mut self) -> Option<NullBuffer> {
        self.len = 0;
        Some(NullBuffer::new(self.bitmap_builder.take()?.finish()))
    }

    fn materialize_if_needed(&mut self) -> Result<(), StelaError> {
        if self.bitmap_builder.is_none() {
            self.materialize()?;
        }
        Ok(())
    }

    #[cold]
    fn materialize(&mut self) -> Result<(), StelaError> {
        let mut builder =
            BooleanBufferBuilder::with_capacity(self.pool.clone(), self.len.max(self.capacity))?;
        builder.append_n(self.len, true)?;
        self.bitmap_builder = Some(builder);
        Ok(())
    }
}
