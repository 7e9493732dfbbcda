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

use stela_buffer::{BufferBuilder, MemoryPool, NullBufferBuilder, ScalarBuffer};
use stela_schema::StelaError;

use crate::array::PrimitiveArray;
use crate::types::*;

/// A signed 8-bit integer array builder
pub type Int8Builder = PrimitiveBuilder<Int8Type>;
/// A signed 16-bit integer array builder
pub type Int16Builder = PrimitiveBuilder<Int16Type>;
/// A signed 32-bit integer array builder
pub type Int32Builder = PrimitiveBuilder<Int32Type>;
/// A signed 64-bit integer array builder
pub type Int64Builder = PrimitiveBuilder<Int64Type>;
/// An unsigned 8-bit integer array builder
pub type UInt8Builder = PrimitiveBuilder<UInt8Type>;
/// An unsigned 16-bit integer array builder
pub type UInt16Builder = PrimitiveBuilder<UInt16Type>;
/// An unsigned 32-bit integer array builder
pub type UInt32Builder = PrimitiveBuilder<UInt32Type>;
/// An unsigned 64-bit integer array builder
pub type UInt64Builder = PrimitiveBuilder<UInt64Type>;
/// A 16-bit floating point array builder
pub type Float16Builder = PrimitiveBuilder<Float16Type>;
/// A 32-bit floating point array builder
pub type Float32Builder = PrimitiveBuilder<Float32Type>;
/// A 64-bit floating point array builder
pub type Float64Builder = PrimitiveBuilder<Float64Type>;

/// Array builder for fixed-width value kinds.
///
/// Accumulates (value, validity) pairs; the validity bitmap is only
/// allocated once the first null arrives. [`finish`](Self::finish)
/// packages the accumulated buffers into a [`PrimitiveArray`] and
/// resets the builder to a fresh empty state, so one builder can
/// produce many arrays.
#[derive(Debug)]
pub struct PrimitiveBuilder<T: PrimitiveType> {
    values_builder: BufferBuilder<T::Native>,
    null_buffer_builder: NullBufferBuilder,
}

impl<T: PrimitiveType> PrimitiveBuilder<T> {
    /// Creates a new builder over `pool`.
    ///
    /// Nothing is allocated up front; the value buffer grows
    /// geometrically on demand and the validity bitmap reserves
    /// `capacity` bits when it materializes.
    pub fn new(pool: Arc<dyn MemoryPool>, capacity: usize) -> Self {
        Self {
            values_builder: BufferBuilder::new(pool.clone()),
            null_buffer_builder: NullBufferBuilder::new(pool, capacity),
        }
    }

    /// Returns the number of accumulated positions
    pub fn len(&self) -> usize {
        self.values_builder.len()
    }

    /// Returns whether nothing has been appended since the last finish
    pub fn is_empty(&self) -> bool {
        self.values_builder.is_empty()
    }

    /// Returns the value capacity of the current allocation
    pub fn capacity(&self) -> usize {
        self.values_builder.capacity()
    }

    /// Appends a valid value
    #[inline]
    pub fn append_value(&mut self, v: T::Native) -> Result<(), StelaError> {
        self.null_buffer_builder.append_non_null()?;
        self.values_builder.append(v)
    }

    /// Appends a null position; its storage is zeroed but carries no
    /// meaning
    #[inline]
    pub fn append_null(&mut self) -> Result<(), StelaError> {
        self.null_buffer_builder.append_null()?;
        self.values_builder.advance(1)
    }

    /// Appends `Some` as a valid value and `None` as a null
    #[inline]
    pub fn append_option(&mut self, v: Option<T::Native>) -> Result<(), StelaError> {
        match v {
            None => self.append_null(),
            Some(v) => self.append_value(v),
        }
    }

    /// Appends a slice of valid values
    #[inline]
    pub fn append_slice(&mut self, values: &[T::Native]) -> Result<(), StelaError> {
        self.null_buffer_builder.append_n_non_nulls(values.len())?;
        self.values_builder.append_slice(values)
    }

    /// Appends values with their validity flags; `None` validity means
    /// every value is valid, a `false` flag marks the value at that
    /// position as null.
    ///
    /// Fails with [`StelaError::Invalid`] when the lengths differ.
    pub fn append_values(
        &mut self,
        values: &[T::Native],
        validity: Option<&[bool]>,
    ) -> Result<(), StelaError> {
        let Some(validity) = validity else {
            return self.append_slice(values);
        };
        if values.len() != validity.len() {
            return Err(StelaError::Invalid(format!(
                "value and validity lengths must be equal: {} vs {}",
                values.len(),
                validity.len()
            )));
        }
        self.null_buffer_builder.append_slice(validity)?;
        self.values_builder.append_slice(values)
    }

    /// Packages the accumulated values and validity into an immutable
    /// [`PrimitiveArray`], computing the null count from the bitmap,
    /// and resets the builder to a fresh empty state
    pub fn finish(&mut self) -> PrimitiveArray<T> {
        let pool = self.values_builder.pool().clone();
        let values = std::mem::replace(&mut self.values_builder, BufferBuilder::new(pool));
        let nulls = self.null_buffer_builder.finish();
        PrimitiveArray::new_unchecked(ScalarBuffer::from(values.finish()), nulls)
    }
}
