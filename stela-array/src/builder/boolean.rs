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

use stela_buffer::{BooleanBufferBuilder, MemoryPool, NullBufferBuilder};
use stela_schema::StelaError;

use crate::array::BooleanArray;

/// Array builder for bit-packed booleans.
///
/// Mirrors [`PrimitiveBuilder`](crate::builder::PrimitiveBuilder) for
/// the one kind whose values are bits rather than whole bytes.
#[derive(Debug)]
pub struct BooleanBuilder {
    values_builder: BooleanBufferBuilder,
    null_buffer_builder: NullBufferBuilder,
}

impl BooleanBuilder {
    /// Creates a new builder over `pool`; see
    /// [`PrimitiveBuilder::new`](crate::builder::PrimitiveBuilder::new)
    /// for the meaning of `capacity`
    pub fn new(pool: Arc<dyn MemoryPool>, capacity: usize) -> Self {
        Self {
            values_builder: BooleanBufferBuilder::new(pool.clone()),
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

    /// Appends a valid value
    #[inline]
    pub fn append_value(&mut self, v: bool) -> Result<(), StelaError> {
        self.null_buffer_builder.append_non_null()?;
        self.values_builder.append(v)
    }

    /// Appends a null position
    #[inline]
    pub fn append_null(&mut self) -> Result<(), StelaError> {
        self.null_buffer_builder.append_null()?;
        self.values_builder.append(false)
    }

    /// Appends `Some` as a valid value and `None` as a null
    #[inline]
    pub fn append_option(&mut self, v: Option<bool>) -> Result<(), StelaError> {
        match v {
            None => self.append_null(),
            Some(v) => self.append_value(v),
        }
    }

    /// Appends a slice of valid values
    pub fn append_slice(&mut self, values: &[bool]) -> Result<(), StelaError> {
        self.null_buffer_builder.append_n_non_nulls(values.len())?;
        self.values_builder.append_slice(values)
    }

    /// Appends values with their validity flags; `None` validity means
    /// every value is valid
    pub fn append_values(
        &mut self,
        values: &[bool],
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

    /// Packages the accumulated bits into a [`BooleanArray`] and resets
    /// the builder to a fresh empty state
    pub fn finish(&mut self) -> BooleanArray {
        let values = self.values_builder.finish();
        let nulls = self.null_buffer_builder.finish();
        BooleanArray::new_unchecked(values, nulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stela_buffer::default_pool;

    #[test]
    fn test_append_and_finish() {
        let mut builder = BooleanBuilder::new(default_pool(), 0);
        builder.append_value(true).unwrap();
        builder.append_null().unwrap();
        builder.append_slice(&[false, true]).unwrap();

        let array = builder.finish();
        assert_eq!(array.len(), 4);
        assert_eq!(array.null_count(), 1);
        assert!(array.value(0));
        assert!(array.is_null(1));
        assert!(!array.value(2));
        assert!(array.value(3));
    }

    #[test]
    fn test_reusable_after_finish() {
        let mut builder = BooleanBuilder::new(default_pool(), 0);
        builder.append_slice(&[true, false]).unwrap();
        let first = builder.finish();

        builder.append_option(None).unwrap();
        let second = builder.finish();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second.null_count(), 1);
    }
}
