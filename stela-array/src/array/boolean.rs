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

use stela_buffer::{BooleanBuffer, NullBuffer};
use stela_schema::{DataType, StelaError};

/// An immutable array of booleans, stored bit-packed, with an optional
/// validity mask
#[derive(Debug, Clone)]
pub struct BooleanArray {
    values: BooleanBuffer,
    nulls: Option<NullBuffer>,
}

impl BooleanArray {
    /// Creates an array from a packed value buffer and an optional
    /// validity mask.
    ///
    /// Fails with [`StelaError::Invalid`] when the mask length differs
    /// from the value count.
    pub fn try_new(
        values: BooleanBuffer,
        nulls: Option<NullBuffer>,
    ) -> Result<Self, StelaError> {
        if let Some(n) = nulls.as_ref() {
            if n.len() != values.len() {
                return Err(StelaError::Invalid(format!(
                    "null mask length {} does not match value count {}",
                    n.len(),
                    values.len()
                )));
            }
        }
        Ok(Self { values, nulls })
    }

    pub(crate) fn new_unchecked(values: BooleanBuffer, nulls: Option<NullBuffer>) -> Self {
        Self { values, nulls }
    }

    /// The logical type of this array
    pub fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    /// The number of values, null or not
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the array holds no values
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of logically null values
    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, |n| n.null_count())
    }

    /// Returns whether the value at `i` is logically null
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`
    pub fn is_null(&self, i: usize) -> bool {
        assert!(i < self.len(), "index {i} out of bounds");
        self.nulls.as_ref().is_some_and(|n| n.is_null(i))
    }

    /// Returns whether the value at `i` is valid
    pub fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }

    /// The stored bit at `i`; only meaningful when `is_valid(i)`
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`
    #[inline]
    pub fn value(&self, i: usize) -> bool {
        self.values.is_set(i)
    }

    /// The packed value bits
    pub fn values(&self) -> &BooleanBuffer {
        &self.values
    }

    /// The validity mask, absent when every value is valid
    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }
}
