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

use stela_buffer::{NullBuffer, ScalarBuffer};
use stela_schema::{DataType, StelaError};

use crate::types::*;

/// An array of signed 8-bit integers
pub type Int8Array = PrimitiveArray<Int8Type>;
/// An array of signed 16-bit integers
pub type Int16Array = PrimitiveArray<Int16Type>;
/// An array of signed 32-bit integers
pub type Int32Array = PrimitiveArray<Int32Type>;
/// An array of signed 64-bit integers
pub type Int64Array = PrimitiveArray<Int64Type>;
/// An array of unsigned 8-bit integers
pub type UInt8Array = PrimitiveArray<UInt8Type>;
/// An array of unsigned 16-bit integers
pub type UInt16Array = PrimitiveArray<UInt16Type>;
/// An array of unsigned 32-bit integers
pub type UInt32Array = PrimitiveArray<UInt32Type>;
/// An array of unsigned 64-bit integers
pub type UInt64Array = PrimitiveArray<UInt64Type>;
/// An array of 16-bit floating point numbers
pub type Float16Array = PrimitiveArray<Float16Type>;
/// An array of 32-bit floating point numbers
pub type Float32Array = PrimitiveArray<Float32Type>;
/// An array of 64-bit floating point numbers
pub type Float64Array = PrimitiveArray<Float64Type>;

/// An immutable array of fixed-width values with an optional validity
/// mask.
///
/// Exactly one data buffer holds `len` values of the native type; a
/// `0` bit in the mask marks the value at that position as logically
/// null. The storage under a null slot is preserved but meaningless —
/// the format does not guarantee it is zeroed.
#[derive(Debug, Clone)]
pub struct PrimitiveArray<T: PrimitiveType> {
    values: ScalarBuffer<T::Native>,
    nulls: Option<NullBuffer>,
}

impl<T: PrimitiveType> PrimitiveArray<T> {
    /// Creates an array from a value buffer and an optional validity
    /// mask.
    ///
    /// Fails with [`StelaError::Invalid`] when the mask length differs
    /// from the value count.
    pub fn try_new(
        values: ScalarBuffer<T::Native>,
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

    pub(crate) fn new_unchecked(
        values: ScalarBuffer<T::Native>,
        nulls: Option<NullBuffer>,
    ) -> Self {
        Self { values, nulls }
    }

    /// The logical type of this array
    pub fn data_type(&self) -> DataType {
        T::DATA_TYPE
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

    /// The stored value at `i`; only meaningful when `is_valid(i)`
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`
    #[inline]
    pub fn value(&self, i: usize) -> T::Native {
        self.values[i]
    }

    /// The stored values, including the storage under null slots
    #[inline]
    pub fn values(&self) -> &[T::Native] {
        &self.values
    }

    /// The value buffer
    pub fn values_buffer(&self) -> &ScalarBuffer<T::Native> {
        &self.values
    }

    /// The validity mask, absent when every value is valid
    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stela_buffer::{default_pool, BooleanBuffer, Buffer};

    fn array(values: &[i32], validity: Option<&[bool]>) -> Int32Array {
        let buffer = Buffer::from_slice_ref(values).unwrap();
        let nulls = validity.map(|flags| {
            let mut builder = stela_buffer::BooleanBufferBuilder::new(default_pool());
            builder.append_slice(flags).unwrap();
            NullBuffer::new(builder.finish())
        });
        Int32Array::try_new(buffer.into(), nulls).unwrap()
    }

    #[test]
    fn test_values_and_nulls() {
        let a = array(&[1, 0, 3], Some(&[true, false, true]));
        assert_eq!(a.len(), 3);
        assert_eq!(a.null_count(), 1);
        assert!(a.is_null(1));
        assert!(a.is_valid(0));
        assert_eq!(a.value(0), 1);
        assert_eq!(a.value(2), 3);
        assert_eq!(a.data_type(), DataType::Int32);
    }

    #[test]
    fn test_no_mask_means_all_valid() {
        let a = array(&[5, 6], None);
        assert_eq!(a.null_count(), 0);
        assert!(a.is_valid(0) && a.is_valid(1));
        assert!(a.nulls().is_none());
    }

    #[test]
    fn test_mask_length_mismatch() {
        let buffer = Buffer::from_slice_ref(&[1i32, 2, 3]).unwrap();
        let mask = NullBuffer::new(BooleanBuffer::new(
            Buffer::from_slice_ref(&[0xffu8]).unwrap(),
            0,
            5,
        ));
        let err = Int32Array::try_new(buffer.into(), Some(mask)).unwrap_err();
        assert!(matches!(err, StelaError::Invalid(_)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_is_null_out_of_bounds() {
        array(&[1], None).is_null(1);
    }
}
