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

//! The concrete array kinds and the [`Array`] sum type over them

mod boolean;
pub use boolean::*;

mod null;
pub use null::*;

mod primitive;
pub use primitive::*;

use std::sync::Arc;

use stela_buffer::{NullBuffer, ToByteSlice};
use stela_schema::{DataType, StelaError};

use crate::types::PrimitiveType;

/// A reference-counted [`Array`], the unit shared by record batches and
/// chunked columns
pub type ArrayRef = Arc<Array>;

/// An immutable, typed, nullable column of values.
///
/// `Array` is a closed sum over the concrete array kinds; operations
/// dispatch by pattern matching, which keeps the type tag and the
/// payload shape checkable at compile time. Nested kinds (`List`,
/// `Struct`) exist as type descriptors only and have no array
/// representation here.
#[derive(Debug, Clone)]
pub enum Array {
    /// An array of type `null`
    Null(NullArray),
    /// A bit-packed boolean array
    Boolean(BooleanArray),
    /// A signed 8-bit integer array
    Int8(Int8Array),
    /// A signed 16-bit integer array
    Int16(Int16Array),
    /// A signed 32-bit integer array
    Int32(Int32Array),
    /// A signed 64-bit integer array
    Int64(Int64Array),
    /// An unsigned 8-bit integer array
    UInt8(UInt8Array),
    /// An unsigned 16-bit integer array
    UInt16(UInt16Array),
    /// An unsigned 32-bit integer array
    UInt32(UInt32Array),
    /// An unsigned 64-bit integer array
    UInt64(UInt64Array),
    /// A 16-bit floating point array
    Float16(Float16Array),
    /// A 32-bit floating point array
    Float32(Float32Array),
    /// A 64-bit floating point array
    Float64(Float64Array),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Array::Null($inner) => $body,
            Array::Boolean($inner) => $body,
            Array::Int8($inner) => $body,
            Array::Int16($inner) => $body,
            Array::Int32($inner) => $body,
            Array::Int64($inner) => $body,
            Array::UInt8($inner) => $body,
            Array::UInt16($inner) => $body,
            Array::UInt32($inner) => $body,
            Array::UInt64($inner) => $body,
            Array::Float16($inner) => $body,
            Array::Float32($inner) => $body,
            Array::Float64($inner) => $body,
        }
    };
}

macro_rules! dispatch_pairs {
    ($lhs:expr, $rhs:expr, ($a:ident, $b:ident) => $body:expr, else => $fallback:expr) => {
        match ($lhs, $rhs) {
            (Array::Null($a), Array::Null($b)) => $body,
            (Array::Boolean($a), Array::Boolean($b)) => $body,
            (Array::Int8($a), Array::Int8($b)) => $body,
            (Array::Int16($a), Array::Int16($b)) => $body,
            (Array::Int32($a), Array::Int32($b)) => $body,
            (Array::Int64($a), Array::Int64($b)) => $body,
            (Array::UInt8($a), Array::UInt8($b)) => $body,
            (Array::UInt16($a), Array::UInt16($b)) => $body,
            (Array::UInt32($a), Array::UInt32($b)) => $body,
            (Array::UInt64($a), Array::UInt64($b)) => $body,
            (Array::Float16($a), Array::Float16($b)) => $body,
            (Array::Float32($a), Array::Float32($b)) => $body,
            (Array::Float64($a), Array::Float64($b)) => $body,
            _ => $fallback,
        }
    };
}

impl Array {
    /// The logical type of this array
    pub fn data_type(&self) -> DataType {
        dispatch!(self, a => a.data_type())
    }

    /// The number of values, null or not
    pub fn len(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    /// Returns true when the array holds no values
    pub fn is_empty(&self) -> bool {
        dispatch!(self, a => a.is_empty())
    }

    /// The number of logically null values
    pub fn null_count(&self) -> usize {
        dispatch!(self, a => a.null_count())
    }

    /// Returns whether the value at `i` is logically null
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`
    pub fn is_null(&self, i: usize) -> bool {
        dispatch!(self, a => a.is_null(i))
    }

    /// Returns whether the value at `i` is valid
    pub fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }

    /// The validity mask, if this array kind carries one
    pub fn nulls(&self) -> Option<&NullBuffer> {
        dispatch!(self, a => a.validity())
    }

    /// Bitwise equality: same kind, length and null count, and
    /// byte-identical value storage (null slots included) and validity
    /// bits. No tolerance for representational differences — an absent
    /// mask and an all-valid mask are unequal here.
    pub fn equals_exact(&self, other: &Array) -> bool {
        dispatch_pairs!(self, other, (a, b) => a.bitwise_equals(b), else => false)
    }

    /// Compares the logical window `self[start..end]` against
    /// `other[other_start..other_start + (end - start)]`: every position
    /// either null in both or valid in both with equal values.
    ///
    /// Fails with [`StelaError::Invalid`] when either window is out of
    /// range.
    pub fn range_equals(
        &self,
        other: &Array,
        start: usize,
        end: usize,
        other_start: usize,
    ) -> Result<bool, StelaError> {
        if end < start {
            return Err(StelaError::Invalid(format!(
                "range start {start} exceeds range end {end}"
            )));
        }
        let len = end - start;
        if end > self.len() {
            return Err(StelaError::Invalid(format!(
                "range end {end} out of bounds for array of length {}",
                self.len()
            )));
        }
        if other_start.saturating_add(len) > other.len() {
            return Err(StelaError::Invalid(format!(
                "range [{other_start}, {}) out of bounds for array of length {}",
                other_start + len,
                other.len()
            )));
        }
        Ok(dispatch_pairs!(
            self, other,
            (a, b) => a.range_values_equal(b, start, end, other_start),
            else => false
        ))
    }
}

/// Logical equality: same kind and length, and every position either
/// null in both arrays or valid in both with equal values. Validity
/// representation does not matter beyond the positions it describes.
impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        dispatch_pairs!(self, other, (a, b) => a.logical_equals(b), else => false)
    }
}

/// The per-kind comparison hooks behind [`Array`]'s equality relations
trait ArrayOps {
    fn validity(&self) -> Option<&NullBuffer>;
    fn logical_equals(&self, other: &Self) -> bool;
    fn bitwise_equals(&self, other: &Self) -> bool;
    /// Ranges are validated by the caller
    fn range_values_equal(&self, other: &Self, start: usize, end: usize, other_start: usize)
        -> bool;
}

fn masks_bitwise_equal(a: Option<&NullBuffer>, b: Option<&NullBuffer>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.inner() == b.inner(),
        _ => false,
    }
}

impl ArrayOps for NullArray {
    fn validity(&self) -> Option<&NullBuffer> {
        None
    }

    fn logical_equals(&self, other: &Self) -> bool {
        self.len() == other.len()
    }

    fn bitwise_equals(&self, other: &Self) -> bool {
        self.len() == other.len()
    }

    fn range_values_equal(&self, _other: &Self, _start: usize, _end: usize, _os: usize) -> bool {
        // all positions null on both sides
        true
    }
}

impl ArrayOps for BooleanArray {
    fn validity(&self) -> Option<&NullBuffer> {
        self.nulls()
    }

    fn logical_equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.range_values_equal(other, 0, self.len(), 0)
    }

    fn bitwise_equals(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.null_count() == other.null_count()
            && self.values() == other.values()
            && masks_bitwise_equal(self.nulls(), other.nulls())
    }

    fn range_values_equal(&self, other: &Self, start: usize, end: usize, other_start: usize) -> bool {
        (start..end).all(|i| {
            let j = other_start + (i - start);
            match (self.is_null(i), other.is_null(j)) {
                (true, true) => true,
                (false, false) => self.value(i) == other.value(j),
                _ => false,
            }
        })
    }
}

impl<T: PrimitiveType> ArrayOps for PrimitiveArray<T> {
    fn validity(&self) -> Option<&NullBuffer> {
        self.nulls()
    }

    fn logical_equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.range_values_equal(other, 0, self.len(), 0)
    }

    fn bitwise_equals(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.null_count() == other.null_count()
            && self.values().to_byte_slice() == other.values().to_byte_slice()
            && masks_bitwise_equal(self.nulls(), other.nulls())
    }

    fn range_values_equal(&self, other: &Self, start: usize, end: usize, other_start: usize) -> bool {
        (start..end).all(|i| {
            let j = other_start + (i - start);
            match (self.is_null(i), other.is_null(j)) {
                (true, true) => true,
                (false, false) => self.value(i) == other.value(j),
                _ => false,
            }
        })
    }
}

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Array {
            fn from(array: $ty) -> Self {
                Array::$variant(array)
            }
        }
    };
}

impl_from!(Null, NullArray);
impl_from!(Boolean, BooleanArray);
impl_from!(Int8, Int8Array);
impl_from!(Int16, Int16Array);
impl_from!(Int32, Int32Array);
impl_from!(Int64, Int64Array);
impl_from!(UInt8, UInt8Array);
impl_from!(UInt16, UInt16Array);
impl_from!(UInt32, UInt32Array);
impl_from!(UInt64, UInt64Array);
impl_from!(Float16, Float16Array);
impl_from!(Float32, Float32Array);
impl_from!(Float64, Float64Array);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Float64Builder, Int32Builder};
    use stela_buffer::default_pool;

    fn int32(values: &[i32], validity: Option<&[bool]>) -> Array {
        let mut builder = Int32Builder::new(default_pool(), 0);
        builder.append_values(values, validity).unwrap();
        builder.finish().into()
    }

    #[test]
    fn test_spec_example_one_null_three() {
        let array = int32(&[1, 0, 3], Some(&[true, false, true]));
        assert_eq!(array.len(), 3);
        assert_eq!(array.null_count(), 1);
        assert!(array.is_null(1));
        match &array {
            Array::Int32(a) => {
                assert_eq!(a.value(0), 1);
                assert_eq!(a.value(2), 3);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_equality_is_reflexive() {
        let arrays = [
            int32(&[1, 2, 3], None),
            int32(&[1, 0, 3], Some(&[true, false, true])),
            Array::Null(NullArray::new(4)),
        ];
        for array in &arrays {
            assert_eq!(array, array);
            assert!(array.equals_exact(array));
        }
    }

    #[test]
    fn test_logical_vs_exact_equality() {
        // same logical content, different storage under the null slot
        let a = int32(&[1, 7, 3], Some(&[true, false, true]));
        let b = int32(&[1, 9, 3], Some(&[true, false, true]));
        assert_eq!(a, b);
        assert!(!a.equals_exact(&b));

        // absent mask vs no mask at all
        let c = int32(&[1, 2], None);
        let d = int32(&[1, 2], None);
        assert_eq!(c, d);
        assert!(c.equals_exact(&d));
    }

    #[test]
    fn test_type_mismatch_is_never_equal() {
        let a = int32(&[1, 2], None);
        let mut builder = Float64Builder::new(default_pool(), 0);
        builder.append_slice(&[1.0, 2.0]).unwrap();
        let b: Array = builder.finish().into();

        assert_ne!(a, b);
        assert!(!a.equals_exact(&b));
        assert!(!a.range_equals(&b, 0, 2, 0).unwrap());
    }

    #[test]
    fn test_range_equals() {
        let a = int32(&[0, 1, 2, 3, 4], None);
        let b = int32(&[2, 3, 4, 9], None);
        assert!(a.range_equals(&b, 2, 5, 0).unwrap());
        assert!(!a.range_equals(&b, 1, 4, 0).unwrap());

        // nullness must line up position by position
        let c = int32(&[9, 1, 0, 3], Some(&[true, true, false, true]));
        let d = int32(&[1, 0, 3], Some(&[true, false, true]));
        assert!(c.range_equals(&d, 1, 4, 0).unwrap());
        assert!(!c.range_equals(&d, 0, 3, 0).unwrap());
    }

    #[test]
    fn test_range_equals_out_of_bounds() {
        let a = int32(&[1, 2, 3], None);
        let b = int32(&[1, 2, 3], None);
        assert!(a.range_equals(&b, 1, 4, 0).is_err());
        assert!(a.range_equals(&b, 0, 2, 2).is_err());
        assert!(a.range_equals(&b, 2, 1, 0).is_err());
    }

    #[test]
    fn test_null_arrays_compare_by_length() {
        let a = Array::Null(NullArray::new(3));
        let b = Array::Null(NullArray::new(3));
        let c = Array::Null(NullArray::new(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.range_equals(&c, 0, 3, 1).unwrap());
    }
}
