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

use half::f16;

mod private {
    pub trait Sealed {}
}

/// A fixed-width scalar value that can be stored directly in a buffer.
///
/// The trait is sealed: only the kinds the format defines implement it,
/// which is what makes the raw byte views over typed slices sound.
pub trait NativeType:
    private::Sealed + Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
}

macro_rules! native_type {
    ($t:ty) => {
        impl private::Sealed for $t {}
        impl NativeType for $t {}
    };
}

native_type!(i8);
native_type!(i16);
native_type!(i32);
native_type!(i64);
native_type!(u8);
native_type!(u16);
native_type!(u32);
native_type!(u64);
native_type!(f16);
native_type!(f32);
native_type!(f64);

/// A value, or slice of values, viewable as raw little-endian bytes
pub trait ToByteSlice {
    /// Returns the value's memory as a byte slice
    fn to_byte_slice(&self) -> &[u8];
}

impl<T: NativeType> ToByteSlice for [T] {
    #[inline]
    fn to_byte_slice(&self) -> &[u8] {
        // Safety: NativeType is sealed to plain-old-data kinds
        unsafe {
            std::slice::from_raw_parts(self.as_ptr() as *const u8, std::mem::size_of_val(self))
        }
    }
}

impl<T: NativeType> ToByteSlice for T {
    #[inline]
    fn to_byte_slice(&self) -> &[u8] {
        // Safety: NativeType is sealed to plain-old-data kinds
        unsafe {
            std::slice::from_raw_parts(self as *const T as *const u8, std::mem::size_of::<T>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_byte_slice() {
        let v = 0x0102_0304u32;
        assert_eq!(v.to_byte_slice(), &[4, 3, 2, 1]);

        let values = [1u16, 256];
        assert_eq!(values.to_byte_slice(), &[1, 0, 0, 1]);
    }
}
