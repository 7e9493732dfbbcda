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

//! Zero-sized types used to parameterize the generic array and builder
//! implementations

use half::f16;
use stela_buffer::NativeType;
use stela_schema::DataType;

mod private {
    pub trait Sealed {}
}

/// A fixed-width value kind: ties a [`DataType`] to its in-memory
/// representation.
///
/// Sealed; one marker type exists per primitive kind of the format.
pub trait PrimitiveType: private::Sealed + Send + Sync + std::fmt::Debug + 'static {
    /// The in-memory representation of a single value
    type Native: NativeType;
    /// The logical type this kind describes
    const DATA_TYPE: DataType;
}

macro_rules! make_type {
    ($name:ident, $native_ty:ty, $data_ty:expr, $doc_string:literal) => {
        #[derive(Debug, Clone)]
        #[doc = $doc_string]
        pub struct $name {}

        impl private::Sealed for $name {}

        impl PrimitiveType for $name {
            type Native = $native_ty;
            const DATA_TYPE: DataType = $data_ty;
        }
    };
}

make_type!(Int8Type, i8, DataType::Int8, "A signed 8-bit integer type.");
make_type!(Int16Type, i16, DataType::Int16, "A signed 16-bit integer type.");
make_type!(Int32Type, i32, DataType::Int32, "A signed 32-bit integer type.");
make_type!(Int64Type, i64, DataType::Int64, "A signed 64-bit integer type.");
make_type!(UInt8Type, u8, DataType::UInt8, "An unsigned 8-bit integer type.");
make_type!(UInt16Type, u16, DataType::UInt16, "An unsigned 16-bit integer type.");
make_type!(UInt32Type, u32, DataType::UInt32, "An unsigned 32-bit integer type.");
make_type!(UInt64Type, u64, DataType::UInt64, "An unsigned 64-bit integer type.");
make_type!(Float16Type, f16, DataType::Float16, "A 16-bit floating point number type.");
make_type!(Float32Type, f32, DataType::Float32, "A 32-bit floating point number type.");
make_type!(Float64Type, f64, DataType::Float64, "A 64-bit floating point number type.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_widths_match_data_types() {
        assert_eq!(
            Int32Type::DATA_TYPE.primitive_width(),
            Some(std::mem::size_of::<<Int32Type as PrimitiveType>::Native>())
        );
        assert_eq!(
            Float16Type::DATA_TYPE.primitive_width(),
            Some(std::mem::size_of::<f16>())
        );
        assert_eq!(
            UInt64Type::DATA_TYPE.primitive_width(),
            Some(std::mem::size_of::<u64>())
        );
    }
}
