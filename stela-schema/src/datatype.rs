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

use std::fmt;

use crate::{Field, StelaError};

/// The logical types supported by the stela format.
///
/// Primitive variants describe fixed-width values stored contiguously;
/// `Binary`/`Utf8` describe variable-width values; `List` and `Struct`
/// are parametric over their children. Values of this enum are immutable
/// and are typically shared behind an `Arc` once embedded in a
/// [`Field`].
///
/// Two types are equal iff they carry the same tag and, for parametric
/// kinds, recursively equal children.
///
/// ```
/// # use stela_schema::DataType;
/// let a = DataType::List(Box::new(DataType::Int32));
/// let b = DataType::List(Box::new(DataType::Int32));
/// assert_eq!(a, b);
/// assert_ne!(a, DataType::List(Box::new(DataType::Int64)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A degenerate type with no physical storage; every slot is null
    Null,
    /// A boolean value, stored bit-packed
    Boolean,
    /// A signed 8-bit integer
    Int8,
    /// A signed 16-bit integer
    Int16,
    /// A signed 32-bit integer
    Int32,
    /// A signed 64-bit integer
    Int64,
    /// An unsigned 8-bit integer
    UInt8,
    /// An unsigned 16-bit integer
    UInt16,
    /// An unsigned 32-bit integer
    UInt32,
    /// An unsigned 64-bit integer
    UInt64,
    /// A 16-bit floating point number
    Float16,
    /// A 32-bit floating point number
    Float32,
    /// A 64-bit floating point number
    Float64,
    /// Variable-length bytes with no guarantee of UTF8-ness
    Binary,
    /// A variable-length UTF8 string
    Utf8,
    /// A list of values of a single element type
    List(Box<DataType>),
    /// An ordered sequence of named, typed children
    Struct(Vec<Field>),
}

/// Stable tag codes for [`DataType`] variants, used as wire codes by the
/// IPC framing and as the argument of [`DataType::from_primitive_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TypeId {
    Null = 0,
    Boolean = 1,
    UInt8 = 2,
    Int8 = 3,
    UInt16 = 4,
    Int16 = 5,
    UInt32 = 6,
    Int32 = 7,
    UInt64 = 8,
    Int64 = 9,
    Float16 = 10,
    Float32 = 11,
    Float64 = 12,
    Binary = 15,
    Utf8 = 16,
    List = 30,
    Struct = 31,
}

impl TypeId {
    /// Recovers a tag from its wire code
    pub fn from_code(code: u8) -> Result<TypeId, StelaError> {
        Ok(match code {
            0 => TypeId::Null,
            1 => TypeId::Boolean,
            2 => TypeId::UInt8,
            3 => TypeId::Int8,
            4 => TypeId::UInt16,
            5 => TypeId::Int16,
            6 => TypeId::UInt32,
            7 => TypeId::Int32,
            8 => TypeId::UInt64,
            9 => TypeId::Int64,
            10 => TypeId::Float16,
            11 => TypeId::Float32,
            12 => TypeId::Float64,
            15 => TypeId::Binary,
            16 => TypeId::Utf8,
            30 => TypeId::List,
            31 => TypeId::Struct,
            other => {
                return Err(StelaError::Invalid(format!(
                    "unknown type code: {other}"
                )))
            }
        })
    }
}

impl DataType {
    /// Returns the tag code of this type
    pub fn id(&self) -> TypeId {
        match self {
            DataType::Null => TypeId::Null,
            DataType::Boolean => TypeId::Boolean,
            DataType::Int8 => TypeId::Int8,
            DataType::Int16 => TypeId::Int16,
            DataType::Int32 => TypeId::Int32,
            DataType::Int64 => TypeId::Int64,
            DataType::UInt8 => TypeId::UInt8,
            DataType::UInt16 => TypeId::UInt16,
            DataType::UInt32 => TypeId::UInt32,
            DataType::UInt64 => TypeId::UInt64,
            DataType::Float16 => TypeId::Float16,
            DataType::Float32 => TypeId::Float32,
            DataType::Float64 => TypeId::Float64,
            DataType::Binary => TypeId::Binary,
            DataType::Utf8 => TypeId::Utf8,
            DataType::List(_) => TypeId::List,
            DataType::Struct(_) => TypeId::Struct,
        }
    }

    /// Constructs a primitive type from its tag.
    ///
    /// Composite and variable-width tags have dedicated constructors
    /// (`List`, `Struct`, `Binary`, `Utf8`) and are rejected here with
    /// [`StelaError::NotImplemented`].
    pub fn from_primitive_id(id: TypeId) -> Result<DataType, StelaError> {
        Ok(match id {
            TypeId::Null => DataType::Null,
            TypeId::Boolean => DataType::Boolean,
            TypeId::Int8 => DataType::Int8,
            TypeId::Int16 => DataType::Int16,
            TypeId::Int32 => DataType::Int32,
            TypeId::Int64 => DataType::Int64,
            TypeId::UInt8 => DataType::UInt8,
            TypeId::UInt16 => DataType::UInt16,
            TypeId::UInt32 => DataType::UInt32,
            TypeId::UInt64 => DataType::UInt64,
            TypeId::Float16 => DataType::Float16,
            TypeId::Float32 => DataType::Float32,
            TypeId::Float64 => DataType::Float64,
            other => {
                return Err(StelaError::NotImplemented(format!(
                    "{other:?} is not a primitive type tag"
                )))
            }
        })
    }

    /// Returns true for fixed-width scalar kinds, including `Null` and
    /// the bit-packed `Boolean`
    pub fn is_primitive(&self) -> bool {
        use DataType::*;
        matches!(
            self,
            Null | Boolean
                | Int8
                | Int16
                | Int32
                | Int64
                | UInt8
                | UInt16
                | UInt32
                | UInt64
                | Float16
                | Float32
                | Float64
        )
    }

    /// Returns true for types parameterized by child types
    pub fn is_nested(&self) -> bool {
        matches!(self, DataType::List(_) | DataType::Struct(_))
    }

    /// Returns the number of bytes a single value of this type occupies,
    /// or `None` for variable-width and nested kinds.
    ///
    /// `Boolean` values are bit-packed and carry no whole-byte width;
    /// `Null` values occupy no storage at all.
    pub fn primitive_width(&self) -> Option<usize> {
        match self {
            DataType::Null => Some(0),
            DataType::Int8 | DataType::UInt8 => Some(1),
            DataType::Int16 | DataType::UInt16 | DataType::Float16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => Some(4),
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "null"),
            DataType::Boolean => write!(f, "bool"),
            DataType::Int8 => write!(f, "int8"),
            DataType::Int16 => write!(f, "int16"),
            DataType::Int32 => write!(f, "int32"),
            DataType::Int64 => write!(f, "int64"),
            DataType::UInt8 => write!(f, "uint8"),
            DataType::UInt16 => write!(f, "uint16"),
            DataType::UInt32 => write!(f, "uint32"),
            DataType::UInt64 => write!(f, "uint64"),
            DataType::Float16 => write!(f, "halffloat"),
            DataType::Float32 => write!(f, "float"),
            DataType::Float64 => write!(f, "double"),
            DataType::Binary => write!(f, "binary"),
            DataType::Utf8 => write!(f, "string"),
            DataType::List(elem) => write!(f, "list<{elem}>"),
            DataType::Struct(fields) => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name(), field.data_type())?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(DataType::Int32, DataType::Int32);
        assert_ne!(DataType::Int32, DataType::Int64);
        assert_eq!(
            DataType::List(Box::new(DataType::Int32)),
            DataType::List(Box::new(DataType::Int32))
        );
        assert_ne!(
            DataType::List(Box::new(DataType::Int32)),
            DataType::List(Box::new(DataType::Int64))
        );
    }

    #[test]
    fn test_from_primitive_id() {
        let dt = DataType::from_primitive_id(TypeId::Int32).unwrap();
        assert_eq!(dt, DataType::Int32);

        let err = DataType::from_primitive_id(TypeId::List).unwrap_err();
        assert!(matches!(err, StelaError::NotImplemented(_)));
        let err = DataType::from_primitive_id(TypeId::Utf8).unwrap_err();
        assert!(matches!(err, StelaError::NotImplemented(_)));
    }

    #[test]
    fn test_primitive_width() {
        assert_eq!(DataType::Int32.primitive_width(), Some(4));
        assert_eq!(DataType::Float64.primitive_width(), Some(8));
        assert_eq!(DataType::Null.primitive_width(), Some(0));
        assert_eq!(DataType::Boolean.primitive_width(), None);
        assert_eq!(DataType::Utf8.primitive_width(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Int32.to_string(), "int32");
        assert_eq!(DataType::Float32.to_string(), "float");
        assert_eq!(DataType::Float64.to_string(), "double");
        assert_eq!(
            DataType::List(Box::new(DataType::Utf8)).to_string(),
            "list<string>"
        );

        let fields = vec![
            Field::new("f0", DataType::Int32, false),
            Field::new("f1", DataType::Float64, true),
        ];
        assert_eq!(
            DataType::Struct(fields).to_string(),
            "struct<f0: int32, f1: double>"
        );
    }

    #[test]
    fn test_type_id_round_trip() {
        for dt in [
            DataType::Null,
            DataType::Boolean,
            DataType::UInt64,
            DataType::Float16,
            DataType::Binary,
            DataType::List(Box::new(DataType::Int8)),
        ] {
            let id = dt.id();
            assert_eq!(TypeId::from_code(id as u8).unwrap(), id);
        }
        assert!(TypeId::from_code(200).is_err());
    }
}
