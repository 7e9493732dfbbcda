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
use std::hash::{Hash, Hasher};

use crate::datatype::DataType;

/// Describes a single column in a [`Schema`](crate::Schema): a name, a
/// [`DataType`] and a nullability flag.
///
/// Fields are immutable once constructed and compare structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    data_type: DataType,
    nullable: bool,
}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.data_type.hash(state);
        self.nullable.hash(state);
    }
}

impl Field {
    /// Creates a new field
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Field {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Returns the field's name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's [`DataType`]
    #[inline]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Indicates whether this field's values may be null
    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " not null")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality() {
        let f1 = Field::new("f1", DataType::Int32, false);
        let f2 = Field::new("f1", DataType::Int32, false);
        assert_eq!(f1, f2);

        assert_ne!(f1, Field::new("f2", DataType::Int32, false));
        assert_ne!(f1, Field::new("f1", DataType::Int64, false));
        assert_ne!(f1, Field::new("f1", DataType::Int32, true));
    }

    #[test]
    fn test_display() {
        let f1 = Field::new("f1", DataType::Int32, false);
        assert_eq!(f1.to_string(), "f1: int32 not null");

        let f3 = Field::new("f3", DataType::UInt64, true);
        assert_eq!(f3.to_string(), "f3: uint64");
    }
}
