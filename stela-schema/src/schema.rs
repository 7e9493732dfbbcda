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
use std::sync::Arc;

use crate::error::StelaError;
use crate::field::Field;

/// A reference-counted [`Schema`], shared by tables and record batches
pub type SchemaRef = Arc<Schema>;

/// An ordered sequence of [`Field`]s describing the columns of a table
/// or record batch.
///
/// Field order is semantically significant: it defines column position.
/// Two schemas are equal iff they hold pairwise-equal fields in the same
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates an empty schema
    pub fn empty() -> Self {
        Self { fields: vec![] }
    }

    /// Creates a new [`Schema`] from a sequence of [`Field`] values
    ///
    /// ```
    /// # use stela_schema::{DataType, Field, Schema};
    /// let schema = Schema::new(vec![
    ///     Field::new("a", DataType::Int64, false),
    ///     Field::new("b", DataType::Boolean, true),
    /// ]);
    /// assert_eq!(schema.num_fields(), 2);
    /// ```
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Returns the fields in positional order
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    pub fn field(&self, i: usize) -> &Field {
        &self.fields[i]
    }

    /// Returns the number of fields
    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns the position of the field named `name`, or a
    /// [`StelaError::KeyError`] if no such field exists
    pub fn index_of(&self, name: &str) -> Result<usize, StelaError> {
        self.fields
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| {
                StelaError::KeyError(format!("no field named '{name}' in schema"))
            })
    }

    /// Returns the field named `name`, if any
    pub fn field_with_name(&self, name: &str) -> Result<&Field, StelaError> {
        Ok(self.field(self.index_of(name)?))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    fn test_schema() -> Schema {
        Schema::new(vec![
            Field::new("f1", DataType::Int32, false),
            Field::new("f2", DataType::Float32, false),
            Field::new("f3", DataType::UInt64, true),
        ])
    }

    #[test]
    fn test_equality() {
        assert_eq!(test_schema(), test_schema());

        let reordered = Schema::new(vec![
            Field::new("f2", DataType::Float32, false),
            Field::new("f1", DataType::Int32, false),
            Field::new("f3", DataType::UInt64, true),
        ]);
        assert_ne!(test_schema(), reordered);

        let truncated = Schema::new(test_schema().fields()[..2].to_vec());
        assert_ne!(test_schema(), truncated);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            test_schema().to_string(),
            "f1: int32 not null\nf2: float not null\nf3: uint64"
        );
    }

    #[test]
    fn test_index_of() {
        let schema = test_schema();
        assert_eq!(schema.index_of("f2").unwrap(), 1);
        assert_eq!(schema.field_with_name("f3").unwrap().name(), "f3");

        let err = schema.index_of("nope").unwrap_err();
        assert!(matches!(err, StelaError::KeyError(_)));
    }
}
