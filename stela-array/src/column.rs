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

use stela_schema::{DataType, Field, StelaError};

use crate::array::ArrayRef;
use crate::chunked::ChunkedArray;

/// A named, typed column: a [`Field`] paired with chunked data.
///
/// Construction never validates — a column may transiently disagree
/// with its field during staged building.
/// [`validate_data`](Self::validate_data) is the explicit, read-only
/// integrity check.
#[derive(Debug, Clone)]
pub struct Column {
    field: Field,
    data: Arc<ChunkedArray>,
}

impl Column {
    /// Creates a column from a field and chunked data
    pub fn new(field: Field, data: ChunkedArray) -> Self {
        Self {
            field,
            data: Arc::new(data),
        }
    }

    /// Creates a single-chunk column from one array
    pub fn from_array(field: Field, array: ArrayRef) -> Self {
        Self::new(field, ChunkedArray::new(vec![array]))
    }

    /// The column's field
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The column's name
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// The column's declared type
    pub fn data_type(&self) -> &DataType {
        self.field.data_type()
    }

    /// The chunked data
    pub fn data(&self) -> &Arc<ChunkedArray> {
        &self.data
    }

    /// The total number of values across the chunks
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when the column holds no values
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The total number of logically null values
    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    /// Checks that every chunk's type equals the field's type.
    ///
    /// Pure read-only check: returns `Ok` or an
    /// [`StelaError::Invalid`] describing the first mismatching chunk;
    /// never mutates the column.
    pub fn validate_data(&self) -> Result<(), StelaError> {
        for (i, chunk) in self.data.chunks().iter().enumerate() {
            let chunk_type = chunk.data_type();
            if chunk_type != *self.field.data_type() {
                return Err(StelaError::Invalid(format!(
                    "column '{}': chunk {i} has type {chunk_type}, expected {}",
                    self.field.name(),
                    self.field.data_type()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Float32Builder, Int32Builder};
    use stela_buffer::default_pool;

    fn float_chunk(n: usize) -> ArrayRef {
        let mut builder = Float32Builder::new(default_pool(), 0);
        builder
            .append_slice(&(0..n).map(|i| i as f32).collect::<Vec<_>>())
            .unwrap();
        Arc::new(builder.finish().into())
    }

    #[test]
    fn test_valid_column() {
        let field = Field::new("f1", DataType::Float32, false);
        let column = Column::from_array(field, float_chunk(32));

        assert_eq!(column.len(), 32);
        assert_eq!(column.null_count(), 0);
        assert_eq!(column.data_type(), &DataType::Float32);
        assert_eq!(column.name(), "f1");
        column.validate_data().unwrap();
    }

    #[test]
    fn test_validation_cites_first_bad_chunk() {
        let mut ints = Int32Builder::new(default_pool(), 0);
        ints.append_slice(&[1, 2]).unwrap();
        let bad_chunk: ArrayRef = Arc::new(ints.finish().into());

        let field = Field::new("f1", DataType::Float32, false);
        let column = Column::new(
            field,
            ChunkedArray::new(vec![float_chunk(2), bad_chunk]),
        );

        // construction succeeded; the explicit check reports the defect
        let err = column.validate_data().unwrap_err();
        assert!(err.to_string().contains("chunk 1"));
        assert!(err.to_string().contains("int32"));
    }
}
