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

use stela_schema::{SchemaRef, StelaError};

use crate::array::ArrayRef;

/// A flat, unchunked collection of equal-length arrays conforming to a
/// schema: the unit of serialization.
///
/// One array per schema field, every array as long as the batch's row
/// count. Batches are immutable containers over already-built arrays.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    schema: SchemaRef,
    row_count: usize,
    columns: Vec<ArrayRef>,
}

impl RecordBatch {
    /// Creates a batch, checking the columns against the schema.
    ///
    /// Fails with [`StelaError::Invalid`] when the column count differs
    /// from the field count, or the first offending column has a type
    /// or length that disagrees with `schema`/`row_count`.
    pub fn try_new(
        schema: SchemaRef,
        row_count: usize,
        columns: Vec<ArrayRef>,
    ) -> Result<Self, StelaError> {
        if columns.len() != schema.num_fields() {
            return Err(StelaError::Invalid(format!(
                "number of columns ({}) must match number of fields ({}) in schema",
                columns.len(),
                schema.num_fields()
            )));
        }
        for (i, (column, field)) in columns.iter().zip(schema.fields()).enumerate() {
            if column.data_type() != *field.data_type() {
                return Err(StelaError::Invalid(format!(
                    "column {i} has type {}, expected {} for field '{}'",
                    column.data_type(),
                    field.data_type(),
                    field.name()
                )));
            }
            if column.len() != row_count {
                return Err(StelaError::Invalid(format!(
                    "column {i} has length {}, expected {row_count} rows",
                    column.len()
                )));
            }
        }
        Ok(Self {
            schema,
            row_count,
            columns,
        })
    }

    /// The batch's schema
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The number of rows
    pub fn num_rows(&self) -> usize {
        self.row_count
    }

    /// The number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The column at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    pub fn column(&self, i: usize) -> &ArrayRef {
        &self.columns[i]
    }

    /// The columns in schema order
    pub fn columns(&self) -> &[ArrayRef] {
        &self.columns
    }

    /// The name of the column at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    pub fn column_name(&self, i: usize) -> &str {
        self.schema.field(i).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Float32Builder, Int32Builder};
    use std::sync::Arc;
    use stela_buffer::default_pool;
    use stela_schema::{DataType, Field, Schema};

    fn test_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("f1", DataType::Int32, false),
            Field::new("f2", DataType::Float32, true),
        ]))
    }

    fn test_columns(n: i32) -> Vec<ArrayRef> {
        let mut ints = Int32Builder::new(default_pool(), 0);
        ints.append_slice(&(0..n).collect::<Vec<_>>()).unwrap();
        let mut floats = Float32Builder::new(default_pool(), 0);
        floats
            .append_slice(&(0..n).map(|i| i as f32).collect::<Vec<_>>())
            .unwrap();
        vec![
            Arc::new(ints.finish().into()),
            Arc::new(floats.finish().into()),
        ]
    }

    #[test]
    fn test_accessors() {
        let batch = RecordBatch::try_new(test_schema(), 100, test_columns(100)).unwrap();
        assert_eq!(batch.num_rows(), 100);
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.column_name(1), "f2");
        assert_eq!(batch.column(0).len(), 100);
        assert_eq!(*batch.schema(), test_schema());
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut columns = test_columns(10);
        columns.pop();
        let err = RecordBatch::try_new(test_schema(), 10, columns).unwrap_err();
        assert!(err.to_string().contains("number of columns"));
    }

    #[test]
    fn test_type_mismatch_names_column() {
        let columns = vec![test_columns(10)[1].clone(), test_columns(10)[1].clone()];
        let err = RecordBatch::try_new(test_schema(), 10, columns).unwrap_err();
        assert!(err.to_string().contains("column 0"));
        assert!(err.to_string().contains("expected int32"));
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = RecordBatch::try_new(test_schema(), 99, test_columns(100)).unwrap_err();
        assert!(err.to_string().contains("expected 99 rows"));
    }
}
