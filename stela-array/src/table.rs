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

use crate::column::Column;

/// A named collection of columns conforming to a schema.
///
/// Like [`Column`], construction never validates, so a table can be
/// assembled in stages; [`validate_columns`](Self::validate_columns)
/// is the explicit integrity check.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: SchemaRef,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table from a name, schema and columns
    pub fn new(name: impl Into<String>, schema: SchemaRef, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            schema,
            columns,
        }
    }

    /// The table's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's schema
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of rows, taken from the first column
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    /// The column at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    pub fn column(&self, i: usize) -> &Column {
        &self.columns[i]
    }

    /// The columns in schema order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Checks the columns against the schema: one column per field,
    /// pairwise-equal fields in order, and a uniform row count.
    ///
    /// Pure read-only check: returns `Ok` or an
    /// [`StelaError::Invalid`] describing the first offending column;
    /// never mutates the table.
    pub fn validate_columns(&self) -> Result<(), StelaError> {
        if self.columns.len() != self.schema.num_fields() {
            return Err(StelaError::Invalid(format!(
                "table '{}' has {} columns but its schema has {} fields",
                self.name,
                self.columns.len(),
                self.schema.num_fields()
            )));
        }
        for (i, (column, field)) in
            self.columns.iter().zip(self.schema.fields()).enumerate()
        {
            if column.field() != field {
                return Err(StelaError::Invalid(format!(
                    "table '{}': column {i} has field '{}', expected '{field}'",
                    self.name,
                    column.field()
                )));
            }
        }
        let num_rows = self.num_rows();
        for (i, column) in self.columns.iter().enumerate() {
            if column.len() != num_rows {
                return Err(StelaError::Invalid(format!(
                    "table '{}': column {i} has {} rows, expected {num_rows}",
                    self.name,
                    column.len()
                )));
            }
        }
        Ok(())
    }
}
