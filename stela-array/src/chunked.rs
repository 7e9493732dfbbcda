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

use stela_schema::DataType;

use crate::array::ArrayRef;

/// A logical column split across multiple non-contiguous array
/// segments, all sharing one type.
///
/// The same-type invariant is not enforced at construction — staged
/// assembly is allowed — but is checked by
/// [`Column::validate_data`](crate::Column::validate_data) once the
/// chunks are attached to a field. Totals are accumulated when the
/// chunk sequence is built, so the length and null-count accessors are
/// O(1).
#[derive(Debug, Clone)]
pub struct ChunkedArray {
    chunks: Vec<ArrayRef>,
    length: usize,
    null_count: usize,
}

impl ChunkedArray {
    /// Creates a chunked array over `chunks`
    pub fn new(chunks: Vec<ArrayRef>) -> Self {
        let length = chunks.iter().map(|c| c.len()).sum();
        let null_count = chunks.iter().map(|c| c.null_count()).sum();
        Self {
            chunks,
            length,
            null_count,
        }
    }

    /// The total number of values across all chunks
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true when no chunk holds any value
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The total number of logically null values across all chunks
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// The number of chunks
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds
    pub fn chunk(&self, i: usize) -> &ArrayRef {
        &self.chunks[i]
    }

    /// The chunks in order
    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    /// The shared type of the chunks, `None` when there are none
    pub fn data_type(&self) -> Option<DataType> {
        self.chunks.first().map(|c| c.data_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Int32Builder;
    use std::sync::Arc;
    use stela_buffer::default_pool;

    #[test]
    fn test_totals_across_chunks() {
        let mut builder = Int32Builder::new(default_pool(), 0);
        builder
            .append_values(&[1, 2, 3], Some(&[true, false, true]))
            .unwrap();
        let first: ArrayRef = Arc::new(builder.finish().into());

        builder.append_values(&[4, 5], Some(&[false, true])).unwrap();
        let second: ArrayRef = Arc::new(builder.finish().into());

        let chunked = ChunkedArray::new(vec![first, second]);
        assert_eq!(chunked.len(), 5);
        assert_eq!(chunked.null_count(), 2);
        assert_eq!(chunked.num_chunks(), 2);
        assert_eq!(chunked.data_type(), Some(DataType::Int32));
        assert_eq!(chunked.chunk(1).len(), 2);
    }

    #[test]
    fn test_empty() {
        let chunked = ChunkedArray::new(vec![]);
        assert!(chunked.is_empty());
        assert_eq!(chunked.data_type(), None);
        assert_eq!(chunked.null_count(), 0);
    }
}
