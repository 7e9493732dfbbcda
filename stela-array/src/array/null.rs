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

/// An array of type `null`: no backing storage, every slot implicitly
/// null
#[derive(Debug, Clone)]
pub struct NullArray {
    len: usize,
}

impl NullArray {
    /// Creates a new [`NullArray`] of the specified length
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// The logical type of this array
    pub fn data_type(&self) -> DataType {
        DataType::Null
    }

    /// The number of slots
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the array holds no slots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every slot is null, so this equals the length
    pub fn null_count(&self) -> usize {
        self.len
    }

    /// Always true for in-bounds indices
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`
    pub fn is_null(&self, i: usize) -> bool {
        assert!(i < self.len, "index {i} out of bounds");
        true
    }

    /// Always false for in-bounds indices
    pub fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }
}
