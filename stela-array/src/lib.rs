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

#![warn(missing_docs)]
//! Typed, nullable arrays for the stela columnar format, their
//! builders, and the containers that assemble them into columns,
//! tables and record batches.
//!
//! ```
//! # use stela_array::builder::Int32Builder;
//! # use stela_buffer::default_pool;
//! let mut builder = Int32Builder::new(default_pool(), 0);
//! builder.append_values(&[1, 0, 3], Some(&[true, false, true])).unwrap();
//! let array = builder.finish();
//!
//! assert_eq!(array.len(), 3);
//! assert_eq!(array.null_count(), 1);
//! assert!(array.is_null(1));
//! assert_eq!(array.value(0), 1);
//! assert_eq!(array.value(2), 3);
//! ```

pub mod array;
pub use array::*;

pub mod builder;

mod chunked;
pub use chunked::ChunkedArray;

mod column;
pub use column::Column;

mod record_batch;
pub use record_batch::RecordBatch;

mod table;
pub use table::Table;

pub mod types;
