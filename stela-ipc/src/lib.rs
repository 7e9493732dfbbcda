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
//! Record batch framing over random-access media.
//!
//! A batch is written as its column buffers — each 64-byte aligned —
//! followed by a fixed-layout little-endian header recording the row
//! count and every buffer's offset and length. Reading the header back
//! with the original schema reconstructs the batch; on a read-only
//! memory-mapped file the reconstructed arrays reference the mapped
//! bytes directly, with no payload copy.

mod medium;
pub use medium::{AccessMode, InMemoryMedium, MemoryMappedFile, RandomAccessMedium};

mod reader;
pub use reader::RecordBatchReader;

mod writer;
pub use writer::{record_batch_size, write_record_batch, DEFAULT_MAX_RECURSION_DEPTH};

/// Buffers and the header start on multiples of this many bytes
pub const BUFFER_ALIGNMENT: u64 = 64;

pub(crate) const HEADER_MAGIC: u32 = 0x314C_5453; // "STL1"
pub(crate) const HEADER_VERSION: u16 = 1;
/// magic + version + reserved + row count + column count
pub(crate) const HEADER_PREAMBLE_LEN: usize = 4 + 2 + 2 + 8 + 4;
/// type code + flags + reserved + null count + two (offset, length) pairs
pub(crate) const PER_COLUMN_LEN: usize = 1 + 1 + 2 + 4 + 8 + 8 + 8 + 8;
pub(crate) const FLAG_HAS_BITMAP: u8 = 1;

/// The header's per-column record
#[derive(Debug, Clone)]
pub(crate) struct ColumnMeta {
    pub type_code: u8,
    pub has_bitmap: bool,
    pub null_count: u32,
    pub bitmap_offset: u64,
    pub bitmap_len: u64,
    pub data_offset: u64,
    pub data_len: u64,
}

/// Rounds `offset` up to the next buffer alignment boundary
pub(crate) fn align(offset: u64) -> u64 {
    offset.div_ceil(BUFFER_ALIGNMENT) * BUFFER_ALIGNMENT
}
