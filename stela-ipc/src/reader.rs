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

//! Reads record batches back from a [`RandomAccessMedium`]

use std::sync::Arc;

use tracing::debug;

use stela_array::types::*;
use stela_array::{Array, ArrayRef, BooleanArray, NullArray, PrimitiveArray, RecordBatch};
use stela_buffer::{BooleanBuffer, Buffer, NullBuffer, ScalarBuffer};
use stela_schema::{SchemaRef, StelaError, TypeId};

use crate::medium::RandomAccessMedium;
use crate::{ColumnMeta, FLAG_HAS_BITMAP, HEADER_MAGIC, HEADER_PREAMBLE_LEN, HEADER_VERSION, PER_COLUMN_LEN};

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes(bytes[at..at + 2].try_into().unwrap())
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    u64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
}

/// Reads and validates the header of a batch previously written with
/// [`write_record_batch`](crate::write_record_batch), then materializes
/// arrays over the recorded buffer regions.
///
/// The reader borrows its source; the buffers of a materialized batch
/// do not, so a batch outlives both the reader and a later
/// [`close`](RandomAccessMedium::close) of the source handle.
#[derive(Debug)]
pub struct RecordBatchReader<'a, M: RandomAccessMedium + ?Sized> {
    source: &'a M,
    num_rows: u64,
    columns: Vec<ColumnMeta>,
}

impl<'a, M: RandomAccessMedium + ?Sized> RecordBatchReader<'a, M> {
    /// Parses the batch header at `position`.
    ///
    /// Fails with [`StelaError::IoError`] when the medium rejects the
    /// read and [`StelaError::Invalid`] when the header is malformed,
    /// truncated, or records buffers beyond the end of the medium.
    pub fn open(source: &'a M, position: u64) -> Result<Self, StelaError> {
        let size = source.size();
        if position.saturating_add(HEADER_PREAMBLE_LEN as u64) > size {
            return Err(StelaError::Invalid(format!(
                "header at {position} is truncated: medium holds {size} bytes"
            )));
        }
        let preamble = source.read_at(position, HEADER_PREAMBLE_LEN)?;
        let preamble = preamble.as_slice();

        let magic = read_u32(preamble, 0);
        if magic != HEADER_MAGIC {
            return Err(StelaError::Invalid(format!(
                "bad header magic at {position}: {magic:#010x}"
            )));
        }
        let version = read_u16(preamble, 4);
        if version != HEADER_VERSION {
            return Err(StelaError::Invalid(format!(
                "unsupported header version {version}"
            )));
        }
        let num_rows = read_u64(preamble, 8);
        let num_columns = read_u32(preamble, 16) as usize;

        let entries_len = PER_COLUMN_LEN * num_columns;
        if position.saturating_add((HEADER_PREAMBLE_LEN + entries_len) as u64) > size {
            return Err(StelaError::Invalid(format!(
                "header records {num_columns} columns but is truncated"
            )));
        }
        let entries = source.read_at(position + HEADER_PREAMBLE_LEN as u64, entries_len)?;
        let entries = entries.as_slice();

        let mut columns = Vec::with_capacity(num_columns);
        for i in 0..num_columns {
            let at = i * PER_COLUMN_LEN;
            let meta = ColumnMeta {
                type_code: entries[at],
                has_bitmap: entries[at + 1] & FLAG_HAS_BITMAP != 0,
                null_count: read_u32(entries, at + 4),
                bitmap_offset: read_u64(entries, at + 8),
                bitmap_len: read_u64(entries, at + 16),
                data_offset: read_u64(entries, at + 24),
                data_len: read_u64(entries, at + 32),
            };
            if meta.has_bitmap && meta.bitmap_offset.saturating_add(meta.bitmap_len) > size {
                return Err(StelaError::Invalid(format!(
                    "column {i}: validity bitmap extends past the end of the medium"
                )));
            }
            if meta.data_offset.saturating_add(meta.data_len) > size {
                return Err(StelaError::Invalid(format!(
                    "column {i}: data buffer extends past the end of the medium"
                )));
            }
            columns.push(meta);
        }

        debug!(position, num_rows, num_columns, "parsed record batch header");
        Ok(Self {
            source,
            num_rows,
            columns,
        })
    }

    /// The row count recorded in the header
    pub fn num_rows(&self) -> u64 {
        self.num_rows
    }

    /// The column count recorded in the header
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Validates the header against the caller's expected `schema` and
    /// reconstructs the batch.
    ///
    /// Column buffers reference the source's bytes at the recorded
    /// offsets — no payload copy on media that share their storage.
    /// Fails with [`StelaError::Invalid`] when the schema disagrees
    /// with the header (column count, per-column type code, or a
    /// null count that does not match the bitmap).
    pub fn get_record_batch(&self, schema: &SchemaRef) -> Result<RecordBatch, StelaError> {
        if schema.num_fields() != self.columns.len() {
            return Err(StelaError::Invalid(format!(
                "schema has {} fields but the header records {} columns",
                schema.num_fields(),
                self.columns.len()
            )));
        }

        let num_rows = self.num_rows as usize;
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len());
        for (i, (meta, field)) in self.columns.iter().zip(schema.fields()).enumerate() {
            let type_id = TypeId::from_code(meta.type_code)?;
            if field.data_type().id() != type_id {
                return Err(StelaError::Invalid(format!(
                    "column {i}: header records {type_id:?} but field '{}' expects {}",
                    field.name(),
                    field.data_type()
                )));
            }

            let nulls = self.read_nulls(i, meta, num_rows)?;
            let array: Array = match type_id {
                TypeId::Null => NullArray::new(num_rows).into(),
                TypeId::Boolean => {
                    let values = self.read_bits(meta.data_offset, meta.data_len, num_rows, i)?;
                    BooleanArray::try_new(values, nulls)?.into()
                }
                TypeId::Int8 => self.read_primitive::<Int8Type>(meta, nulls, num_rows, i)?.into(),
                TypeId::Int16 => self.read_primitive::<Int16Type>(meta, nulls, num_rows, i)?.into(),
                TypeId::Int32 => self.read_primitive::<Int32Type>(meta, nulls, num_rows, i)?.into(),
                TypeId::Int64 => self.read_primitive::<Int64Type>(meta, nulls, num_rows, i)?.into(),
                TypeId::UInt8 => self.read_primitive::<UInt8Type>(meta, nulls, num_rows, i)?.into(),
                TypeId::UInt16 => {
                    self.read_primitive::<UInt16Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::UInt32 => {
                    self.read_primitive::<UInt32Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::UInt64 => {
                    self.read_primitive::<UInt64Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::Float16 => {
                    self.read_primitive::<Float16Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::Float32 => {
                    self.read_primitive::<Float32Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::Float64 => {
                    self.read_primitive::<Float64Type>(meta, nulls, num_rows, i)?.into()
                }
                TypeId::Binary | TypeId::Utf8 | TypeId::List | TypeId::Struct => {
                    return Err(StelaError::NotImplemented(format!(
                        "no wire decoding for columns of type {}",
                        field.data_type()
                    )))
                }
            };
            arrays.push(Arc::new(array));
        }

        RecordBatch::try_new(schema.clone(), num_rows, arrays)
    }

    /// Reads a bit-packed buffer of `len` bits
    fn read_bits(
        &self,
        offset: u64,
        byte_len: u64,
        len: usize,
        column: usize,
    ) -> Result<BooleanBuffer, StelaError> {
        let expected = len.div_ceil(8) as u64;
        if byte_len != expected {
            return Err(StelaError::Invalid(format!(
                "column {column}: bit buffer holds {byte_len} bytes, expected {expected} for {len} values"
            )));
        }
        let buffer = self.source.read_at(offset, byte_len as usize)?;
        Ok(BooleanBuffer::new(buffer, 0, len))
    }

    fn read_nulls(
        &self,
        column: usize,
        meta: &ColumnMeta,
        num_rows: usize,
    ) -> Result<Option<NullBuffer>, StelaError> {
        if !meta.has_bitmap {
            return Ok(None);
        }
        let bits = self.read_bits(meta.bitmap_offset, meta.bitmap_len, num_rows, column)?;
        let nulls = NullBuffer::new(bits);
        if nulls.null_count() != meta.null_count as usize {
            return Err(StelaError::Invalid(format!(
                "column {column}: header records {} nulls but the bitmap holds {}",
                meta.null_count,
                nulls.null_count()
            )));
        }
        Ok(Some(nulls))
    }

    fn read_primitive<T: PrimitiveType>(
        &self,
        meta: &ColumnMeta,
        nulls: Option<NullBuffer>,
        num_rows: usize,
        column: usize,
    ) -> Result<PrimitiveArray<T>, StelaError> {
        let width = std::mem::size_of::<T::Native>();
        let expected = (num_rows * width) as u64;
        if meta.data_len != expected {
            return Err(StelaError::Invalid(format!(
                "column {column}: data buffer holds {} bytes, expected {expected} for {num_rows} values",
                meta.data_len
            )));
        }
        let buffer = self.read_aligned(meta.data_offset, meta.data_len as usize, width, column)?;
        PrimitiveArray::try_new(ScalarBuffer::from(buffer), nulls)
    }

    /// Reads a value buffer, rejecting regions the typed view could not
    /// be placed over
    fn read_aligned(
        &self,
        offset: u64,
        nbytes: usize,
        align: usize,
        column: usize,
    ) -> Result<Buffer, StelaError> {
        let buffer = self.source.read_at(offset, nbytes)?;
        if buffer.as_ptr().align_offset(align) != 0 {
            return Err(StelaError::Invalid(format!(
                "column {column}: buffer at {offset} is not aligned for its value width"
            )));
        }
        Ok(buffer)
    }
}
