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

//! Writes record batches onto a [`RandomAccessMedium`]

use tracing::debug;

use stela_array::{Array, RecordBatch};
use stela_buffer::util::bit_util;
use stela_buffer::{BooleanBuffer, ToByteSlice};
use stela_schema::{DataType, StelaError};

use crate::medium::RandomAccessMedium;
use crate::{
    align, ColumnMeta, FLAG_HAS_BITMAP, HEADER_MAGIC, HEADER_PREAMBLE_LEN, HEADER_VERSION,
    PER_COLUMN_LEN,
};

/// The recursion bound used by the convenience paths; matches the
/// historical default of the wire protocol
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 64;

/// The nesting depth of a type: 1 for leaves, one more per `List` or
/// `Struct` level
fn type_depth(data_type: &DataType) -> usize {
    match data_type {
        DataType::List(elem) => 1 + type_depth(elem),
        DataType::Struct(fields) => {
            1 + fields
                .iter()
                .map(|f| type_depth(f.data_type()))
                .max()
                .unwrap_or(0)
        }
        _ => 1,
    }
}

/// The packed bytes of a bit buffer, `ceil(len / 8)` of them
fn packed_bits(bits: &BooleanBuffer) -> Result<&[u8], StelaError> {
    if bits.offset() % 8 != 0 {
        return Err(StelaError::Invalid(
            "bit buffer does not start on a byte boundary".to_string(),
        ));
    }
    let start = bits.offset() / 8;
    let len = bit_util::ceil(bits.len(), 8);
    Ok(&bits.values()[start..start + len])
}

/// The serialized value bytes of a column, `None` for null arrays
fn value_bytes(array: &Array) -> Result<Option<&[u8]>, StelaError> {
    Ok(match array {
        Array::Null(_) => None,
        Array::Boolean(a) => Some(packed_bits(a.values())?),
        Array::Int8(a) => Some(a.values().to_byte_slice()),
        Array::Int16(a) => Some(a.values().to_byte_slice()),
        Array::Int32(a) => Some(a.values().to_byte_slice()),
        Array::Int64(a) => Some(a.values().to_byte_slice()),
        Array::UInt8(a) => Some(a.values().to_byte_slice()),
        Array::UInt16(a) => Some(a.values().to_byte_slice()),
        Array::UInt32(a) => Some(a.values().to_byte_slice()),
        Array::UInt64(a) => Some(a.values().to_byte_slice()),
        Array::Float16(a) => Some(a.values().to_byte_slice()),
        Array::Float32(a) => Some(a.values().to_byte_slice()),
        Array::Float64(a) => Some(a.values().to_byte_slice()),
    })
}

/// The validity bytes of a column, `None` when it carries no mask
fn bitmap_bytes(array: &Array) -> Result<Option<&[u8]>, StelaError> {
    array.nulls().map(|n| packed_bits(n.inner())).transpose()
}

struct BatchLayout {
    columns: Vec<ColumnMeta>,
    header_pos: u64,
    end_pos: u64,
}

/// Assigns every buffer of `batch` an aligned absolute offset starting
/// at `position`
fn batch_layout(batch: &RecordBatch, position: u64) -> Result<BatchLayout, StelaError> {
    let mut offset = position;
    let mut columns = Vec::with_capacity(batch.num_columns());
    for (array, field) in batch.columns().iter().zip(batch.schema().fields()) {
        let mut meta = ColumnMeta {
            type_code: field.data_type().id() as u8,
            has_bitmap: false,
            null_count: array.null_count() as u32,
            bitmap_offset: 0,
            bitmap_len: 0,
            data_offset: 0,
            data_len: 0,
        };
        if let Some(bitmap) = bitmap_bytes(array)? {
            offset = align(offset);
            meta.has_bitmap = true;
            meta.bitmap_offset = offset;
            meta.bitmap_len = bitmap.len() as u64;
            offset += meta.bitmap_len;
        }
        if let Some(values) = value_bytes(array)? {
            offset = align(offset);
            meta.data_offset = offset;
            meta.data_len = values.len() as u64;
            offset += meta.data_len;
        }
        columns.push(meta);
    }
    let header_pos = align(offset);
    let header_len = HEADER_PREAMBLE_LEN as u64 + PER_COLUMN_LEN as u64 * columns.len() as u64;
    Ok(BatchLayout {
        columns,
        header_pos,
        end_pos: header_pos + header_len,
    })
}

fn encode_header(batch: &RecordBatch, layout: &BatchLayout) -> Vec<u8> {
    let mut header = Vec::with_capacity(layout.end_pos as usize - layout.header_pos as usize);
    header.extend_from_slice(&HEADER_MAGIC.to_le_bytes());
    header.extend_from_slice(&HEADER_VERSION.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());
    header.extend_from_slice(&(batch.num_rows() as u64).to_le_bytes());
    header.extend_from_slice(&(batch.num_columns() as u32).to_le_bytes());
    for meta in &layout.columns {
        header.push(meta.type_code);
        header.push(if meta.has_bitmap { FLAG_HAS_BITMAP } else { 0 });
        header.extend_from_slice(&0u16.to_le_bytes());
        header.extend_from_slice(&meta.null_count.to_le_bytes());
        header.extend_from_slice(&meta.bitmap_offset.to_le_bytes());
        header.extend_from_slice(&meta.bitmap_len.to_le_bytes());
        header.extend_from_slice(&meta.data_offset.to_le_bytes());
        header.extend_from_slice(&meta.data_len.to_le_bytes());
    }
    header
}

/// Serializes `batch` onto `sink` starting at `position` and returns
/// the offset of the self-describing header.
///
/// The column buffers are laid out first, each 64-byte aligned, with
/// the header after them — which is why the returned header offset,
/// not `position`, is what a reader must be given. Alignment is
/// computed on absolute offsets, so a 64-byte-aligned `position`
/// yields the footprint predicted by [`record_batch_size`].
///
/// Fails with [`StelaError::Invalid`] when a column type's nesting
/// depth exceeds `max_recursion_depth`, [`StelaError::NotImplemented`]
/// for column encodings outside the primitive set, and
/// [`StelaError::IoError`] when the sink rejects a write. The sink is
/// not rolled back on failure; the header is written last, so an
/// aborted write never yields a parseable batch.
pub fn write_record_batch<M: RandomAccessMedium + ?Sized>(
    sink: &mut M,
    batch: &RecordBatch,
    position: u64,
    max_recursion_depth: usize,
) -> Result<u64, StelaError> {
    for field in batch.schema().fields() {
        let depth = type_depth(field.data_type());
        if depth > max_recursion_depth {
            return Err(StelaError::Invalid(format!(
                "field '{}' exceeds the maximum nesting depth: {depth} > {max_recursion_depth}",
                field.name()
            )));
        }
        if !field.data_type().is_primitive() {
            return Err(StelaError::NotImplemented(format!(
                "no wire encoding for columns of type {}",
                field.data_type()
            )));
        }
    }

    let layout = batch_layout(batch, position)?;
    for (array, meta) in batch.columns().iter().zip(&layout.columns) {
        if let Some(bitmap) = bitmap_bytes(array)? {
            sink.write_at(meta.bitmap_offset, bitmap)?;
        }
        if let Some(values) = value_bytes(array)? {
            sink.write_at(meta.data_offset, values)?;
        }
    }
    sink.write_at(layout.header_pos, &encode_header(batch, &layout))?;

    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        position,
        header_pos = layout.header_pos,
        bytes = layout.end_pos - position,
        "wrote record batch"
    );
    Ok(layout.header_pos)
}

/// The exact byte footprint `batch` occupies when written at a
/// 64-byte-aligned position; no I/O is performed.
///
/// Callers use this to size a target medium before writing.
pub fn record_batch_size(batch: &RecordBatch) -> Result<u64, StelaError> {
    let layout = batch_layout(batch, 0)?;
    Ok(layout.end_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stela_array::builder::Int32Builder;
    use stela_array::ArrayRef;
    use stela_buffer::default_pool;
    use stela_schema::{Field, Schema, SchemaRef};

    fn int_batch(n: i32) -> RecordBatch {
        let schema: SchemaRef = Arc::new(Schema::new(vec![Field::new(
            "f1",
            DataType::Int32,
            false,
        )]));
        let mut builder = Int32Builder::new(default_pool(), 0);
        builder.append_slice(&(0..n).collect::<Vec<_>>()).unwrap();
        let column: ArrayRef = Arc::new(builder.finish().into());
        RecordBatch::try_new(schema, n as usize, vec![column]).unwrap()
    }

    #[test]
    fn test_type_depth() {
        assert_eq!(type_depth(&DataType::Int32), 1);
        assert_eq!(type_depth(&DataType::List(Box::new(DataType::Int32))), 2);
        let nested = DataType::List(Box::new(DataType::List(Box::new(DataType::Utf8))));
        assert_eq!(type_depth(&nested), 3);
        let s = DataType::Struct(vec![Field::new("a", nested, true)]);
        assert_eq!(type_depth(&s), 4);
    }

    #[test]
    fn test_size_covers_buffers_and_header() {
        let batch = int_batch(100);
        // 400 data bytes pad to 448, plus a 20 + 40 byte header
        assert_eq!(record_batch_size(&batch).unwrap(), 448 + 60);
    }

    #[test]
    fn test_write_rejects_small_sink() {
        let batch = int_batch(100);
        let mut sink = crate::InMemoryMedium::new(64);
        let err = write_record_batch(&mut sink, &batch, 0, 64).unwrap_err();
        assert!(matches!(err, StelaError::IoError(_, _)));
    }

    #[test]
    fn test_aligned_layout() {
        let batch = int_batch(3);
        let layout = batch_layout(&batch, 128).unwrap();
        assert_eq!(layout.columns[0].data_offset, 128);
        assert_eq!(layout.columns[0].data_len, 12);
        assert_eq!(layout.header_pos, 192);
    }
}
