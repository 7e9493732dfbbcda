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

use std::fs::File;
use std::sync::Arc;

use stela_array::builder::{BooleanBuilder, Float32Builder, Int32Builder};
use stela_array::{ArrayRef, NullArray, RecordBatch};
use stela_buffer::default_pool;
use stela_ipc::{
    record_batch_size, write_record_batch, AccessMode, InMemoryMedium, MemoryMappedFile,
    RandomAccessMedium, RecordBatchReader, DEFAULT_MAX_RECURSION_DEPTH,
};
use stela_schema::{DataType, Field, Schema, SchemaRef, StelaError};

fn test_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("key", DataType::Int32, false),
        Field::new("payload", DataType::Float32, true),
        Field::new("flag", DataType::Boolean, true),
        Field::new("missing", DataType::Null, true),
    ]))
}

fn test_batch(rows: usize) -> RecordBatch {
    let pool = default_pool();

    let mut keys = Int32Builder::new(pool.clone(), rows);
    keys.append_slice(&(0..rows as i32).collect::<Vec<_>>())
        .unwrap();

    let mut payloads = Float32Builder::new(pool.clone(), rows);
    for i in 0..rows {
        payloads
            .append_option((i % 7 != 0).then_some(i as f32 * 0.5))
            .unwrap();
    }

    let mut flags = BooleanBuilder::new(pool, rows);
    for i in 0..rows {
        flags
            .append_option((i % 5 != 0).then_some(i % 2 == 0))
            .unwrap();
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(keys.finish().into()),
        Arc::new(payloads.finish().into()),
        Arc::new(flags.finish().into()),
        Arc::new(NullArray::new(rows).into()),
    ];
    RecordBatch::try_new(test_schema(), rows, columns).unwrap()
}

#[test]
fn test_mmap_round_trip() {
    let batch = test_batch(100);
    let batch_size = record_batch_size(&batch).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.stela");
    let file = File::create(&path).unwrap();
    file.set_len(batch_size).unwrap();
    file.sync_all().unwrap();
    drop(file);

    let mut sink = MemoryMappedFile::open(&path, AccessMode::ReadWrite).unwrap();
    let header_pos =
        write_record_batch(&mut sink, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap();
    assert!(header_pos < batch_size);
    sink.close().unwrap();

    let source = MemoryMappedFile::open(&path, AccessMode::ReadOnly).unwrap();
    let reader = RecordBatchReader::open(&source, header_pos).unwrap();
    assert_eq!(reader.num_rows(), 100);
    assert_eq!(reader.num_columns(), 4);

    let read_back = reader.get_record_batch(batch.schema()).unwrap();
    assert_eq!(read_back.num_rows(), batch.num_rows());
    for i in 0..batch.num_columns() {
        assert_eq!(batch.column(i).as_ref(), read_back.column(i).as_ref());
        assert!(batch.column(i).equals_exact(read_back.column(i)));
    }
}

#[test]
fn test_batch_outlives_source_handle() {
    let batch = test_batch(64);
    let batch_size = record_batch_size(&batch).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.stela");
    File::create(&path)
        .and_then(|f| f.set_len(batch_size).map(|_| f))
        .unwrap();

    let mut sink = MemoryMappedFile::open(&path, AccessMode::ReadWrite).unwrap();
    let header_pos =
        write_record_batch(&mut sink, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap();
    sink.close().unwrap();

    let mut source = MemoryMappedFile::open(&path, AccessMode::ReadOnly).unwrap();
    let read_back = {
        let reader = RecordBatchReader::open(&source, header_pos).unwrap();
        reader.get_record_batch(batch.schema()).unwrap()
    };
    // the mapping handle is closed, but the batch shares ownership of
    // the mapped region and stays readable
    source.close().unwrap();
    drop(source);

    assert_eq!(read_back.num_rows(), 64);
    assert_eq!(batch.column(0).as_ref(), read_back.column(0).as_ref());
}

#[test]
fn test_size_is_exact() {
    let batch = test_batch(33);
    let batch_size = record_batch_size(&batch).unwrap() as usize;

    // one byte short: the final (header) write must be rejected
    let mut small = InMemoryMedium::new(batch_size - 1);
    let err = write_record_batch(&mut small, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap_err();
    assert!(matches!(err, StelaError::IoError(_, _)));

    // exactly sized: the write fits to the last byte
    let mut exact = InMemoryMedium::new(batch_size);
    write_record_batch(&mut exact, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap();
}

#[test]
fn test_round_trip_at_nonzero_position() {
    let batch = test_batch(10);
    let position = 128;
    let size = position + record_batch_size(&batch).unwrap();

    let mut medium = InMemoryMedium::new(size as usize);
    let header_pos =
        write_record_batch(&mut medium, &batch, position, DEFAULT_MAX_RECURSION_DEPTH).unwrap();

    let reader = RecordBatchReader::open(&medium, header_pos).unwrap();
    let read_back = reader.get_record_batch(batch.schema()).unwrap();
    for i in 0..batch.num_columns() {
        assert_eq!(batch.column(i).as_ref(), read_back.column(i).as_ref());
    }
}

#[test]
fn test_open_rejects_garbage() {
    let batch = test_batch(10);
    let size = record_batch_size(&batch).unwrap();
    let mut medium = InMemoryMedium::new(size as usize);
    let header_pos =
        write_record_batch(&mut medium, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap();

    // not a header position: the magic check fails
    let err = RecordBatchReader::open(&medium, 0).unwrap_err();
    assert!(matches!(err, StelaError::Invalid(_)));

    // truncated: the preamble does not fit
    let err = RecordBatchReader::open(&medium, size - 4).unwrap_err();
    assert!(matches!(err, StelaError::Invalid(_)));

    // a good position still works afterwards
    RecordBatchReader::open(&medium, header_pos).unwrap();
}

#[test]
fn test_schema_mismatch_is_rejected() {
    let batch = test_batch(10);
    let size = record_batch_size(&batch).unwrap();
    let mut medium = InMemoryMedium::new(size as usize);
    let header_pos =
        write_record_batch(&mut medium, &batch, 0, DEFAULT_MAX_RECURSION_DEPTH).unwrap();
    let reader = RecordBatchReader::open(&medium, header_pos).unwrap();

    // wrong arity
    let narrow: SchemaRef = Arc::new(Schema::new(vec![Field::new(
        "key",
        DataType::Int32,
        false,
    )]));
    let err = reader.get_record_batch(&narrow).unwrap_err();
    assert!(matches!(err, StelaError::Invalid(_)));

    // right arity, wrong type for the first column
    let skewed: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("key", DataType::Int64, false),
        Field::new("payload", DataType::Float32, true),
        Field::new("flag", DataType::Boolean, true),
        Field::new("missing", DataType::Null, true),
    ]));
    let err = reader.get_record_batch(&skewed).unwrap_err();
    assert!(matches!(err, StelaError::Invalid(_)));

    // the correct schema still materializes
    reader.get_record_batch(batch.schema()).unwrap();
}

#[test]
fn test_nested_types_are_not_encodable() {
    let schema: SchemaRef = Arc::new(Schema::new(vec![Field::new(
        "values",
        DataType::List(Box::new(DataType::Int32)),
        true,
    )]));
    // no array representation exists for nested types, so a batch over
    // this schema cannot even be assembled
    let err = RecordBatch::try_new(schema, 0, vec![]).unwrap_err();
    assert!(matches!(err, StelaError::Invalid(_)));
}
