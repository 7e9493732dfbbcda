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
//! Logical types for the stela columnar format: [`DataType`], [`Field`]
//! and [`Schema`] describe the shape of typed, nullable columns, and
//! [`StelaError`] is the error type shared by all stela crates.

mod datatype;
pub use datatype::{DataType, TypeId};

mod error;
pub use error::StelaError;

mod field;
pub use field::Field;

mod schema;
pub use schema::{Schema, SchemaRef};
