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

//! Defines the low-level [`Allocation`] API for shared memory regions

use std::fmt::{Debug, Formatter};
use std::panic::RefUnwindSafe;
use std::sync::Arc;

use crate::pool::MemoryPool;

/// The alignment, in bytes, of every pool allocation.
///
/// Cache-line alignment keeps typed views over buffers valid for every
/// fixed-width value kind.
pub const ALIGNMENT: usize = 64;

/// The owner of an externally allocated region.
///
/// The implementation is responsible for releasing the region once no
/// more references exist; a memory-mapped file is the canonical example.
pub trait Allocation: RefUnwindSafe + Send + Sync {}

impl<T: RefUnwindSafe + Send + Sync> Allocation for T {}

/// Mode of deallocating memory regions
pub(crate) enum Deallocation {
    /// A region obtained from a [`MemoryPool`]; freed back to the pool
    /// with its full capacity when the last reference drops
    Pool {
        pool: Arc<dyn MemoryPool>,
        capacity: usize,
    },
    /// A weak view into a region owned elsewhere. The owner is kept
    /// alive by the `Arc` and performs the release; we never free it.
    /// The second element is the viewed size, tracked for reporting.
    External(Arc<dyn Allocation>, usize),
}

impl Debug for Deallocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Deallocation::Pool { capacity, .. } => {
                write!(f, "Deallocation::Pool {{ capacity: {capacity} }}")
            }
            Deallocation::External(_, size) => {
                write!(f, "Deallocation::External {{ size: {size} }}")
            }
        }
    }
}
