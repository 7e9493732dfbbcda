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

//! Random-access byte media the framing layer reads from and writes to

use std::fs::OpenOptions;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use memmap2::{Mmap, MmapMut};
use tracing::debug;

use stela_buffer::Buffer;
use stela_schema::StelaError;

/// How a [`MemoryMappedFile`] is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Reads only; reads are zero-copy views into the mapping
    ReadOnly,
    /// Reads and writes; reads copy out of the writable mapping
    ReadWrite,
}

/// A positioned byte source/sink with explicit size and close.
///
/// Reads and writes are synchronous and atomic from the caller's
/// perspective: each call either completes or reports an
/// [`StelaError::IoError`] without partial effect. No retry logic
/// exists at this layer.
pub trait RandomAccessMedium {
    /// The medium's size in bytes
    fn size(&self) -> u64;

    /// Reads `nbytes` starting at `position`.
    ///
    /// Media able to share their storage return a zero-copy view; the
    /// returned buffer keeps the backing region alive independently of
    /// this handle.
    fn read_at(&self, position: u64, nbytes: usize) -> Result<Buffer, StelaError>;

    /// Writes `data` starting at `position`; fails with
    /// [`StelaError::IoError`] when the medium is too small or not
    /// writable
    fn write_at(&mut self, position: u64, data: &[u8]) -> Result<(), StelaError>;

    /// Flushes and detaches this handle from the medium.
    ///
    /// Buffers already handed out by [`read_at`](Self::read_at) stay
    /// valid; they share ownership of the backing storage.
    fn close(&mut self) -> Result<(), StelaError>;
}

fn bounds_check(size: u64, position: u64, nbytes: u64, op: &str) -> Result<(), StelaError> {
    if position.saturating_add(nbytes) > size {
        return Err(StelaError::IoError(
            format!("{op} of {nbytes} bytes at {position} exceeds medium size {size}"),
            None,
        ));
    }
    Ok(())
}

enum Mapping {
    ReadOnly(Arc<Mmap>),
    ReadWrite(MmapMut),
    Closed,
}

/// A memory-mapped file.
///
/// Read-only mappings hand out buffers that reference the mapped bytes
/// directly — no copy — and keep the mapping alive through shared
/// ownership, so a batch reconstructed from the file stays readable
/// even after this handle is closed.
pub struct MemoryMappedFile {
    mapping: Mapping,
    size: u64,
}

impl std::fmt::Debug for MemoryMappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.mapping {
            Mapping::ReadOnly(_) => "read-only",
            Mapping::ReadWrite(_) => "read-write",
            Mapping::Closed => "closed",
        };
        f.debug_struct("MemoryMappedFile")
            .field("size", &self.size)
            .field("state", &state)
            .finish()
    }
}

impl MemoryMappedFile {
    /// Maps the file at `path`.
    ///
    /// The file must already have its final size (e.g. via `set_len`);
    /// mapping does not grow it.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self, StelaError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(mode == AccessMode::ReadWrite)
            .open(path)?;

        // Safety: the region stays mapped for the lifetime of the
        // mapping object; callers must not truncate the file while it
        // is mapped
        let mapping = match mode {
            AccessMode::ReadOnly => Mapping::ReadOnly(Arc::new(unsafe { Mmap::map(&file)? })),
            AccessMode::ReadWrite => Mapping::ReadWrite(unsafe { MmapMut::map_mut(&file)? }),
        };
        let size = match &mapping {
            Mapping::ReadOnly(map) => map.len() as u64,
            Mapping::ReadWrite(map) => map.len() as u64,
            Mapping::Closed => unreachable!(),
        };
        debug!(path = %path.display(), size, ?mode, "mapped file");
        Ok(Self { mapping, size })
    }
}

impl RandomAccessMedium for MemoryMappedFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&self, position: u64, nbytes: usize) -> Result<Buffer, StelaError> {
        bounds_check(self.size, position, nbytes as u64, "read")?;
        match &self.mapping {
            Mapping::ReadOnly(map) => {
                let ptr = map[position as usize..].as_ptr() as *mut u8;
                // Safety: the range is inside the mapping, and the Arc
                // owner keeps the mapping alive for the view's lifetime
                Ok(unsafe {
                    Buffer::from_external(map.clone(), NonNull::new(ptr).unwrap(), nbytes)
                })
            }
            Mapping::ReadWrite(map) => {
                Buffer::from_slice_ref(&map[position as usize..position as usize + nbytes])
            }
            Mapping::Closed => Err(StelaError::IoError(
                "read from a closed medium".to_string(),
                None,
            )),
        }
    }

    fn write_at(&mut self, position: u64, data: &[u8]) -> Result<(), StelaError> {
        bounds_check(self.size, position, data.len() as u64, "write")?;
        match &mut self.mapping {
            Mapping::ReadWrite(map) => {
                map[position as usize..position as usize + data.len()].copy_from_slice(data);
                Ok(())
            }
            Mapping::ReadOnly(_) => Err(StelaError::IoError(
                "write to a read-only mapping".to_string(),
                None,
            )),
            Mapping::Closed => Err(StelaError::IoError(
                "write to a closed medium".to_string(),
                None,
            )),
        }
    }

    fn close(&mut self) -> Result<(), StelaError> {
        match std::mem::replace(&mut self.mapping, Mapping::Closed) {
            Mapping::ReadWrite(map) => {
                map.flush()?;
                debug!(size = self.size, "flushed and closed writable mapping");
            }
            Mapping::ReadOnly(_) => debug!(size = self.size, "closed read-only mapping"),
            Mapping::Closed => (),
        }
        Ok(())
    }
}

/// A heap-backed medium of fixed size, for tests and staging
#[derive(Debug)]
pub struct InMemoryMedium {
    data: Vec<u8>,
    closed: bool,
}

impl InMemoryMedium {
    /// Creates a zero-filled medium of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            closed: false,
        }
    }
}

impl RandomAccessMedium for InMemoryMedium {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&self, position: u64, nbytes: usize) -> Result<Buffer, StelaError> {
        if self.closed {
            return Err(StelaError::IoError(
                "read from a closed medium".to_string(),
                None,
            ));
        }
        bounds_check(self.size(), position, nbytes as u64, "read")?;
        Buffer::from_slice_ref(&self.data[position as usize..position as usize + nbytes])
    }

    fn write_at(&mut self, position: u64, data: &[u8]) -> Result<(), StelaError> {
        if self.closed {
            return Err(StelaError::IoError(
                "write to a closed medium".to_string(),
                None,
            ));
        }
        bounds_check(self.size(), position, data.len() as u64, "write")?;
        self.data[position as usize..position as usize + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn close(&mut self) -> Result<(), StelaError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let mut medium = InMemoryMedium::new(64);
        let values: Vec<u8> = (0..32).collect();
        medium.write_at(16, &values).unwrap();

        let buffer = medium.read_at(16, 32).unwrap();
        assert_eq!(buffer.as_slice(), values.as_slice());
        assert_eq!(medium.size(), 64);
    }

    #[test]
    fn test_bounds_are_enforced() {
        let mut medium = InMemoryMedium::new(16);
        assert!(matches!(
            medium.write_at(8, &[0u8; 16]),
            Err(StelaError::IoError(_, _))
        ));
        assert!(matches!(
            medium.read_at(16, 1),
            Err(StelaError::IoError(_, _))
        ));
    }

    #[test]
    fn test_closed_medium_rejects_io() {
        let mut medium = InMemoryMedium::new(16);
        medium.close().unwrap();
        assert!(medium.read_at(0, 1).is_err());
        assert!(medium.write_at(0, &[1]).is_err());
    }
}
