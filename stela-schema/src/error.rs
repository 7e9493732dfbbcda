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

//! Defines [`StelaError`], the uniform error type returned by every
//! fallible operation in the stela crates.

use std::error::Error;
use std::fmt;

/// The outcome taxonomy shared by all stela crates.
///
/// Operations report failure through this type rather than panicking;
/// on failure the operated-on structures are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StelaError {
    /// The memory pool could not satisfy an allocation request
    OutOfMemory(String),
    /// A lookup by name or key found nothing
    KeyError(String),
    /// Malformed input, a type/length mismatch, or capability misuse
    Invalid(String),
    /// A medium read/write/open/close failed; carries the raw OS error
    /// code when the platform reported one
    IoError(String, Option<i32>),
    /// The requested type or operation combination is not supported
    NotImplemented(String),
}

impl fmt::Display for StelaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StelaError::OutOfMemory(message) => {
                write!(f, "Out of memory: {message}")
            }
            StelaError::KeyError(message) => {
                write!(f, "Key error: {message}")
            }
            StelaError::Invalid(message) => {
                write!(f, "Invalid: {message}")
            }
            StelaError::IoError(message, Some(code)) => {
                write!(f, "IO error (os error {code}): {message}")
            }
            StelaError::IoError(message, None) => {
                write!(f, "IO error: {message}")
            }
            StelaError::NotImplemented(message) => {
                write!(f, "Not yet implemented: {message}")
            }
        }
    }
}

impl Error for StelaError {}

impl From<std::io::Error> for StelaError {
    fn from(error: std::io::Error) -> Self {
        StelaError::IoError(error.to_string(), error.raw_os_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StelaError::Invalid("chunk 2 has type double".to_string());
        assert_eq!(err.to_string(), "Invalid: chunk 2 has type double");

        let err = StelaError::IoError("mmap failed".to_string(), Some(22));
        assert_eq!(err.to_string(), "IO error (os error 22): mmap failed");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match StelaError::from(io) {
            StelaError::IoError(message, _) => assert!(message.contains("gone")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
