//! Unified error type.

use std::fmt;

/// The error wren's fallible operations return.
///
/// Only infrastructure failures end up here — binding the listener, accepting
/// a connection. Anything a client should hear about (404, 400, …) is a
/// [`Response`](crate::Response), never an `Error`.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io error: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}
