//! Mesh file loaders.
//!
//! Two line-oriented text formats are supported: a strict OBJ subset
//! ([`obj`]) and ASCII PLY ([`ply`]). Both produce a [`crate::mesh::Mesh`]
//! whose vertices carry coordinates, uv, and normal where the file provides
//! them and zero values otherwise.

mod obj;
mod ply;

pub use obj::{load_obj, parse_obj};
pub use ply::{load_ply, parse_ply};

use std::fmt;
use std::io;

/// Error produced while loading a mesh file.
#[derive(Debug)]
pub enum LoadError {
    /// The underlying reader failed.
    Io(io::Error),
    /// A line did not match the format grammar.
    MalformedFormat { line: usize, message: String },
}

impl LoadError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedFormat {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "i/o error: {err}"),
            LoadError::MalformedFormat { line, message } => {
                write!(f, "malformed input at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::MalformedFormat { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}
