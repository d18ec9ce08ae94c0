//! Abstraction over "a thing that can open independent read-seekable
//! handles onto the same underlying bytes" — a file path or an in-memory
//! slice. `EditorBuffer::read_seeker` hands out a fresh handle per call so
//! callers never fight over a shared cursor.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::change::ReadSeek;

pub trait ByteSource {
    /// Open a fresh, independent read-seekable handle onto the source.
    fn open(&self) -> io::Result<Box<dyn ReadSeek>>;
}

/// A source backed by a file on disk. Every `open()` call reopens the path,
/// so the buffer always sees the file's current on-disk contents without
/// needing to cache a handle.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

/// A source backed by an in-memory byte slice, for buffers with no backing
/// path (tests, scratch buffers).
#[derive(Debug, Clone)]
pub struct MemSource {
    data: Arc<[u8]>,
}

impl MemSource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemSource {
    fn open(&self) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.data))))
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
