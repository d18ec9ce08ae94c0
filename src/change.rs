//! A single atomic edit record, and the overlay reader that layers it over
//! an underlying read-seekable view.

use std::io::{self, Read, Seek, SeekFrom};
use std::rc::Rc;

/// Anything that can be both read and seeked — the shape of both the raw
/// source and every layered logical view built on top of it.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// An atomic edit, immutable once committed.
///
/// `position` is expressed in the coordinate space of *this change's own
/// predecessor view* — the view produced by every change below it on the
/// stack — never in the original source's coordinates. A pure insertion has
/// `removed == 0`; a pure deletion has `data` empty; a replacement has both
/// non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub position: u64,
    pub removed: u64,
    pub data: Vec<u8>,
}

impl Change {
    pub fn new(position: u64, removed: u64, data: Vec<u8>) -> Self {
        Self {
            position,
            removed,
            data,
        }
    }

    pub fn insert(position: u64, data: Vec<u8>) -> Self {
        Self::new(position, 0, data)
    }

    pub fn delete(position: u64, removed: u64) -> Self {
        Self::new(position, removed, Vec::new())
    }

    /// A change that deletes nothing and inserts nothing — a no-op overlay.
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.data.is_empty()
    }

    /// Net change in length this edit applies to its predecessor view.
    pub fn delta(&self) -> i64 {
        self.data.len() as i64 - self.removed as i64
    }
}

fn stream_len<S: Seek>(s: &mut S) -> io::Result<u64> {
    let current = s.stream_position()?;
    let len = s.seek(SeekFrom::End(0))?;
    s.seek(SeekFrom::Start(current))?;
    Ok(len)
}

/// A read-seekable wrapper presenting `inner` with one [`Change`] applied,
/// per the layering rule in the editing core's spec:
///
/// ```text
/// V[i]         = R[i]              for 0 <= i < p
/// V[p+j]       = d[j]              for 0 <= j < n
/// V[p+n+j]     = R[p+k+j]          for j >= 0
/// ```
///
/// where `R` is `inner`, `(p, k, d)` is the change, and `n = |d|`.
pub struct OverlayReader<R> {
    inner: R,
    change: Rc<Change>,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> OverlayReader<R> {
    pub fn new(mut inner: R, change: Rc<Change>) -> io::Result<Self> {
        let inner_len = stream_len(&mut inner)?;
        let len = inner_len
            .saturating_sub(change.removed)
            .saturating_add(change.data.len() as u64);
        Ok(Self {
            inner,
            change,
            pos: 0,
            len,
        })
    }
}

impl<R: Read + Seek> Read for OverlayReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        let insert_end = self.change.position + self.change.data.len() as u64;

        while written < buf.len() {
            if self.pos >= self.len {
                break;
            }
            let space = buf.len() - written;

            if self.pos < self.change.position {
                let seg_left = self.change.position - self.pos;
                let want = seg_left.min(space as u64) as usize;
                self.inner.seek(SeekFrom::Start(self.pos))?;
                let n = self.inner.read(&mut buf[written..written + want])?;
                written += n;
                self.pos += n as u64;
                if n < want {
                    break;
                }
                continue;
            }

            if self.pos < insert_end {
                let offset = (self.pos - self.change.position) as usize;
                let seg_left = self.change.data.len() - offset;
                let want = seg_left.min(space);
                buf[written..written + want].copy_from_slice(&self.change.data[offset..offset + want]);
                written += want;
                self.pos += want as u64;
                continue;
            }

            let src_offset = self.change.position + self.change.removed + (self.pos - insert_end);
            let seg_left = self.len - self.pos;
            let want = seg_left.min(space as u64) as usize;
            self.inner.seek(SeekFrom::Start(src_offset))?;
            let n = self.inner.read(&mut buf[written..written + want])?;
            written += n;
            self.pos += n as u64;
            if n < want {
                break;
            }
        }

        Ok(written)
    }
}

impl<R: Read + Seek> Seek for OverlayReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target: i64 = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::Current(d) => self.pos as i64 + d,
            SeekFrom::End(d) => self.len as i64 + d,
        };
        // A negative resulting position is end-of-stream, not an OS-level
        // seek error: the next read reports zero bytes.
        self.pos = if target < 0 { self.len } else { target as u64 };
        Ok(self.pos)
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
