//! Atomic, rename-based file swapping used by [`crate::buffer::EditorBuffer::save`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SUFFIX_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A suffix unique enough to avoid colliding with a concurrent save in this
/// process; the core is single-threaded (see spec §5) so this only needs to
/// avoid reusing a name within one process lifetime, not provide
/// cryptographic randomness.
fn random_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let counter = SUFFIX_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id() as u64;
    format!("{:x}", nanos ^ pid.rotate_left(17) ^ counter.rotate_left(3))
}

/// `path` with `suffix` appended to its file name, in the same directory.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    name.push_str(suffix);
    path.with_file_name(name)
}

/// Exchange the contents of `a` and `b` via three renames, so that after a
/// successful call the bytes previously at `a` are at `b` and vice versa.
///
/// Any rename failure midway leaves at least one of `a`, `b`, and the
/// transient sibling holding valid old-or-new data — nothing is ever
/// truncated or deleted outright.
pub fn swap_file(a: &Path, b: &Path) -> io::Result<()> {
    let tmp = sibling_path(a, &format!("~{}", random_suffix()));
    fs::rename(a, &tmp)?;
    fs::rename(b, a)?;
    fs::rename(&tmp, b)?;
    Ok(())
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
