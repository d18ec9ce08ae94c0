//! Editing core for a modal, vi-style hex editor.
//!
//! Exposes a logical read-seekable view of "the file as if every edit had
//! been applied" over a source that is never mutated: edits are a stack of
//! overlays, undo/redo is stack push/pop, and saving streams the view back
//! to disk without ever materialising it whole in memory.

pub mod buffer;
pub mod change;
pub mod command_line;
pub mod error;
pub mod hex;
pub mod numeric;
pub mod persistence;
pub mod region;
pub mod settings;
pub mod source;

pub use buffer::EditorBuffer;
pub use change::{Change, ReadSeek};
pub use error::{EditorError, Result};
pub use region::{Range, Region, RegionKind};
pub use settings::{ByteOrder, EditorSettings};
pub use source::{ByteSource, FileSource, MemSource};
