//! The one mutable entity in the editing core: owns the source, the
//! undo/redo/preview stacks, the clipboard, the selection, and the cursor.

use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, error, info, trace};

use crate::change::{Change, OverlayReader, ReadSeek};
use crate::error::{EditorError, Result};
use crate::numeric::clamp;
use crate::persistence::{sibling_path, swap_file};
use crate::region::{active_regions, merge_ranges, Range, Region, RegionKind};
use crate::source::ByteSource;

/// Owns source + undo/redo/preview stacks, clipboard, selection, cursor;
/// exposes the logical read-seeker, undo/redo, preview/commit, selection
/// copy, and region list.
pub struct EditorBuffer {
    name: String,
    source: Box<dyn ByteSource>,
    cursor: u64,
    selection_start: u64,
    undo_stack: Vec<Rc<Change>>,
    redo_stack: Vec<Rc<Change>>,
    preview: Option<Rc<Change>>,
    clipboard: Vec<u8>,
    regions: Vec<Region>,
}

impl EditorBuffer {
    pub fn new(name: impl Into<String>, source: Box<dyn ByteSource>) -> Self {
        Self {
            name: name.into(),
            source,
            cursor: 0,
            selection_start: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            preview: None,
            clipboard: Vec::new(),
            regions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn selection_start(&self) -> u64 {
        self.selection_start
    }

    pub fn clipboard(&self) -> &[u8] {
        &self.clipboard
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn clear_regions(&mut self) {
        self.regions.clear();
    }

    /// A fresh, independent read-seeker over the logical view: source with
    /// every undo-stack change layered on, plus the preview if any.
    pub fn read_seeker(&self) -> Result<Box<dyn ReadSeek>> {
        let mut view: Box<dyn ReadSeek> = self.source.open()?;
        for change in &self.undo_stack {
            view = Box::new(OverlayReader::new(view, Rc::clone(change))?);
        }
        if let Some(preview) = &self.preview {
            view = Box::new(OverlayReader::new(view, Rc::clone(preview))?);
        }
        Ok(view)
    }

    /// Logical length in bytes: source size plus every committed change's
    /// and the preview's net size delta.
    pub fn size(&self) -> Result<u64> {
        let mut seeker = self.read_seeker()?;
        let len = seeker.seek(SeekFrom::End(0))?;
        Ok(len)
    }

    /// Sets the transient, uncommitted preview change, replacing any prior
    /// one. Reads and dirty-region computation include the preview; undo
    /// and redo ignore it entirely.
    pub fn preview_change(&mut self, change: Change) {
        trace!(
            "preview position={} removed={} data_len={}",
            change.position,
            change.removed,
            change.data.len()
        );
        self.preview = Some(Rc::new(change));
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Change> {
        self.preview.as_deref()
    }

    /// Commits a non-empty preview onto the undo stack and clears the redo
    /// stack. Returns whether anything was committed. An empty preview
    /// (no-op overlay) is discarded without being pushed.
    pub fn commit_change(&mut self) -> bool {
        match self.preview.take() {
            Some(change) if !change.is_empty() => {
                debug!(
                    "commit position={} removed={} data_len={}",
                    change.position,
                    change.removed,
                    change.data.len()
                );
                self.undo_stack.push(change);
                self.redo_stack.clear();
                true
            }
            _ => false,
        }
    }

    /// Pops the top of the undo stack onto the redo stack. Returns whether
    /// anything was undone.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(change) => {
                debug!("undo position={} removed={} data_len={}", change.position, change.removed, change.data.len());
                self.redo_stack.push(change);
                true
            }
            None => false,
        }
    }

    /// Pops the top of the redo stack back onto the undo stack. Returns
    /// whether anything was redone.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(change) => {
                debug!("redo position={} removed={} data_len={}", change.position, change.removed, change.data.len());
                self.undo_stack.push(change);
                true
            }
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.undo_stack.is_empty() || self.preview.is_some()
    }

    /// `(min(cursor, selection_start), max(cursor, selection_start))`,
    /// inclusive.
    pub fn get_selection_range(&self) -> (u64, u64) {
        (
            self.cursor.min(self.selection_start),
            self.cursor.max(self.selection_start),
        )
    }

    /// Reads `end - start + 1` bytes of the selection into the clipboard
    /// and returns how many were actually read (a view shorter than the
    /// selection is a truncation, not an error). An "empty" selection
    /// (cursor == selection_start) copies the single byte under the cursor.
    pub fn copy_selection(&mut self) -> Result<usize> {
        let (start, end) = self.get_selection_range();
        let want = (end - start + 1) as usize;
        let mut seeker = self.read_seeker()?;
        seeker.seek(SeekFrom::Start(start))?;

        let mut buf = vec![0u8; want];
        let mut total = 0;
        while total < want {
            let n = seeker.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        buf.truncate(total);
        self.clipboard = buf;
        Ok(total)
    }

    /// Reopens the source and discards all undo/redo/preview state. Used
    /// after a successful save to rebase the editor on the new contents.
    pub fn reload(&mut self) -> Result<()> {
        if let Err(e) = self.source.open() {
            error!("reload {}: {}", self.name, e);
            return Err(EditorError::Io(e));
        }
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.preview = None;
        info!("reloaded {}", self.name);
        Ok(())
    }

    pub fn set_cursor(&mut self, offset: u64) -> Result<()> {
        let size = self.size()?;
        if offset > size {
            return Err(EditorError::OutOfRange { offset, size });
        }
        self.cursor = offset;
        Ok(())
    }

    /// Moves the cursor by `delta`, clamping into `[0, size()-1]` (or `0`
    /// for an empty buffer). Never errors on the clamp itself; only the
    /// underlying size computation can fail with I/O.
    pub fn move_cursor(&mut self, delta: i64) -> Result<()> {
        let size = self.size()?;
        let max = size.saturating_sub(1) as i64;
        let target = self.cursor as i64 + delta;
        self.cursor = clamp(target, 0, max) as u64;
        Ok(())
    }

    pub fn move_selection_anchor(&mut self, offset: u64) -> Result<()> {
        let size = self.size()?;
        if offset > size {
            return Err(EditorError::OutOfRange { offset, size });
        }
        self.selection_start = offset;
        Ok(())
    }

    /// Streams the entire logical view to `path` (created/truncated),
    /// returning the number of bytes written.
    pub fn write_to_file(&self, path: &Path) -> Result<u64> {
        let mut seeker = self.read_seeker()?;
        seeker.seek(SeekFrom::Start(0))?;
        let mut out = std::fs::File::create(path)?;
        let n = io::copy(&mut seeker, &mut out)?;
        out.sync_all()?;
        Ok(n)
    }

    /// Atomically saves the logical view to `path` (or `name` if `path` is
    /// empty): writes a sibling `path~`, then swaps it with `path`, leaving
    /// the prior contents backed up at `path~`.
    pub fn save(&mut self, path: Option<&str>) -> Result<u64> {
        let target: PathBuf = match path.filter(|p| !p.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(&self.name),
        };
        let sibling = sibling_path(&target, "~");

        let written = self.write_to_file(&sibling)?;
        if let Err(e) = swap_file(&target, &sibling) {
            error!("save {}: swap failed: {}", target.display(), e);
            return Err(EditorError::Io(e));
        }
        info!("saved {} ({} bytes)", target.display(), written);
        Ok(written)
    }

    /// In-place save: valid only when every committed change preserves
    /// length. Opens `name` for writing and replays each change as a patch
    /// at its position.
    pub fn save_in_place(&mut self) -> Result<()> {
        if self.undo_stack.iter().any(|c| c.removed != c.data.len() as u64) {
            error!("save_in_place {}: length-changing edit present", self.name);
            return Err(EditorError::LengthChange);
        }

        let mut file = OpenOptions::new().write(true).open(&self.name)?;
        for change in &self.undo_stack {
            file.seek(SeekFrom::Start(change.position))?;
            file.write_all(&change.data)?;
        }
        file.sync_all()?;
        info!("saved in place {} ({} changes)", self.name, self.undo_stack.len());
        Ok(())
    }

    /// Dirty regions, user regions, and the selection/cursor regions,
    /// merged and sorted ascending by start (see spec §4.3).
    pub fn get_regions(&self) -> Vec<Region> {
        let dirty = merge_ranges(self.dirty_ranges());

        let mut out: Vec<Region> = dirty
            .into_iter()
            .map(|r| Region::new(RegionKind::Dirty, r))
            .collect();
        out.extend(self.regions.iter().copied());

        let (start, end) = self.get_selection_range();
        out.push(Region::new(RegionKind::Selection, Range::new(start, end)));
        out.push(Region::new(RegionKind::Cursor, Range::new(self.cursor, self.cursor)));

        out.sort_by_key(|r| r.range.start);
        out
    }

    pub fn active_regions_at(&self, pos: u64) -> Vec<Region> {
        active_regions(&self.get_regions(), pos)
    }

    /// Translates each committed change's (and the preview's) position,
    /// which is expressed in its own predecessor view, into the final
    /// logical coordinate space, per spec §4.3:
    ///
    /// `final_start(i) = c_i.position + sum over later changes c_j whose
    /// position precedes c_i's of (|c_j.data| - c_j.removed)`
    ///
    /// Pure deletions (`data` empty) contribute no dirty range.
    fn dirty_ranges(&self) -> Vec<Range> {
        let mut changes: Vec<&Rc<Change>> = self.undo_stack.iter().collect();
        if let Some(preview) = &self.preview {
            changes.push(preview);
        }

        let n = changes.len();
        let mut out = Vec::new();
        for i in 0..n {
            let ci = changes[i];
            if ci.data.is_empty() {
                continue;
            }
            let mut shift: i64 = 0;
            for cj in changes.iter().skip(i + 1) {
                if cj.position < ci.position {
                    shift += cj.delta();
                }
            }
            let final_start = ci.position as i64 + shift;
            if final_start < 0 {
                // Should not happen for a well-formed stack; guard anyway.
                continue;
            }
            let final_start = final_start as u64;
            let final_end = final_start + ci.data.len() as u64 - 1;
            out.push(Range::new(final_start, final_end));
        }
        out
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
