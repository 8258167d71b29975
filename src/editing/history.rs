// Linear edit history - baseline image plus accepted edits

use super::error::{EditorError, Result};
use super::types::EncodedImage;

/// Linear undo stack of accepted images with a single pending slot.
///
/// `entries[0]` is the uploaded baseline. `cursor` always points at a
/// valid entry while the history is non-empty. A pending edit is a
/// candidate generated from `entries[cursor]` and is not part of the
/// history until accepted.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    entries: Vec<EncodedImage>,
    cursor: usize,
    pending: Option<EncodedImage>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from a freshly uploaded baseline
    pub fn reset(&mut self, baseline: EncodedImage) {
        self.entries.clear();
        self.entries.push(baseline);
        self.cursor = 0;
        self.pending = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.pending = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[EncodedImage] {
        &self.entries
    }

    /// The baseline for the next edit
    pub fn current(&self) -> Option<&EncodedImage> {
        self.entries.get(self.cursor)
    }

    pub fn pending(&self) -> Option<&EncodedImage> {
        self.pending.as_ref()
    }

    /// Pending edit if any, otherwise the image at the cursor
    pub fn displayed(&self) -> Option<&EncodedImage> {
        self.pending.as_ref().or_else(|| self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Replace the pending slot. Ignored while no image is loaded.
    pub fn propose(&mut self, image: EncodedImage) {
        if !self.entries.is_empty() {
            self.pending = Some(image);
        }
    }

    pub fn discard_pending(&mut self) -> Option<EncodedImage> {
        self.pending.take()
    }

    /// Commit the pending edit after the cursor, dropping the redo tail
    pub fn accept_pending(&mut self) -> Result<&EncodedImage> {
        let pending = self.pending.take().ok_or(EditorError::NothingPending)?;
        self.entries.truncate(self.cursor + 1);
        self.entries.push(pending);
        self.cursor = self.entries.len() - 1;
        Ok(&self.entries[self.cursor])
    }

    pub fn undo(&mut self) -> Result<&EncodedImage> {
        if !self.can_undo() {
            return Err(EditorError::NothingToUndo);
        }
        self.cursor -= 1;
        self.pending = None;
        Ok(&self.entries[self.cursor])
    }

    pub fn redo(&mut self) -> Result<&EncodedImage> {
        if !self.can_redo() {
            return Err(EditorError::NothingToRedo);
        }
        self.cursor += 1;
        self.pending = None;
        Ok(&self.entries[self.cursor])
    }
}
