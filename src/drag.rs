//! Drag-and-drop capability.
//!
//! A gesture recognizer only has to produce a [`DropResult`]; the store
//! consumes it through [`crate::store::TaskStore::apply_drop`] and never
//! sees the gesture itself.

use serde::Serialize;

/// Outcome of a finished drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropResult {
    pub source: usize,
    /// `None` when the gesture was cancelled or released outside the list.
    pub destination: Option<usize>,
}

impl DropResult {
    pub fn moved(source: usize, destination: usize) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: usize) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}

/// Keyboard-driven drag gesture: grab a row, move the hover target, drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    source: usize,
    target: usize,
    len: usize,
}

impl DragSession {
    /// Start dragging the row at `index`. Returns `None` when `index` is not
    /// a row of a list with `len` rows.
    pub fn grab(index: usize, len: usize) -> Option<Self> {
        if index >= len {
            return None;
        }
        Some(Self {
            source: index,
            target: index,
            len,
        })
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Row the task would land on if dropped now.
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn move_by(&mut self, delta: isize) {
        let max = self.len.saturating_sub(1) as isize;
        self.target = (self.target as isize + delta).clamp(0, max) as usize;
    }

    pub fn move_to(&mut self, index: usize) {
        self.target = index.min(self.len.saturating_sub(1));
    }

    pub fn drop_here(self) -> DropResult {
        DropResult::moved(self.source, self.target)
    }

    pub fn cancel(self) -> DropResult {
        DropResult::cancelled(self.source)
    }
}
