//! Bounded stack of mask snapshots.

use image::RgbaImage;
use std::collections::VecDeque;

/// Number of strokes that can be undone.
pub const MAX_UNDO_SNAPSHOTS: usize = 10;

#[derive(Debug, Clone)]
pub struct UndoStack {
    snapshots: VecDeque<RgbaImage>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Pushes a snapshot, dropping the oldest one when full.
    pub fn push(&mut self, snapshot: RgbaImage) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(MAX_UNDO_SNAPSHOTS)
    }
}
