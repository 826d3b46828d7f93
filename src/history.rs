//! Linear snapshot history with branch-discard-on-write semantics.

use serde::{Deserialize, Serialize};

use crate::stroke::Stroke;

/// History of a page's stroke list.
pub type StrokeHistory = History<Vec<Stroke>>;

/// Generic undo/redo store over whole-document snapshots.
///
/// The stack is never empty and `index` always points at the live snapshot;
/// both invariants are restored on re-seeding from untrusted parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    stack: Vec<T>,
    index: usize,
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> History<T> {
    /// A history seeded with one empty snapshot.
    pub fn new() -> Self {
        Self {
            stack: vec![T::default()],
            index: 0,
        }
    }

    /// Reinitialize wholesale from a `(stack, index)` pair, e.g. when a page
    /// becomes live again. Repairs an empty stack or out-of-range index.
    pub fn from_parts(stack: Vec<T>, index: usize) -> Self {
        let mut stack = stack;
        if stack.is_empty() {
            stack.push(T::default());
        }
        let index = index.min(stack.len() - 1);
        Self { stack, index }
    }
}

impl<T> History<T> {
    /// Append a snapshot, discarding any redo tail.
    pub fn push(&mut self, state: T) {
        self.stack.truncate(self.index + 1);
        self.stack.push(state);
        self.index = self.stack.len() - 1;
    }

    /// Overwrite the live snapshot without creating a history entry.
    ///
    /// Used for changes that must not be individually undoable, like
    /// highlighter lifespan pruning.
    pub fn replace_current(&mut self, state: T) {
        self.stack[self.index] = state;
    }

    /// Step back one snapshot; no-op at the start of history.
    pub fn undo(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// Step forward one snapshot; no-op at the end of history.
    pub fn redo(&mut self) {
        if self.index < self.stack.len() - 1 {
            self.index += 1;
        }
    }

    pub fn current(&self) -> &T {
        &self.stack[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.stack.len() - 1
    }

    pub fn stack(&self) -> &[T] {
        &self.stack
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
