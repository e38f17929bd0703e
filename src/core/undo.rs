//! Bounded undo history
//!
//! Full deep-copy snapshots of the product collection, taken immediately
//! before each mutation. The stack is bounded: pushing past capacity evicts
//! the oldest snapshot. Undo is consumption-only; there is no redo.

use std::collections::VecDeque;

use crate::core::product::Product;

pub const DEFAULT_UNDO_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct UndoEngine {
    snapshots: VecDeque<Vec<Product>>,
    capacity: usize,
}

impl UndoEngine {
    /// A zero capacity is treated as one: an undo engine that can never
    /// hold a snapshot would silently disable undo
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild an engine from previously saved snapshots, oldest first.
    /// Anything beyond capacity is evicted from the old end.
    pub fn from_snapshots(capacity: usize, snapshots: Vec<Vec<Product>>) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots: VecDeque<Vec<Product>> = snapshots.into();
        while snapshots.len() > capacity {
            snapshots.pop_front();
        }
        Self {
            snapshots,
            capacity,
        }
    }

    /// The stack contents, oldest first (for persistence)
    pub fn stack(&self) -> &VecDeque<Vec<Product>> {
        &self.snapshots
    }

    /// Deep-copy the collection onto the stack, evicting the oldest
    /// snapshot when full
    pub fn snapshot(&mut self, products: &[Product]) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(products.to_vec());
    }

    /// Pop the most recent snapshot; `None` on an empty stack
    pub fn undo(&mut self) -> Option<Vec<Product>> {
        self.snapshots.pop_back()
    }

    /// Drop the most recent snapshot without restoring it.
    ///
    /// Used when the mutation the snapshot was taken for failed validation:
    /// the stack must only hold states that were actually superseded.
    pub fn discard_last(&mut self) {
        self.snapshots.pop_back();
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

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}
