use std::collections::VecDeque;

/// Bounded history of snapshots. Pushing past capacity forgets the oldest entry.
#[derive(Clone, Debug)]
pub struct UndoStack<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> UndoStack<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
