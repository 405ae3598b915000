//! Bounded undo log
//!
//! A fixed-capacity ring: once full, each push silently overwrites the
//! oldest entry. There is no redo.

use crate::world::{EditorObject, ObjectId, TerrainBackup};

/// One reversible editor action
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// An object was created; undo removes it
    ObjectCreate { id: ObjectId },
    /// An object was deleted; undo re-appends this snapshot
    ObjectDelete { object: EditorObject },
    /// An object was edited; undo writes `before` back
    ObjectModify { before: EditorObject, after: EditorObject },
    /// Heights before a brush stroke
    TerrainModify(TerrainBackup),
    /// Selection membership to restore
    SelectionChange { ids: Vec<ObjectId> },
}

impl UndoAction {
    /// Short label for logs and UI
    pub fn label(&self) -> &'static str {
        match self {
            UndoAction::ObjectCreate { .. } => "create object",
            UndoAction::ObjectDelete { .. } => "delete object",
            UndoAction::ObjectModify { .. } => "modify object",
            UndoAction::TerrainModify(_) => "terrain edit",
            UndoAction::SelectionChange { .. } => "selection change",
        }
    }
}

/// Ring buffer of [`UndoAction`]s
#[derive(Debug, Clone)]
pub struct UndoLog {
    slots: Vec<Option<UndoAction>>,
    /// Next write position
    head: usize,
    /// Oldest live entry
    tail: usize,
    count: usize,
}

impl UndoLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Record an action, evicting the oldest one when full
    pub fn push(&mut self, action: UndoAction) {
        let capacity = self.capacity();
        self.slots[self.head] = Some(action);
        self.head = (self.head + 1) % capacity;
        if self.count < capacity {
            self.count += 1;
        } else {
            self.tail = (self.tail + 1) % capacity;
        }
    }

    /// Take the newest action
    pub fn pop(&mut self) -> Option<UndoAction> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.capacity();
        self.head = (self.head + capacity - 1) % capacity;
        self.count -= 1;
        self.slots[self.head].take()
    }

    /// Newest action, without removing it
    pub fn peek(&self) -> Option<&UndoAction> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.capacity();
        self.slots[(self.head + capacity - 1) % capacity].as_ref()
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &UndoAction> {
        let capacity = self.capacity();
        (1..=self.count).filter_map(move |i| self.slots[(self.head + capacity - i) % capacity].as_ref())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}
