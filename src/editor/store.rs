//! Object store - dense, ordered storage of placed objects
//!
//! Objects keep their insertion order; removal shifts later objects down.
//! Lookup by id is a linear scan, which is fine at editor scale.

use thiserror::Error;

use crate::math::Vec3;
use crate::world::{EditorObject, ObjectId, ObjectType};

/// Error type for editor operations that can be refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("object store is full ({capacity} objects)")]
    StoreFull { capacity: usize },
    #[error("object ids exhausted")]
    IdsExhausted,
}

/// Bounded object array plus the id allocator
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects: Vec<EditorObject>,
    /// Next id handed out by [`ObjectStore::create`]; never reused
    next_id: ObjectId,
    capacity: usize,
}

impl ObjectStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            capacity: capacity.max(1),
        }
    }

    /// Append a default object of `object_type` with a fresh id
    pub fn create(&mut self, object_type: ObjectType, position: Vec3) -> Result<ObjectId, EditorError> {
        if self.is_full() {
            return Err(EditorError::StoreFull { capacity: self.capacity });
        }
        if self.next_id == ObjectId::MAX {
            return Err(EditorError::IdsExhausted);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(EditorObject::new(id, object_type, position));
        Ok(id)
    }

    /// Append an existing object as-is (its id is not checked or allocated)
    pub fn insert(&mut self, object: EditorObject) -> Result<(), EditorError> {
        if self.is_full() {
            return Err(EditorError::StoreFull { capacity: self.capacity });
        }
        self.objects.push(object);
        Ok(())
    }

    /// Remove the first object with `id`, keeping the others in order
    pub fn remove(&mut self, id: ObjectId) -> Option<EditorObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn find(&self, id: ObjectId) -> Option<&EditorObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Mutable access; edits made here are not recorded for undo
    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut EditorObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Objects in store order
    pub fn iter(&self) -> impl Iterator<Item = &EditorObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.objects.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn next_id(&self) -> ObjectId {
        self.next_id
    }

    /// Make sure future ids are greater than every id currently stored.
    /// `ObjectId::MAX` is never handed out, so a store holding it is
    /// exhausted.
    pub fn reserve_past_existing(&mut self) {
        if let Some(max) = self.objects.iter().map(|o| o.id).max() {
            let past = max.checked_add(1).unwrap_or(ObjectId::MAX);
            self.next_id = self.next_id.max(past);
        }
    }

    /// Drop all objects and restart ids at 1
    pub fn clear(&mut self) {
        self.objects.clear();
        self.next_id = 1;
    }
}
