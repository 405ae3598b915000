//! Selection set with cached bounds

use crate::math::Vec3;
use crate::world::ObjectId;
use super::store::ObjectStore;

/// Selected object ids (insertion order, no duplicates) and their AABB.
///
/// Bounds are cached; callers re-run [`Selection::recompute`] after any
/// membership or position change.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    ids: Vec<ObjectId>,
    capacity: usize,
    bounds_min: Vec3,
    bounds_max: Vec3,
    center: Vec3,
}

impl Selection {
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: Vec::new(),
            capacity: capacity.max(1),
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
            center: Vec3::ZERO,
        }
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `id`. Returns false if it was already present or the set is full.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.contains(id) || self.is_full() {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`, keeping the order of the rest
    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.ids.iter().position(|&s| s == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Rebuild bounds from member positions; all zeros when empty
    pub fn recompute(&mut self, store: &ObjectStore) {
        let mut positions = self.ids.iter().filter_map(|&id| store.find(id)).map(|o| o.position);
        let Some(first) = positions.next() else {
            self.bounds_min = Vec3::ZERO;
            self.bounds_max = Vec3::ZERO;
            self.center = Vec3::ZERO;
            return;
        };

        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        self.bounds_min = min;
        self.bounds_max = max;
        self.center = (min + max) * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ObjectType;

    #[test]
    fn test_insert_is_idempotent_and_bounded() {
        let mut sel = Selection::new(2);
        assert!(sel.insert(5));
        assert!(!sel.insert(5));
        assert!(sel.insert(6));
        assert!(!sel.insert(7));
        assert_eq!(sel.ids(), &[5, 6]);

        assert!(sel.remove(5));
        assert!(!sel.remove(5));
        assert_eq!(sel.ids(), &[6]);
    }

    #[test]
    fn test_bounds_and_center() {
        let mut store = ObjectStore::new(8);
        let a = store.create(ObjectType::Light, Vec3::new(-2.0, 0.0, 4.0)).unwrap();
        let b = store.create(ObjectType::Light, Vec3::new(6.0, 3.0, -4.0)).unwrap();
        let c = store.create(ObjectType::Light, Vec3::new(1.0, -1.0, 0.0)).unwrap();

        let mut sel = Selection::new(8);
        for id in [a, b, c] {
            sel.insert(id);
        }
        sel.recompute(&store);

        let (min, max) = sel.bounds();
        assert_eq!(min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(max, Vec3::new(6.0, 3.0, 4.0));
        assert_eq!(sel.center(), Vec3::new(2.0, 1.0, 0.0));
        for o in store.iter() {
            for axis in 0..3 {
                assert!(min[axis] <= o.position[axis] && o.position[axis] <= max[axis]);
            }
        }

        sel.clear();
        sel.recompute(&store);
        assert_eq!(sel.bounds(), (Vec3::ZERO, Vec3::ZERO));
        assert_eq!(sel.center(), Vec3::ZERO);
    }
}
