//! Entity pools
//!
//! Each pool is an arena of slots keyed by a monotonically increasing id. Slots
//! stay sorted by id (ids are only ever appended), which keeps iteration order
//! stable and lookups a binary search. Destroyed entities keep their slot with
//! `alive == false` until [`Pool::sweep`] runs, so an explosion frame can still
//! be drawn for them.

/// Session-unique entity id
pub type EntityId = u32;

#[derive(Debug, Clone)]
pub struct Slot<T> {
    pub id: EntityId,
    pub alive: bool,
    pub entity: T,
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a live entity. Ids must be strictly increasing.
    pub fn insert(&mut self, id: EntityId, entity: T) {
        debug_assert!(
            self.slots.last().is_none_or(|s| s.id < id),
            "pool ids must increase"
        );
        self.slots.push(Slot {
            id,
            alive: true,
            entity,
        });
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position(id).map(|i| &self.slots[i].entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.position(id).map(move |i| &mut self.slots[i].entity)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.position(id).is_some_and(|i| self.slots[i].alive)
    }

    /// Flag an entity as destroyed. Returns false if it was unknown or already destroyed.
    pub fn mark_destroyed(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(i) if self.slots[i].alive => {
                self.slots[i].alive = false;
                true
            }
            _ => false,
        }
    }

    /// Remove an entity immediately (no explosion grace period)
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.position(id).map(|i| self.slots.remove(i).entity)
    }

    /// Drop every destroyed slot, returning the removed ids
    pub fn sweep(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .slots
            .iter()
            .filter(|s| !s.alive)
            .map(|s| s.id)
            .collect();
        if !removed.is_empty() {
            self.slots.retain(|s| s.alive);
        }
        removed
    }

    /// Remove every entity matching `pred`, returning the removed ids
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.slots.retain(|s| {
            if pred(&s.entity) {
                removed.push(s.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of slots, destroyed-but-unswept included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot<T>> {
        self.slots.iter()
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<T>> {
        self.slots.iter_mut()
    }

    /// Live entities with their ids
    pub fn iter_alive(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().filter(|s| s.alive).map(|s| (s.id, &s.entity))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(ids: &[EntityId]) -> Pool<&'static str> {
        let mut pool = Pool::new();
        for &id in ids {
            pool.insert(id, "rock");
        }
        pool
    }

    #[test]
    fn test_lookup_by_id() {
        let mut pool = pool_of(&[2, 5, 9]);
        assert_eq!(pool.get(5), Some(&"rock"));
        assert!(pool.get(3).is_none());
        *pool.get_mut(9).unwrap() = "dust";
        assert_eq!(pool.get(9), Some(&"dust"));
    }

    #[test]
    fn test_destroyed_stay_until_sweep() {
        let mut pool = pool_of(&[1, 2, 3]);
        assert!(pool.mark_destroyed(2));
        assert!(!pool.mark_destroyed(2));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.alive_count(), 2);
        assert!(!pool.is_alive(2));

        assert_eq!(pool.sweep(), vec![2]);
        assert_eq!(pool.ids(), vec![1, 3]);
        assert!(pool.sweep().is_empty());
    }

    #[test]
    fn test_remove_immediately() {
        let mut pool = pool_of(&[4, 6]);
        assert_eq!(pool.remove(4), Some("rock"));
        assert_eq!(pool.remove(4), None);
        assert_eq!(pool.ids(), vec![6]);
    }

    #[test]
    fn test_remove_where() {
        let mut pool = Pool::new();
        pool.insert(1, 10);
        pool.insert(2, 300);
        pool.insert(3, 20);
        assert_eq!(pool.remove_where(|v| *v > 100), vec![2]);
        let alive: Vec<_> = pool.iter_alive().map(|(id, v)| (id, *v)).collect();
        assert_eq!(alive, vec![(1, 10), (3, 20)]);
    }
}
