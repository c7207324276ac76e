//! Index based node storage shared by the tree indexes.

pub(crate) type NodeId = usize;

/// Slot vector with a free list, freed ids are reused by later allocations.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, value: T) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id].is_none());
                self.slots[id] = Some(value);
                id
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    /// Remove and return the value at `id`.
    ///
    /// Panics if `id` is not allocated (internal invariant).
    pub fn take(&mut self, id: NodeId) -> T {
        let value = self.slots[id].take();
        self.free.push(id);
        match value {
            Some(v) => v,
            None => panic!("node {id} taken twice"),
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    /// Number of allocated values.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id, v)))
    }
}

impl<T> std::ops::Index<NodeId> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(v) => v,
            None => panic!("node {id} is not allocated"),
        }
    }
}

impl<T> std::ops::IndexMut<NodeId> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(v) => v,
            None => panic!("node {id} is not allocated"),
        }
    }
}
