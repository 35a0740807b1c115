use crate::util::id::StateID;

/// A sparse set of state identifiers.
///
/// This is the visited set used by every graph traversal in this crate:
/// epsilon closures, reachability queries, fragment cloning and NFA
/// compaction. Since the set lives outside of the graph being traversed, no
/// state ever needs a transient "visited" marker.
///
/// This supports constant time addition and membership testing. Clearing an
/// entire set can also be done in constant time. Iteration yields elements
/// in the order in which they were inserted.
///
/// The data structure is based on: https://research.swtch.com/sparse
/// Note though that we don't actually use uninitialized memory. We generally
/// reuse sparse sets, so the initial allocation cost is bareable. However, its
/// other properties listed above are extremely useful.
#[derive(Clone)]
pub(crate) struct SparseSet {
    /// The number of elements currently in this set.
    len: usize,
    /// Dense contains the ids in the order in which they were inserted.
    dense: Vec<StateID>,
    /// Sparse maps ids to their location in dense.
    ///
    /// A state ID is in the set if and only if
    /// sparse[id] < len && id == dense[sparse[id]].
    sparse: Vec<StateID>,
}

impl SparseSet {
    /// Create a new sparse set with the given capacity.
    ///
    /// Sparse sets have a fixed size and they cannot grow. Attempting to
    /// insert more distinct elements than the total capacity of the set will
    /// result in a panic.
    ///
    /// This panics if the capacity given is bigger than `StateID::LIMIT`.
    #[inline]
    pub(crate) fn new(capacity: usize) -> SparseSet {
        let mut set = SparseSet { len: 0, dense: vec![], sparse: vec![] };
        set.resize(capacity);
        set
    }

    /// Resizes this sparse set to have the new capacity given.
    ///
    /// This set is automatically cleared.
    #[inline]
    pub(crate) fn resize(&mut self, new_capacity: usize) {
        assert!(
            new_capacity <= StateID::LIMIT,
            "sparse set capacity cannot excced {:?}",
            StateID::LIMIT
        );
        self.clear();
        self.dense.resize(new_capacity, StateID::ZERO);
        self.sparse.resize(new_capacity, StateID::ZERO);
    }

    /// Returns the capacity of this set.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.dense.len()
    }

    /// Returns the number of elements in this set.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if and only if this set is empty.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert the state ID value into this set and return true if the given
    /// state ID was not previously in this set.
    ///
    /// If more than `capacity` ids are inserted, then this panics.
    #[inline(always)]
    pub(crate) fn insert(&mut self, value: StateID) -> bool {
        if self.contains(value) {
            return false;
        }

        let i = self.len();
        assert!(
            i < self.capacity(),
            "{:?} exceeds capacity of {:?} when inserting {:?}",
            i,
            self.capacity(),
            value,
        );
        // OK since i < self.capacity() and self.capacity() is guaranteed to
        // be <= StateID::LIMIT.
        let id = StateID::new_unchecked(i);
        self.dense[id] = value;
        self.sparse[value] = id;
        self.len += 1;
        true
    }

    /// Returns true if and only if this set contains the given value.
    #[inline]
    pub(crate) fn contains(&self, value: StateID) -> bool {
        let i = self.sparse[value];
        i.as_usize() < self.len() && self.dense[i] == value
    }

    /// Clear this set such that it has no members.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the members of this set sorted by ID.
    ///
    /// This is the canonical form of a set of NFA states, and is what two
    /// DFA states are compared by.
    pub(crate) fn to_sorted_vec(&self) -> Vec<StateID> {
        let mut ids = self.dense[..self.len()].to_vec();
        ids.sort_unstable();
        ids
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let elements: Vec<StateID> = self.into_iter().collect();
        f.debug_tuple("SparseSet").field(&elements).finish()
    }
}

/// An iterator over all elements in a sparse set.
///
/// The lifetime `'a` refers to the lifetime of the set being iterated over.
#[derive(Debug)]
pub(crate) struct SparseSetIter<'a>(core::slice::Iter<'a, StateID>);

impl<'a> IntoIterator for &'a SparseSet {
    type Item = StateID;
    type IntoIter = SparseSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        SparseSetIter(self.dense[..self.len()].iter())
    }
}

impl<'a> Iterator for SparseSetIter<'a> {
    type Item = StateID;

    #[inline(always)]
    fn next(&mut self) -> Option<StateID> {
        self.0.next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn insert_contains_clear() {
        let mut set = SparseSet::new(10);
        assert!(set.is_empty());
        assert!(set.insert(StateID::must(3)));
        assert!(set.insert(StateID::must(7)));
        assert!(!set.insert(StateID::must(3)));
        assert_eq!(2, set.len());
        assert!(set.contains(StateID::must(7)));
        assert!(!set.contains(StateID::must(0)));

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(StateID::must(3)));
    }

    #[test]
    #[should_panic]
    fn insert_beyond_capacity_panics() {
        let mut set = SparseSet::new(1);
        set.insert(StateID::must(0));
        set.insert(StateID::must(1));
    }

    quickcheck! {
        fn prop_iteration_is_insertion_order(ids: Vec<u8>) -> bool {
            let mut set = SparseSet::new(256);
            let mut expected = vec![];
            for &id in &ids {
                let sid = StateID::must(usize::from(id));
                if set.insert(sid) {
                    expected.push(sid);
                }
            }
            let got: Vec<StateID> = set.into_iter().collect();
            got == expected
        }
    }
}
