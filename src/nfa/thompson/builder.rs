use crate::{
    error::Error,
    nfa::thompson::nfa::{State, NFA},
    util::{alphabet::Label, id::StateID, sparse_set::SparseSet},
};

/// A low level builder for assembling an NFA state by state.
///
/// States are added to an arena and refer to each other by [`StateID`].
/// Any graph shape is permitted, including cycles and states that are never
/// reached. Calling [`Builder::build`] keeps only the states reachable from
/// the given start state and renumbers them densely, starting with the start
/// state at ID `0`.
///
/// The [`Compiler`](crate::nfa::thompson::Compiler) uses this builder to
/// implement Thompson's construction, but it can also be used directly.
///
/// # Example
///
/// This builds an NFA equivalent to `ab*` by hand.
///
/// ```
/// use regex_subset::{
///     dfa::DFA,
///     nfa::thompson::Builder,
///     util::alphabet::Label,
/// };
///
/// let mut builder = Builder::new();
/// let s0 = builder.add_state(false)?;
/// let s1 = builder.add_state(true)?;
/// builder.add_transition(s0, Label::Literal('a'), s1);
/// builder.add_transition(s1, Label::Literal('b'), s1);
/// let nfa = builder.build(s0)?;
/// assert_eq!(2, nfa.len());
///
/// let dfa = DFA::new(&nfa)?;
/// assert_eq!(2, dfa.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    states: Vec<State>,
}

impl Builder {
    /// Create a new builder with no states.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Remove all states from this builder, so that it can be reused.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Returns the number of states added so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no states have been added.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Add a new state with no transitions and return its ID.
    ///
    /// This returns an error if the builder already contains
    /// [`StateID::LIMIT`] states.
    pub fn add_state(&mut self, accept: bool) -> Result<StateID, Error> {
        let id = StateID::new(self.states.len())
            .map_err(|_| Error::too_many_states(StateID::LIMIT))?;
        self.states.push(State { accept, ..State::default() });
        Ok(id)
    }

    /// Add a transition from `from` to `to` on `label`. If `from` already
    /// has a transition on `label`, then it is replaced.
    ///
    /// # Panics
    ///
    /// This panics if `from` was not returned by this builder.
    pub fn add_transition(&mut self, from: StateID, label: Label, to: StateID) {
        self.states[from].set_transition(label, to);
    }

    /// Add an epsilon transition from `from` to `to`. Adding the same
    /// epsilon transition twice has no effect.
    ///
    /// # Panics
    ///
    /// This panics if `from` was not returned by this builder.
    pub fn add_epsilon(&mut self, from: StateID, to: StateID) {
        self.states[from].add_epsilon(to);
    }

    /// Set whether the given state is an accepting state.
    ///
    /// # Panics
    ///
    /// This panics if `id` was not returned by this builder.
    pub fn set_accept(&mut self, id: StateID, yes: bool) {
        self.states[id].accept = yes;
    }

    /// Build an NFA whose start state is `start`.
    ///
    /// Only states reachable from `start` are kept. They are renumbered in
    /// the order a depth first traversal visits them, so `start` becomes
    /// state `0`. Transition targets that do not refer to a state in this
    /// builder result in a panic.
    pub fn build(&self, start: StateID) -> Result<NFA, Error> {
        let mut set = SparseSet::new(self.states.len());
        self.reachable(start, &mut set);

        let mut remap = vec![StateID::ZERO; self.states.len()];
        for (new, old) in set.into_iter().enumerate() {
            // Every kept state already has an ID in this builder, so the
            // renumbered ID is smaller than one we've already handed out.
            remap[old] = StateID::new_unchecked(new);
        }
        let mut states = Vec::with_capacity(set.len());
        for old in &set {
            states.push(self.remap_state(&self.states[old], &remap));
        }
        let nfa = NFA::from_parts(states, StateID::ZERO);
        debug!("built NFA with {} states", nfa.len());
        Ok(nfa)
    }

    /// Insert every state reachable from `start` into `set`, including
    /// `start` itself. The set is cleared and resized first.
    ///
    /// States are inserted in depth first order.
    pub(crate) fn reachable(&self, start: StateID, set: &mut SparseSet) {
        if set.capacity() < self.states.len() {
            set.resize(self.states.len());
        }
        set.clear();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !set.insert(id) {
                continue;
            }
            let state = &self.states[id];
            // Push in reverse so that targets are visited in order.
            let targets: Vec<StateID> = state.targets().collect();
            stack.extend(targets.into_iter().rev());
        }
    }

    /// Return every accepting state reachable from `start`.
    pub(crate) fn accepts(
        &self,
        start: StateID,
        set: &mut SparseSet,
    ) -> Vec<StateID> {
        self.reachable(start, set);
        set.into_iter().filter(|&id| self.states[id].accept).collect()
    }

    /// Returns true if any state reachable from `start` has a transition
    /// back to `start`.
    pub(crate) fn has_incoming(
        &self,
        start: StateID,
        set: &mut SparseSet,
    ) -> bool {
        self.reachable(start, set);
        set.into_iter().any(|id| self.states[id].targets().any(|t| t == start))
    }

    /// Make a deep copy of every state reachable from `start` and return the
    /// copy of `start`. The copy shares no states with the original.
    pub(crate) fn clone_fragment(
        &mut self,
        start: StateID,
        set: &mut SparseSet,
    ) -> Result<StateID, Error> {
        self.reachable(start, set);
        let old: Vec<StateID> = set.into_iter().collect();
        let mut remap = vec![StateID::ZERO; self.states.len()];
        for &id in &old {
            remap[id] = self.add_state(self.states[id].accept)?;
        }
        for &id in &old {
            let copy = self.remap_state(&self.states[id], &remap);
            self.states[remap[id]] = copy;
        }
        Ok(remap[start])
    }

    /// Returns a start state for the fragment at `start` that has no
    /// incoming transitions.
    ///
    /// If `start` already has none, it is returned as is. Otherwise, a new
    /// state with a single epsilon transition to `start` is returned.
    pub(crate) fn isolate(
        &mut self,
        start: StateID,
        set: &mut SparseSet,
    ) -> Result<StateID, Error> {
        if !self.has_incoming(start, set) {
            return Ok(start);
        }
        let id = self.add_state(false)?;
        self.add_epsilon(id, start);
        Ok(id)
    }

    fn remap_state(&self, state: &State, remap: &[StateID]) -> State {
        State {
            accept: state.accept,
            transitions: state
                .transitions
                .iter()
                .map(|&(ref label, to)| (label.clone(), remap[to]))
                .collect(),
            epsilons: state.epsilons.iter().map(|&to| remap[to]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(c: char) -> Label {
        Label::Literal(c)
    }

    #[test]
    fn build_drops_unreachable_states() {
        let mut b = Builder::new();
        let unreachable = b.add_state(true).unwrap();
        let s1 = b.add_state(false).unwrap();
        let s2 = b.add_state(true).unwrap();
        b.add_transition(s1, lit('a'), s2);
        b.add_transition(unreachable, lit('x'), s1);
        let nfa = b.build(s1).unwrap();

        assert_eq!(2, nfa.len());
        assert_eq!(StateID::ZERO, nfa.start());
        let start = nfa.state(nfa.start());
        assert!(!start.is_accept());
        let next = start.next(&lit('a')).unwrap();
        assert_eq!(StateID::must(1), next);
        assert!(nfa.state(next).is_accept());
    }

    #[test]
    fn build_handles_cycles() {
        let mut b = Builder::new();
        let s0 = b.add_state(false).unwrap();
        let s1 = b.add_state(true).unwrap();
        b.add_transition(s0, lit('a'), s1);
        b.add_epsilon(s1, s0);
        let nfa = b.build(s0).unwrap();
        assert_eq!(2, nfa.len());
        assert_eq!(nfa.state(StateID::must(1)).epsilons(), &[StateID::ZERO]);
    }

    #[test]
    fn accepts_and_incoming() {
        let mut set = SparseSet::new(0);
        let mut b = Builder::new();
        let s0 = b.add_state(false).unwrap();
        let s1 = b.add_state(true).unwrap();
        let s2 = b.add_state(true).unwrap();
        b.add_transition(s0, lit('a'), s1);
        b.add_epsilon(s0, s2);
        assert_eq!(b.accepts(s0, &mut set), vec![s1, s2]);
        assert!(!b.has_incoming(s0, &mut set));

        b.add_epsilon(s1, s0);
        assert!(b.has_incoming(s0, &mut set));
        let isolated = b.isolate(s0, &mut set).unwrap();
        assert_ne!(isolated, s0);
        assert!(!b.has_incoming(isolated, &mut set));
        assert_eq!(b.isolate(isolated, &mut set).unwrap(), isolated);
    }

    #[test]
    fn clones_are_independent() {
        let mut set = SparseSet::new(0);
        let mut b = Builder::new();
        let s0 = b.add_state(false).unwrap();
        let s1 = b.add_state(true).unwrap();
        b.add_transition(s0, lit('a'), s1);
        b.add_epsilon(s1, s0);

        let c0 = b.clone_fragment(s0, &mut set).unwrap();
        assert_eq!(4, b.len());
        let c1 = b.states[c0].next(&lit('a')).unwrap();
        assert_ne!(c1, s1);
        assert_eq!(b.states[c1].epsilons(), &[c0]);

        // Mutating the copy leaves the original alone.
        b.set_accept(c1, false);
        assert!(b.states[s1].is_accept());
        assert_eq!(b.accepts(s0, &mut set), vec![s1]);
        assert!(b.accepts(c0, &mut set).is_empty());
    }
}
