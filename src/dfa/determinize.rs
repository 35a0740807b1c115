use std::collections::{BTreeSet, HashMap};

use crate::{
    dfa::{State, DFA},
    error::Error,
    nfa::thompson::NFA,
    util::{
        alphabet::{self, Label},
        id::StateID,
        sparse_set::SparseSet,
    },
};

/// A builder for converting an NFA into a DFA via subset construction.
///
/// # Example
///
/// This shows how to bound the number of DFA states, which is otherwise
/// exponential in the number of NFA states in the worst case.
///
/// ```
/// use regex_subset::{dfa::Determinizer, nfa::thompson::NFA, ErrorKind};
///
/// let nfa = NFA::new("[ab]*a[ab]{6}")?;
/// let result = Determinizer::new().state_limit(Some(50)).build(&nfa);
/// let err = result.unwrap_err();
/// assert_eq!(&ErrorKind::TooManyStates { limit: 50 }, err.kind());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Determinizer {
    state_limit: Option<usize>,
}

impl Determinizer {
    /// Create a new determinizer with no state limit.
    pub fn new() -> Determinizer {
        Determinizer::default()
    }

    /// Set the maximum number of DFA states that construction may create.
    /// If construction would exceed it, an error is returned instead.
    ///
    /// This is disabled by default.
    pub fn state_limit(mut self, limit: Option<usize>) -> Determinizer {
        self.state_limit = limit;
        self
    }

    /// Returns the configured state limit, if any.
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit
    }

    /// Build a DFA from the given NFA.
    pub fn build(&self, nfa: &NFA) -> Result<DFA, Error> {
        let dfa = Runner {
            nfa,
            limit: self.state_limit,
            states: vec![],
            cache: HashMap::new(),
            stack: vec![],
        }
        .run()?;
        debug!("built DFA with {} states", dfa.len());
        Ok(dfa)
    }
}

/// The state of a single subset construction.
struct Runner<'a> {
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    limit: Option<usize>,
    /// The DFA states built so far. A state's transitions are filled in once
    /// it is taken off the worklist.
    states: Vec<State>,
    /// A map from sorted sets of NFA states to the DFA state standing for
    /// them.
    cache: HashMap<Vec<StateID>, StateID>,
    /// A stack of NFA states to visit, for depth first visiting.
    stack: Vec<StateID>,
}

impl<'a> Runner<'a> {
    fn run(mut self) -> Result<DFA, Error> {
        let mut sparse = SparseSet::new(self.nfa.len());
        let mut uncompiled = vec![];

        self.epsilon_closure(self.nfa.start(), &mut sparse);
        let (start, _) = self.cached_state(&sparse)?;
        uncompiled.push(start);

        self.anchor_closure(&[Label::StartAnchor], &mut sparse);
        let (text_start, is_new) = self.cached_state(&sparse)?;
        if is_new {
            uncompiled.push(text_start);
        }
        // In an empty haystack, `^` and `$` both hold at the same position
        // and may be crossed in any order.
        self.anchor_closure(
            &[Label::StartAnchor, Label::EndAnchor],
            &mut sparse,
        );
        let nfa = self.nfa;
        let mut accepts_empty = false;
        for nfa_id in &sparse {
            accepts_empty = accepts_empty || nfa.state(nfa_id).is_accept();
        }

        while let Some(dfa_id) = uncompiled.pop() {
            let labels = self.labels(dfa_id);
            let mut transitions = Vec::with_capacity(labels.len());
            for label in labels {
                self.next(dfa_id, &[&label], &mut sparse);
                if sparse.is_empty() {
                    continue;
                }
                let (next_id, is_new) = self.cached_state(&sparse)?;
                if is_new {
                    uncompiled.push(next_id);
                }
                transitions.push((label, next_id));
            }
            let sets: Vec<usize> = transitions
                .iter()
                .enumerate()
                .filter(|&(_, &(ref label, _))| label.is_set())
                .map(|(i, _)| i)
                .collect();

            let mut overlaps = vec![];
            if sets.len() >= 2 {
                let set_labels: Vec<&Label> =
                    sets.iter().map(|&i| &transitions[i].0).collect();
                for combo in alphabet::overlapping_combinations(&set_labels) {
                    let labels: Vec<&Label> =
                        combo.iter().map(|&j| set_labels[j]).collect();
                    self.next(dfa_id, &labels, &mut sparse);
                    let (next_id, is_new) = self.cached_state(&sparse)?;
                    if is_new {
                        uncompiled.push(next_id);
                    }
                    let indices = combo.iter().map(|&j| sets[j]).collect();
                    overlaps.push((indices, next_id));
                }
            }

            let state = &mut self.states[dfa_id];
            state.transitions = transitions;
            state.sets = sets;
            state.overlaps = overlaps;
        }
        Ok(DFA { states: self.states, start, text_start, accepts_empty })
    }

    /// Return every distinct label on a transition out of the NFA states
    /// making up the given DFA state, in sorted order.
    fn labels(&self, dfa_id: StateID) -> Vec<Label> {
        let nfa = self.nfa;
        let mut labels = BTreeSet::new();
        for &nfa_id in &self.states[dfa_id].substates {
            for &(ref label, _) in nfa.state(nfa_id).transitions() {
                labels.insert(label);
            }
        }
        labels.into_iter().cloned().collect()
    }

    /// Compute the epsilon closure of every NFA state reachable from the
    /// given DFA state by following any one of the given labels, and store
    /// it in `next_nfa_states`.
    ///
    /// A label naming a single unit of input (a literal or an escape) also
    /// follows every other label that matches that unit, since a walk will
    /// take the transition on that label whenever the unit is seen.
    fn next(
        &mut self,
        dfa_id: StateID,
        labels: &[&Label],
        next_nfa_states: &mut SparseSet,
    ) {
        let nfa = self.nfa;
        next_nfa_states.clear();
        for i in 0..self.states[dfa_id].substates.len() {
            let nfa_id = self.states[dfa_id].substates[i];
            for &(ref l, to) in nfa.state(nfa_id).transitions() {
                let hit = labels.iter().any(|&label| {
                    l == label || label.as_unit().map_or(false, |u| l.matches(u))
                });
                if hit {
                    self.epsilon_closure(to, next_nfa_states);
                }
            }
        }
    }

    /// Extend `set` with everything reachable by following transitions on
    /// the given anchors any number of times.
    fn anchor_closure(&mut self, anchors: &[Label], set: &mut SparseSet) {
        let nfa = self.nfa;
        let mut seen = 0;
        loop {
            let pending: Vec<StateID> = set.into_iter().skip(seen).collect();
            if pending.is_empty() {
                return;
            }
            seen += pending.len();
            for nfa_id in pending {
                for anchor in anchors {
                    if let Some(to) = nfa.state(nfa_id).next(anchor) {
                        self.epsilon_closure(to, set);
                    }
                }
            }
        }
    }

    fn epsilon_closure(&mut self, start: StateID, set: &mut SparseSet) {
        let nfa = self.nfa;
        self.stack.push(start);
        while let Some(id) = self.stack.pop() {
            if !set.insert(id) {
                continue;
            }
            self.stack.extend(nfa.state(id).epsilons().iter().rev());
        }
    }

    /// Return the DFA state for the given set of NFA states, creating it if
    /// it doesn't exist yet. The boolean is true when the state is new.
    fn cached_state(
        &mut self,
        set: &SparseSet,
    ) -> Result<(StateID, bool), Error> {
        let substates = set.to_sorted_vec();
        if let Some(&id) = self.cache.get(&substates) {
            return Ok((id, false));
        }
        if let Some(limit) = self.limit {
            if self.states.len() >= limit {
                return Err(Error::too_many_states(limit));
            }
        }
        let id = StateID::new(self.states.len())
            .map_err(|_| Error::too_many_states(StateID::LIMIT))?;
        let nfa = self.nfa;
        let accept = substates.iter().any(|&s| nfa.state(s).is_accept());
        trace!(
            "new DFA state {}: accept={:?}, substates={:?}",
            id.as_usize(),
            accept,
            substates,
        );
        self.cache.insert(substates.clone(), id);
        self.states.push(State {
            accept,
            substates,
            transitions: vec![],
            sets: vec![],
            overlaps: vec![],
        });
        Ok((id, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, nfa::thompson::Builder, util::alphabet::Unit};

    fn dfa(pattern: &str) -> DFA {
        DFA::new(&NFA::new(pattern).unwrap()).unwrap()
    }

    #[test]
    fn start_state() {
        let dfa = dfa("a*b");
        let start = dfa.state(dfa.start());
        assert!(!start.is_accept());
        assert_eq!(2, start.transitions().len());
        assert_eq!(StateID::ZERO, dfa.start());
    }

    #[test]
    fn equal_subsets_are_one_state() {
        // Every 'a' leads back to the same set of NFA states.
        let dfa = dfa("a+");
        assert_eq!(2, dfa.len());
        let sid = dfa.next_state(dfa.start(), Unit::Char('a')).unwrap();
        assert_eq!(Some(sid), dfa.next_state(sid, Unit::Char('a')));
    }

    #[test]
    fn no_dead_state() {
        let dfa = dfa("ab");
        assert_eq!(3, dfa.len());
        for state in dfa.states() {
            assert!(state.transitions().len() <= 1);
        }
    }

    #[test]
    fn accept_iff_substate_accepts() {
        let nfa = NFA::new("a|bc").unwrap();
        let dfa = DFA::new(&nfa).unwrap();
        for state in dfa.states() {
            let expected =
                state.substates().iter().any(|&s| nfa.state(s).is_accept());
            assert_eq!(expected, state.is_accept());
        }
    }

    #[test]
    fn epsilon_cycles_terminate() {
        let mut b = Builder::new();
        let s0 = b.add_state(false).unwrap();
        let s1 = b.add_state(false).unwrap();
        let s2 = b.add_state(true).unwrap();
        b.add_epsilon(s0, s1);
        b.add_epsilon(s1, s0);
        b.add_transition(s1, Label::Literal('x'), s2);
        let dfa = DFA::new(&b.build(s0).unwrap()).unwrap();
        assert_eq!(2, dfa.len());
        assert_eq!(2, dfa.state(dfa.start()).substates().len());
    }

    #[test]
    fn repeated_start_anchors() {
        let dfa = dfa("^^a");
        let sid = dfa.next_state(dfa.text_start(), Unit::Char('a')).unwrap();
        assert!(dfa.accepts_at_end(sid));
    }

    #[test]
    fn empty_haystack_crosses_anchors_in_any_order() {
        assert!(dfa("$^").accepts_empty());
        assert!(dfa("a*$^").accepts_empty());
        assert!(dfa("a|$^").accepts_empty());
        assert!(dfa("^$").accepts_empty());
        assert!(!dfa("$^a").accepts_empty());
        assert!(!dfa("a").accepts_empty());
    }

    #[test]
    fn state_limit() {
        let nfa = NFA::new("(a|b)*c").unwrap();
        assert!(Determinizer::new().state_limit(Some(10)).build(&nfa).is_ok());
        let err =
            Determinizer::new().state_limit(Some(1)).build(&nfa).unwrap_err();
        assert_eq!(&ErrorKind::TooManyStates { limit: 1 }, err.kind());
        assert!(!err.is_syntax());
    }
}
