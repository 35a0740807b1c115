use core::fmt;

use std::sync::Arc;

use crate::{
    error::Error,
    nfa::thompson::compiler::Compiler,
    util::{alphabet::Label, id::StateID},
};

/// A Thompson non-deterministic finite automaton (NFA).
///
/// An NFA is a graph of states stored in an arena and addressed by
/// [`StateID`]. Each state has zero or more labeled transitions (at most one
/// per label), zero or more epsilon transitions and an accept flag. Cycles
/// are permitted and are created by the `+` and `*` operators.
///
/// An NFA built by this crate contains only states that are reachable from
/// its start state, and the start state always has ID `0`.
///
/// An NFA cannot be searched directly. Instead, it is converted to a
/// [`DFA`](crate::dfa::DFA) via subset construction.
///
/// Cloning an NFA is cheap since its states are reference counted.
///
/// # Example
///
/// ```
/// use regex_subset::{nfa::thompson::NFA, util::alphabet::Label};
///
/// let nfa = NFA::new("ab")?;
/// let start = nfa.state(nfa.start());
/// assert!(!start.is_accept());
/// assert!(start.next(&Label::Literal('a')).is_some());
/// assert!(start.next(&Label::Literal('b')).is_none());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct NFA(Arc<Inner>);

#[derive(Debug)]
struct Inner {
    states: Vec<State>,
    start: StateID,
}

impl NFA {
    /// Parse the given pattern and build an NFA from it.
    pub fn new(pattern: &str) -> Result<NFA, Error> {
        NFA::compiler().build(pattern)
    }

    /// Return a compiler for building an NFA from a pattern or from a
    /// postfix token sequence.
    pub fn compiler() -> Compiler {
        Compiler::new()
    }

    pub(super) fn from_parts(states: Vec<State>, start: StateID) -> NFA {
        NFA(Arc::new(Inner { states, start }))
    }

    /// Return the ID of this NFA's start state.
    #[inline]
    pub fn start(&self) -> StateID {
        self.0.start
    }

    /// Return the state with the given ID.
    ///
    /// # Panics
    ///
    /// This panics if the ID does not belong to this NFA.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.0.states[id]
    }

    /// Returns a slice of all states in this NFA, indexed by `StateID`.
    #[inline]
    pub fn states(&self) -> &[State] {
        &self.0.states
    }

    /// Returns the total number of states in this NFA.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.states.len()
    }

    /// Returns true if this NFA has no states. This is never true for an NFA
    /// built by this crate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.states.is_empty()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "thompson::NFA(")?;
        for (i, state) in self.states().iter().enumerate() {
            let status = if i == self.start().as_usize() { '^' } else { ' ' };
            writeln!(f, "{}{:06?}: {:?}", status, i, state)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// A state in an NFA.
///
/// Labeled transitions are sorted by label. No two labeled transitions share
/// a label.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct State {
    pub(super) accept: bool,
    pub(super) transitions: Vec<(Label, StateID)>,
    pub(super) epsilons: Vec<StateID>,
}

impl State {
    /// Returns true if this is an accepting state.
    #[inline]
    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// Returns this state's labeled transitions, sorted by label.
    #[inline]
    pub fn transitions(&self) -> &[(Label, StateID)] {
        &self.transitions
    }

    /// Returns the targets of this state's epsilon transitions.
    #[inline]
    pub fn epsilons(&self) -> &[StateID] {
        &self.epsilons
    }

    /// Returns the target of the transition on the given label, if one
    /// exists.
    pub fn next(&self, label: &Label) -> Option<StateID> {
        self.transitions
            .binary_search_by(|&(ref l, _)| l.cmp(label))
            .ok()
            .map(|i| self.transitions[i].1)
    }

    /// Add or replace the transition on `label`, keeping transitions sorted.
    pub(super) fn set_transition(&mut self, label: Label, to: StateID) {
        match self.transitions.binary_search_by(|&(ref l, _)| l.cmp(&label))
        {
            Ok(i) => self.transitions[i].1 = to,
            Err(i) => self.transitions.insert(i, (label, to)),
        }
    }

    /// Add an epsilon transition to `to` unless one already exists.
    pub(super) fn add_epsilon(&mut self, to: StateID) {
        if !self.epsilons.contains(&to) {
            self.epsilons.push(to);
        }
    }

    /// Iterate over the targets of every transition out of this state,
    /// labeled ones first.
    pub(super) fn targets(&self) -> impl Iterator<Item = StateID> + '_ {
        self.transitions
            .iter()
            .map(|&(_, to)| to)
            .chain(self.epsilons.iter().copied())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for &(ref label, to) in &self.transitions {
            parts.push(format!("{} => {}", label, to.as_usize()));
        }
        for &to in &self.epsilons {
            parts.push(format!("ε => {}", to.as_usize()));
        }
        if self.accept {
            write!(f, "accept(")?;
        } else {
            write!(f, "(")?;
        }
        write!(f, "{})", parts.join(", "))
    }
}
