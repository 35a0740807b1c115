/*!
A deterministic finite automaton (DFA) built by subset construction.

Each DFA state stands for a set of NFA states (its "substates"), and two DFA
states are the same state exactly when their substate sets are equal. A DFA
has at most one transition per label out of each state, so walking it over
some input never requires backtracking.

Since labels can overlap (for example, `.` and `[a-z]` both match `q`), a
state also carries an overlap table: for each combination of its set-like
labels that a single character can match at once, the state reached by
following all of them together. See [`State::next_unit`] for how a unit of
input picks its transition.

# Example

```
use regex_subset::{dfa::DFA, nfa::thompson::NFA, util::alphabet::Unit};

let dfa = DFA::new(&NFA::new("a[a-z]")?)?;
let mut sid = dfa.start();
for unit in [Unit::Char('a'), Unit::Char('q')].iter() {
    sid = dfa.next_state(sid, *unit).unwrap();
}
assert!(dfa.accepts_at_end(sid));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use core::fmt;

use crate::{
    error::Error,
    nfa::thompson::NFA,
    util::{
        alphabet::{Label, Unit},
        id::StateID,
    },
};

pub use self::determinize::Determinizer;

mod determinize;
pub(crate) mod search;

/// A deterministic finite automaton over [`Unit`]s of input.
///
/// A DFA has two start states. [`DFA::text_start`] is used when a walk
/// begins at the very start of a haystack, where `^` is satisfied.
/// [`DFA::start`] is used everywhere else. The two are the same state when
/// the pattern has no `^` that can be reached without consuming input.
#[derive(Clone)]
pub struct DFA {
    states: Vec<State>,
    start: StateID,
    text_start: StateID,
    accepts_empty: bool,
}

impl DFA {
    /// Build a DFA from the given NFA with a default [`Determinizer`].
    pub fn new(nfa: &NFA) -> Result<DFA, Error> {
        Determinizer::new().build(nfa)
    }

    /// Return the ID of the start state used when a walk does not begin at
    /// the start of a haystack.
    #[inline]
    pub fn start(&self) -> StateID {
        self.start
    }

    /// Return the ID of the start state used when a walk begins at the
    /// start of a haystack.
    #[inline]
    pub fn text_start(&self) -> StateID {
        self.text_start
    }

    /// Return the state with the given ID.
    ///
    /// # Panics
    ///
    /// This panics if the ID does not belong to this DFA.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }

    /// Returns a slice of all states in this DFA, indexed by `StateID`.
    #[inline]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the total number of states in this DFA.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if this DFA has no states. This is never true for a DFA
    /// built by this crate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Return the state reached from `id` by consuming `unit`, or `None` if
    /// the walk fails there.
    #[inline]
    pub fn next_state(&self, id: StateID, unit: Unit) -> Option<StateID> {
        self.states[id].next_unit(unit)
    }

    /// Returns true if an empty haystack matches.
    ///
    /// In an empty haystack the start of text is also its end, so `^` and
    /// `$` may be crossed in any order. [`DFA::accepts_at_end`] on the text
    /// start state only follows `$`, which misses patterns like `$^`.
    #[inline]
    pub fn accepts_empty(&self) -> bool {
        self.accepts_empty
    }

    /// Returns true if the state `id` accepts at the end of input. That is,
    /// if it is accepting or if following `$` transitions from it reaches an
    /// accepting state.
    pub fn accepts_at_end(&self, mut id: StateID) -> bool {
        // A chain of `$` transitions never needs to visit a state twice.
        for _ in 0..self.states.len() {
            let state = &self.states[id];
            if state.is_accept() {
                return true;
            }
            id = match state.next(&Label::EndAnchor) {
                None => return false,
                Some(next) => next,
            };
        }
        false
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dfa::DFA(")?;
        for (i, state) in self.states.iter().enumerate() {
            let id = StateID::new_unchecked(i);
            let status = if id == self.start {
                '^'
            } else if id == self.text_start {
                '>'
            } else {
                ' '
            };
            let accept = if state.is_accept() { '*' } else { ' ' };
            writeln!(f, "{}{}{:06?}: {:?}", accept, status, i, state)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// A state in a DFA.
#[derive(Clone, Eq, PartialEq)]
pub struct State {
    accept: bool,
    substates: Vec<StateID>,
    /// Sorted by label.
    transitions: Vec<(Label, StateID)>,
    /// Indices into `transitions` of the set-like labels.
    sets: Vec<usize>,
    overlaps: Vec<(Vec<usize>, StateID)>,
}

impl State {
    /// Returns true if this is an accepting state.
    #[inline]
    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// Returns the sorted IDs of the NFA states that this state stands for.
    #[inline]
    pub fn substates(&self) -> &[StateID] {
        &self.substates
    }

    /// Returns this state's labeled transitions, sorted by label.
    #[inline]
    pub fn transitions(&self) -> &[(Label, StateID)] {
        &self.transitions
    }

    /// Returns this state's overlap table.
    ///
    /// Each entry is a set of two or more indices into
    /// [`State::transitions`], all of them set-like labels, paired with the
    /// state reached when a unit matches exactly those labels.
    #[inline]
    pub fn overlaps(&self) -> &[(Vec<usize>, StateID)] {
        &self.overlaps
    }

    /// Returns the target of the transition on the given label, if one
    /// exists.
    pub fn next(&self, label: &Label) -> Option<StateID> {
        self.transitions
            .binary_search_by(|&(ref l, _)| l.cmp(label))
            .ok()
            .map(|i| self.transitions[i].1)
    }

    /// Return the state reached by consuming `unit` from this state.
    ///
    /// A literal or escape label that is exactly the unit wins. Otherwise,
    /// the set-like labels matching the unit decide: none means there is no
    /// transition, one means its transition is taken and several means the
    /// overlap table entry for that combination is taken.
    pub fn next_unit(&self, unit: Unit) -> Option<StateID> {
        let exact = match unit {
            Unit::Char(c) => Label::Literal(c),
            Unit::Escape(c) => Label::Escape(c),
        };
        if let Some(next) = self.next(&exact) {
            return Some(next);
        }
        let mut first = None;
        let mut count = 0;
        for &i in &self.sets {
            if self.transitions[i].0.matches(unit) {
                count += 1;
                first = first.or(Some(i));
            }
        }
        match count {
            0 => None,
            1 => first.map(|i| self.transitions[i].1),
            _ => self
                .overlaps
                .iter()
                .find(|&&(ref combo, _)| {
                    combo.len() == count
                        && combo
                            .iter()
                            .all(|&i| self.transitions[i].0.matches(unit))
                })
                .map(|&(_, next)| next),
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for &(ref label, to) in &self.transitions {
            parts.push(format!("{} => {}", label, to.as_usize()));
        }
        for &(ref combo, to) in &self.overlaps {
            let labels: Vec<String> = combo
                .iter()
                .map(|&i| self.transitions[i].0.to_string())
                .collect();
            parts.push(format!("{} => {}", labels.join("&"), to.as_usize()));
        }
        write!(f, "{}", parts.join(", "))
    }
}
