/// The kind of match semantics to use when walking a DFA.
///
/// The default match kind is `Earliest`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchKind {
    /// Report a match as soon as the walk reaches an accepting state, even
    /// if input remains. Since the walk starts in the start state, a pattern
    /// that accepts the empty string matches every input.
    Earliest,
    /// Report a match only if the walk consumes the entire input and ends in
    /// a state that accepts at the end of input.
    Full,
}

impl MatchKind {
    /// Returns true if a walk may stop as soon as it sees an accepting
    /// state.
    pub(crate) fn stop_at_first_match(&self) -> bool {
        *self == MatchKind::Earliest
    }
}

impl Default for MatchKind {
    fn default() -> MatchKind {
        MatchKind::Earliest
    }
}
