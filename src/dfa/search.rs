use crate::{
    dfa::DFA,
    util::{
        alphabet::Units, id::StateID, prefilter::Prefilter, search::MatchKind,
    },
};

/// Returns true if the DFA matches the haystack starting at its beginning.
pub(crate) fn is_match(dfa: &DFA, haystack: &str, kind: MatchKind) -> bool {
    if haystack.is_empty() {
        return dfa.accepts_empty();
    }
    walk(dfa, dfa.text_start(), haystack, kind)
}

/// Returns true if the DFA matches the haystack starting at any character
/// offset, including the offset at the very end.
///
/// Only the walk beginning at offset `0` starts in the text start state.
pub(crate) fn search(
    dfa: &DFA,
    pre: Option<&Prefilter>,
    haystack: &str,
    kind: MatchKind,
) -> bool {
    if is_match(dfa, haystack, kind) {
        return true;
    }
    if let Some(pre) = pre {
        let mut at = 1;
        while let Some(candidate) = pre.find(haystack.as_bytes(), at) {
            if walk(dfa, dfa.start(), &haystack[candidate..], kind) {
                return true;
            }
            at = candidate + 1;
        }
        return false;
    }
    let at_end = if haystack.is_empty() { None } else { Some(haystack.len()) };
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(at_end)
        .any(|at| walk(dfa, dfa.start(), &haystack[at..], kind))
}

/// Walk the DFA over the units of the haystack, starting in `start`.
#[inline]
fn walk(dfa: &DFA, start: StateID, haystack: &str, kind: MatchKind) -> bool {
    let mut sid = start;
    for unit in Units::new(haystack) {
        if kind.stop_at_first_match() && dfa.state(sid).is_accept() {
            return true;
        }
        sid = match dfa.next_state(sid, unit) {
            None => return false,
            Some(next) => next,
        };
    }
    dfa.accepts_at_end(sid)
}
