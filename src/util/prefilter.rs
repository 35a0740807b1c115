/*!
A prefilter for quickly skipping to offsets where a match could begin.

A prefilter is only built when every transition out of a DFA's start state
is labeled with one of at most three ASCII literals, and the start state
itself does not accept. In that case, a walk can only succeed from an offset
holding one of those bytes, so `memchr` (or `memchr2`/`memchr3`) can find
candidate offsets far faster than trying each offset in turn.
*/

use crate::{dfa::DFA, util::alphabet::Label};

/// A byte-oriented candidate finder.
#[derive(Clone, Debug)]
pub(crate) enum Prefilter {
    Memchr(u8),
    Memchr2(u8, u8),
    Memchr3(u8, u8, u8),
}

impl Prefilter {
    /// Build a prefilter for the given DFA, if one applies.
    pub(crate) fn new(dfa: &DFA) -> Option<Prefilter> {
        let start = dfa.state(dfa.start());
        if start.is_accept() {
            debug!("prefilter building failed: start state accepts");
            return None;
        }
        let mut bytes = vec![];
        for &(ref label, _) in start.transitions() {
            match *label {
                Label::Literal(c) if c.is_ascii() => bytes.push(c as u8),
                _ => {
                    debug!(
                        "prefilter building failed: start state has \
                         non-literal transition on {}",
                        label,
                    );
                    return None;
                }
            }
        }
        match bytes.len() {
            0 => {
                debug!("prefilter building failed: no start transitions");
                None
            }
            1 => {
                debug!("prefilter built: memchr");
                Some(Prefilter::Memchr(bytes[0]))
            }
            2 => {
                debug!("prefilter built: memchr2");
                Some(Prefilter::Memchr2(bytes[0], bytes[1]))
            }
            3 => {
                debug!("prefilter built: memchr3");
                Some(Prefilter::Memchr3(bytes[0], bytes[1], bytes[2]))
            }
            _ => {
                debug!(
                    "prefilter building failed: {} start literals",
                    bytes.len(),
                );
                None
            }
        }
    }

    /// Returns the first offset at or after `at` where a match could begin.
    ///
    /// Since every needle is ASCII, the returned offset is always on a
    /// character boundary.
    pub(crate) fn find(&self, haystack: &[u8], at: usize) -> Option<usize> {
        let hay = haystack.get(at..)?;
        let found = match *self {
            Prefilter::Memchr(b1) => memchr::memchr(b1, hay),
            Prefilter::Memchr2(b1, b2) => memchr::memchr2(b1, b2, hay),
            Prefilter::Memchr3(b1, b2, b3) => {
                memchr::memchr3(b1, b2, b3, hay)
            }
        };
        found.map(|i| at + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::thompson::NFA;

    fn prefilter(pattern: &str) -> Option<Prefilter> {
        let dfa = DFA::new(&NFA::new(pattern).unwrap()).unwrap();
        Prefilter::new(&dfa)
    }

    #[test]
    fn strategies() {
        assert!(matches!(prefilter("abc"), Some(Prefilter::Memchr(b'a'))));
        assert!(matches!(prefilter("a|b"), Some(Prefilter::Memchr2(..))));
        assert!(matches!(
            prefilter("(x|y|z)+"),
            Some(Prefilter::Memchr3(..))
        ));
        assert!(prefilter("a|b|c|d").is_none());
        assert!(prefilter("[ab]c").is_none());
        assert!(prefilter(r"\+").is_none());
        assert!(prefilter("a*").is_none());
        assert!(prefilter("^a").is_none());
        assert!(prefilter("é").is_none());
    }

    #[test]
    fn find() {
        let pre = Prefilter::Memchr2(b'x', b'y');
        assert_eq!(pre.find(b"abxcy", 0), Some(2));
        assert_eq!(pre.find(b"abxcy", 3), Some(4));
        assert_eq!(pre.find(b"abxcy", 5), None);
        assert_eq!(pre.find(b"abxcy", 9), None);
    }
}
