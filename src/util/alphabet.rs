/*!
Transition labels and units of input.

A [`Label`] is what sits on a transition in an NFA or a DFA. A [`Unit`] is a
single element of input, produced by splitting a haystack with the same
escape rule that the tokenizer applies to patterns: a `\` followed by a
character is one unit. Searching walks a DFA one unit at a time and asks
each candidate label whether it [matches](Label::matches) the unit.

Some labels name exactly one unit (literals and escapes). Others stand for a
set of units (`.`, bracketed classes and the `\s`/`\w`/`\d` shorthands).
Since several set-like labels can match the same unit, determinization
needs to know which combinations of them can actually occur together. That
is computed by [`overlapping_combinations`], which partitions the space of
characters at the boundaries of every range involved, much like byte
equivalence classes partition the 256 possible bytes.
*/

use core::fmt;

use std::collections::BTreeSet;

use crate::syntax::{Class, Token};

/// A single unit of input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Unit {
    /// Any character that is not part of an escape.
    Char(char),
    /// A `\` followed by the given character.
    Escape(char),
}

/// An iterator over the units of a haystack.
///
/// Unlike the tokenizer, this never fails: a trailing `\` is simply a
/// `Unit::Char('\\')`.
#[derive(Clone, Debug)]
pub struct Units<'h> {
    chars: core::str::Chars<'h>,
}

impl<'h> Units<'h> {
    /// Create an iterator over the units in the given haystack.
    pub fn new(haystack: &'h str) -> Units<'h> {
        Units { chars: haystack.chars() }
    }
}

impl<'h> Iterator for Units<'h> {
    type Item = Unit;

    #[inline]
    fn next(&mut self) -> Option<Unit> {
        let c = self.chars.next()?;
        if c != '\\' {
            return Some(Unit::Char(c));
        }
        Some(match self.chars.next() {
            None => Unit::Char('\\'),
            Some(escaped) => Unit::Escape(escaped),
        })
    }
}

/// The label on a transition.
///
/// Labels are totally ordered so that transition tables built from them are
/// deterministic.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Label {
    /// Matches exactly `Unit::Char(c)`.
    Literal(char),
    /// Matches exactly `Unit::Escape(c)`. If `c` is one of `s`, `w`, `d`,
    /// `S`, `W` or `D`, this also matches every `Unit::Char` in the
    /// corresponding ASCII class.
    Escape(char),
    /// Matches every `Unit::Char` in the class.
    Class(Class),
    /// Matches any unit.
    Any,
    /// `^`. Never matches a unit. Only followed at the start of a haystack.
    StartAnchor,
    /// `$`. Never matches a unit. Only followed at the end of a haystack.
    EndAnchor,
}

impl Label {
    /// Convert a token to a label. This returns `None` for operators and
    /// grouping tokens.
    pub fn from_token(tok: &Token) -> Option<Label> {
        Some(match *tok {
            Token::Literal(c) => Label::Literal(c),
            Token::Escape(c) => Label::Escape(c),
            Token::Class(ref class) => Label::Class(class.clone()),
            Token::Any => Label::Any,
            Token::StartAnchor => Label::StartAnchor,
            Token::EndAnchor => Label::EndAnchor,
            _ => return None,
        })
    }

    /// Returns the one unit this label is written as, if any. This is
    /// defined only for literals and escapes.
    pub fn as_unit(&self) -> Option<Unit> {
        match *self {
            Label::Literal(c) => Some(Unit::Char(c)),
            Label::Escape(c) => Some(Unit::Escape(c)),
            _ => None,
        }
    }

    /// Returns true if this label is `^` or `$`.
    pub fn is_anchor(&self) -> bool {
        match *self {
            Label::StartAnchor | Label::EndAnchor => true,
            _ => false,
        }
    }

    /// Returns true if this label stands for a set of characters rather
    /// than one specific unit. That is, `.`, a bracketed class or a
    /// shorthand escape like `\w`.
    pub fn is_set(&self) -> bool {
        match *self {
            Label::Any | Label::Class(_) => true,
            Label::Escape(c) => Shorthand::new(c).is_some(),
            _ => false,
        }
    }

    /// Returns true if and only if this label matches the given unit.
    pub fn matches(&self, unit: Unit) -> bool {
        match (self, unit) {
            (&Label::Any, _) => true,
            (&Label::Literal(c), Unit::Char(u)) => c == u,
            (&Label::Escape(c), Unit::Escape(u)) => c == u,
            (&Label::Escape(c), Unit::Char(u)) => {
                Shorthand::new(c).map_or(false, |s| s.contains(u))
            }
            (&Label::Class(ref class), Unit::Char(u)) => class.contains(u),
            _ => false,
        }
    }

    /// Pushes the character ranges this label is built from onto `ranges`.
    /// Negation is ignored since only the boundaries matter.
    fn ranges(&self, ranges: &mut Vec<(char, char)>) {
        match *self {
            Label::Class(ref class) => ranges.extend(class.ranges()),
            Label::Escape(c) => {
                if let Some(s) = Shorthand::new(c) {
                    ranges.extend_from_slice(s.ranges);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Label::Literal(c) => write!(f, "{}", c),
            Label::Escape(c) => write!(f, "\\{}", c),
            Label::Class(ref class) => write!(f, "{}", class),
            Label::Any => write!(f, "."),
            Label::StartAnchor => write!(f, "^"),
            Label::EndAnchor => write!(f, "$"),
        }
    }
}

// All ASCII whitespace: tab, newline, vertical tab, form feed, carriage
// return and space. Not just space and tab.
const SPACE: &[(char, char)] = &[('\t', '\r'), (' ', ' ')];
const WORD: &[(char, char)] = &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')];
const DIGIT: &[(char, char)] = &[('0', '9')];

/// One of the ASCII shorthand classes `\s`, `\w`, `\d` or their negations.
#[derive(Clone, Copy, Debug)]
struct Shorthand {
    ranges: &'static [(char, char)],
    negated: bool,
}

impl Shorthand {
    fn new(escaped: char) -> Option<Shorthand> {
        let (ranges, negated) = match escaped {
            's' => (SPACE, false),
            'S' => (SPACE, true),
            'w' => (WORD, false),
            'W' => (WORD, true),
            'd' => (DIGIT, false),
            'D' => (DIGIT, true),
            _ => return None,
        };
        Some(Shorthand { ranges, negated })
    }

    fn contains(&self, c: char) -> bool {
        let found = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        found != self.negated
    }
}

/// Returns every combination of two or more of the given set-like labels
/// that some single character matches simultaneously.
///
/// Each combination is a sorted list of indices into `labels`. Units that
/// match at most one label don't need a combination, since the transition
/// on that one label is already exact.
pub(crate) fn overlapping_combinations(labels: &[&Label]) -> Vec<Vec<usize>> {
    let mut ranges = vec![];
    for label in labels {
        label.ranges(&mut ranges);
    }
    // Every cell between two consecutive boundaries is matched by the same
    // labels, so it suffices to test one character per cell.
    let mut boundaries = BTreeSet::new();
    boundaries.insert(0u32);
    for &(lo, hi) in &ranges {
        boundaries.insert(u32::from(lo));
        if hi < char::MAX {
            boundaries.insert(u32::from(hi) + 1);
        }
    }
    let boundaries: Vec<u32> = boundaries.into_iter().collect();

    let mut combos = BTreeSet::new();
    for (i, &lo) in boundaries.iter().enumerate() {
        let hi = boundaries.get(i + 1).map_or(u32::from(char::MAX), |&b| b - 1);
        let c = match representative(lo, hi) {
            None => continue,
            Some(c) => c,
        };
        let combo: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, label)| label.matches(Unit::Char(c)))
            .map(|(i, _)| i)
            .collect();
        if combo.len() >= 2 {
            combos.insert(combo);
        }
    }
    combos.into_iter().collect()
}

/// Returns the first valid character in the inclusive range `lo..=hi`.
fn representative(lo: u32, hi: u32) -> Option<char> {
    const SURROGATE_START: u32 = 0xD800;
    const SURROGATE_END: u32 = 0xDFFF;

    let c = if SURROGATE_START <= lo && lo <= SURROGATE_END {
        SURROGATE_END + 1
    } else {
        lo
    };
    if c > hi {
        return None;
    }
    char::from_u32(c)
}
