/*!
A compiled pattern that can be matched against strings.

A [`Regex`] bundles the NFA and DFA built from a pattern along with an
optional prefilter, and provides the two search operations:
[`Regex::is_match`] reports whether the pattern matches starting at the
beginning of a haystack, while [`Regex::search`] reports whether it matches
starting anywhere.
*/

use crate::{
    dfa::{self, Determinizer, DFA},
    error::Error,
    nfa::thompson::{Compiler, NFA},
    util::{prefilter::Prefilter, search::MatchKind},
};

/// A compiled pattern.
///
/// # Example
///
/// ```
/// use regex_subset::Regex;
///
/// let re = Regex::new("(a|b)a+")?;
/// assert!(re.is_match("aaaaafoobar"));
/// assert!(!re.is_match("a"));
/// assert!(re.search("xxbaa"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Match semantics
///
/// By default, a match is reported as soon as any prefix of the haystack
/// (including the empty prefix) is accepted. This is
/// [`MatchKind::Earliest`]. With [`MatchKind::Full`], the entire haystack
/// must be consumed instead.
///
/// ```
/// use regex_subset::{MatchKind, Regex};
///
/// let re = Regex::builder()
///     .configure(Regex::config().match_kind(MatchKind::Full))
///     .build("ab+")?;
/// assert!(re.is_match("abbb"));
/// assert!(!re.is_match("abbbc"));
/// assert!(re.search("cabbb"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    nfa: NFA,
    dfa: DFA,
    prefilter: Option<Prefilter>,
    match_kind: MatchKind,
}

impl Regex {
    /// Compile the given pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Regex::builder().build(pattern)
    }

    /// Return a default configuration for a `Regex`.
    ///
    /// This is a convenience routine to avoid needing to import the
    /// [`Config`] type when customizing the construction of a regex.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a builder for configuring the construction of a `Regex`.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns true if this regex matches the haystack starting at its first
    /// character.
    ///
    /// `^` is satisfied at the start of the haystack and `$` at its end.
    /// Escapes in the haystack are read the same way as in patterns, so the
    /// pattern `\+` matches the two characters `\+`.
    pub fn is_match(&self, haystack: &str) -> bool {
        dfa::search::is_match(&self.dfa, haystack, self.match_kind)
    }

    /// Returns true if this regex matches the haystack starting at any
    /// character offset.
    ///
    /// Every offset from `0` up to and including the length of the haystack
    /// is tried. `^` is only satisfied by the walk beginning at offset `0`.
    pub fn search(&self, haystack: &str) -> bool {
        dfa::search::search(
            &self.dfa,
            self.prefilter.as_ref(),
            haystack,
            self.match_kind,
        )
    }

    /// Returns the pattern this regex was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the NFA built from the pattern.
    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    /// Returns the DFA used for matching.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Returns the match semantics used by this regex.
    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    /// Returns true if [`Regex::search`] uses a prefilter to skip to
    /// candidate offsets.
    pub fn has_prefilter(&self) -> bool {
        self.prefilter.is_some()
    }
}

/// The configuration used for compiling a [`Regex`].
///
/// Every option is unset by default, in which case its default value is used.
/// Settings from one configuration can be layered on top of another with
/// [`Builder::configure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    match_kind: Option<MatchKind>,
    dfa_state_limit: Option<Option<usize>>,
    prefilter: Option<bool>,
}

impl Config {
    /// Return a new default regex configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the match semantics. See [`MatchKind`] for details.
    ///
    /// The default is [`MatchKind::Earliest`].
    pub fn match_kind(mut self, kind: MatchKind) -> Config {
        self.match_kind = Some(kind);
        self
    }

    /// Set a limit on the number of DFA states that may be created.
    ///
    /// When set, compiling a pattern whose DFA would need more states fails
    /// with [`ErrorKind::TooManyStates`](crate::ErrorKind::TooManyStates).
    /// There is no limit by default.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_subset::Regex;
    ///
    /// let config = Regex::config().dfa_state_limit(Some(10));
    /// assert!(Regex::builder().configure(config).build("ab").is_ok());
    /// assert!(Regex::builder()
    ///     .configure(config)
    ///     .build("[ab]*a[ab][ab][ab][ab]")
    ///     .is_err());
    /// ```
    pub fn dfa_state_limit(mut self, limit: Option<usize>) -> Config {
        self.dfa_state_limit = Some(limit);
        self
    }

    /// Whether to build a prefilter for [`Regex::search`] when the pattern
    /// permits one.
    ///
    /// A prefilter never changes search results. This is enabled by default.
    pub fn prefilter(mut self, yes: bool) -> Config {
        self.prefilter = Some(yes);
        self
    }

    /// Returns the match semantics in this configuration.
    pub fn get_match_kind(&self) -> MatchKind {
        self.match_kind.unwrap_or_default()
    }

    /// Returns the DFA state limit in this configuration, if any.
    pub fn get_dfa_state_limit(&self) -> Option<usize> {
        self.dfa_state_limit.unwrap_or(None)
    }

    /// Returns whether prefilters are enabled in this configuration.
    pub fn get_prefilter(&self) -> bool {
        self.prefilter.unwrap_or(true)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            match_kind: o.match_kind.or(self.match_kind),
            dfa_state_limit: o.dfa_state_limit.or(self.dfa_state_limit),
            prefilter: o.prefilter.or(self.prefilter),
        }
    }
}

/// A builder for a [`Regex`].
///
/// # Example
///
/// ```
/// use regex_subset::{MatchKind, Regex};
///
/// let re = Regex::builder()
///     .configure(Regex::config().match_kind(MatchKind::Full))
///     .build(r"\w+@\w+")?;
/// assert!(re.is_match("me@example"));
/// assert!(!re.is_match("me@example.com"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    thompson: Compiler,
}

impl Builder {
    /// Create a new regex builder with the default configuration.
    pub fn new() -> Builder {
        Builder { config: Config::default(), thompson: Compiler::new() }
    }

    /// Build a regex from the given pattern.
    ///
    /// If there was a problem parsing the pattern or building its automata,
    /// then an error is returned.
    pub fn build(&self, pattern: &str) -> Result<Regex, Error> {
        let nfa = self.thompson.build(pattern)?;
        let dfa = Determinizer::new()
            .state_limit(self.config.get_dfa_state_limit())
            .build(&nfa)?;
        let prefilter = if self.config.get_prefilter() {
            Prefilter::new(&dfa)
        } else {
            None
        };
        Ok(Regex {
            pattern: pattern.to_string(),
            nfa,
            dfa,
            prefilter,
            match_kind: self.config.get_match_kind(),
        })
    }

    /// Apply the given regex configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    const PATTERN_ALPHABET: &[char] =
        &['a', 'b', 'c', '.', '*', '+', '?', '|', '(', ')', '^', '$'];
    const HAYSTACK_ALPHABET: &[char] = &['a', 'b', 'c'];

    fn pick(bytes: &[u8], alphabet: &[char], max_len: usize) -> String {
        bytes
            .iter()
            .take(max_len)
            .map(|&b| alphabet[usize::from(b) % alphabet.len()])
            .collect()
    }

    fn full(pattern: &str) -> Regex {
        Regex::builder()
            .configure(Regex::config().match_kind(MatchKind::Full))
            .build(pattern)
            .unwrap()
    }

    #[test]
    fn oibits() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }

    #[test]
    fn config_layers() {
        let base = Config::new().match_kind(MatchKind::Full);
        let layered = base.overwrite(Config::new().dfa_state_limit(Some(5)));
        assert_eq!(MatchKind::Full, layered.get_match_kind());
        assert_eq!(Some(5), layered.get_dfa_state_limit());
        assert!(layered.get_prefilter());

        let defaults = Config::new();
        assert_eq!(MatchKind::Earliest, defaults.get_match_kind());
        assert_eq!(None, defaults.get_dfa_state_limit());
    }

    #[test]
    fn accessors() {
        let re = Regex::new("abc").unwrap();
        assert_eq!("abc", re.pattern());
        assert_eq!(MatchKind::Earliest, re.match_kind());
        assert!(re.has_prefilter());
        assert_eq!(6, re.nfa().len());
        assert_eq!(4, re.dfa().len());

        let re = Regex::builder()
            .configure(Regex::config().prefilter(false))
            .build("abc")
            .unwrap();
        assert!(!re.has_prefilter());
    }

    quickcheck! {
        fn prop_is_match_implies_search(p: Vec<u8>, h: Vec<u8>) -> bool {
            let pattern = pick(&p, PATTERN_ALPHABET, 10);
            let haystack = pick(&h, HAYSTACK_ALPHABET, 16);
            let re = match Regex::new(&pattern) {
                Err(_) => return true,
                Ok(re) => re,
            };
            !re.is_match(&haystack) || re.search(&haystack)
        }

        fn prop_full_implies_earliest(p: Vec<u8>, h: Vec<u8>) -> bool {
            let pattern = pick(&p, PATTERN_ALPHABET, 10);
            let haystack = pick(&h, HAYSTACK_ALPHABET, 16);
            let earliest = match Regex::new(&pattern) {
                Err(_) => return true,
                Ok(re) => re,
            };
            !full(&pattern).is_match(&haystack) || earliest.is_match(&haystack)
        }

        fn prop_prefilter_is_transparent(p: Vec<u8>, h: Vec<u8>) -> bool {
            let pattern = pick(&p, &['a', 'b', 'c', '|', '+'], 8);
            let haystack = pick(&h, HAYSTACK_ALPHABET, 32);
            let with = match Regex::new(&pattern) {
                Err(_) => return true,
                Ok(re) => re,
            };
            let without = Regex::builder()
                .configure(Regex::config().prefilter(false))
                .build(&pattern)
                .unwrap();
            with.search(&haystack) == without.search(&haystack)
        }

        fn prop_construction_is_deterministic(p: Vec<u8>) -> bool {
            let pattern = pick(&p, PATTERN_ALPHABET, 10);
            match (Regex::new(&pattern), Regex::new(&pattern)) {
                (Ok(re1), Ok(re2)) => {
                    format!("{:?}", re1.dfa()) == format!("{:?}", re2.dfa())
                }
                (Err(e1), Err(e2)) => e1 == e2,
                _ => false,
            }
        }

        fn prop_bounded_repetition(min: u8, extra: u8, len: u8) -> bool {
            let (min, max) = (min % 5, min % 5 + extra % 4);
            let len = len % 10;
            let re = full(&format!("a{{{},{}}}", min, max));
            let haystack = "a".repeat(usize::from(len));
            re.is_match(&haystack) == (min <= len && len <= max)
        }

        fn prop_unbounded_repetition(min: u8, len: u8) -> bool {
            let (min, len) = (min % 5, len % 10);
            let re = full(&format!("(ab){{{},}}", min));
            let haystack = "ab".repeat(usize::from(len));
            re.is_match(&haystack) == (min <= len)
        }
    }
}
