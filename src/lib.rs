/*!
A small regular expression engine built from textbook automata.

A pattern is compiled in four steps: it is [tokenized](syntax::tokenize),
translated to [postfix order](syntax::postfix), turned into a
[Thompson NFA](nfa::thompson::NFA) and finally converted into a
[DFA](dfa::DFA) by subset construction. Matching walks the DFA over the
haystack without ever backtracking.

The supported syntax is deliberately small: literals, `.`, bracketed classes
(`[a-z_]`, `[^0-9]`), escapes (including the ASCII shorthands `\s`, `\w`,
`\d` and their negations), `^`, `$`, grouping, alternation, `*`, `+`, `?`
and counted repetition (`{m}`, `{m,}`, `{m,n}`). See the [`syntax`] module
for details.

# Example: one-off matching

```
assert!(regex_subset::is_match("(a|b)a+", "aaaaafoobar")?);
assert!(!regex_subset::is_match("(a|b)a+", "a")?);
assert!(regex_subset::search("(abc)(def)+", "xzvfabcdefdefdeffffff")?);
assert!(!regex_subset::search("(abc)(def)+", "xzvfabc")?);

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Example: compile once, match many times

```
use regex_subset::Regex;

let re = Regex::new("^(ab){3,5}$")?;
assert!(re.is_match("ababab"));
assert!(!re.is_match("ab"));
assert!(!re.is_match("abababababab"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Escapes in haystacks

Haystacks are split into units with the same escape rule as patterns: a `\`
followed by any character is a single unit. An escape in a pattern matches
exactly that escape in the haystack, so `\.` matches the two characters `\.`
rather than a `.`:

```
use regex_subset::Regex;

let re = Regex::new(r"vic\.ca")?;
assert!(re.is_match(r"vic\.ca"));
assert!(!re.is_match("vic.ca"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - Adds a dependency on the `log` crate and emits messages
  about pattern compilation at the `debug` and `trace` levels.
*/

pub use crate::{
    error::{Error, ErrorKind},
    regex::{Builder, Config, Regex},
    util::search::MatchKind,
};

#[macro_use]
mod macros;

pub mod dfa;
mod error;
pub mod nfa;
mod regex;
pub mod syntax;
pub mod util;

/// Compile the given pattern into a [`Regex`] with the default
/// configuration.
///
/// This is the same as [`Regex::new`].
pub fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}

/// Returns true if the pattern matches the haystack starting at its first
/// character.
///
/// By default, a match is reported as soon as any prefix of the haystack is
/// accepted. Use a [`Builder`] with [`MatchKind::Full`] to require the whole
/// haystack to match.
///
/// This returns an error only if the pattern fails to compile.
pub fn is_match(pattern: &str, haystack: &str) -> Result<bool, Error> {
    Ok(Regex::new(pattern)?.is_match(haystack))
}

/// Returns true if the pattern matches the haystack starting at any
/// character offset.
///
/// This returns an error only if the pattern fails to compile.
pub fn search(pattern: &str, haystack: &str) -> Result<bool, Error> {
    Ok(Regex::new(pattern)?.search(haystack))
}
