/*!
Pattern syntax: tokenizing a pattern and translating it to postfix order.

The grammar is small. A pattern is a sequence of atoms, each optionally
followed by postfix operators, with `|` for alternation and parentheses for
grouping:

* Atoms: a literal character, an escape (`\` followed by any character), a
  bracketed class (`[a-z_]`, `[^0-9]`), `.`, `^` and `$`.
* Postfix operators: `*`, `+`, `?` and counted repetition (`{m}`, `{m,}`,
  `{m,n}`).

Escapes are atomic: `\+` is a single token that matches the two characters
`\+` in the input. The escapes `\s`, `\w` and `\d` (and their uppercase
negations) additionally match any single character in their ASCII class.

# Example

```
use regex_subset::syntax::{postfix, tokenize};

let tokens = tokenize("(a|b)a+")?;
assert_eq!("ab|a+&", postfix(&tokens)?.to_string());

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    postfix::{postfix, Postfix},
    token::{tokenize, Class, ClassItem, Repetition, Token},
};

mod postfix;
mod token;
