/*!
Thompson's construction of an NFA from a postfix token sequence.

Each atom becomes a two state fragment joined by a labeled transition, and
each operator combines the fragments on top of a stack:

* `&` (concatenation) links every accept state of the left fragment to the
  start of the right one with an epsilon transition.
* `|` adds an epsilon transition from the left fragment's start to the right
  fragment's start.
* `+` links every accept state back to the start.
* `*` is `+` with an accepting start state.
* `?` adds an epsilon transition from the start to a new accept state.
* `{m,n}` chains deep copies of its operand.

When `*`, `?` or the left side of `|` would attach to a start state that a
loop inside the fragment already leads back to, the fragment first gets a
fresh start state. Otherwise, `(a+b)*` would accept `a` and `a+|b` would
accept `ab`.
*/

pub use self::{
    builder::Builder,
    compiler::Compiler,
    nfa::{State, NFA},
};

mod builder;
mod compiler;
mod nfa;
