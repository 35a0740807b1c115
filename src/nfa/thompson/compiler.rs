use core::cell::RefCell;

use crate::{
    error::Error,
    nfa::thompson::{builder::Builder, nfa::NFA},
    syntax::{self, Repetition, Token},
    util::{alphabet::Label, id::StateID, sparse_set::SparseSet},
};

/// A compiler from postfix token sequences to Thompson NFAs.
///
/// The compiler keeps a stack of fragments. A fragment is identified by its
/// start state alone: its states are those reachable from the start and its
/// accept states are the reachable states marked as accepting. Atoms push a
/// new fragment and operators pop their operands and push the combined
/// fragment.
///
/// A compiler can be reused for many patterns.
///
/// # Example
///
/// ```
/// use regex_subset::{
///     nfa::thompson::Compiler,
///     syntax::{postfix, tokenize},
/// };
///
/// let postfix = postfix(&tokenize("a|b")?)?;
/// let nfa = Compiler::new().compile(postfix.tokens())?;
/// // Two states for each literal. The start of 'a' doubles as the start of
/// // the alternation.
/// assert_eq!(4, nfa.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Compiler {
    builder: RefCell<Builder>,
    set: RefCell<SparseSet>,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> Compiler {
        Compiler {
            builder: RefCell::new(Builder::new()),
            set: RefCell::new(SparseSet::new(0)),
        }
    }

    /// Tokenize the given pattern, translate it to postfix order and
    /// compile it into an NFA.
    pub fn build(&self, pattern: &str) -> Result<NFA, Error> {
        let tokens = syntax::tokenize(pattern)?;
        let postfix = syntax::postfix(&tokens)?;
        debug!("postfix form of {:?} is {:?}", pattern, postfix.to_string());
        self.compile(postfix.tokens())
    }

    /// Compile a postfix token sequence into an NFA.
    ///
    /// Any sequence is accepted as input, but a sequence that does not
    /// reduce to exactly one expression results in a
    /// [`MissingOperand`](crate::ErrorKind::MissingOperand) error. Grouping
    /// tokens are rejected the same way since they never appear in postfix
    /// order.
    ///
    /// The empty sequence compiles to an NFA that matches only the empty
    /// string.
    pub fn compile(&self, postfix: &[Token]) -> Result<NFA, Error> {
        self.builder.borrow_mut().clear();
        let mut stack: Vec<StateID> = vec![];
        for tok in postfix {
            let frag = match *tok {
                Token::Concat => {
                    let (a, b) = pop2(&mut stack, tok)?;
                    self.compile_concat(a, b)?
                }
                Token::Alternate => {
                    let (a, b) = pop2(&mut stack, tok)?;
                    self.compile_alternation(a, b)?
                }
                Token::Plus => self.compile_plus(pop(&mut stack, tok)?)?,
                Token::Star => self.compile_star(pop(&mut stack, tok)?)?,
                Token::Question => {
                    self.compile_question(pop(&mut stack, tok)?)?
                }
                Token::Repeat(rep) => {
                    self.compile_repetition(pop(&mut stack, tok)?, rep)?
                }
                Token::OpenGroup | Token::CloseGroup => {
                    return Err(Error::missing_operand(tok.to_string()));
                }
                _ => match Label::from_token(tok) {
                    Some(label) => self.compile_atom(label)?,
                    None => {
                        return Err(Error::missing_operand(tok.to_string()))
                    }
                },
            };
            stack.push(frag);
        }
        let start = match (stack.pop(), stack.is_empty()) {
            (None, _) => self.compile_empty()?,
            (Some(start), true) => start,
            // Leftover operands mean a binary operator is missing.
            (Some(_), false) => {
                return Err(Error::missing_operand(Token::Concat.to_string()))
            }
        };
        self.builder.borrow().build(start)
    }

    fn compile_empty(&self) -> Result<StateID, Error> {
        self.builder.borrow_mut().add_state(true)
    }

    fn compile_atom(&self, label: Label) -> Result<StateID, Error> {
        let mut builder = self.builder.borrow_mut();
        let start = builder.add_state(false)?;
        let end = builder.add_state(true)?;
        builder.add_transition(start, label, end);
        Ok(start)
    }

    fn compile_concat(
        &self,
        a: StateID,
        b: StateID,
    ) -> Result<StateID, Error> {
        self.patch_accepts(a, Some(b), None);
        Ok(a)
    }

    fn compile_alternation(
        &self,
        a: StateID,
        b: StateID,
    ) -> Result<StateID, Error> {
        let start = self.isolate(a)?;
        self.builder.borrow_mut().add_epsilon(start, b);
        Ok(start)
    }

    fn compile_plus(&self, start: StateID) -> Result<StateID, Error> {
        let accepts = self.accepts(start);
        let mut builder = self.builder.borrow_mut();
        for id in accepts {
            builder.add_epsilon(id, start);
        }
        Ok(start)
    }

    fn compile_star(&self, start: StateID) -> Result<StateID, Error> {
        let start = self.compile_plus(self.isolate(start)?)?;
        self.builder.borrow_mut().set_accept(start, true);
        Ok(start)
    }

    fn compile_question(&self, start: StateID) -> Result<StateID, Error> {
        let start = self.isolate(start)?;
        let mut builder = self.builder.borrow_mut();
        let end = builder.add_state(true)?;
        builder.add_epsilon(start, end);
        Ok(start)
    }

    fn compile_repetition(
        &self,
        start: StateID,
        rep: Repetition,
    ) -> Result<StateID, Error> {
        match rep.max {
            None => self.compile_at_least(start, rep.min),
            Some(max) if rep.min > max => {
                Err(Error::invalid_repetition_range(rep.min, max))
            }
            Some(max) => self.compile_bounded(start, rep.min, max),
        }
    }

    /// `{min,max}`: `max` copies in a chain, where the point after each of
    /// the copies `min..=max` can skip straight to a shared accept state.
    fn compile_bounded(
        &self,
        start: StateID,
        min: u32,
        max: u32,
    ) -> Result<StateID, Error> {
        if max == 0 {
            return self.compile_empty();
        }
        let mut copies = self.copies(start, max)?;
        if min == 0 {
            copies[0] = self.isolate(copies[0])?;
        }
        let end = self.builder.borrow_mut().add_state(false)?;
        for (i, &copy) in copies.iter().enumerate() {
            let skip = if i + 1 >= min as usize { Some(end) } else { None };
            self.patch_accepts(copy, copies.get(i + 1).copied(), skip);
        }
        let mut builder = self.builder.borrow_mut();
        if min == 0 {
            builder.add_epsilon(copies[0], end);
        }
        builder.set_accept(end, true);
        Ok(copies[0])
    }

    /// `{min,}`: `min` copies in a chain where the last one may repeat.
    fn compile_at_least(
        &self,
        start: StateID,
        min: u32,
    ) -> Result<StateID, Error> {
        if min == 0 {
            return self.compile_star(start);
        }
        let copies = self.copies(start, min)?;
        let last = copies.len() - 1;
        self.compile_plus(copies[last])?;
        for i in 0..last {
            self.patch_accepts(copies[i], Some(copies[i + 1]), None);
        }
        Ok(copies[0])
    }

    /// Return `n` independent copies of the fragment at `start`, where the
    /// last one is `start` itself. `n` must be at least 1.
    ///
    /// All clones are made before the caller mutates anything, so every copy
    /// is structurally identical to the original.
    fn copies(&self, start: StateID, n: u32) -> Result<Vec<StateID>, Error> {
        let mut copies = Vec::with_capacity(n as usize);
        let mut builder = self.builder.borrow_mut();
        let mut set = self.set.borrow_mut();
        for _ in 1..n {
            copies.push(builder.clone_fragment(start, &mut set)?);
        }
        copies.push(start);
        Ok(copies)
    }

    /// Every accept state of the fragment at `start` stops accepting and
    /// gets an epsilon transition to `next` and to `skip`, when given.
    fn patch_accepts(
        &self,
        start: StateID,
        next: Option<StateID>,
        skip: Option<StateID>,
    ) {
        let accepts = self.accepts(start);
        let mut builder = self.builder.borrow_mut();
        for id in accepts {
            builder.set_accept(id, false);
            for to in next.into_iter().chain(skip) {
                builder.add_epsilon(id, to);
            }
        }
    }

    fn accepts(&self, start: StateID) -> Vec<StateID> {
        self.builder.borrow().accepts(start, &mut self.set.borrow_mut())
    }

    fn isolate(&self, start: StateID) -> Result<StateID, Error> {
        self.builder.borrow_mut().isolate(start, &mut self.set.borrow_mut())
    }
}

impl Default for Compiler {
    fn default() -> Compiler {
        Compiler::new()
    }
}

fn pop(stack: &mut Vec<StateID>, tok: &Token) -> Result<StateID, Error> {
    stack.pop().ok_or_else(|| Error::missing_operand(tok.to_string()))
}

fn pop2(
    stack: &mut Vec<StateID>,
    tok: &Token,
) -> Result<(StateID, StateID), Error> {
    let b = pop(stack, tok)?;
    let a = pop(stack, tok)?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, syntax::Postfix};

    fn nfa(pattern: &str) -> NFA {
        NFA::new(pattern).unwrap()
    }

    fn err(postfix: Vec<Token>) -> ErrorKind {
        Compiler::new().compile(&postfix).unwrap_err().kind().clone()
    }

    #[test]
    fn atom() {
        let nfa = nfa("a");
        assert_eq!(2, nfa.len());
        let start = nfa.state(nfa.start());
        assert!(!start.is_accept());
        assert!(start.epsilons().is_empty());
        let next = start.next(&Label::Literal('a')).unwrap();
        assert!(nfa.state(next).is_accept());
    }

    #[test]
    fn concat_clears_left_accept() {
        let nfa = nfa("ab");
        assert_eq!(4, nfa.len());
        assert_eq!(1, nfa.states().iter().filter(|s| s.is_accept()).count());
    }

    #[test]
    fn star_accepts_at_start() {
        let nfa = nfa("a*");
        assert!(nfa.state(nfa.start()).is_accept());
        assert_eq!(2, nfa.len());
    }

    #[test]
    fn star_isolates_looping_start() {
        // The inner '+' loops back to the start of 'a', so '*' must not mark
        // that state as accepting.
        let nfa = nfa("(a+b)*");
        let start = nfa.state(nfa.start());
        assert!(start.is_accept());
        assert!(start.transitions().is_empty());
        assert_eq!(1, start.epsilons().len());
        assert!(!nfa.state(start.epsilons()[0]).is_accept());
    }

    #[test]
    fn empty() {
        let nfa = nfa("");
        assert_eq!(1, nfa.len());
        assert!(nfa.state(nfa.start()).is_accept());
    }

    #[test]
    fn bounded_repetition_sizes() {
        // Three copies of 'ab' plus one shared accept state.
        assert_eq!(13, nfa("(ab){2,3}").len());
        assert_eq!(1, nfa("a{0}").len());
        assert_eq!(1, nfa("a{0,0}").len());
        // Two copies of 'a'. The last one loops.
        assert_eq!(4, nfa("a{2,}").len());
    }

    #[test]
    fn invalid_range() {
        let got = NFA::new("a{3,2}").unwrap_err();
        assert_eq!(
            &ErrorKind::InvalidRepetitionRange { min: 3, max: 2 },
            got.kind()
        );
    }

    #[test]
    fn malformed_postfix() {
        let a = Token::Literal('a');
        let missing =
            |op: &str| ErrorKind::MissingOperand { operator: op.to_string() };
        assert_eq!(err(vec![a.clone(), Token::Concat]), missing("&"));
        assert_eq!(err(vec![Token::Star]), missing("*"));
        assert_eq!(err(vec![a.clone(), a.clone()]), missing("&"));
        assert_eq!(err(vec![a.clone(), Token::OpenGroup]), missing("("));
    }

    #[test]
    fn compiler_is_reusable() {
        let compiler = Compiler::new();
        let p1 = Postfix::new(vec![Token::Literal('a')]);
        let p2 = Postfix::new(vec![
            Token::Literal('a'),
            Token::Literal('b'),
            Token::Alternate,
        ]);
        assert_eq!(2, compiler.compile(p1.tokens()).unwrap().len());
        assert_eq!(4, compiler.compile(p2.tokens()).unwrap().len());
        assert_eq!(2, compiler.compile(p1.tokens()).unwrap().len());
    }
}
