use core::fmt;

use crate::{error::Error, syntax::token::Token};

/// A pattern's tokens in postfix (reverse Polish) order.
///
/// Grouping parentheses are gone and concatenation is explicit, so that the
/// NFA compiler can consume the sequence with a simple stack. The `Display`
/// impl writes the tokens back to back, e.g., `(a|b)a+` is displayed as
/// `ab|a+&`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Postfix(Vec<Token>);

impl Postfix {
    /// Wrap an existing postfix sequence.
    ///
    /// The sequence is not validated. The NFA compiler reports malformed
    /// sequences as missing operands.
    pub fn new(tokens: Vec<Token>) -> Postfix {
        Postfix(tokens)
    }

    /// The tokens of this postfix sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Consume this sequence and return its tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.0
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for tok in &self.0 {
            write!(f, "{}", tok)?;
        }
        Ok(())
    }
}

/// Translate an infix token sequence into postfix order.
///
/// Adjacent expressions are joined with [`Token::Concat`]. Alternation is
/// kept as an explicit [`Token::Alternate`] with its left operand emitted
/// first.
pub fn postfix(tokens: &[Token]) -> Result<Postfix, Error> {
    let mut translator = Translator { tokens, pos: 0 };
    let expr = translator.expr(false)?;
    // A top-level expression only stops early at a ')' and that is rejected
    // while outside of a group, so all tokens have been consumed here.
    debug_assert_eq!(translator.pos, tokens.len());
    Ok(Postfix(expr))
}

/// A recursive descent translator over a token slice.
///
/// `pos` is the index of the next token to look at. Recursive calls share
/// it, so when a nested call returns, `pos` points at whatever stopped it:
/// either the end of input or a `)`.
struct Translator<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Translator<'t> {
    /// Translate tokens until the end of input or, when `nested` is true,
    /// until a `)` (which is left unconsumed).
    ///
    /// An empty result means no expression was found at all. Callers decide
    /// whether that is an error.
    fn expr(&mut self, nested: bool) -> Result<Vec<Token>, Error> {
        let tokens = self.tokens;
        let mut stack: Vec<Vec<Token>> = vec![];
        while let Some(tok) = tokens.get(self.pos) {
            match *tok {
                Token::Alternate => {
                    let left = fold(&mut stack);
                    if left.is_empty() {
                        return Err(Error::missing_operand(tok.to_string()));
                    }
                    self.pos += 1;
                    let right = self.expr(nested)?;
                    if right.is_empty() {
                        return Err(Error::missing_operand(tok.to_string()));
                    }
                    let mut expr = left;
                    expr.extend(right);
                    expr.push(Token::Alternate);
                    stack.push(expr);
                    // The right operand stopped at the end of input or at a
                    // ')', which the next loop iteration handles.
                }
                Token::Star
                | Token::Plus
                | Token::Question
                | Token::Repeat(_) => {
                    let mut expr = match stack.pop() {
                        None => {
                            return Err(Error::missing_operand(tok.to_string()))
                        }
                        Some(expr) => expr,
                    };
                    expr.push(tok.clone());
                    stack.push(expr);
                    self.pos += 1;
                }
                Token::OpenGroup => {
                    self.pos += 1;
                    let inner = self.expr(true)?;
                    match tokens.get(self.pos) {
                        Some(&Token::CloseGroup) => self.pos += 1,
                        _ => return Err(Error::unclosed_group()),
                    }
                    if inner.is_empty() {
                        return Err(Error::empty_group());
                    }
                    stack.push(inner);
                }
                Token::CloseGroup => {
                    if !nested {
                        return Err(Error::unopened_group());
                    }
                    return Ok(fold(&mut stack));
                }
                // The tokenizer never produces this, but if it shows up in a
                // hand-built sequence, it is a binary operator with nothing
                // to its left.
                Token::Concat => {
                    return Err(Error::missing_operand(tok.to_string()));
                }
                _ => {
                    stack.push(vec![tok.clone()]);
                    self.pos += 1;
                }
            }
        }
        Ok(fold(&mut stack))
    }
}

/// Reduce the pending expressions on the stack to a single expression by
/// concatenating them pairwise from the right, e.g., `[a, b, c]` becomes
/// `abc&&`. An empty stack yields an empty expression.
fn fold(stack: &mut Vec<Vec<Token>>) -> Vec<Token> {
    while stack.len() > 1 {
        let right = stack.pop().unwrap();
        let mut left = stack.pop().unwrap();
        left.extend(right);
        left.push(Token::Concat);
        stack.push(left);
    }
    stack.pop().unwrap_or_default()
}
