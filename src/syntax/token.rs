use core::fmt;

use crate::error::Error;

/// An atomic unit of a pattern.
///
/// Tokens are produced by [`tokenize`](crate::syntax::tokenize), reordered
/// into postfix form by [`postfix`](crate::syntax::postfix) and consumed by
/// the NFA compiler. They are never mutated.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Token {
    /// A character with no special meaning.
    Literal(char),
    /// A `\` followed by a character, e.g., `\+` or `\w`.
    Escape(char),
    /// A bracketed character class, e.g., `[a-z_]` or `[^0-9]`.
    Class(Class),
    /// `.`, which matches any single unit of input.
    Any,
    /// `^`, which matches only at the beginning of the input.
    StartAnchor,
    /// `$`, which matches only at the end of the input.
    EndAnchor,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `{m}`, `{m,}` or `{m,n}`.
    Repeat(Repetition),
    /// `|`
    Alternate,
    /// Explicit concatenation. This never comes out of the tokenizer; the
    /// postfix translator inserts it between adjacent expressions.
    Concat,
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
}

impl Token {
    /// Returns true if this token can label a transition, i.e., it is not an
    /// operator or a grouping token.
    pub fn is_atom(&self) -> bool {
        match *self {
            Token::Literal(_)
            | Token::Escape(_)
            | Token::Class(_)
            | Token::Any
            | Token::StartAnchor
            | Token::EndAnchor => true,
            _ => false,
        }
    }

    /// Returns true if this is a postfix operator taking one operand.
    pub fn is_unary(&self) -> bool {
        match *self {
            Token::Star | Token::Plus | Token::Question | Token::Repeat(_) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Literal(c) => write!(f, "{}", c),
            Token::Escape(c) => write!(f, "\\{}", c),
            Token::Class(ref class) => write!(f, "{}", class),
            Token::Any => write!(f, "."),
            Token::StartAnchor => write!(f, "^"),
            Token::EndAnchor => write!(f, "$"),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Question => write!(f, "?"),
            Token::Repeat(ref rep) => write!(f, "{}", rep),
            Token::Alternate => write!(f, "|"),
            Token::Concat => write!(f, "&"),
            Token::OpenGroup => write!(f, "("),
            Token::CloseGroup => write!(f, ")"),
        }
    }
}

/// A bracketed character class.
///
/// Classes only ever match a single character of input. Escapes are not
/// interpreted inside brackets, so `[\w]` is the set `{'\\', 'w'}`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Class {
    negated: bool,
    items: Vec<ClassItem>,
}

/// A single member of a character class.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ClassItem {
    /// A single character.
    Char(char),
    /// An inclusive range of characters whose endpoints are either both
    /// digits or both letters.
    Range(char, char),
}

impl Class {
    /// Create a new class from its items.
    ///
    /// Callers are responsible for ensuring that ranges are well formed. The
    /// tokenizer always validates them.
    pub fn new(negated: bool, items: Vec<ClassItem>) -> Class {
        Class { negated, items }
    }

    /// Returns true if this class was written with a leading `^`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The items of this class, in the order they were written.
    pub fn items(&self) -> &[ClassItem] {
        &self.items
    }

    /// Returns true if and only if the given character is in this class,
    /// taking negation into account.
    pub fn contains(&self, c: char) -> bool {
        let found = self.items.iter().any(|item| match *item {
            ClassItem::Char(x) => x == c,
            ClassItem::Range(start, end) => start <= c && c <= end,
        });
        found != self.negated
    }

    /// Returns the items of this class as inclusive ranges, ignoring
    /// negation.
    pub(crate) fn ranges(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.items.iter().map(|item| match *item {
            ClassItem::Char(c) => (c, c),
            ClassItem::Range(start, end) => (start, end),
        })
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        if self.negated {
            write!(f, "^")?;
        }
        for item in &self.items {
            match *item {
                ClassItem::Char(c) => write!(f, "{}", c)?,
                ClassItem::Range(start, end) => write!(f, "{}-{}", start, end)?,
            }
        }
        write!(f, "]")
    }
}

/// The bounds of a counted repetition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Repetition {
    /// The minimum number of repetitions.
    pub min: u32,
    /// The maximum number of repetitions, or `None` if unbounded (`{m,}`).
    pub max: Option<u32>,
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.max {
            None => write!(f, "{{{},}}", self.min),
            Some(max) if max == self.min => write!(f, "{{{}}}", self.min),
            Some(max) => write!(f, "{{{},{}}}", self.min, max),
        }
    }
}

/// Split a pattern into tokens.
///
/// This fails on a trailing `\`, an unclosed `[` or `{`, an empty or
/// malformed character class, and a malformed counted repetition. Whether a
/// counted repetition has `m <= n` is checked later, when the NFA is built.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, Error> {
    Tokenizer::new(pattern).collect()
}

/// An iterator over the tokens of a pattern.
///
/// Once an error is yielded, the iterator is exhausted.
#[derive(Debug)]
struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    fn new(pattern: &str) -> Tokenizer {
        Tokenizer { chars: pattern.chars().collect(), pos: 0 }
    }

    fn token(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let c = self.chars[start];
        self.pos += 1;
        let tok = match c {
            '\\' => match self.chars.get(self.pos) {
                None => return Err(Error::trailing_escape(start)),
                Some(&escaped) => {
                    self.pos += 1;
                    Token::Escape(escaped)
                }
            },
            '[' => {
                let body = self.until(']', Error::unclosed_class(start))?;
                Token::Class(parse_class(&body, start)?)
            }
            '{' => {
                let body = self.until('}', Error::unclosed_repetition(start))?;
                Token::Repeat(parse_repetition(&body, start)?)
            }
            '.' => Token::Any,
            '^' => Token::StartAnchor,
            '$' => Token::EndAnchor,
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::Question,
            '|' => Token::Alternate,
            '(' => Token::OpenGroup,
            ')' => Token::CloseGroup,
            c => Token::Literal(c),
        };
        Ok(tok)
    }

    /// Consume everything up to and including the next `close` character and
    /// return what came before it. If there is no such character, then the
    /// error given is returned.
    fn until(&mut self, close: char, err: Error) -> Result<Vec<char>, Error> {
        let rest = &self.chars[self.pos..];
        match rest.iter().position(|&c| c == close) {
            None => {
                self.pos = self.chars.len();
                Err(err)
            }
            Some(len) => {
                let body = rest[..len].to_vec();
                self.pos += len + 1;
                Ok(body)
            }
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Result<Token, Error>> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let result = self.token();
        if result.is_err() {
            self.pos = self.chars.len();
        }
        Some(result)
    }
}

fn parse_class(body: &[char], offset: usize) -> Result<Class, Error> {
    let (negated, body) = match body.split_first() {
        Some((&'^', rest)) => (true, rest),
        _ => (false, body),
    };
    if body.is_empty() {
        return Err(Error::empty_class(offset));
    }
    let mut items = vec![];
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == '-' {
            let (start, end) = (body[i], body[i + 2]);
            if !is_valid_range(start, end) {
                return Err(Error::invalid_class_range(start, end));
            }
            items.push(ClassItem::Range(start, end));
            i += 3;
        } else {
            items.push(ClassItem::Char(body[i]));
            i += 1;
        }
    }
    Ok(Class::new(negated, items))
}

fn is_valid_range(start: char, end: char) -> bool {
    let same_kind = (start.is_ascii_digit() && end.is_ascii_digit())
        || (start.is_ascii_alphabetic() && end.is_ascii_alphabetic());
    same_kind && start <= end
}

fn parse_repetition(body: &[char], offset: usize) -> Result<Repetition, Error> {
    let body: String = body.iter().collect();
    let number = |s: &str| -> Result<u32, Error> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::invalid_repetition(offset));
        }
        s.parse().map_err(|_| Error::invalid_repetition(offset))
    };
    match body.find(',') {
        None => {
            let n = number(&body)?;
            Ok(Repetition { min: n, max: Some(n) })
        }
        Some(i) => {
            let min = number(&body[..i])?;
            let rest = &body[i + 1..];
            let max = if rest.is_empty() { None } else { Some(number(rest)?) };
            Ok(Repetition { min, max })
        }
    }
}
