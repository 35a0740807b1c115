/// An error that occurred while compiling a pattern.
///
/// Almost every error is a syntax error in the pattern, in which case
/// [`Error::is_syntax`] returns true and the `Display` impl describes the
/// offending construct. The only other kind of error is exceeding an explicitly
/// configured state limit during DFA construction.
///
/// Searching never produces an error. Once a pattern has compiled, matching it
/// against any input is total.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred.
///
/// Offsets are measured in characters (not bytes) from the start of the
/// pattern.
///
/// Note that this enum is non-exhaustive. Adding new variants is not
/// considered a breaking change.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A `\` was the last character of the pattern.
    TrailingEscape { offset: usize },
    /// A `[` was never closed by a `]`.
    UnclosedClass { offset: usize },
    /// A character class contained no items, e.g., `[]` or `[^]`.
    EmptyClass { offset: usize },
    /// A character class range whose endpoints are not both digits or both
    /// letters, or whose start is greater than its end.
    InvalidClassRange { start: char, end: char },
    /// A `{` was never closed by a `}`.
    UnclosedRepetition { offset: usize },
    /// The contents of a `{...}` are not `m`, `m,` or `m,n` for non-negative
    /// integers.
    InvalidRepetition { offset: usize },
    /// A bounded repetition `{m,n}` where `m > n`.
    InvalidRepetitionRange { min: u32, max: u32 },
    /// A `(` was never closed by a `)`.
    UnclosedGroup,
    /// A `)` appeared without a corresponding `(`.
    UnopenedGroup,
    /// A group with nothing in it, e.g., `()`.
    EmptyGroup,
    /// An operator was missing one of its operands, e.g., `*a` or `a|`.
    MissingOperand { operator: String },
    /// An automaton needed more states than permitted. The limit is either
    /// the one configured for DFA construction or
    /// [`StateID::LIMIT`](crate::util::id::StateID::LIMIT).
    TooManyStates { limit: usize },
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns true if and only if this error was caused by invalid pattern
    /// syntax.
    pub fn is_syntax(&self) -> bool {
        match self.kind {
            ErrorKind::TooManyStates { .. } => false,
            _ => true,
        }
    }

    pub(crate) fn trailing_escape(offset: usize) -> Error {
        Error { kind: ErrorKind::TrailingEscape { offset } }
    }

    pub(crate) fn unclosed_class(offset: usize) -> Error {
        Error { kind: ErrorKind::UnclosedClass { offset } }
    }

    pub(crate) fn empty_class(offset: usize) -> Error {
        Error { kind: ErrorKind::EmptyClass { offset } }
    }

    pub(crate) fn invalid_class_range(start: char, end: char) -> Error {
        Error { kind: ErrorKind::InvalidClassRange { start, end } }
    }

    pub(crate) fn unclosed_repetition(offset: usize) -> Error {
        Error { kind: ErrorKind::UnclosedRepetition { offset } }
    }

    pub(crate) fn invalid_repetition(offset: usize) -> Error {
        Error { kind: ErrorKind::InvalidRepetition { offset } }
    }

    pub(crate) fn invalid_repetition_range(min: u32, max: u32) -> Error {
        Error { kind: ErrorKind::InvalidRepetitionRange { min, max } }
    }

    pub(crate) fn unclosed_group() -> Error {
        Error { kind: ErrorKind::UnclosedGroup }
    }

    pub(crate) fn unopened_group() -> Error {
        Error { kind: ErrorKind::UnopenedGroup }
    }

    pub(crate) fn empty_group() -> Error {
        Error { kind: ErrorKind::EmptyGroup }
    }

    pub(crate) fn missing_operand(operator: String) -> Error {
        Error { kind: ErrorKind::MissingOperand { operator } }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit } }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            ErrorKind::TrailingEscape { offset } => write!(
                f,
                "syntax error at offset {}: '\\' must be followed by \
                 a character",
                offset,
            ),
            ErrorKind::UnclosedClass { offset } => write!(
                f,
                "syntax error at offset {}: unclosed character class",
                offset,
            ),
            ErrorKind::EmptyClass { offset } => write!(
                f,
                "syntax error at offset {}: empty character class",
                offset,
            ),
            ErrorKind::InvalidClassRange { start, end } => write!(
                f,
                "syntax error: invalid character class range {}-{} \
                 (endpoints must both be digits or both be letters, in \
                 increasing order)",
                start, end,
            ),
            ErrorKind::UnclosedRepetition { offset } => write!(
                f,
                "syntax error at offset {}: unclosed counted repetition",
                offset,
            ),
            ErrorKind::InvalidRepetition { offset } => write!(
                f,
                "syntax error at offset {}: counted repetition must be \
                 {{m}}, {{m,}} or {{m,n}}",
                offset,
            ),
            ErrorKind::InvalidRepetitionRange { min, max } => write!(
                f,
                "syntax error: counted repetition {{{},{}}} has a minimum \
                 greater than its maximum",
                min, max,
            ),
            ErrorKind::UnclosedGroup => {
                write!(f, "syntax error: unclosed group")
            }
            ErrorKind::UnopenedGroup => {
                write!(f, "syntax error: unopened group")
            }
            ErrorKind::EmptyGroup => write!(f, "syntax error: empty group"),
            ErrorKind::MissingOperand { ref operator } => write!(
                f,
                "syntax error: operator '{}' is missing an operand",
                operator,
            ),
            ErrorKind::TooManyStates { limit } => write!(
                f,
                "automaton construction exceeded the limit of {} states",
                limit,
            ),
        }
    }
}
