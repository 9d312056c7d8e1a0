/*! Tokenization of regular expression source strings.

The tokenizer turns the raw expression into a sequence of [`Token`]s,
handling escapes and normalizing the textual epsilon glyph `ε` to the
reserved internal symbol. No structural validation happens here; unbalanced
parentheses and missing operands are detected by later stages.
*/

use std::fmt::{Display, Formatter};

use crate::Error;

/// The reserved symbol that stands for the empty string.
///
/// Expressions use it as an atom matching the empty string (for example in
/// `a|@`), and the NFA uses it internally for its no-input transitions. It
/// is never part of an automaton's alphabet.
pub const EPSILON: char = '@';

/// The textual epsilon glyph, accepted in expressions as an alias for
/// [`EPSILON`].
const EPSILON_GLYPH: char = 'ε';

/// A single atomic unit of a regular expression.
///
/// Tokens are immutable values compared by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A single-character literal, including the reserved epsilon symbol.
    Literal(char),
    /// An escaped literal `\x`. Matches `x` as a plain character even when
    /// `x` is an operator or parenthesis.
    Escaped(char),
    /// One of the five operators.
    Operator(Operator),
    /// An opening parenthesis.
    OpenParen,
    /// A closing parenthesis.
    CloseParen,
}

/// The operators recognized in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Alternation, `a|b`.
    Union,
    /// Concatenation. Implicit in the source text (`ab`), made explicit
    /// during postfix translation.
    Concat,
    /// Zero or more repetitions, `a*`.
    Star,
    /// One or more repetitions, `a+`.
    Plus,
    /// Zero or one occurrence, `a?`.
    Optional,
}

impl Operator {
    /// Binding strength used by the shunting-yard translation. Union binds
    /// weakest, the unary postfix group strongest.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Union => 1,
            Operator::Concat => 2,
            Operator::Star | Operator::Plus | Operator::Optional => 3,
        }
    }

    /// True for the unary postfix operators `*`, `+` and `?`.
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Star | Operator::Plus | Operator::Optional)
    }

    /// The unary postfix group is right-associative, union and concatenation
    /// are left-associative. For single-operand operators associativity is
    /// immaterial, but it must be encoded consistently so that ties against
    /// an equal-precedence stack top are broken the same way every time.
    pub fn is_right_associative(&self) -> bool {
        self.is_unary()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "{}", c),
            Token::Escaped(c) => write!(f, "\\{}", c),
            Token::Operator(Operator::Union) => write!(f, "|"),
            Token::Operator(Operator::Concat) => write!(f, "·"),
            Token::Operator(Operator::Star) => write!(f, "*"),
            Token::Operator(Operator::Plus) => write!(f, "+"),
            Token::Operator(Operator::Optional) => write!(f, "?"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
        }
    }
}

/// Turns a raw expression string into a sequence of tokens.
///
/// Whitespace is ignored. A backslash followed by any character yields a
/// single [`Token::Escaped`] carrying that character; a trailing lone
/// backslash fails with [`Error::TrailingEscape`]. The epsilon glyph `ε` is
/// normalized to [`EPSILON`] before tokenization.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().map(normalize_epsilon);

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        let token = match c {
            '\\' => match chars.next() {
                Some(escaped) => Token::Escaped(escaped),
                None => return Err(Error::TrailingEscape),
            },
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '|' => Token::Operator(Operator::Union),
            '*' => Token::Operator(Operator::Star),
            '+' => Token::Operator(Operator::Plus),
            '?' => Token::Operator(Operator::Optional),
            c => Token::Literal(c),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn normalize_epsilon(c: char) -> char {
    if c == EPSILON_GLYPH {
        EPSILON
    } else {
        c
    }
}
