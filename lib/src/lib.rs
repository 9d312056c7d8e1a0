/*! A regular expression to minimal DFA compiler written in Rust.

The compilation of an expression goes through four stages, each one consuming
the output of the previous one:

1. The expression string is tokenized and translated into postfix (Reverse
   Polish) form by a [shunting-yard][1] pass that also inserts the implicit
   concatenation operators.
2. The postfix token sequence is turned into a nondeterministic finite
   automaton (NFA) using [Thompson's construction][2].
3. The NFA is converted into an equivalent deterministic finite automaton
   (DFA) by the [subset construction][3].
4. The DFA is reduced to the minimal number of states by partition refinement
   (Myhill–Nerode equivalence).

The entry point is [`compile`], which runs the whole pipeline and returns a
[`Compilation`] holding every intermediate artifact. Both the NFA and the two
DFAs can decide acceptance of an input string on their own, so the
intermediate automata are as usable as the final one.

# Example

```rust
let compilation = rdfa::compile("(a|b)*abb").unwrap();

assert!(compilation.nfa.matches("aabb"));
assert!(compilation.dfa.matches("aabb"));
assert!(compilation.min_dfa.matches("aabb"));
assert!(!compilation.min_dfa.matches("ab"));
```

[1]: https://en.wikipedia.org/wiki/Shunting_yard_algorithm
[2]: https://en.wikipedia.org/wiki/Thompson%27s_construction
[3]: https://en.wikipedia.org/wiki/Powerset_construction
*/

pub mod dfa;
pub mod nfa;
pub mod postfix;
pub mod tokens;

mod minimize;

#[cfg(test)]
mod tests;

use itertools::Itertools;
use log::debug;
use thiserror::Error;

pub use crate::dfa::Dfa;
pub use crate::nfa::Nfa;
pub use crate::tokens::{Token, EPSILON};

/// Errors raised while compiling a regular expression.
///
/// Every error is fatal to the compilation it occurs in; no stage produces
/// partial results. Compilation is pure and deterministic, so retrying the
/// same expression yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The expression ends with a lone, unescaped backslash.
    #[error("trailing escape at the end of the expression")]
    TrailingEscape,

    /// A closing parenthesis has no matching opener, or an opener was never
    /// closed.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// An operator in the postfix sequence lacks its operands, or the
    /// sequence doesn't reduce to a single automaton.
    #[error("malformed postfix expression")]
    MalformedPostfix,

    /// A token that can't appear in postfix form (a parenthesis) reached the
    /// NFA builder.
    #[error("unexpected token `{0}` in postfix expression")]
    UnexpectedToken(Token),
}

/// The result of compiling a regular expression.
///
/// All the intermediate artifacts are retained: consumers that only need to
/// match strings can use [`Compilation::min_dfa`], while diagnostic tools can
/// inspect the postfix form and the intermediate automata.
#[derive(Debug)]
pub struct Compilation {
    /// The expression in postfix form, with explicit concatenation operators.
    pub postfix: Vec<Token>,
    /// The NFA built from the postfix form by Thompson's construction.
    pub nfa: Nfa,
    /// The DFA built from the NFA by subset construction.
    pub dfa: Dfa,
    /// The minimal DFA equivalent to [`Compilation::dfa`].
    pub min_dfa: Dfa,
}

impl Compilation {
    /// Returns the postfix form of the expression as a string.
    pub fn postfix_notation(&self) -> String {
        self.postfix.iter().join("")
    }
}

/// Compiles a regular expression into a minimal DFA.
///
/// Runs the whole pipeline: tokenization, postfix translation, Thompson's
/// construction, subset construction and minimization. Fails with one of the
/// [`Error`] kinds when the expression is malformed.
pub fn compile(expression: &str) -> Result<Compilation, Error> {
    let tokens = tokens::tokenize(expression)?;
    let postfix = postfix::to_postfix(&tokens)?;
    let nfa = Nfa::from_postfix(&postfix)?;
    let dfa = Dfa::from_nfa(&nfa);
    let min_dfa = dfa.minimize();

    debug!(
        "compiled `{}`: {} NFA states, {} DFA states, {} after minimization",
        expression,
        nfa.state_count(),
        dfa.state_count(),
        min_dfa.state_count()
    );

    Ok(Compilation { postfix, nfa, dfa, min_dfa })
}
