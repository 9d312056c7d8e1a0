/*! End-to-end tests for the whole compilation pipeline. */

use pretty_assertions::assert_eq;

use crate::tokens::Token;
use crate::{compile, Compilation, Error};

/// Asserts that the NFA, the DFA and the minimized DFA all agree on the
/// verdict for `input`.
fn assert_accepts(compilation: &Compilation, input: &str, expected: bool) {
    assert_eq!(
        compilation.nfa.matches(input),
        expected,
        "NFA verdict for {:?}",
        input
    );
    assert_eq!(
        compilation.dfa.matches(input),
        expected,
        "DFA verdict for {:?}",
        input
    );
    assert_eq!(
        compilation.min_dfa.matches(input),
        expected,
        "minimized DFA verdict for {:?}",
        input
    );
}

#[test]
fn single_literal() {
    let c = compile("a").unwrap();
    assert_accepts(&c, "a", true);
    assert_accepts(&c, "b", false);
    assert_accepts(&c, "", false);
}

#[test]
fn union() {
    let c = compile("a|b").unwrap();
    assert_accepts(&c, "a", true);
    assert_accepts(&c, "b", true);
    assert_accepts(&c, "ab", false);
}

#[test]
fn star() {
    let c = compile("a*").unwrap();
    assert_accepts(&c, "", true);
    assert_accepts(&c, "aaaa", true);
    assert_accepts(&c, "aab", false);
}

#[test]
fn implicit_concatenation() {
    let c = compile("ab").unwrap();
    assert_accepts(&c, "ab", true);
    assert_accepts(&c, "a", false);
    assert_accepts(&c, "ba", false);
}

#[test]
fn one_or_more() {
    let c = compile("a+").unwrap();
    assert_accepts(&c, "", false);
    assert_accepts(&c, "a", true);
    assert_accepts(&c, "aaa", true);
}

#[test]
fn textbook_example() {
    let c = compile("(a|b)*abb").unwrap();
    assert_eq!(c.min_dfa.state_count(), 4);
    assert_accepts(&c, "aabb", true);
    assert_accepts(&c, "babb", true);
    assert_accepts(&c, "abb", true);
    assert_accepts(&c, "aab", false);
}

#[test]
fn stage_equivalence() {
    let expressions = [
        "a",
        "a|b",
        "a*",
        "ab",
        "a+",
        "a?",
        "(a|b)*abb",
        "(ab|ba)+",
        "a(b|c)*d",
        r"\(a\)",
        "a|@",
        "(a*)*b?",
    ];
    let inputs = [
        "", "a", "b", "ab", "ba", "abb", "aabb", "babb", "abab", "abba",
        "acd", "abcd", "ad", "(a)", "aaab", "bbbb",
    ];
    for expression in expressions {
        let c = compile(expression).unwrap();
        for input in inputs {
            let expected = c.nfa.matches(input);
            assert_accepts(&c, input, expected);
        }
    }
}

#[test]
fn minimization_never_increases_size() {
    for expression in ["a", "a|b", "a*", "(a|b)*abb", "(ab|ba)+", "a?b?c?"] {
        let c = compile(expression).unwrap();
        assert!(c.min_dfa.state_count() <= c.dfa.state_count());
    }
}

#[test]
fn minimization_is_idempotent() {
    for expression in ["a", "a|b", "(a|b)*abb", "(ab|ba)+"] {
        let c = compile(expression).unwrap();
        assert_eq!(
            c.min_dfa.minimize().state_count(),
            c.min_dfa.state_count()
        );
    }
}

#[test]
fn postfix_operand_stack_depth() {
    // Every literal pushes one operand, binary operators pop two and push
    // one, unary operators pop one and push one. Well-formed postfix leaves
    // exactly one operand.
    for expression in ["a", "a|b", "a*", "(a|b)*abb", "(ab|ba)+", "a?b?c?"] {
        let c = compile(expression).unwrap();
        let mut depth: i64 = 0;
        for token in &c.postfix {
            match token {
                Token::Literal(_) | Token::Escaped(_) => depth += 1,
                Token::Operator(op) if op.is_unary() => {
                    assert!(depth >= 1)
                }
                Token::Operator(_) => {
                    assert!(depth >= 2);
                    depth -= 1;
                }
                token => panic!("parenthesis {token} in postfix"),
            }
        }
        assert_eq!(depth, 1, "final operand depth for `{expression}`");
    }
}

#[test]
fn postfix_notation_display() {
    let c = compile("(a|b)*abb").unwrap();
    assert_eq!(c.postfix_notation(), "ab|*a·b·b·");
}

#[test]
fn epsilon_expression() {
    // Both the `@` symbol and the `ε` glyph denote the empty string.
    for expression in ["a|@", "a|ε"] {
        let c = compile(expression).unwrap();
        assert_accepts(&c, "", true);
        assert_accepts(&c, "a", true);
        assert_accepts(&c, "@", false);
    }
}

#[test]
fn whitespace_in_expression_is_ignored() {
    let c = compile("a b | c").unwrap();
    assert_accepts(&c, "ab", true);
    assert_accepts(&c, "c", true);
    assert_accepts(&c, "a b", false);
}

#[test]
fn error_reporting() {
    assert_eq!(compile(r"ab\").unwrap_err(), Error::TrailingEscape);
    assert_eq!(compile("(a|b").unwrap_err(), Error::UnbalancedParentheses);
    assert_eq!(compile("a)b").unwrap_err(), Error::UnbalancedParentheses);
    assert_eq!(compile("*").unwrap_err(), Error::MalformedPostfix);
    assert_eq!(compile("|").unwrap_err(), Error::MalformedPostfix);
    assert_eq!(compile("a|").unwrap_err(), Error::MalformedPostfix);
}

#[test]
fn error_messages() {
    assert_eq!(
        compile(r"ab\").unwrap_err().to_string(),
        "trailing escape at the end of the expression"
    );
    assert_eq!(
        compile("(a").unwrap_err().to_string(),
        "unbalanced parentheses"
    );
}
