/*! Translation of token sequences into postfix (Reverse Polish) form.

Two passes: the first inserts the concatenation operators that are implicit
in the source text (adjacent atoms concatenate), the second is the classic
shunting-yard translation driven by operator precedence and associativity.
The postfix form removes parentheses and precedence altogether, which keeps
the NFA builder a plain stack machine.
*/

use crate::tokens::{Operator, Token};
use crate::Error;

/// Translates a token sequence into postfix form.
///
/// Fails with [`Error::UnbalancedParentheses`] when a closing parenthesis
/// has no matching opener, or an opener is still on the stack after all
/// tokens were processed.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, Error> {
    shunting_yard(&insert_concatenation(tokens))
}

/// True when the token can end the left operand of an implicit
/// concatenation: a literal, a closing parenthesis, or a unary postfix
/// operator.
fn concatenates_to_right(token: &Token) -> bool {
    match token {
        Token::Literal(_) | Token::Escaped(_) | Token::CloseParen => true,
        Token::Operator(op) => op.is_unary(),
        _ => false,
    }
}

/// True when the token can start the right operand of an implicit
/// concatenation: a literal or an opening parenthesis.
fn concatenates_to_left(token: &Token) -> bool {
    matches!(
        token,
        Token::Literal(_) | Token::Escaped(_) | Token::OpenParen
    )
}

/// Inserts an explicit concatenation operator between every pair of adjacent
/// tokens that the source-text convention concatenates.
fn insert_concatenation(tokens: &[Token]) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        result.push(*token);
        if let Some(next) = tokens.get(i + 1) {
            if concatenates_to_right(token) && concatenates_to_left(next) {
                result.push(Token::Operator(Operator::Concat));
            }
        }
    }
    result
}

/// The precedence-climbing translation. Literals go straight to the output,
/// operators wait on a stack until an incoming operator with lower (or
/// equal, for left-associative operators) precedence pops them. Parentheses
/// are opaque delimiters on the stack.
fn shunting_yard(tokens: &[Token]) -> Result<Vec<Token>, Error> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(_) | Token::Escaped(_) => output.push(*token),
            Token::OpenParen => stack.push(*token),
            Token::CloseParen => loop {
                match stack.pop() {
                    Some(Token::OpenParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(Error::UnbalancedParentheses),
                }
            },
            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    let pops = if op.is_right_associative() {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if !pops {
                        break;
                    }
                    stack.pop();
                    output.push(Token::Operator(top));
                }
                stack.push(*token);
            }
        }
    }

    while let Some(token) = stack.pop() {
        match token {
            Token::OpenParen => return Err(Error::UnbalancedParentheses),
            token => output.push(token),
        }
    }

    Ok(output)
}
