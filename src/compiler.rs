//! Infix-to-postfix compilation via the shunting-yard algorithm.
//!
//! The postfix program *is* the compiled representation; no expression tree
//! is built. Function and unary tokens sit on the operator stack and are
//! flushed ahead of ordinary binary operators; a function reaches the output
//! when its closing parenthesis is reduced.

use crate::error::{EngineError, Result};
use crate::token::Token;

pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) | Token::Var | Token::Const(_) => out.push(token),
            Token::Func(_) | Token::Unary(_) => ops.push(token),
            Token::Bin(op) => {
                while let Some(&top) = ops.last() {
                    let flush = match top {
                        Token::Func(_) | Token::Unary(_) => true,
                        Token::Bin(t) => {
                            t.precedence() > op.precedence()
                                || (t.precedence() == op.precedence()
                                    && !op.is_right_associative())
                        }
                        _ => false,
                    };
                    if !flush {
                        break;
                    }
                    out.push(top);
                    ops.pop();
                }
                ops.push(token);
            }
            Token::Open => ops.push(token),
            Token::Close => {
                loop {
                    match ops.pop() {
                        Some(Token::Open) => break,
                        Some(t) => out.push(t),
                        None => {
                            return Err(EngineError::Parse(
                                "mismatched parentheses".to_string(),
                            ));
                        }
                    }
                }
                if matches!(ops.last(), Some(Token::Func(_))) {
                    if let Some(func) = ops.pop() {
                        out.push(func);
                    }
                }
            }
        }
    }

    while let Some(token) = ops.pop() {
        if matches!(token, Token::Open) {
            return Err(EngineError::Parse("mismatched parentheses".to_string()));
        }
        out.push(token);
    }

    Ok(out)
}
