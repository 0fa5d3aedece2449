//! Compilation pipeline and the stack-machine evaluator.

use crate::compiler::to_postfix;
use crate::error::{EngineError, Result};
use crate::lexer::tokenize;
use crate::token::Token;

/// Compile an expression, or an equation `LHS = RHS`, into a callable
/// function of the single variable `x`. Equations compile to the residual
/// `LHS(x) - RHS(x)`, so their roots are the equation's solutions.
pub fn compile(expr: &str) -> Result<CompiledFunction> {
    let tokens = tokenize(expr)?;
    let program = to_postfix(&tokens)?;
    validate(&program)?;
    Ok(CompiledFunction { program })
}

/// A compiled expression: a postfix token program evaluated by a small stack
/// machine. Evaluation is pure; the same `x` always yields the same result.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    program: Vec<Token>,
}

impl CompiledFunction {
    /// Evaluate at `x` with standard IEEE-754 semantics: division by zero
    /// gives ±∞ and out-of-domain function arguments give NaN. Non-finite
    /// values are returned, never raised; downstream solvers treat them as
    /// failure sentinels.
    pub fn eval(&self, x: f64) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.program.len());
        for &token in &self.program {
            match token {
                Token::Number(v) => stack.push(v),
                Token::Var => stack.push(x),
                Token::Const(c) => stack.push(c.value()),
                Token::Unary(op) => {
                    let Some(v) = stack.pop() else {
                        return f64::NAN;
                    };
                    stack.push(op.apply(v));
                }
                Token::Bin(op) => {
                    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                        return f64::NAN;
                    };
                    stack.push(op.apply(a, b));
                }
                Token::Func(func) => {
                    let Some(v) = stack.pop() else {
                        return f64::NAN;
                    };
                    stack.push(func.apply(v));
                }
                // validate() rejects grouping tokens before construction
                Token::Open | Token::Close => return f64::NAN,
            }
        }
        stack.pop().unwrap_or(f64::NAN)
    }
}

// Simulate stack depth over the program: it must never underflow and must
// leave exactly one value. Catching this at compile time keeps eval
// infallible.
fn validate(program: &[Token]) -> Result<()> {
    let mut depth: usize = 0;
    for token in program {
        match token {
            Token::Number(_) | Token::Var | Token::Const(_) => depth += 1,
            Token::Unary(_) | Token::Func(_) => {
                if depth < 1 {
                    return Err(malformed());
                }
            }
            Token::Bin(_) => {
                if depth < 2 {
                    return Err(malformed());
                }
                depth -= 1;
            }
            Token::Open | Token::Close => return Err(malformed()),
        }
    }
    if depth == 1 { Ok(()) } else { Err(malformed()) }
}

fn malformed() -> EngineError {
    EngineError::Parse("malformed expression".to_string())
}
