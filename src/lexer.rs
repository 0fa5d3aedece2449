//! Tokenizer and normalizer: turns a raw expression or equation string into
//! a flat token stream ready for postfix compilation.
//!
//! Lexing proper is a nom scanner over numbers, identifiers, operators, and
//! parentheses. The contextual work happens in a second pass: identifier
//! classification, unary-sign resolution, and implicit-multiplication
//! insertion as a token-adjacency rule (`2x`, `x(x+1)`, `(x+1)(x-1)` all
//! multiply; `sin(x)` stays a call).

use nom::IResult;
use nom::branch::alt;
use nom::character::complete::{alpha1, alphanumeric0, char, digit0, digit1, multispace0, one_of};
use nom::combinator::{map, map_res, opt, recognize};
use nom::sequence::{delimited, pair};

use crate::error::{EngineError, Result};
use crate::token::{BinOp, Constant, Func, Token, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Number(f64),
    Ident(String),
    Op(char),
    Open,
    Close,
}

/// Tokenize an expression, or an equation `LHS = RHS` which is emitted as
/// `( LHS ) - ( RHS )` so the compiled function is the equation's residual.
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let expr = expr.trim().to_lowercase();
    if expr.is_empty() {
        return Err(EngineError::Parse("empty expression".to_string()));
    }

    let sides: Vec<&str> = expr.split('=').collect();
    match sides.as_slice() {
        [only] => normalize(&lex(only)?),
        [lhs, rhs] => {
            let lhs_tokens = normalize(&lex(lhs)?)?;
            let rhs_tokens = normalize(&lex(rhs)?)?;
            if lhs_tokens.is_empty() || rhs_tokens.is_empty() {
                return Err(EngineError::Parse("equation side is empty".to_string()));
            }
            let mut out = Vec::with_capacity(lhs_tokens.len() + rhs_tokens.len() + 5);
            out.push(Token::Open);
            out.extend(lhs_tokens);
            out.push(Token::Close);
            out.push(Token::Bin(BinOp::Sub));
            out.push(Token::Open);
            out.extend(rhs_tokens);
            out.push(Token::Close);
            Ok(out)
        }
        _ => Err(EngineError::Parse(
            "more than one '=' in expression".to_string(),
        )),
    }
}

fn lex(side: &str) -> Result<Vec<Lexeme>> {
    let mut out = Vec::new();
    let mut rest = side;
    while !rest.trim_start().is_empty() {
        match ws(lexeme)(rest) {
            Ok((next, lexeme)) => {
                out.push(lexeme);
                rest = next;
            }
            Err(_) => {
                let offending = rest.trim_start().chars().next().unwrap_or('?');
                return Err(EngineError::Parse(format!(
                    "unrecognized character '{offending}'"
                )));
            }
        }
    }
    Ok(out)
}

fn lexeme(input: &str) -> IResult<&str, Lexeme> {
    alt((
        map(one_of("+-*/^"), Lexeme::Op),
        map(char('('), |_| Lexeme::Open),
        map(char(')'), |_| Lexeme::Close),
        number,
        ident,
    ))(input)
}

// An alphanumeric run is one identifier (`log10` keeps its digits), but when
// the full run is not a known name its trailing digits are given back so
// `x2` lexes as `x` `2` and the adjacency rule multiplies them. Only
// value-like prefixes (`x`, constants) split this way; implicit
// multiplication never follows a bare function name.
fn ident(input: &str) -> IResult<&str, Lexeme> {
    let (rest, run) = recognize(pair(alpha1, alphanumeric0))(input)?;
    if is_known_name(run) {
        return Ok((rest, Lexeme::Ident(run.to_string())));
    }
    let mut end = run.len();
    while run[..end].ends_with(|c: char| c.is_ascii_digit()) {
        end -= 1;
        let name = &run[..end];
        if is_value_name(name) {
            return Ok((&input[end..], Lexeme::Ident(name.to_string())));
        }
    }
    Ok((rest, Lexeme::Ident(run.to_string())))
}

fn is_known_name(name: &str) -> bool {
    Func::from_name(name).is_some() || is_value_name(name)
}

fn is_value_name(name: &str) -> bool {
    Constant::from_name(name).is_some() || name == "x"
}

// Plain decimal literals only; `2e3` lexes as the product `2*e*3`, not as
// scientific notation.
fn number(input: &str) -> IResult<&str, Lexeme> {
    map_res(
        recognize(alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        ))),
        |s: &str| s.parse::<f64>().map(Lexeme::Number),
    )(input)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn normalize(lexemes: &[Lexeme]) -> Result<Vec<Token>> {
    let mut out: Vec<Token> = Vec::new();
    for lexeme in lexemes {
        let token = match lexeme {
            Lexeme::Number(v) => Token::Number(*v),
            Lexeme::Ident(name) => classify_ident(name)?,
            Lexeme::Open => Token::Open,
            Lexeme::Close => Token::Close,
            Lexeme::Op(c) => resolve_operator(*c, out.last()),
        };
        if let Some(prev) = out.last() {
            if prev.ends_value() && token.starts_value() {
                out.push(Token::Bin(BinOp::Mul));
            }
        }
        out.push(token);
    }
    Ok(out)
}

fn classify_ident(name: &str) -> Result<Token> {
    if let Some(func) = Func::from_name(name) {
        return Ok(Token::Func(func));
    }
    if let Some(constant) = Constant::from_name(name) {
        return Ok(Token::Const(constant));
    }
    if name == "x" {
        return Ok(Token::Var);
    }
    Err(EngineError::Parse(format!(
        "unknown function or variable '{name}'"
    )))
}

// `+`/`-` are unary at the start of a (sub)expression, after an operator,
// after `(`, or after a function name.
fn resolve_operator(c: char, prev: Option<&Token>) -> Token {
    let unary_position = matches!(
        prev,
        None | Some(Token::Bin(_)) | Some(Token::Unary(_)) | Some(Token::Open) | Some(Token::Func(_))
    );
    match c {
        '+' if unary_position => Token::Unary(UnaryOp::Pos),
        '-' if unary_position => Token::Unary(UnaryOp::Neg),
        '+' => Token::Bin(BinOp::Add),
        '-' => Token::Bin(BinOp::Sub),
        '*' => Token::Bin(BinOp::Mul),
        '/' => Token::Bin(BinOp::Div),
        '^' => Token::Bin(BinOp::Pow),
        _ => unreachable!(),
    }
}
