//! Numeric engine for single-variable algebraic expressions: compiles
//! user-typed expressions (or equations `LHS = RHS`) into callable
//! `f(x) -> f64` functions, then finds their roots, definite integrals, and
//! unknown integration limits.

pub mod calculus;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod program;
pub mod solver;
pub mod token;

pub use calculus::{DEFAULT_SUBINTERVALS, integrate, solve_limit};
pub use error::{EngineError, Result};
pub use program::{CompiledFunction, compile};
pub use solver::{
    DEDUP_TOL, EPSILON, MAX_ITER, SWEEP_RANGE, SWEEP_STEPS, SweepOptions, find_all_roots,
    find_root,
};
pub use token::{BinOp, Constant, Func, Token, UnaryOp};
