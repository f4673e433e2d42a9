//! Substitution of identifiers and function calls.
//!
//! Before an expression is parsed into operators, every constant, variable,
//! and function call is replaced with a number. Function arguments are full
//! expressions, so they are evaluated recursively with an increased depth

use log::trace;

use crate::config::{AngleMode, CalcConfig};
use crate::errors::*;
use crate::funcs;
use crate::ops::CalcResult;
use crate::parse::{lex, normalize, tokenize, Lexeme};
use crate::stack::{check_depth, eval_tokens};
use crate::symbols::SymbolTable;
use crate::validate::validate;

/// Everything an evaluation reads: variables, the last result, and settings
pub(crate) struct Scope<'a> {
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) ans: f64,
    pub(crate) mode: AngleMode,
    pub(crate) config: &'a CalcConfig,
}

impl<'a> Scope<'a> {
    /// Runs the whole pipeline for a raw expression
    pub(crate) fn eval_expr(&self, expr: &str) -> CalcResult {
        let low = expr.to_lowercase();
        validate(&low)?;
        let lexemes = lex(&normalize(&low))?;
        self.eval_lexemes(&lexemes, 0)
    }

    pub(crate) fn eval_lexemes(&self, lexemes: &[Lexeme], depth: usize) -> CalcResult {
        check_depth(depth, self.config.max_depth)?;
        let resolved = resolve(lexemes, self, depth)?;
        let tokens = tokenize(&resolved)?;
        eval_tokens(&tokens, depth, self.config.max_depth)
    }

    // substituted values are rounded to a fixed number of fractional digits
    fn literal(&self, v: f64) -> CalcResult {
        let s = format!("{:.*}", self.config.literal_digits, v);
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(f),
            _ => Err(CalcError::InvalidNumber(s)),
        }
    }

    fn lookup(&self, name: &str) -> CalcResult {
        match self.symbols.lookup(name, self.ans) {
            Some(v) => self.literal(v),
            None => Err(CalcError::VarUndeclared(name.to_string())),
        }
    }
}

// index of the bracket that closes the one at `open`
fn matching_bracket(lexemes: &[Lexeme], open: usize) -> Result<usize, CalcError> {
    let mut level = 0usize;
    for (idx, lx) in lexemes.iter().enumerate().skip(open) {
        match lx {
            Lexeme::Open => level += 1,
            Lexeme::Close => {
                level -= 1;
                if level == 0 {
                    return Ok(idx);
                }
            }
            _ => {}
        }
    }
    Err(CalcError::OpenBracketMismatch)
}

// splits function arguments by commas outside of nested brackets.
// No lexemes at all means the function is called without arguments
fn split_args<'l>(fname: &str, lexemes: &'l [Lexeme]) -> Result<Vec<&'l [Lexeme]>, CalcError> {
    if lexemes.is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut level = 0usize;
    let mut start = 0usize;
    for (idx, lx) in lexemes.iter().enumerate() {
        match lx {
            Lexeme::Open => level += 1,
            Lexeme::Close => level = level.saturating_sub(1),
            Lexeme::Comma if level == 0 => {
                args.push(&lexemes[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&lexemes[start..]);

    if args.iter().any(|a| a.is_empty()) {
        return Err(CalcError::EmptyArgument(fname.to_string()));
    }
    Ok(args)
}

/// Replaces identifiers with their values and function calls with their
/// results. Calls are resolved from left to right, inner calls are resolved
/// while evaluating the arguments of the outer one
pub(crate) fn resolve(lexemes: &[Lexeme], scope: &Scope, depth: usize) -> Result<Vec<Lexeme>, CalcError> {
    let mut out = Vec::with_capacity(lexemes.len());
    let mut idx = 0;
    while idx < lexemes.len() {
        match &lexemes[idx] {
            Lexeme::Ident(name) if lexemes.get(idx + 1) == Some(&Lexeme::Open) => {
                let close = matching_bracket(lexemes, idx + 1)?;
                let args = split_args(name, &lexemes[idx + 2..close])?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(scope.eval_lexemes(arg, depth + 1)?);
                }
                let v = scope.literal(funcs::call(name, &values, scope.mode)?)?;
                trace!("{}({:?}) -> {}", name, values, v);
                out.push(Lexeme::Number(v));
                idx = close + 1;
            }
            Lexeme::Ident(name) => {
                let v = scope.lookup(name)?;
                trace!("{} -> {}", name, v);
                out.push(Lexeme::Number(v));
                idx += 1;
            }
            lx => {
                out.push(lx.clone());
                idx += 1;
            }
        }
    }
    Ok(out)
}
