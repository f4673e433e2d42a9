//! # Scientific expression calculator
//!
//! The crate evaluates calculator expressions given as text and returns either
//! a floating point number or an error describing what went wrong. All values
//! are `f64`, and a result is never NaN or infinite: such values become
//! errors at the operation that produced them.
//!
//! Evaluation goes through a few steps:
//! * the expression is validated: brackets, operator pairs, characters,
//!   function names, and number literals
//! * constants, variables, and function calls are replaced with numbers.
//!   Function arguments are expressions themselves and are evaluated first
//! * factorials are calculated
//! * the rest is converted to postfix notation and evaluated
//!
//! Trigonometric functions (including inverted ones) take their argument in
//! radians by default. In degree mode the argument is converted from degrees:
//! `sin(90)` returns `1`. An expression can select the mode with a prefix:
//! `deg sin(90)` or `rad sin(pi/2)` (see `Engine::eval_line`)
//!
//! The list of supported functions:
//! * trigonometric functions: sin, cos, tan, asin, acos, atan
//! * hyperbolic functions: sinh, cosh, tanh
//! * roots: sqrt and cbrt
//! * exponent and logarithms: exp, log (natural), log10
//! * absolute value: abs
//! * power: pow(base, exponent)
//! * min and max of any number of arguments
//! * rounding: round, floor, ceil. An optional second argument is the number
//!   of decimal places: `round(3.14159, 2)` is `3.14`
//!
//! Operators (starting from highest priority):
//! * `!` - factorial. It applies to everything on its left up to an opening
//!   bracket: `2+3!` is `(2+3)!`
//! * `-` - unary minus. Unary plus is allowed and ignored
//! * `^` - power
//! * `*`, `/`, `%` - multiplication, division, remainder
//! * `+`, `-` - addition, subtraction
//!
//! All binary operators are left-associative: `2^3^2` is `64`.
//!
//! Predefined constants:
//! * `pi` (or `π`) - 3.14159...
//! * `e` - 2.71828...
//! * `ans` - the result of the last successful evaluation
//!
//! Constants, variables, and function results are rounded to 10 fractional
//! digits when they are substituted into an expression.
//!
//! Example:
//! ```
//! use sciexpr::{AngleMode, Engine};
//!
//! let engine = Engine::new();
//! assert_eq!(engine.evaluate("(2 + 3) * 4", AngleMode::Radians), Ok(20.0));
//! assert_eq!(engine.eval_line("deg sin(90)"), Ok(1.0));
//! assert!(engine.evaluate("sqrt(-1)", AngleMode::Radians).is_err());
//! ```

#[macro_use]
extern crate pest_derive;

pub mod config;
pub mod engine;
pub mod errors;
pub mod funcs;
pub mod ops;
pub mod parse;
mod stack;
pub mod state;
mod subst;
pub mod symbols;
pub mod validate;

pub use crate::config::{AngleMode, CalcConfig};
pub use crate::engine::Engine;
pub use crate::errors::{CalcError, ErrorKind};
pub use crate::ops::CalcResult;
pub use crate::state::{CalcState, HistoryEntry};
pub use crate::symbols::SymbolTable;
