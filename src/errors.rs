use std::error::Error;
use std::fmt;

/// Broad class of a failure, used by callers to decide how to present it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// the text is not a well-formed expression
    Syntax,
    /// unknown function or variable, or a name that cannot be used
    UnknownIdentifier,
    /// a function called with a wrong number of arguments
    Arity,
    /// mathematically undefined operation
    Domain,
    /// malformed postfix stream or nesting limit reached
    Evaluation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalcError {
    EmptyExpression,
    UnbalancedBrackets,
    ClosingBracketMismatch,
    OpenBracketMismatch,
    InvalidChar(char),
    ConsecutiveOps(char, char),
    InvalidNumber(String),
    UnexpectedToken(String),
    EmptyArgument(String),
    ParseFailed(String),
    InvalidAngleMode(String),

    UnknownFunction(String),
    VarUndeclared(String),
    InvalidVarName(String, &'static str),
    ReservedName(String),

    FunctionArgs(String, &'static str),

    DividedByZero(String),
    ModuloByZero(String),
    ArgumentOutOfRange(String, String, String),
    FactorialUndefined(String),
    FactorialTooLarge(String),
    ZeroPower(String),
    NegativeBase(String, String),
    NotFinite(String),

    InsufficientOps(String),
    InvalidExpression,
    TooDeep(usize),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::EmptyExpression
            | CalcError::UnbalancedBrackets
            | CalcError::ClosingBracketMismatch
            | CalcError::OpenBracketMismatch
            | CalcError::InvalidChar(..)
            | CalcError::ConsecutiveOps(..)
            | CalcError::InvalidNumber(..)
            | CalcError::UnexpectedToken(..)
            | CalcError::EmptyArgument(..)
            | CalcError::ParseFailed(..)
            | CalcError::InvalidAngleMode(..) => ErrorKind::Syntax,

            CalcError::UnknownFunction(..)
            | CalcError::VarUndeclared(..)
            | CalcError::InvalidVarName(..)
            | CalcError::ReservedName(..) => ErrorKind::UnknownIdentifier,

            CalcError::FunctionArgs(..) => ErrorKind::Arity,

            CalcError::DividedByZero(..)
            | CalcError::ModuloByZero(..)
            | CalcError::ArgumentOutOfRange(..)
            | CalcError::FactorialUndefined(..)
            | CalcError::FactorialTooLarge(..)
            | CalcError::ZeroPower(..)
            | CalcError::NegativeBase(..)
            | CalcError::NotFinite(..) => ErrorKind::Domain,

            CalcError::InsufficientOps(..) | CalcError::InvalidExpression | CalcError::TooDeep(..) => {
                ErrorKind::Evaluation
            }
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::EmptyExpression => write!(f, "Empty expression"),
            CalcError::UnbalancedBrackets => write!(f, "Unbalanced parentheses"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::OpenBracketMismatch => write!(f, "Mismatched opening bracket"),
            CalcError::InvalidChar(c) => write!(f, "Invalid character '{}' in expression", c),
            CalcError::ConsecutiveOps(a, b) => write!(f, "Consecutive operators '{}{}'", a, b),
            CalcError::InvalidNumber(s) => write!(f, "Invalid number format: {}", s),
            CalcError::UnexpectedToken(s) => write!(f, "Unexpected '{}'", s),
            CalcError::EmptyArgument(s) => write!(f, "Function '{}' has an empty argument", s),
            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),
            CalcError::InvalidAngleMode(s) => write!(f, "Invalid angle mode '{}', expected deg or rad", s),

            CalcError::UnknownFunction(s) => write!(f, "Unknown function: {}", s),
            CalcError::VarUndeclared(s) => write!(f, "Variable '{}' not found", s),
            CalcError::InvalidVarName(s, why) => write!(f, "Invalid variable name '{}': {}", s, why),
            CalcError::ReservedName(s) => write!(f, "'{}' is a reserved name", s),

            CalcError::FunctionArgs(s, n) => write!(f, "Function '{}' expects {}", s, n),

            CalcError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),
            CalcError::ModuloByZero(s) => write!(f, "'{}' modulus by zero", s),
            CalcError::ArgumentOutOfRange(func, val, range) => {
                write!(f, "Argument {} of {} out of range({})", val, func, range)
            }
            CalcError::FactorialUndefined(s) => {
                write!(f, "Factorial undefined for non-integer or negative number {}", s)
            }
            CalcError::FactorialTooLarge(s) => write!(f, "Factorial of {} is too large", s),
            CalcError::ZeroPower(s) => write!(f, "0^{} is undefined", s),
            CalcError::NegativeBase(b, e) => {
                write!(f, "Negative base {} with non-integer exponent {}", b, e)
            }
            CalcError::NotFinite(s) => write!(f, "Result of '{}' is not a finite number", s),

            CalcError::InsufficientOps(s) => write!(f, "Insufficient operands for '{}'", s),
            CalcError::InvalidExpression => write!(f, "Invalid expression"),
            CalcError::TooDeep(n) => write!(f, "Expression too deeply nested (limit {})", n),
        }
    }
}

impl Error for CalcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(CalcError::EmptyExpression.kind(), ErrorKind::Syntax);
        assert_eq!(CalcError::UnknownFunction("foo".to_string()).kind(), ErrorKind::UnknownIdentifier);
        assert_eq!(CalcError::FunctionArgs("pow".to_string(), "2 arguments").kind(), ErrorKind::Arity);
        assert_eq!(CalcError::DividedByZero("1".to_string()).kind(), ErrorKind::Domain);
        assert_eq!(CalcError::TooDeep(64).kind(), ErrorKind::Evaluation);
    }

    #[test]
    fn test_message() {
        let e = CalcError::FunctionArgs("pow".to_string(), "2 arguments");
        assert_eq!(e.to_string(), "Function 'pow' expects 2 arguments");
        let e = CalcError::ArgumentOutOfRange("sqrt".to_string(), "-1".to_string(), "x >= 0".to_string());
        assert_eq!(e.to_string(), "Argument -1 of sqrt out of range(x >= 0)");
    }
}
