//! Expression-level checks done before any parsing. They turn most malformed
//! input into a single clear error

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::*;
use crate::funcs;
use crate::ops::CalcErrorResult;

const OPERATORS: &str = "+-*/^%";

lazy_static! {
    static ref FUNC_CALL: Regex = Regex::new(r"\b([a-z_][a-z0-9_]*)\s*\(").unwrap();
    // identifiers are matched too, so digits inside names are never taken for numbers
    static ref LITERAL: Regex = Regex::new(r"[a-z_][a-z0-9_]*|[0-9.]+(?:e[+-]?[0-9.]*)?").unwrap();
}

fn allowed_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_ascii_lowercase()
        || c.is_whitespace()
        || OPERATORS.contains(c)
        || "().,!_π".contains(c)
}

pub(crate) fn check_brackets(expr: &str) -> CalcErrorResult {
    let mut level = 0i32;
    for c in expr.chars() {
        match c {
            '(' => level += 1,
            ')' => {
                level -= 1;
                if level < 0 {
                    return Err(CalcError::UnbalancedBrackets);
                }
            }
            _ => {}
        }
    }
    if level != 0 {
        return Err(CalcError::UnbalancedBrackets);
    }
    Ok(())
}

// `+` or `-` may follow `+` or `-` to allow signed numbers
pub(crate) fn check_operators(expr: &str) -> CalcErrorResult {
    let mut prev = ' ';
    for c in expr.chars() {
        if OPERATORS.contains(prev) && OPERATORS.contains(c) {
            let signed = (prev == '+' || prev == '-') && (c == '+' || c == '-');
            if !signed {
                return Err(CalcError::ConsecutiveOps(prev, c));
            }
        }
        prev = c;
    }
    Ok(())
}

pub(crate) fn check_chars(expr: &str) -> CalcErrorResult {
    match expr.chars().find(|c| !allowed_char(*c)) {
        Some(c) => Err(CalcError::InvalidChar(c)),
        None => Ok(()),
    }
}

pub(crate) fn check_functions(expr: &str) -> CalcErrorResult {
    for cap in FUNC_CALL.captures_iter(expr) {
        let name = &cap[1];
        if !funcs::is_func(name) {
            return Err(CalcError::UnknownFunction(name.to_string()));
        }
    }
    if expr.matches('(').count() != expr.matches(')').count() {
        return Err(CalcError::OpenBracketMismatch);
    }
    Ok(())
}

/// Checks a single numeric literal: at most one decimal point, at least one
/// digit, and an exponent (if any) made of an optional sign and digits
pub fn check_literal(s: &str) -> CalcErrorResult {
    let (mantissa, exponent) = match s.find('e') {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    if mantissa.matches('.').count() > 1 || !mantissa.chars().any(|c| c.is_ascii_digit()) {
        return Err(CalcError::InvalidNumber(s.to_string()));
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix('+').or_else(|| exp.strip_prefix('-')).unwrap_or(exp);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CalcError::InvalidNumber(s.to_string()));
        }
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(()),
        _ => Err(CalcError::InvalidNumber(s.to_string())),
    }
}

pub(crate) fn check_numbers(expr: &str) -> CalcErrorResult {
    for m in LITERAL.find_iter(expr) {
        let s = m.as_str();
        if s.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            check_literal(s)?;
        }
    }
    Ok(())
}

/// Validates a lowercased expression. The first failed check wins
pub fn validate(expr: &str) -> CalcErrorResult {
    if expr.trim().is_empty() {
        return Err(CalcError::EmptyExpression);
    }
    check_brackets(expr)?;
    check_operators(expr)?;
    check_chars(expr)?;
    check_functions(expr)?;
    check_numbers(expr)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        let exprs = [
            "2 + 3 * 4",
            "(2 + 3) * 4",
            "sin(pi/2)",
            "2 ++ 3",
            "2 - -3",
            "5!!",
            "pow(2, 10)",
            "max(1, min(2, 3))",
            "1.5e-3 * x_1",
            "log10(100)",
            ".5 + 5.",
            "2 * π",
        ];
        for e in exprs.iter() {
            assert_eq!(validate(e), Ok(()), "{}", e);
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(validate(""), Err(CalcError::EmptyExpression));
        assert_eq!(validate("   "), Err(CalcError::EmptyExpression));
    }

    #[test]
    fn test_brackets() {
        assert_eq!(validate("(2+3"), Err(CalcError::UnbalancedBrackets));
        assert_eq!(validate("2+3)"), Err(CalcError::UnbalancedBrackets));
        assert_eq!(validate(")2+3("), Err(CalcError::UnbalancedBrackets));
    }

    #[test]
    fn test_operators() {
        assert_eq!(validate("2 +* 3"), Err(CalcError::ConsecutiveOps('+', '*')));
        assert_eq!(validate("2*/3"), Err(CalcError::ConsecutiveOps('*', '/')));
        assert_eq!(validate("2^-3"), Err(CalcError::ConsecutiveOps('^', '-')));
        assert_eq!(validate("2+-3"), Ok(()));
    }

    #[test]
    fn test_chars() {
        assert_eq!(validate("2 & 3"), Err(CalcError::InvalidChar('&')));
        assert_eq!(validate("x = 3"), Err(CalcError::InvalidChar('=')));
    }

    #[test]
    fn test_functions() {
        assert_eq!(validate("foo(2)"), Err(CalcError::UnknownFunction("foo".to_string())));
        assert_eq!(validate("ln (2)"), Err(CalcError::UnknownFunction("ln".to_string())));
        assert_eq!(validate("sqrt(abs(-4))"), Ok(()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(validate("1.2.3 + 1"), Err(CalcError::InvalidNumber("1.2.3".to_string())));
        assert_eq!(validate("2e + 1"), Err(CalcError::InvalidNumber("2e".to_string())));
        assert_eq!(validate("2e+ 1"), Err(CalcError::InvalidNumber("2e+".to_string())));
        assert_eq!(validate("1e400"), Err(CalcError::InvalidNumber("1e400".to_string())));
        assert_eq!(validate(". + 1"), Err(CalcError::InvalidNumber(".".to_string())));
        assert_eq!(validate("2e10 + e"), Ok(()));
    }
}
