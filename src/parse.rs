use pest::error::InputLocation;
use pest::Parser;

use crate::errors::*;
use crate::ops::{self, CalcResult};

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// Priority of the unary minus: higher than any binary operator
pub const PRI_UNARY: i32 = 4;

/// A unit of the source text before constants, variables, and function calls
/// are substituted
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    Number(f64),
    Ident(String),
    Operator(char),
    Bang,
    Open,
    Close,
    Comma,
}

/// Binary operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Op {
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            '%' => Some(Op::Mod),
            '^' => Some(Op::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Mod => '%',
            Op::Pow => '^',
        }
    }

    pub fn priority(self) -> i32 {
        match self {
            Op::Pow => 3,
            Op::Mul | Op::Div | Op::Mod => 2,
            Op::Add | Op::Sub => 1,
        }
    }

    pub fn arity(self) -> usize {
        2
    }

    pub fn apply(self, a: f64, b: f64) -> CalcResult {
        match self {
            Op::Add => ops::add(a, b),
            Op::Sub => ops::subtract(a, b),
            Op::Mul => ops::multiply(a, b),
            Op::Div => ops::divide(a, b),
            Op::Mod => ops::modulus(a, b),
            Op::Pow => ops::power(a, b),
        }
    }
}

/// Item of an infix expression that contains only numbers and operators
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Op),
    LeftParen,
    RightParen,
    UnaryMinus,
    Factorial,
}

impl Token {
    pub fn priority(&self) -> i32 {
        match self {
            Token::Operator(op) => op.priority(),
            Token::UnaryMinus => PRI_UNARY,
            _ => 0,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Token::Operator(op) => op.arity(),
            Token::UnaryMinus | Token::Factorial => 1,
            _ => 0,
        }
    }
}

/// Lowercases the expression and removes all whitespaces
pub fn normalize(expr: &str) -> String {
    expr.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_number(s: &str) -> CalcResult {
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(CalcError::InvalidNumber(s.to_owned())),
    }
}

/// Splits a lowercased expression into lexemes
pub fn lex(expr: &str) -> Result<Vec<Lexeme>, CalcError> {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(e) => {
            let pos = match e.location {
                InputLocation::Pos(p) => p,
                InputLocation::Span((p, _)) => p,
            };
            return Err(CalcError::ParseFailed(format!("unexpected input at position {}", pos)));
        }
    };

    let mut lexemes = Vec::new();
    for pair in pairs {
        let val = pair.as_str();
        match pair.as_rule() {
            Rule::number => lexemes.push(Lexeme::Number(parse_number(val)?)),
            Rule::ident => lexemes.push(Lexeme::Ident(val.to_string())),
            Rule::operator => {
                // the grammar guarantees a single char here
                if let Some(c) = val.chars().next() {
                    lexemes.push(Lexeme::Operator(c));
                }
            }
            Rule::factorial => lexemes.push(Lexeme::Bang),
            Rule::open_b => lexemes.push(Lexeme::Open),
            Rule::close_b => lexemes.push(Lexeme::Close),
            Rule::arg_sep => lexemes.push(Lexeme::Comma),
            Rule::EOI => {}
            _ => return Err(CalcError::ParseFailed(format!("unexpected '{}'", val))),
        }
    }
    Ok(lexemes)
}

// a lexeme after which `+` and `-` are binary operators
fn ends_operand(lx: &Lexeme) -> bool {
    matches!(lx, Lexeme::Number(..) | Lexeme::Close | Lexeme::Bang)
}

/// Converts lexemes of a substituted expression into tokens.
/// A minus is unary if it starts the expression or follows an operator or
/// an opening bracket. Unary plus in the same position is dropped
pub fn tokenize(lexemes: &[Lexeme]) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::with_capacity(lexemes.len());
    for (i, lx) in lexemes.iter().enumerate() {
        let prefix = i == 0 || !ends_operand(&lexemes[i - 1]);
        match lx {
            Lexeme::Number(v) => tokens.push(Token::Number(*v)),
            Lexeme::Operator('-') if prefix => tokens.push(Token::UnaryMinus),
            Lexeme::Operator('+') if prefix => {}
            Lexeme::Operator(c) => match Op::from_char(*c) {
                Some(op) => tokens.push(Token::Operator(op)),
                None => return Err(CalcError::UnexpectedToken(c.to_string())),
            },
            Lexeme::Bang => tokens.push(Token::Factorial),
            Lexeme::Open => tokens.push(Token::LeftParen),
            Lexeme::Close => tokens.push(Token::RightParen),
            Lexeme::Ident(s) => return Err(CalcError::UnexpectedToken(s.clone())),
            Lexeme::Comma => return Err(CalcError::UnexpectedToken(",".to_string())),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Sin( PI / 2 ) "), "sin(pi/2)");
        assert_eq!(normalize("2 ++ 3"), "2++3");
    }

    #[test]
    fn test_lex() {
        let v = lex("sin(pi/2)+1.5e3!");
        assert_eq!(
            v,
            Ok(vec![
                Lexeme::Ident("sin".to_string()),
                Lexeme::Open,
                Lexeme::Ident("pi".to_string()),
                Lexeme::Operator('/'),
                Lexeme::Number(2.0),
                Lexeme::Close,
                Lexeme::Operator('+'),
                Lexeme::Number(1500.0),
                Lexeme::Bang,
            ])
        );
        let v = lex("pow(2,x_1)");
        assert_eq!(
            v,
            Ok(vec![
                Lexeme::Ident("pow".to_string()),
                Lexeme::Open,
                Lexeme::Number(2.0),
                Lexeme::Comma,
                Lexeme::Ident("x_1".to_string()),
                Lexeme::Close,
            ])
        );
        assert_eq!(lex("2*π"), Ok(vec![Lexeme::Number(2.0), Lexeme::Operator('*'), Lexeme::Ident("π".to_string())]));
        assert_eq!(lex(".5e-1"), Ok(vec![Lexeme::Number(0.05)]));
        assert!(lex("2&3").is_err());
    }

    #[test]
    fn test_unary() {
        let lx = lex("--5").unwrap();
        assert_eq!(tokenize(&lx), Ok(vec![Token::UnaryMinus, Token::UnaryMinus, Token::Number(5.0)]));
        let lx = lex("+-3").unwrap();
        assert_eq!(tokenize(&lx), Ok(vec![Token::UnaryMinus, Token::Number(3.0)]));
        let lx = lex("2++3").unwrap();
        assert_eq!(
            tokenize(&lx),
            Ok(vec![Token::Number(2.0), Token::Operator(Op::Add), Token::Number(3.0)])
        );
        let lx = lex("(-2)-(1)").unwrap();
        assert_eq!(
            tokenize(&lx),
            Ok(vec![
                Token::LeftParen,
                Token::UnaryMinus,
                Token::Number(2.0),
                Token::RightParen,
                Token::Operator(Op::Sub),
                Token::LeftParen,
                Token::Number(1.0),
                Token::RightParen,
            ])
        );
        let lx = lex("3!-1").unwrap();
        assert_eq!(
            tokenize(&lx),
            Ok(vec![Token::Number(3.0), Token::Factorial, Token::Operator(Op::Sub), Token::Number(1.0)])
        );
    }

    #[test]
    fn test_leftovers() {
        let lx = lex("x+1").unwrap();
        assert_eq!(tokenize(&lx), Err(CalcError::UnexpectedToken("x".to_string())));
        let lx = lex("1,2").unwrap();
        assert_eq!(tokenize(&lx), Err(CalcError::UnexpectedToken(",".to_string())));
    }

    #[test]
    fn test_priority() {
        assert!(Token::UnaryMinus.priority() > Token::Operator(Op::Pow).priority());
        assert!(Token::Operator(Op::Pow).priority() > Token::Operator(Op::Mod).priority());
        assert!(Token::Operator(Op::Div).priority() > Token::Operator(Op::Sub).priority());
        assert_eq!(Token::UnaryMinus.arity(), 1);
        assert_eq!(Token::Operator(Op::Mul).arity(), 2);
    }
}
