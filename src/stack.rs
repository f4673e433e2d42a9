use log::trace;

use crate::errors::*;
use crate::ops::{self, CalcErrorResult, CalcResult};
use crate::parse::Token;

pub(crate) struct Stack {
    pub(crate) queue: Vec<Token>,
    pub(crate) output: Vec<Token>,
    values: Vec<f64>,
}

pub(crate) fn check_depth(depth: usize, limit: usize) -> CalcErrorResult {
    if depth > limit {
        return Err(CalcError::TooDeep(limit));
    }
    Ok(())
}

impl Stack {
    // move operators from the queue to output while the top operator in the
    // queue has equal or greater priority
    fn pop_while_priority(&mut self, priority: i32) {
        while let Some(e) = self.queue.pop() {
            match e {
                Token::Operator(..) | Token::UnaryMinus if e.priority() >= priority => self.output.push(e),
                _ => {
                    self.queue.push(e);
                    return;
                }
            }
        }
    }

    // move operators from the queue to output until the first bracket
    fn pop_until_bracket(&mut self) -> CalcErrorResult {
        loop {
            match self.queue.pop() {
                None => return Err(CalcError::ClosingBracketMismatch),
                Some(Token::LeftParen) => return Ok(()),
                Some(e) => self.output.push(e),
            }
        }
    }

    // move all operators from queue to output.
    // Must be called only after the expression ends
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(v) = self.queue.pop() {
            match v {
                Token::LeftParen => return Err(CalcError::OpenBracketMismatch),
                _ => self.output.push(v),
            }
        }
        Ok(())
    }

    // ------------ PUBLIC -----------------

    pub(crate) fn new() -> Self {
        Stack {
            queue: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, token: Token) -> CalcErrorResult {
        match token {
            Token::Number(..) => self.output.push(token),
            Token::LeftParen => self.queue.push(token),
            Token::RightParen => self.pop_until_bracket()?,
            // prefix operator: nothing on its left to pop
            Token::UnaryMinus => self.queue.push(token),
            Token::Operator(..) => {
                self.pop_while_priority(token.priority());
                self.queue.push(token);
            }
            Token::Factorial => return Err(CalcError::UnexpectedToken("!".to_string())),
        }
        Ok(())
    }

    /// Finishes the conversion and evaluates the postfix stream
    pub(crate) fn calculate(&mut self) -> CalcResult {
        self.pop_all()?;
        trace!("rpn: {:?}", self.output);

        self.values = Vec::with_capacity(self.output.len());
        for o in self.output.iter() {
            match o {
                Token::Number(v) => self.values.push(*v),
                Token::UnaryMinus => match self.values.pop() {
                    Some(v) => self.values.push(ops::negate(v)?),
                    None => return Err(CalcError::InsufficientOps("-".to_string())),
                },
                Token::Operator(op) => {
                    if self.values.len() < op.arity() {
                        return Err(CalcError::InsufficientOps(op.symbol().to_string()));
                    }
                    let v2 = self.values.pop().unwrap_or_default();
                    let v1 = self.values.pop().unwrap_or_default();
                    self.values.push(op.apply(v1, v2)?);
                }
                _ => return Err(CalcError::InvalidExpression),
            }
        }

        if self.values.len() != 1 {
            return Err(CalcError::InvalidExpression);
        }
        Ok(self.values[0])
    }
}

/// Converts infix tokens to postfix order and evaluates them
pub(crate) fn eval_rpn(tokens: &[Token]) -> CalcResult {
    let mut stk = Stack::new();
    for t in tokens.iter() {
        stk.push(t.clone())?;
    }
    stk.calculate()
}

// start of the operand of the factorial at `bang`: everything to the left up
// to an unclosed opening bracket
fn factorial_operand_start(tokens: &[Token], bang: usize) -> usize {
    let mut level = 0;
    for i in (0..bang).rev() {
        match tokens[i] {
            Token::RightParen => level += 1,
            Token::LeftParen => {
                if level == 0 {
                    return i + 1;
                }
                level -= 1;
            }
            _ => {}
        }
    }
    0
}

/// Evaluates an infix token stream that may contain factorials.
/// The last run of `!` applies to the whole expression on its left, e.g.
/// `2+3!` is `(2+3)!` and `5!!` is `(5!)!`. The operand is evaluated
/// recursively, and `depth` is checked against `limit`
pub(crate) fn eval_tokens(tokens: &[Token], depth: usize, limit: usize) -> CalcResult {
    check_depth(depth, limit)?;

    let mut tokens = tokens.to_vec();
    while let Some(last) = tokens.iter().rposition(|t| *t == Token::Factorial) {
        let mut first = last;
        while first > 0 && tokens[first - 1] == Token::Factorial {
            first -= 1;
        }
        let start = factorial_operand_start(&tokens, first);
        if start == first {
            return Err(CalcError::UnexpectedToken("!".to_string()));
        }

        let mut v = eval_tokens(&tokens[start..first], depth + 1, limit)?;
        for _ in first..=last {
            v = ops::factorial(v)?;
        }
        trace!("factorial of {:?} x{} = {}", &tokens[start..first], last - first + 1, v);
        tokens.splice(start..=last, std::iter::once(Token::Number(v)));
    }

    eval_rpn(&tokens)
}
