use log::debug;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;

use crate::config::{AngleMode, CalcConfig};
use crate::errors::*;
use crate::ops::{format_f64, CalcErrorResult, CalcResult};
use crate::state::{CalcState, HistoryEntry};
use crate::subst::Scope;
use crate::symbols::{validate_name, SymbolTable};

/// Expression evaluator that owns variables and the calculator state.
///
/// The state lives behind `Arc<RwLock<..>>`, so a shell can read memory and
/// history while another thread evaluates. Evaluations are serialized: each
/// holds an upgradable read lock on the state and upgrades it only to record
/// a successful result
///
/// Example:
/// ```
/// use sciexpr::{AngleMode, Engine};
///
/// let engine = Engine::new();
/// engine.set_variable("x", 5.0).unwrap();
/// assert_eq!(engine.evaluate("x^2 + 3*x + 2", AngleMode::Radians), Ok(42.0));
/// assert_eq!(engine.evaluate("ans / 2", AngleMode::Radians), Ok(21.0));
/// ```
#[derive(Debug)]
pub struct Engine {
    config: CalcConfig,
    symbols: RwLock<SymbolTable>,
    state: Arc<RwLock<CalcState>>,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_config(CalcConfig::default())
    }

    pub fn with_config(config: CalcConfig) -> Self {
        let state = Arc::new(RwLock::new(CalcState::new(config.history_limit)));
        Engine::with_state(config, state)
    }

    /// Creates an engine that uses existing state, e.g. shared with another engine
    pub fn with_state(config: CalcConfig, state: Arc<RwLock<CalcState>>) -> Self {
        Engine {
            config,
            symbols: RwLock::new(SymbolTable::new()),
            state,
        }
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    /// Shared handle to the calculator state
    pub fn state(&self) -> Arc<RwLock<CalcState>> {
        Arc::clone(&self.state)
    }

    /// Evaluates an expression. On success the result becomes `ans` and is
    /// appended to history. A failed evaluation does not change anything
    pub fn evaluate(&self, expr: &str, mode: AngleMode) -> CalcResult {
        let state = self.state.upgradable_read();
        let res = {
            let symbols = self.symbols.read();
            let scope = Scope {
                symbols: &symbols,
                ans: state.last_result(),
                mode,
                config: &self.config,
            };
            scope.eval_expr(expr)
        };

        match res {
            Ok(v) => {
                debug!("[{}] {} = {}", mode, expr, format_f64(v));
                let mut state = RwLockUpgradableReadGuard::upgrade(state);
                state.record(expr.trim(), v);
                Ok(v)
            }
            Err(e) => {
                debug!("[{}] {}: {}", mode, expr, e);
                Err(e)
            }
        }
    }

    /// Evaluates a line that may start with `deg` or `rad` followed by a
    /// space. Otherwise the configured angle mode is used
    pub fn eval_line(&self, line: &str) -> CalcResult {
        let line = line.trim();
        if let Some((first, rest)) = line.split_once(char::is_whitespace) {
            let first = first.to_lowercase();
            if first == "deg" || first == "rad" {
                let mode: AngleMode = first.parse()?;
                return self.evaluate(rest, mode);
            }
        }
        self.evaluate(line, self.config.angle_mode)
    }

    /// Handles `name = expression`: evaluates the expression in the
    /// configured angle mode and stores the result in a variable
    pub fn assign(&self, line: &str) -> CalcResult {
        let (name, expr) = match line.split_once('=') {
            Some((n, e)) => (n.trim(), e.trim()),
            None => return Err(CalcError::ParseFailed("expected 'name = expression'".to_string())),
        };
        validate_name(name)?;
        let v = self.evaluate(expr, self.config.angle_mode)?;
        self.set_variable(name, v)?;
        Ok(v)
    }

    pub fn set_variable(&self, name: &str, value: f64) -> CalcErrorResult {
        self.symbols.write().set_variable(name, value)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.symbols.read().variable(name)
    }

    pub fn remove_variable(&self, name: &str) -> Option<f64> {
        self.symbols.write().remove_variable(name)
    }

    pub fn clear_variables(&self) {
        debug!("clear variables");
        self.symbols.write().clear_variables();
    }

    /// User variables sorted by name
    pub fn variables(&self) -> Vec<(String, f64)> {
        self.symbols.read().variables()
    }

    pub fn memory(&self) -> f64 {
        self.state.read().memory()
    }

    pub fn set_memory(&self, value: f64) {
        self.state.write().set_memory(value);
    }

    pub fn add_to_memory(&self, value: f64) {
        self.state.write().add_to_memory(value);
    }

    pub fn subtract_from_memory(&self, value: f64) {
        self.state.write().subtract_from_memory(value);
    }

    pub fn clear_memory(&self) {
        self.state.write().clear_memory();
    }

    pub fn last_result(&self) -> f64 {
        self.state.read().last_result()
    }

    pub fn set_last_result(&self, value: f64) {
        self.state.write().set_last_result(value);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().history()
    }

    pub fn clear_history(&self) {
        self.state.write().clear_history();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let engine = Engine::new();
        assert_eq!(engine.evaluate("2 + 3 * 4", AngleMode::Radians), Ok(14.0));
        assert_eq!(engine.last_result(), 14.0);
        assert_eq!(engine.evaluate("ans - 4", AngleMode::Radians), Ok(10.0));
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history()[1].to_string(), "ans - 4 = 10.0");
    }

    #[test]
    fn test_failure_keeps_state() {
        let engine = Engine::new();
        engine.evaluate("7", AngleMode::Radians).unwrap();
        assert!(engine.evaluate("1/0", AngleMode::Radians).is_err());
        assert!(engine.evaluate("(2+3", AngleMode::Radians).is_err());
        assert_eq!(engine.last_result(), 7.0);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_function_args_not_recorded() {
        let engine = Engine::new();
        engine.evaluate("max(1, 2, sqrt(9))", AngleMode::Radians).unwrap();
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_eval_line() {
        let engine = Engine::new();
        assert_eq!(engine.eval_line("deg sin(90)"), Ok(1.0));
        assert_eq!(engine.eval_line("DEG cos(0)"), Ok(1.0));
        assert_eq!(engine.eval_line("rad cos(0)"), Ok(1.0));
        assert_eq!(engine.eval_line("  2 +  2 "), Ok(4.0));
        assert_eq!(engine.history()[0].expression, "sin(90)");
        let engine = Engine::with_config(CalcConfig::new().with_angle_mode(AngleMode::Degrees));
        assert_eq!(engine.eval_line("sin(30) * 2"), Ok(1.0));
    }

    #[test]
    fn test_assign() {
        let engine = Engine::new();
        assert_eq!(engine.assign("rate = 2 * 3"), Ok(6.0));
        assert_eq!(engine.variable("RATE"), Some(6.0));
        assert_eq!(engine.evaluate("rate + 1", AngleMode::Radians), Ok(7.0));
        assert_eq!(engine.assign("pi = 3"), Err(CalcError::ReservedName("pi".to_string())));
        assert_eq!(engine.assign("1x = 3").unwrap_err().kind(), ErrorKind::UnknownIdentifier);
        assert_eq!(engine.assign("y = 1/0"), Err(CalcError::DividedByZero("1.0".to_string())));
        assert_eq!(engine.variable("y"), None);
        assert_eq!(engine.assign("y").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(engine.variables(), vec![("rate".to_string(), 6.0)]);
    }

    #[test]
    fn test_memory() {
        let engine = Engine::new();
        engine.set_memory(2.0);
        engine.add_to_memory(3.0);
        engine.subtract_from_memory(1.0);
        assert_eq!(engine.memory(), 4.0);
        engine.clear_memory();
        assert_eq!(engine.memory(), 0.0);
    }

    #[test]
    fn test_shared_state() {
        let first = Engine::new();
        let second = Engine::with_state(CalcConfig::default(), first.state());
        first.evaluate("6 * 7", AngleMode::Radians).unwrap();
        assert_eq!(second.evaluate("ans", AngleMode::Radians), Ok(42.0));
        assert_eq!(first.history().len(), 2);
        second.set_last_result(1.0);
        assert_eq!(first.last_result(), 1.0);
        first.clear_history();
        assert!(second.history().is_empty());
    }
}
