use std::collections::VecDeque;
use std::fmt;

use crate::ops::format_f64;

/// A successfully evaluated expression
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: f64,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.expression, format_f64(self.result))
    }
}

/// Mutable calculator state: memory register, the last result, and the
/// bounded history of evaluations
#[derive(Clone, Debug)]
pub struct CalcState {
    memory: f64,
    last_result: f64,
    history: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for CalcState {
    fn default() -> CalcState {
        CalcState::new(100)
    }
}

impl CalcState {
    /// Creates an empty state that keeps at most `limit` history entries
    pub fn new(limit: usize) -> Self {
        CalcState {
            memory: 0.0,
            last_result: 0.0,
            history: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn set_memory(&mut self, value: f64) {
        self.memory = value;
    }

    pub fn add_to_memory(&mut self, value: f64) {
        self.memory += value;
    }

    pub fn subtract_from_memory(&mut self, value: f64) {
        self.memory -= value;
    }

    pub fn clear_memory(&mut self) {
        self.memory = 0.0;
    }

    /// The value of `ans`
    pub fn last_result(&self) -> f64 {
        self.last_result
    }

    pub fn set_last_result(&mut self, value: f64) {
        self.last_result = value;
    }

    /// Saves a successful evaluation: updates the last result and appends a
    /// history entry, evicting the oldest one when history is full
    pub fn record(&mut self, expression: &str, result: f64) {
        self.last_result = result;
        if self.limit == 0 {
            return;
        }
        while self.history.len() >= self.limit {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            expression: expression.to_string(),
            result,
        });
    }

    /// History entries, the newest is the last one
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.iter().cloned().collect()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
