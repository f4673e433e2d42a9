use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::f64::consts::{E, PI};

use crate::errors::*;
use crate::funcs::STD_FUNCS;
use crate::ops::{format_f64, CalcErrorResult};

/// the name of the last successful result
pub const LAST_RESULT: &str = "ans";

const CONSTANTS: [&str; 3] = ["pi", "e", LAST_RESULT];
const COMMANDS: [&str; 6] = ["exit", "quit", "help", "clear", "mem", "history"];

lazy_static! {
    static ref IDENT: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Returns a constant value by its name. `ans` is not a fixed constant, its
/// value comes from the calculator state
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "π" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

/// Returns true if the name belongs to a constant, a function, or a shell command.
/// Name is caseinsensitive
pub fn is_reserved(name: &str) -> bool {
    let low = name.to_lowercase();
    CONSTANTS.iter().any(|c| *c == low)
        || STD_FUNCS.iter().any(|f| *f == low)
        || COMMANDS.iter().any(|c| *c == low)
}

/// Check if variable name is valid:
/// - name convention: Latin letter or underscore followed by letters, digits, and underscores
/// - does not conflict with any constant, function, or command
pub fn validate_name(name: &str) -> CalcErrorResult {
    if name.is_empty() {
        return Err(CalcError::InvalidVarName(name.to_string(), "name is empty"));
    }
    if !IDENT.is_match(name) {
        return Err(CalcError::InvalidVarName(
            name.to_string(),
            "must start with a letter or '_' and contain only Latin letters, digits, and underscore",
        ));
    }
    if is_reserved(name) {
        return Err(CalcError::ReservedName(name.to_lowercase()));
    }
    Ok(())
}

/// User-defined variables. Names are stored lowercased
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    variables: HashMap<String, f64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a variable value by its name. Name is caseinsensitive
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(&name.to_lowercase()).copied()
    }

    /// Creates a new variable or replaces existing one with a new value
    pub fn set_variable(&mut self, name: &str, value: f64) -> CalcErrorResult {
        validate_name(name)?;
        if !value.is_finite() {
            return Err(CalcError::NotFinite(name.to_string()));
        }
        let name = name.to_lowercase();
        debug!("variable {} = {}", name, format_f64(value));
        self.variables.insert(name, value);
        Ok(())
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<f64> {
        self.variables.remove(&name.to_lowercase())
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /// All variables sorted by name
    pub fn variables(&self) -> Vec<(String, f64)> {
        let mut vars: Vec<(String, f64)> = self.variables.iter().map(|(k, v)| (k.clone(), *v)).collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// Resolves a lowercased identifier: variables shadow constants, `ans`
    /// is taken from `last`
    pub fn lookup(&self, name: &str, last: f64) -> Option<f64> {
        if let Some(v) = self.variables.get(name) {
            return Some(*v);
        }
        if name == LAST_RESULT {
            return Some(last);
        }
        constant(name)
    }
}
