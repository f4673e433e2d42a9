use lazy_static::lazy_static;

use crate::config::AngleMode;
use crate::errors::*;
use crate::ops::{self, CalcResult};

lazy_static! {
    pub(crate) static ref STD_FUNCS: Vec<&'static str> = [
        "sin",
        "cos",
        "tan",
        "asin",
        "acos",
        "atan",
        "sinh",
        "cosh",
        "tanh",
        "sqrt",
        "cbrt",
        "log",
        "log10",
        "exp",
        "abs",
        "pow",
        "min",
        "max",
        "round",
        "floor",
        "ceil",
    ]
    .to_vec();
}

/// Function families. Only `Angular` functions depend on the angle mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuncKind {
    /// trigonometric functions and their inverses: the argument is converted
    /// from degrees in degree mode
    Angular,
    Hyperbolic,
    /// single argument non-trigonometric functions
    Math,
    Power,
    MinMax,
    Rounding,
}

pub fn is_func(name: &str) -> bool {
    STD_FUNCS.iter().any(|f| *f == name)
}

pub fn kind(name: &str) -> Option<FuncKind> {
    match name {
        "sin" | "cos" | "tan" | "asin" | "acos" | "atan" => Some(FuncKind::Angular),
        "sinh" | "cosh" | "tanh" => Some(FuncKind::Hyperbolic),
        "sqrt" | "cbrt" | "log" | "log10" | "exp" | "abs" => Some(FuncKind::Math),
        "pow" => Some(FuncKind::Power),
        "min" | "max" => Some(FuncKind::MinMax),
        "round" | "floor" | "ceil" => Some(FuncKind::Rounding),
        _ => None,
    }
}

fn single(fname: &str, args: &[f64]) -> CalcResult {
    if args.len() != 1 {
        return Err(CalcError::FunctionArgs(fname.to_string(), "1 argument"));
    }
    Ok(args[0])
}

fn unary(fname: &str, x: f64) -> CalcResult {
    match fname {
        "sin" => ops::sin(x),
        "cos" => ops::cos(x),
        "tan" => ops::tan(x),
        "asin" => ops::asin(x),
        "acos" => ops::acos(x),
        "atan" => ops::atan(x),
        "sinh" => ops::sinh(x),
        "cosh" => ops::cosh(x),
        "tanh" => ops::tanh(x),
        "sqrt" => ops::sqrt(x),
        "cbrt" => ops::cbrt(x),
        "log" => ops::log(x),
        "log10" => ops::log10(x),
        "exp" => ops::exp(x),
        "abs" => ops::abs(x),
        _ => Err(CalcError::UnknownFunction(fname.to_string())),
    }
}

fn min_max<F>(fname: &str, args: &[f64], pick: F) -> CalcResult
where
    F: Fn(f64, f64) -> bool,
{
    if args.is_empty() {
        return Err(CalcError::FunctionArgs(fname.to_string(), "at least 1 argument"));
    }
    let mut v = args[0];
    for a in &args[1..] {
        if pick(*a, v) {
            v = *a;
        }
    }
    Ok(v)
}

fn rounding(fname: &str, args: &[f64]) -> CalcResult {
    let (x, places) = match args {
        [x] => (*x, 0),
        [x, p] => (*x, p.trunc() as i32),
        _ => return Err(CalcError::FunctionArgs(fname.to_string(), "1 or 2 arguments")),
    };
    match fname {
        "round" => ops::round_to(x, places),
        "floor" => ops::floor_to(x, places),
        _ => ops::ceil_to(x, places),
    }
}

/// Calls a function from the registry with already evaluated arguments
pub fn call(fname: &str, args: &[f64], mode: AngleMode) -> CalcResult {
    let kind = match kind(fname) {
        Some(k) => k,
        None => return Err(CalcError::UnknownFunction(fname.to_string())),
    };

    match kind {
        FuncKind::Angular => {
            let x = single(fname, args)?;
            let x = if mode == AngleMode::Degrees { ops::to_radians(x) } else { x };
            unary(fname, x)
        }
        FuncKind::Hyperbolic | FuncKind::Math => {
            let x = single(fname, args)?;
            unary(fname, x)
        }
        FuncKind::Power => {
            if args.len() != 2 {
                return Err(CalcError::FunctionArgs(fname.to_string(), "2 arguments"));
            }
            ops::power(args[0], args[1])
        }
        FuncKind::MinMax => {
            if fname == "min" {
                min_max(fname, args, |a, b| a < b)
            } else {
                min_max(fname, args, |a, b| a > b)
            }
        }
        FuncKind::Rounding => rounding(fname, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        for f in STD_FUNCS.iter() {
            assert!(kind(f).is_some(), "{} has no kind", f);
        }
        assert!(is_func("log10"));
        assert!(!is_func("ln"));
        assert_eq!(kind("sinh"), Some(FuncKind::Hyperbolic));
        assert_eq!(kind("atan"), Some(FuncKind::Angular));
    }

    #[test]
    fn test_angle_mode() {
        let v = call("sin", &[90.0], AngleMode::Degrees).unwrap();
        assert!((v - 1.0).abs() < 1e-12);
        let v = call("cos", &[0.0], AngleMode::Radians).unwrap();
        assert_eq!(v, 1.0);
        // hyperbolic functions ignore degree mode
        assert_eq!(call("sinh", &[1.0], AngleMode::Degrees), Ok(1.0f64.sinh()));
        // the argument of inverse functions is converted as well
        assert_eq!(call("asin", &[30.0], AngleMode::Degrees), Ok(ops::to_radians(30.0).asin()));
        assert!(call("acos", &[90.0], AngleMode::Degrees).is_err());
    }

    #[test]
    fn test_arity() {
        assert_eq!(
            call("sqrt", &[4.0, 9.0], AngleMode::Radians),
            Err(CalcError::FunctionArgs("sqrt".to_string(), "1 argument"))
        );
        assert_eq!(
            call("pow", &[2.0], AngleMode::Radians),
            Err(CalcError::FunctionArgs("pow".to_string(), "2 arguments"))
        );
        assert_eq!(
            call("max", &[], AngleMode::Radians),
            Err(CalcError::FunctionArgs("max".to_string(), "at least 1 argument"))
        );
        assert_eq!(
            call("round", &[1.0, 2.0, 3.0], AngleMode::Radians),
            Err(CalcError::FunctionArgs("round".to_string(), "1 or 2 arguments"))
        );
        assert_eq!(
            call("ln", &[1.0], AngleMode::Radians),
            Err(CalcError::UnknownFunction("ln".to_string()))
        );
    }

    #[test]
    fn test_multi_args() {
        assert_eq!(call("pow", &[2.0, 8.0], AngleMode::Radians), Ok(256.0));
        assert_eq!(call("min", &[3.0, -1.0, 2.0], AngleMode::Radians), Ok(-1.0));
        assert_eq!(call("max", &[3.0, -1.0, 7.5], AngleMode::Radians), Ok(7.5));
        assert_eq!(call("max", &[4.0], AngleMode::Radians), Ok(4.0));
        assert_eq!(call("round", &[2.5], AngleMode::Radians), Ok(3.0));
        assert_eq!(call("round", &[3.14159, 2.0], AngleMode::Radians), Ok(3.14));
        assert_eq!(call("floor", &[-2.5], AngleMode::Radians), Ok(-3.0));
        assert_eq!(call("ceil", &[2.01], AngleMode::Radians), Ok(3.0));
    }

    #[test]
    fn test_domain() {
        assert!(call("sqrt", &[-1.0], AngleMode::Radians).is_err());
        assert!(call("log", &[0.0], AngleMode::Radians).is_err());
        assert!(call("pow", &[0.0, 0.0], AngleMode::Radians).is_err());
    }
}
