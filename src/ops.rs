use dtoa;
use std::f64::consts;
use std::str;

use crate::errors::*;

/// Expression calculation result: either value or error
pub type CalcResult = Result<f64, CalcError>;
pub type CalcErrorResult = Result<(), CalcError>;

/// The largest integer whose factorial still fits into f64
pub const MAX_FACTORIAL: f64 = 170.0;

const F64_BUF_LEN: usize = 48;
pub(crate) fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

// every successful result must be a finite number
fn finite(name: &str, v: f64) -> CalcResult {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CalcError::NotFinite(name.to_string()))
    }
}

fn is_integer(v: f64) -> bool {
    v == v.trunc()
}

macro_rules! basic_op {
    ($id:ident, $op:tt) => {
        pub fn $id(a: f64, b: f64) -> CalcResult {
            finite(stringify!($id), a $op b)
        }
    };
}

macro_rules! float_fn {
    ($id:ident) => {
        pub fn $id(x: f64) -> CalcResult {
            finite(stringify!($id), x.$id())
        }
    };
}

macro_rules! asin_cos {
    ($id:ident) => {
        pub fn $id(x: f64) -> CalcResult {
            if x < -1.0 || x > 1.0 {
                return Err(CalcError::ArgumentOutOfRange(
                    stringify!($id).to_string(),
                    format_f64(x),
                    "-1 <= x <= 1".to_string(),
                ));
            }
            Ok(x.$id())
        }
    };
}

basic_op!(add, +);
basic_op!(subtract, -);
basic_op!(multiply, *);

pub fn divide(a: f64, b: f64) -> CalcResult {
    if b == 0.0 {
        return Err(CalcError::DividedByZero(format_f64(a)));
    }
    finite("divide", a / b)
}

/// Remainder with the sign of the dividend
pub fn modulus(a: f64, b: f64) -> CalcResult {
    if b == 0.0 {
        return Err(CalcError::ModuloByZero(format_f64(a)));
    }
    finite("modulus", a % b)
}

/// Raises `base` into `exp` power.
/// `0` raised to zero or negative power is undefined, as well as a negative
/// base with a fractional exponent
pub fn power(base: f64, exp: f64) -> CalcResult {
    if base == 0.0 && exp <= 0.0 {
        return Err(CalcError::ZeroPower(format_f64(exp)));
    }
    if base < 0.0 && !is_integer(exp) {
        return Err(CalcError::NegativeBase(format_f64(base), format_f64(exp)));
    }
    finite("power", base.powf(exp))
}

pub fn negate(x: f64) -> CalcResult {
    Ok(-x)
}

/// Returns factorial of a non-negative integer not greater than 170
pub fn factorial(n: f64) -> CalcResult {
    if n < 0.0 || !is_integer(n) {
        return Err(CalcError::FactorialUndefined(format_f64(n)));
    }
    if n > MAX_FACTORIAL {
        return Err(CalcError::FactorialTooLarge(format_f64(n)));
    }
    let mut res = 1.0f64;
    let mut cnt = 2.0f64;
    while cnt <= n {
        res *= cnt;
        cnt += 1.0;
    }
    Ok(res)
}

float_fn!(sin);
float_fn!(cos);
float_fn!(tan);
float_fn!(atan);
asin_cos!(asin);
asin_cos!(acos);

float_fn!(sinh);
float_fn!(cosh);
float_fn!(tanh);

float_fn!(cbrt);
float_fn!(exp);
float_fn!(abs);

pub fn sqrt(x: f64) -> CalcResult {
    if x < 0.0 {
        return Err(CalcError::ArgumentOutOfRange(
            "sqrt".to_string(),
            format_f64(x),
            "x >= 0".to_string(),
        ));
    }
    Ok(x.sqrt())
}

/// Natural logarithm
pub fn log(x: f64) -> CalcResult {
    if x <= 0.0 {
        return Err(CalcError::ArgumentOutOfRange("log".to_string(), format_f64(x), "x > 0".to_string()));
    }
    Ok(x.ln())
}

pub fn log10(x: f64) -> CalcResult {
    if x <= 0.0 {
        return Err(CalcError::ArgumentOutOfRange(
            "log10".to_string(),
            format_f64(x),
            "x > 0".to_string(),
        ));
    }
    Ok(x.log10())
}

macro_rules! round_op {
    ($name:ident, $id:ident) => {
        /// Rounds to the given number of decimal places (negative values round
        /// to tens, hundreds etc)
        pub fn $name(x: f64, places: i32) -> CalcResult {
            let mul = 10f64.powi(places);
            finite(stringify!($id), (x * mul).$id() / mul)
        }
    };
}

round_op!(round_to, round);
round_op!(floor_to, floor);
round_op!(ceil_to, ceil);

pub fn to_radians(deg: f64) -> f64 {
    deg * consts::PI / 180.0
}

pub fn to_degrees(rad: f64) -> f64 {
    rad * 180.0 / consts::PI
}
