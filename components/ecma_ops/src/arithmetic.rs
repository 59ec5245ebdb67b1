//! Additive and multiplicative operators (ECMA-262 §11.5, §11.6).
//!
//! Addition follows the engine's shortcut order: numeric fast paths, the
//! `NaN`/`Infinity` string shortcuts, the `undefined` shortcut, and only then
//! the generic `ToPrimitive` pipeline. The other four operators resolve each
//! operand to a number through a per-class dispatch and never produce a
//! string.

use tracing::trace;

use core_types::{
    str_to_double, BuiltinString, Host, JsError, JsResult, JsString, ObjectClass, PreferredType,
    Sign, StringRef, Value, ValueKind, NUMBER_MIN_VALUE,
};

use crate::coercion::{number_from_f64, to_number_value, to_string, with_primitive};
use crate::guard::scoped;

// Addition

/// Double addition with saturation to signed Infinity at the edge of the
/// representable range. Results below the smallest magnitude snap to zero.
fn add_double(dx: f64, dy: f64) -> Value {
    if (dx >= f64::MAX && dy > 0.0) || (dx > 0.0 && dy >= f64::MAX) {
        return Value::infinity(Sign::Positive);
    }
    if (dx <= -f64::MAX && dy < 0.0) || (dx < 0.0 && dy <= -f64::MAX) {
        return Value::infinity(Sign::Negative);
    }
    let sum = dx + dy;
    if sum.abs() < NUMBER_MIN_VALUE {
        return if sum.is_sign_negative() {
            Value::negative_zero()
        } else {
            Value::number(0)
        };
    }
    Value::double(sum)
}

/// Sum of two number values of any representation.
pub fn add_numbers(a: Value, b: Value) -> Value {
    match (a.kind(), b.kind()) {
        (ValueKind::Int32(x), ValueKind::Int32(y)) => match x.checked_add(y) {
            Some(sum) => Value::number(sum),
            None => Value::double(f64::from(x) + f64::from(y)),
        },
        (ValueKind::NaN, _) | (_, ValueKind::NaN) => Value::nan(),
        (ValueKind::Infinity(s), ValueKind::Infinity(t)) => {
            if s == t {
                a
            } else {
                Value::nan()
            }
        }
        (ValueKind::Infinity(_), _) => a,
        (_, ValueKind::Infinity(_)) => b,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(dx), Some(dy)) => add_double(dx, dy),
            _ => Value::nan(),
        },
    }
}

fn concat_strings<H: Host + ?Sized>(
    host: &mut H,
    left: StringRef,
    right: StringRef,
) -> JsResult<Value> {
    let joined = JsString::concat2(host.string(left)?, host.string(right)?);
    Ok(Value::string(host.alloc_string(joined)))
}

/// Builtin text an infinite or NaN operand contributes to a concatenation.
fn special_number_text(v: Value) -> StringRef {
    StringRef::Builtin(match v.kind() {
        ValueKind::Infinity(Sign::Positive) => BuiltinString::Infinity,
        ValueKind::Infinity(Sign::Negative) => BuiltinString::NegInfinity,
        _ => BuiltinString::NaN,
    })
}

/// `Infinity + other` or `other + Infinity`, keeping operand order.
fn add_infinity<H: Host + ?Sized>(
    host: &mut H,
    infinity: Value,
    other: Value,
    infinity_on_left: bool,
) -> JsResult<Value> {
    with_primitive(host, other, PreferredType::Default, |host, prim| match prim.as_string() {
        Some(s) => {
            let text = special_number_text(infinity);
            if infinity_on_left {
                concat_strings(host, text, s)
            } else {
                concat_strings(host, s, text)
            }
        }
        None => {
            let n = to_number_value(host, prim)?.value;
            Ok(add_numbers(infinity, n))
        }
    })
}

/// The addition operator `x + y`.
///
/// A string result is a fresh heap string owned by the caller. Operand
/// strings are never released.
pub fn add<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    match (x.kind(), y.kind()) {
        (
            ValueKind::Int32(_) | ValueKind::Double(_),
            ValueKind::Int32(_) | ValueKind::Double(_),
        ) => return Ok(add_numbers(x, y)),
        (ValueKind::NaN, ValueKind::String(s)) => {
            return concat_strings(host, BuiltinString::NaN.into(), s)
        }
        (ValueKind::String(s), ValueKind::NaN) => {
            return concat_strings(host, s, BuiltinString::NaN.into())
        }
        (ValueKind::NaN, other) | (other, ValueKind::NaN)
            if !matches!(other, ValueKind::Object(_)) =>
        {
            return Ok(Value::nan())
        }
        (ValueKind::Infinity(_), ValueKind::Infinity(_)) => return Ok(add_numbers(x, y)),
        (ValueKind::Infinity(_), _) => return add_infinity(host, x, y, true),
        (_, ValueKind::Infinity(_)) => return add_infinity(host, y, x, false),
        (
            ValueKind::Undefined,
            ValueKind::Undefined | ValueKind::Null | ValueKind::Int32(_) | ValueKind::Double(_),
        )
        | (ValueKind::Null | ValueKind::Int32(_) | ValueKind::Double(_), ValueKind::Undefined) => {
            return Ok(Value::nan())
        }
        _ => {}
    }
    add_generic(host, x, y)
}

/// ECMA-262 §11.6.1 steps 5 to 8.
fn add_generic<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    with_primitive(host, x, PreferredType::Default, |host, lprim| {
        with_primitive(host, y, PreferredType::Default, |host, rprim| {
            combine_primitives(host, lprim, rprim)
        })
    })
}

fn combine_primitives<H: Host + ?Sized>(
    host: &mut H,
    lprim: Value,
    rprim: Value,
) -> JsResult<Value> {
    if !lprim.is_string() && !rprim.is_string() {
        let a = to_number_value(host, lprim)?.value;
        let b = to_number_value(host, rprim)?.value;
        return Ok(add_numbers(a, b));
    }
    scoped(host, |host, scratch| {
        let lstr = to_string(host, lprim)?;
        if !lprim.is_string() {
            scratch.track(lstr);
        }
        let rstr = to_string(host, rprim)?;
        if !rprim.is_string() {
            scratch.track(rstr);
        }
        trace!(target: "ecma_ops::arithmetic", scratch = scratch.len(), "string concatenation");
        concat_strings(host, lstr, rstr)
    })
}

// Subtraction, multiplication, division, remainder

/// Number an operand contributes to `-`, `*`, `/` and `%`.
enum Operand {
    Number(Value),
    /// A Function-class operand; the whole expression is NaN.
    Callable,
}

fn parse_string_operand<H: Host + ?Sized>(host: &H, s: StringRef) -> JsResult<Value> {
    Ok(match str_to_double(host.string(s)?) {
        Some(d) => number_from_f64(d),
        None => Value::nan(),
    })
}

fn resolve_primitive<H: Host + ?Sized>(host: &H, v: Value) -> JsResult<Value> {
    Ok(match v.kind() {
        ValueKind::Int32(_) | ValueKind::Double(_) | ValueKind::NaN | ValueKind::Infinity(_) => v,
        ValueKind::Boolean(b) => Value::number(i32::from(b)),
        ValueKind::Null => Value::number(0),
        ValueKind::Undefined | ValueKind::None => Value::nan(),
        ValueKind::String(s) => parse_string_operand(host, s)?,
        _ => {
            return Err(JsError::internal(format!(
                "arithmetic operand {:?} is not a primitive",
                v
            )))
        }
    })
}

fn resolve_operand<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<Operand> {
    let obj = match v.kind() {
        ValueKind::Object(obj) => obj,
        ValueKind::Function(_) => return Ok(Operand::Callable),
        ValueKind::Environment(_) => {
            return Err(JsError::internal(
                "environment value reached an arithmetic operator",
            ))
        }
        _ => return Ok(Operand::Number(resolve_primitive(host, v)?)),
    };
    let number = match host.object_class(obj)? {
        ObjectClass::Number(n) => n,
        ObjectClass::Boolean(b) => Value::number(i32::from(b)),
        ObjectClass::String(s) => parse_string_operand(host, s)?,
        ObjectClass::Function(_) => return Ok(Operand::Callable),
        ObjectClass::Object | ObjectClass::Array | ObjectClass::Date(_) => {
            with_primitive(host, v, PreferredType::Number, |host, prim| {
                resolve_primitive(host, prim)
            })?
        }
    };
    Ok(Operand::Number(number))
}

/// Resolve both operands left to right. `None` means a callable operand
/// made the result NaN; the right operand is not touched if the left one
/// is callable.
fn resolve_operands<H: Host + ?Sized>(
    host: &mut H,
    x: Value,
    y: Value,
) -> JsResult<Option<(Value, Value)>> {
    let Operand::Number(a) = resolve_operand(host, x)? else {
        return Ok(None);
    };
    let Operand::Number(b) = resolve_operand(host, y)? else {
        return Ok(None);
    };
    Ok(Some((a, b)))
}

fn numeric_binary<H, F>(host: &mut H, x: Value, y: Value, op: F) -> JsResult<Value>
where
    H: Host + ?Sized,
    F: FnOnce(Value, Value) -> Value,
{
    Ok(match resolve_operands(host, x, y)? {
        Some((a, b)) => op(a, b),
        None => Value::nan(),
    })
}

fn as_f64_or_nan(v: Value) -> f64 {
    v.as_f64().unwrap_or(f64::NAN)
}

/// Signed Infinity from the dividend when the divisor is a zero.
fn divide_by_zero(dividend: f64) -> Value {
    if dividend.is_nan() || dividend == 0.0 {
        Value::nan()
    } else {
        Value::infinity(Sign::of(dividend))
    }
}

fn is_zero(v: Value) -> bool {
    v.as_f64().is_some_and(|d| d == 0.0)
}

/// `a - b` on number values.
pub fn sub_numbers(a: Value, b: Value) -> Value {
    if let (Some(x), Some(y)) = (a.as_int32(), b.as_int32()) {
        if let Some(diff) = x.checked_sub(y) {
            return Value::number(diff);
        }
    }
    Value::double(as_f64_or_nan(a) - as_f64_or_nan(b))
}

/// `a * b` on number values.
pub fn mul_numbers(a: Value, b: Value) -> Value {
    if let (Some(x), Some(y)) = (a.as_int32(), b.as_int32()) {
        if let Some(product) = x.checked_mul(y) {
            if product == 0 && (x < 0 || y < 0) {
                return Value::negative_zero();
            }
            return Value::number(product);
        }
    }
    Value::double(as_f64_or_nan(a) * as_f64_or_nan(b))
}

/// `a / b` on number values.
pub fn div_numbers(a: Value, b: Value) -> Value {
    if is_zero(b) {
        return divide_by_zero(as_f64_or_nan(a));
    }
    if let (Some(x), Some(y)) = (a.as_int32(), b.as_int32()) {
        if x == 0 && y < 0 {
            return Value::negative_zero();
        }
        if let (Some(0), Some(quotient)) = (x.checked_rem(y), x.checked_div(y)) {
            return Value::number(quotient);
        }
    }
    Value::double(as_f64_or_nan(a) / as_f64_or_nan(b))
}

/// `a % b` on number values. The result takes the dividend's sign.
pub fn rem_numbers(a: Value, b: Value) -> Value {
    if is_zero(b) {
        return divide_by_zero(as_f64_or_nan(a));
    }
    if let (Some(x), Some(y)) = (a.as_int32(), b.as_int32()) {
        let r = x.checked_rem(y).unwrap_or(0);
        if r == 0 && x < 0 {
            return Value::negative_zero();
        }
        return Value::number(r);
    }
    Value::double(as_f64_or_nan(a) % as_f64_or_nan(b))
}

/// The subtraction operator `x - y`.
pub fn sub<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    numeric_binary(host, x, y, sub_numbers)
}

/// The multiplication operator `x * y`.
pub fn mul<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    numeric_binary(host, x, y, mul_numbers)
}

/// The division operator `x / y`. Any zero divisor yields Infinity signed
/// like the dividend; `0 / 0` and NaN dividends yield NaN.
pub fn div<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    numeric_binary(host, x, y, div_numbers)
}

/// The remainder operator `x % y`, with the same zero-divisor rule as
/// [`div`].
pub fn rem<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<Value> {
    numeric_binary(host, x, y, rem_numbers)
}
