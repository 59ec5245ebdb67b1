//! Type conversion abstract operations (ECMA-262 §9).
//!
//! Each conversion is a match over the operand's kind. Object operands go
//! through `ToPrimitive`, and the primitive it produces is retained while it
//! is converted further (see [`crate::guard::with_transient`]).
//!
//! Strings returned by `to_string` are either built-ins, the operand's own
//! string, or fresh heap strings with a zero reference count. A caller that
//! does not pass the result on must recall it.

use num_traits::ToPrimitive as _;
use tracing::{debug, trace};

use core_types::{
    format_double, format_int32, str_to_double, BuiltinString, Host, JsError, JsResult, JsString, ObjectClass, ObjectRef,
    PreferredType, Sign, StringRef, Value, ValueKind,
};

use crate::guard::with_transient;

/// `2^53 - 1`, the largest length `to_length` returns.
pub const MAX_SAFE_LENGTH: u64 = (1 << 53) - 1;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Result of the slow ToNumber form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberConversion {
    /// Int32, Double, NaN or Infinity
    pub value: Value,
    /// False exactly when `value` is NaN
    pub convertible: bool,
}

impl NumberConversion {
    fn number(value: Value) -> Self {
        NumberConversion {
            convertible: !value.is_nan(),
            value,
        }
    }

    fn nan() -> Self {
        NumberConversion {
            value: Value::nan(),
            convertible: false,
        }
    }
}

/// Number value for a double, narrowed to Int32 when it is integral and in
/// range. `-0` stays a double.
pub fn number_from_f64(d: f64) -> Value {
    if d == 0.0 && d.is_sign_negative() {
        return Value::negative_zero();
    }
    if d.fract() == 0.0 {
        if let Some(n) = d.to_i32() {
            return Value::number(n);
        }
    }
    Value::double(d)
}

fn internal_kind_error(op: &str, v: Value) -> JsError {
    JsError::internal(format!("{} reached with engine-internal value {:?}", op, v))
}

// ToPrimitive

/// `ToPrimitive(v, hint)`.
///
/// Primitives are returned unchanged. Date objects always use their date
/// string; every other object delegates to `[[DefaultValue]]`.
pub fn to_primitive<H: Host + ?Sized>(
    host: &mut H,
    v: Value,
    hint: PreferredType,
) -> JsResult<Value> {
    let Some(obj) = v.as_object() else {
        return Ok(v);
    };
    if let ObjectClass::Date(_) = host.object_class(obj)? {
        return Ok(Value::string(host.date_to_string(obj)?));
    }
    debug!(target: "ecma_ops::coercion", object = obj.index(), ?hint, "object to primitive");
    let prim = host.default_value(obj, hint)?;
    if !prim.is_primitive() {
        return Err(JsError::internal(
            "[[DefaultValue]] returned a non-primitive value",
        ));
    }
    Ok(prim)
}

/// `ToPrimitive` variant used by abstract equality: Number and Boolean
/// wrappers unwrap to their payload, everything else converts with no hint.
pub fn to_primitive_unboxed<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<Value> {
    if let Some(obj) = v.as_object() {
        match host.object_class(obj)? {
            ObjectClass::Number(n) => return Ok(n),
            ObjectClass::Boolean(b) => return Ok(Value::boolean(b)),
            _ => {}
        }
    }
    to_primitive(host, v, PreferredType::Default)
}

/// Run `f` on `ToPrimitive(v, hint)`. When `v` is an object the primitive
/// is retained for the duration of `f` and released afterwards.
pub fn with_primitive<H, T, F>(host: &mut H, v: Value, hint: PreferredType, f: F) -> JsResult<T>
where
    H: Host + ?Sized,
    F: FnOnce(&mut H, Value) -> JsResult<T>,
{
    if !v.is_object() {
        return f(host, v);
    }
    let prim = to_primitive(host, v, hint)?;
    with_transient(host, prim, |host| f(host, prim))
}

// ToBoolean

/// `ToBoolean(v)`. Raw function entries are truthy like function objects.
pub fn to_boolean<H: Host + ?Sized>(host: &H, v: Value) -> JsResult<bool> {
    Ok(match v.kind() {
        ValueKind::Undefined | ValueKind::Null | ValueKind::None | ValueKind::NaN => false,
        ValueKind::Boolean(b) => b,
        ValueKind::String(s) => !host.string(s)?.is_empty(),
        ValueKind::Int32(n) => n != 0,
        ValueKind::Double(d) => d != 0.0,
        ValueKind::Infinity(_) => true,
        ValueKind::Object(_) | ValueKind::Function(_) => true,
        ValueKind::Environment(_) => return Err(internal_kind_error("ToBoolean", v)),
    })
}

// ToNumber

/// Slow `ToNumber(v)`: a number value plus its convertibility.
pub fn to_number_value<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<NumberConversion> {
    Ok(match v.kind() {
        ValueKind::Int32(_) | ValueKind::Double(_) | ValueKind::Infinity(_) => {
            NumberConversion::number(v)
        }
        ValueKind::NaN | ValueKind::Undefined | ValueKind::None => NumberConversion::nan(),
        ValueKind::Null => NumberConversion::number(Value::number(0)),
        ValueKind::Boolean(b) => NumberConversion::number(Value::number(i32::from(b))),
        ValueKind::String(s) => match str_to_double(host.string(s)?) {
            Some(d) => NumberConversion::number(number_from_f64(d)),
            None => NumberConversion::nan(),
        },
        ValueKind::Object(_) => {
            with_primitive(host, v, PreferredType::Number, to_number_value)?
        }
        ValueKind::Environment(_) | ValueKind::Function(_) => {
            return Err(internal_kind_error("ToNumber", v))
        }
    })
}

/// `ToNumber(v)` as an `f64`.
pub fn to_f64<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<f64> {
    let converted = to_number_value(host, v)?;
    Ok(converted.value.as_f64().unwrap_or(f64::NAN))
}

/// Fast `ToNumber(v)` for callers that know the result fits in 32 bits.
///
/// Int32 and Boolean operands are answered without conversion. Anything
/// else goes through the slow form; NaN and infinities become 0 and
/// fractions truncate toward zero, wrapping like `ToInt32` when out of range.
pub fn to_number<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<i32> {
    match v.kind() {
        ValueKind::Int32(n) => Ok(n),
        ValueKind::Boolean(b) => Ok(i32::from(b)),
        _ => to_int32(host, v),
    }
}

/// `ToNumber64`: Int32, Double and Boolean only, truncated toward zero and
/// saturated to the `i64` range. NaN is 0.
pub fn to_number64(v: Value) -> JsResult<i64> {
    match v.kind() {
        ValueKind::Int32(n) => Ok(i64::from(n)),
        ValueKind::Boolean(b) => Ok(i64::from(b)),
        ValueKind::Double(d) => Ok(d.trunc().to_i64().unwrap_or(if d < 0.0 {
            i64::MIN
        } else {
            i64::MAX
        })),
        ValueKind::NaN => Ok(0),
        ValueKind::Infinity(Sign::Positive) => Ok(i64::MAX),
        ValueKind::Infinity(Sign::Negative) => Ok(i64::MIN),
        _ => Err(JsError::type_error(format!(
            "cannot convert {:?} to a 64-bit integer",
            v
        ))),
    }
}

/// `ToInteger(v)`: NaN becomes `+0`, infinities stay, everything else
/// truncates toward zero.
pub fn to_integer<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<Value> {
    let converted = to_number_value(host, v)?.value;
    Ok(match converted.kind() {
        ValueKind::NaN => Value::number(0),
        ValueKind::Infinity(_) | ValueKind::Int32(_) => converted,
        ValueKind::Double(d) => number_from_f64(d.trunc()),
        _ => return Err(internal_kind_error("ToInteger", converted)),
    })
}

/// Integer part of `d` modulo 2^32; 0 for NaN and infinities.
fn modulo_two_pow_32(d: f64) -> u32 {
    if !d.is_finite() {
        return 0;
    }
    d.trunc().rem_euclid(TWO_POW_32) as u32
}

/// `ToUint32(v)`.
pub fn to_uint32<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<u32> {
    if let Some(n) = v.as_int32() {
        return Ok(n as u32);
    }
    let d = to_f64(host, v)?;
    Ok(modulo_two_pow_32(d))
}

/// `ToInt32(v)`.
pub fn to_int32<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<i32> {
    if let Some(n) = v.as_int32() {
        return Ok(n);
    }
    Ok(to_uint32(host, v)? as i32)
}

/// `ToUint16(v)`.
pub fn to_uint16<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<u16> {
    Ok(to_uint32(host, v)? as u16)
}

// ToString

/// `ToString(v)`.
pub fn to_string<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<StringRef> {
    let builtin = |id: BuiltinString| -> JsResult<StringRef> { Ok(StringRef::Builtin(id)) };
    match v.kind() {
        ValueKind::Undefined | ValueKind::None => builtin(BuiltinString::Undefined),
        ValueKind::Null => builtin(BuiltinString::Null),
        ValueKind::Boolean(true) => builtin(BuiltinString::True),
        ValueKind::Boolean(false) => builtin(BuiltinString::False),
        ValueKind::NaN => builtin(BuiltinString::NaN),
        ValueKind::Infinity(Sign::Positive) => builtin(BuiltinString::Infinity),
        ValueKind::Infinity(Sign::Negative) => builtin(BuiltinString::NegInfinity),
        ValueKind::Int32(0) => builtin(BuiltinString::Digit0),
        ValueKind::Int32(n) => Ok(host.alloc_string(JsString::from_str(&format_int32(n)))),
        ValueKind::Double(d) if d == 0.0 => builtin(BuiltinString::Digit0),
        ValueKind::Double(d) => Ok(host.alloc_string(JsString::from_str(&format_double(d)))),
        ValueKind::String(s) => Ok(s),
        ValueKind::Object(_) => {
            let prim = to_primitive(host, v, PreferredType::String)?;
            match prim.as_string() {
                Some(s) => Ok(s),
                None => with_transient(host, prim, |host| to_string(host, prim)),
            }
        }
        ValueKind::Environment(_) | ValueKind::Function(_) => {
            Err(internal_kind_error("ToString", v))
        }
    }
}

/// `ToString(v)` as a string value.
pub fn to_string_value<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<Value> {
    Ok(Value::string(to_string(host, v)?))
}

// ToObject

/// `ToObject(v)`: wraps primitives; `undefined`, `null` and none throw.
pub fn to_object<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<ObjectRef> {
    match v.kind() {
        ValueKind::Object(obj) => Ok(obj),
        ValueKind::Int32(_) | ValueKind::Double(_) | ValueKind::NaN | ValueKind::Infinity(_) => {
            host.new_number_object(v)
        }
        ValueKind::Boolean(b) => host.new_boolean_object(b),
        ValueKind::String(s) => host.new_string_object(s),
        ValueKind::Undefined | ValueKind::Null | ValueKind::None => {
            trace!(target: "ecma_ops::coercion", ?v, "ToObject TypeError");
            Err(JsError::type_error(format!(
                "Cannot convert {} to object",
                nullish_name(v)
            )))
        }
        ValueKind::Environment(_) | ValueKind::Function(_) => {
            Err(internal_kind_error("ToObject", v))
        }
    }
}

fn nullish_name(v: Value) -> &'static str {
    if v.is_null() {
        "null"
    } else {
        "undefined"
    }
}

/// `CheckObjectCoercible(v)`.
pub fn check_object_coercible(v: Value) -> JsResult<()> {
    if v.is_nullish() {
        trace!(target: "ecma_ops::coercion", ?v, "CheckObjectCoercible TypeError");
        return Err(JsError::type_error(format!(
            "Cannot convert {} to object",
            nullish_name(v)
        )));
    }
    Ok(())
}

/// `IsCallable(v)`: Function-class objects and raw function entries.
pub fn is_callable<H: Host + ?Sized>(host: &H, v: Value) -> JsResult<bool> {
    Ok(match v.kind() {
        ValueKind::Function(_) => true,
        ValueKind::Object(obj) => matches!(host.object_class(obj)?, ObjectClass::Function(_)),
        _ => false,
    })
}

// ToLength

fn length_from_f64(d: f64) -> u64 {
    if d.is_nan() || d <= 0.0 {
        return 0;
    }
    if d == f64::INFINITY {
        return MAX_SAFE_LENGTH;
    }
    d.trunc().to_u64().map_or(MAX_SAFE_LENGTH, |n| n.min(MAX_SAFE_LENGTH))
}

/// `ToLength(v)`: clamp to `[0, 2^53 - 1]`.
pub fn to_length<H: Host + ?Sized>(host: &mut H, v: Value) -> JsResult<u64> {
    Ok(match v.kind() {
        ValueKind::Int32(n) => u64::try_from(n).unwrap_or(0),
        ValueKind::Double(d) => length_from_f64(d),
        ValueKind::Infinity(Sign::Positive) => MAX_SAFE_LENGTH,
        ValueKind::Infinity(Sign::Negative)
        | ValueKind::NaN
        | ValueKind::Undefined
        | ValueKind::Null
        | ValueKind::None => 0,
        ValueKind::Boolean(b) => u64::from(b),
        ValueKind::String(s) => str_to_double(host.string(s)?).map_or(0, length_from_f64),
        ValueKind::Object(_) => with_primitive(host, v, PreferredType::Number, to_length)?,
        ValueKind::Environment(_) | ValueKind::Function(_) => {
            return Err(internal_kind_error("ToLength", v))
        }
    })
}
