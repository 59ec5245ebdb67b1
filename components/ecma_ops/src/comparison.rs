//! Relational and equality operators (ECMA-262 §11.8, §11.9, §9.12).

use std::cmp::Ordering;

use tracing::trace;

use core_types::{
    FunctionRecord, Host, JsResult, JsString, JsType, ObjectClass, PreferredType, Value,
    ValueKind,
};

use crate::coercion::{to_number_value, to_primitive_unboxed, with_primitive};
use crate::guard::with_transient;

/// Outcome of the abstract relational comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `x < y`
    Less,
    /// `x >= y`
    NotLess,
    /// A NaN or `undefined` was involved; every relational operator built on
    /// this result is false, including the negated ones.
    Incomparable,
}

impl Relation {
    fn from_bool(less: bool) -> Relation {
        if less {
            Relation::Less
        } else {
            Relation::NotLess
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Relation {
    if a.is_nan() || b.is_nan() {
        Relation::Incomparable
    } else {
        Relation::from_bool(a < b)
    }
}

/// The abstract relational comparison `x < y`.
///
/// `left_first` fixes the order in which the operands are converted, which is
/// observable through user `valueOf` / `toString` methods.
pub fn abstract_relational_comparison<H: Host + ?Sized>(
    host: &mut H,
    x: Value,
    y: Value,
    left_first: bool,
) -> JsResult<Relation> {
    if x.is_numeric() && y.is_numeric() {
        if let (Some(a), Some(b)) = (x.as_int32(), y.as_int32()) {
            return Ok(Relation::from_bool(a < b));
        }
        if let (Some(a), Some(b)) = (x.as_f64(), y.as_f64()) {
            return Ok(compare_f64(a, b));
        }
    }
    if x.is_undefined() || y.is_undefined() {
        return Ok(Relation::Incomparable);
    }
    if left_first {
        with_primitive(host, x, PreferredType::Number, |host, px| {
            with_primitive(host, y, PreferredType::Number, |host, py| {
                compare_primitives(host, px, py)
            })
        })
    } else {
        with_primitive(host, y, PreferredType::Number, |host, py| {
            with_primitive(host, x, PreferredType::Number, |host, px| {
                compare_primitives(host, px, py)
            })
        })
    }
}

fn compare_primitives<H: Host + ?Sized>(host: &mut H, px: Value, py: Value) -> JsResult<Relation> {
    if let (Some(a), Some(b)) = (px.as_string(), py.as_string()) {
        let ordering = JsString::compare(host.string(a)?, host.string(b)?);
        return Ok(Relation::from_bool(ordering == Ordering::Less));
    }
    let nx = to_number_value(host, px)?;
    let ny = to_number_value(host, py)?;
    if !nx.convertible || !ny.convertible {
        return Ok(Relation::Incomparable);
    }
    match (nx.value.as_f64(), ny.value.as_f64()) {
        (Some(a), Some(b)) => Ok(compare_f64(a, b)),
        _ => Ok(Relation::Incomparable),
    }
}

/// `x < y`
pub fn less_than<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    Ok(abstract_relational_comparison(host, x, y, true)? == Relation::Less)
}

/// `x > y`
pub fn greater_than<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    Ok(abstract_relational_comparison(host, y, x, false)? == Relation::Less)
}

/// `x <= y`
pub fn less_equal<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    Ok(abstract_relational_comparison(host, y, x, false)? == Relation::NotLess)
}

/// `x >= y`
pub fn greater_equal<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    Ok(abstract_relational_comparison(host, x, y, true)? == Relation::NotLess)
}

// Equality

/// SameValue (§9.12).
///
/// Numbers compare by value with the sign of zero significant, and NaN is
/// the same as NaN. Function objects are the same when they run the same
/// code, and a Function object is the same as the raw entry it wraps.
pub fn same_value<H: Host + ?Sized>(host: &H, x: Value, y: Value) -> JsResult<bool> {
    if x == y {
        return Ok(true);
    }
    Ok(match (x.kind(), y.kind()) {
        (ValueKind::Int32(a), ValueKind::Int32(b)) => a == b,
        (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
        (ValueKind::Int32(_) | ValueKind::Double(_), ValueKind::Int32(_) | ValueKind::Double(_)) => {
            match (x.as_f64(), y.as_f64()) {
                (Some(a), Some(b)) => a == b && a.is_sign_negative() == b.is_sign_negative(),
                _ => false,
            }
        }
        (ValueKind::String(a), ValueKind::String(b)) => {
            JsString::equals(host.string(a)?, host.string(b)?)
        }
        (ValueKind::Object(a), ValueKind::Object(b)) => {
            match (host.object_class(a)?, host.object_class(b)?) {
                (ObjectClass::Function(fa), ObjectClass::Function(fb)) => fa == fb,
                _ => false,
            }
        }
        (ValueKind::Object(obj), ValueKind::Function(entry))
        | (ValueKind::Function(entry), ValueKind::Object(obj)) => matches!(
            host.object_class(obj)?,
            ObjectClass::Function(FunctionRecord::Ordinary { entry: e }) if e == entry
        ),
        _ => false,
    })
}

/// The strict equality comparison `x === y` (§11.9.6).
///
/// Mixed Int32 / Double and Double / Double pairs compare through
/// [`core_types::SemanticsConfig::numbers_equal`].
pub fn strict_equality<H: Host + ?Sized>(host: &H, x: Value, y: Value) -> JsResult<bool> {
    if x.is_nan() || y.is_nan() {
        return Ok(false);
    }
    let x = if x.is_negative_zero() {
        Value::positive_zero()
    } else {
        x
    };
    let y = if y.is_negative_zero() {
        Value::positive_zero()
    } else {
        y
    };
    let semantics = host.semantics();
    Ok(match (x.kind(), y.kind()) {
        (ValueKind::Double(a), ValueKind::Int32(b)) | (ValueKind::Int32(b), ValueKind::Double(a)) => {
            semantics.numbers_equal(a, f64::from(b))
        }
        (ValueKind::Double(a), ValueKind::Double(b)) => semantics.numbers_equal(a, b),
        (ValueKind::Boolean(_), ValueKind::Boolean(_)) => x == y,
        (ValueKind::Boolean(_), _) | (_, ValueKind::Boolean(_)) => false,
        (ValueKind::None, ValueKind::Undefined) | (ValueKind::Undefined, ValueKind::None) => true,
        _ => same_value(host, x, y)?,
    })
}

fn undefined_if_none(v: Value) -> Value {
    if v.is_none() {
        Value::undefined()
    } else {
        v
    }
}

/// The abstract equality comparison `x == y` (§11.9.3).
pub fn abstract_equality<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    let x = undefined_if_none(x);
    let y = undefined_if_none(y);
    let (tx, ty) = (x.type_of(), y.type_of());

    if tx.is_numeric() && ty.is_numeric() {
        return strict_equality(host, x, y);
    }
    if tx == ty {
        return same_value(host, x, y);
    }
    match (tx, ty) {
        (JsType::Null, JsType::Undefined) | (JsType::Undefined, JsType::Null) => Ok(true),
        (JsType::Object, JsType::Function) | (JsType::Function, JsType::Object) => {
            same_value(host, x, y)
        }
        (t, JsType::String) if t.is_numeric() => {
            let ny = to_number_value(host, y)?.value;
            abstract_equality(host, x, ny)
        }
        (JsType::String, t) if t.is_numeric() => {
            let nx = to_number_value(host, x)?.value;
            abstract_equality(host, nx, y)
        }
        (JsType::Boolean, _) => {
            let nx = to_number_value(host, x)?.value;
            abstract_equality(host, nx, y)
        }
        (_, JsType::Boolean) => {
            let ny = to_number_value(host, y)?.value;
            abstract_equality(host, x, ny)
        }
        (t, JsType::Object) if t.is_numeric() || t == JsType::String => {
            trace!(target: "ecma_ops::comparison", "loose equality unboxes right operand");
            let prim = to_primitive_unboxed(host, y)?;
            with_transient(host, prim, |host| abstract_equality(host, x, prim))
        }
        (JsType::Object, t) if t.is_numeric() || t == JsType::String => {
            trace!(target: "ecma_ops::comparison", "loose equality unboxes left operand");
            let prim = to_primitive_unboxed(host, x)?;
            with_transient(host, prim, |host| abstract_equality(host, prim, y))
        }
        _ => Ok(false),
    }
}

/// `x == y`
pub fn loose_equals<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    abstract_equality(host, x, y)
}

/// `x != y`
pub fn loose_not_equals<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    Ok(!abstract_equality(host, x, y)?)
}

/// `x === y`
pub fn strict_equals<H: Host + ?Sized>(host: &H, x: Value, y: Value) -> JsResult<bool> {
    strict_equality(host, x, y)
}

/// `x !== y`
pub fn strict_not_equals<H: Host + ?Sized>(host: &H, x: Value, y: Value) -> JsResult<bool> {
    Ok(!strict_equality(host, x, y)?)
}
