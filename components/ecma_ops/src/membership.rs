//! The `instanceof` and `in` operators (ECMA-262 §11.8.6, §11.8.7).

use tracing::trace;

use core_types::{FunctionRecord, Host, JsError, JsResult, ObjectClass, ObjectRef, Value};

use crate::coercion::{is_callable, to_string};
use crate::guard::scoped;

/// Longest chain of bound functions followed before giving up.
const MAX_BOUND_DEPTH: usize = 10_000;

/// Follow bound-function targets down to the function that owns the
/// `prototype` checked by `[[HasInstance]]`.
fn unwrap_bound<H: Host + ?Sized>(host: &H, mut function: ObjectRef) -> JsResult<ObjectRef> {
    for _ in 0..MAX_BOUND_DEPTH {
        match host.object_class(function)? {
            ObjectClass::Function(FunctionRecord::Bound { target }) => function = target,
            _ => return Ok(function),
        }
    }
    Err(JsError::internal("bound function chain too long"))
}

/// `x instanceof y`.
///
/// A raw function entry has no `prototype` object, so nothing is an instance
/// of it.
pub fn instanceof<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    if !is_callable(host, y)? {
        trace!(target: "ecma_ops::membership", ?y, "instanceof TypeError");
        return Err(JsError::type_error(
            "Right-hand side of 'instanceof' is not callable",
        ));
    }
    let Some(function) = y.as_object() else {
        return Ok(false);
    };
    let target = unwrap_bound(host, function)?;
    host.has_instance(target, x)
}

/// `x in y`. The key string is released unless `x` was already a string.
pub fn in_operator<H: Host + ?Sized>(host: &mut H, x: Value, y: Value) -> JsResult<bool> {
    let Some(obj) = y.as_object() else {
        trace!(target: "ecma_ops::membership", ?y, "in TypeError");
        return Err(JsError::type_error(
            "Cannot use 'in' operator to search for a key in a non-object",
        ));
    };
    scoped(host, |host, scratch| {
        let key = to_string(host, x)?;
        if !x.is_string() {
            scratch.track(key);
        }
        host.has_property(obj, key)
    })
}
