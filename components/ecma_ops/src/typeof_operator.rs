//! The `typeof` operator (ECMA-262 §11.4.3).

use core_types::{BuiltinString, Host, JsError, JsResult, ObjectClass, StringRef, Value, ValueKind};

/// Type name of `v` as an interned string. Never allocates.
pub fn type_of<H: Host + ?Sized>(host: &H, v: Value) -> JsResult<StringRef> {
    let name = match v.kind() {
        ValueKind::Undefined | ValueKind::None => BuiltinString::Undefined,
        ValueKind::Null => BuiltinString::Object,
        ValueKind::Boolean(_) => BuiltinString::Boolean,
        ValueKind::Int32(_) | ValueKind::Double(_) | ValueKind::NaN | ValueKind::Infinity(_) => {
            BuiltinString::Number
        }
        ValueKind::String(_) => BuiltinString::String,
        ValueKind::Function(_) => BuiltinString::Function,
        ValueKind::Object(obj) => match host.object_class(obj)? {
            ObjectClass::Function(_) => BuiltinString::Function,
            _ => BuiltinString::Object,
        },
        ValueKind::Environment(_) => {
            return Err(JsError::internal("typeof applied to an environment value"))
        }
    };
    Ok(StringRef::Builtin(name))
}
