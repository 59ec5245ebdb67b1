//! Collaborator interfaces consumed by the coercion and operator layer.
//!
//! The core owns no heap. Strings and objects belong to the embedder, which
//! exposes them through two traits:
//!
//! - [`MemoryManager`] stores heap strings and keeps their reference counts.
//!   A freshly allocated string starts with a count of zero; `dec_ref` frees
//!   at zero and `recall` frees only a string nobody has retained.
//! - [`ObjectModel`] answers the object questions the algorithms need:
//!   class and payload, `[[DefaultValue]]`, `[[HasProperty]]`,
//!   `[[HasInstance]]`, the Date string, and wrapper construction.
//!
//! [`Host`] bundles both with the engine's [`SemanticsConfig`].

use crate::builtin_strings::lookup_builtin;
use crate::config::SemanticsConfig;
use crate::error::{JsError, JsResult};
use crate::js_string::JsString;
use crate::value::{EntryPoint, ObjectRef, StringRef, Value};

/// Hint passed to `ToPrimitive` / `[[DefaultValue]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreferredType {
    /// No hint
    #[default]
    Default,
    /// Prefer `valueOf`
    Number,
    /// Prefer `toString`
    String,
}

/// Callable payload of a Function-class object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionRecord {
    /// A function with its own code.
    Ordinary {
        /// Native entry point
        entry: EntryPoint,
    },
    /// Result of `Function.prototype.bind`.
    Bound {
        /// The wrapped function object
        target: ObjectRef,
    },
}

/// Class tag of an object together with its class-specific payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectClass {
    /// Generic object
    Object,
    /// Array exotic object
    Array,
    /// Date; the payload is the time value in milliseconds (NaN when invalid)
    Date(f64),
    /// Callable
    Function(FunctionRecord),
    /// Number wrapper holding a numeric value (Int32, Double, NaN or Infinity)
    Number(Value),
    /// Boolean wrapper
    Boolean(bool),
    /// String wrapper
    String(StringRef),
}

impl ObjectClass {
    /// Class name as in `Object.prototype.toString`.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectClass::Object => "Object",
            ObjectClass::Array => "Array",
            ObjectClass::Date(_) => "Date",
            ObjectClass::Function(_) => "Function",
            ObjectClass::Number(_) => "Number",
            ObjectClass::Boolean(_) => "Boolean",
            ObjectClass::String(_) => "String",
        }
    }
}

/// Heap-string storage and reference counting.
pub trait MemoryManager {
    /// Store a new heap string. Its reference count starts at zero.
    fn alloc_string(&mut self, s: JsString) -> StringRef;

    /// Contents of a live heap string slot.
    fn heap_string(&self, slot: u32) -> Option<&JsString>;

    /// Retain the payload of `v`. No-op for values without a refcount.
    fn inc_ref(&mut self, v: Value);

    /// Release the payload of `v`, freeing it when the count reaches zero.
    /// No-op for values without a refcount.
    fn dec_ref(&mut self, v: Value);

    /// Surrender a string the caller allocated but is not returning. Frees
    /// it if nothing retained it; built-ins are never freed.
    fn recall(&mut self, s: StringRef);

    /// Contents of any string, built-in or heap.
    fn string(&self, s: StringRef) -> JsResult<&JsString> {
        match s {
            StringRef::Builtin(id) => Ok(lookup_builtin(id)),
            StringRef::Heap(slot) => self
                .heap_string(slot)
                .ok_or_else(|| JsError::internal(format!("dangling string handle {}", slot))),
        }
    }
}

/// Object operations the algorithms delegate to.
pub trait ObjectModel {
    /// Class and payload of `obj`.
    fn object_class(&self, obj: ObjectRef) -> JsResult<ObjectClass>;

    /// `[[DefaultValue]](hint)`. Must yield a primitive or a `TypeError`.
    fn default_value(&mut self, obj: ObjectRef, hint: PreferredType) -> JsResult<Value>;

    /// `[[HasProperty]](key)`.
    fn has_property(&mut self, obj: ObjectRef, key: StringRef) -> JsResult<bool>;

    /// `[[HasInstance]](value)` of a non-bound function object.
    fn has_instance(&mut self, function: ObjectRef, value: Value) -> JsResult<bool>;

    /// String form of a Date object.
    fn date_to_string(&mut self, obj: ObjectRef) -> JsResult<StringRef>;

    /// New Number wrapper around a numeric value.
    fn new_number_object(&mut self, number: Value) -> JsResult<ObjectRef>;

    /// New Boolean wrapper.
    fn new_boolean_object(&mut self, b: bool) -> JsResult<ObjectRef>;

    /// New String wrapper. The wrapper retains `s`.
    fn new_string_object(&mut self, s: StringRef) -> JsResult<ObjectRef>;
}

/// Everything the operator layer needs from its embedder.
pub trait Host: ObjectModel + MemoryManager {
    /// Semantics in effect.
    fn semantics(&self) -> SemanticsConfig;
}
