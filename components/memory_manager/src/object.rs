//! JavaScript object representation
//!
//! Objects in the reference heap carry their class tag and payload, a flat
//! property map, an optional prototype link, and optional conversion hooks
//! standing in for user-defined `valueOf` / `toString` methods.

use std::collections::HashMap;

use core_types::{JsString, ObjectClass, ObjectRef, Value};

/// Behaviour of a `valueOf` or `toString` method installed on an object.
///
/// Calling arbitrary script functions belongs to the interpreter; these hooks
/// cover what the conversion algorithms can observe of such a call.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionHook {
    /// Return this value.
    Return(Value),
    /// Allocate and return a fresh heap string with this text on every call.
    AllocString(String),
    /// Return the receiver itself (not a primitive, so the next method runs).
    ReturnThis,
    /// Throw a `TypeError` with this message.
    Throw(String),
}

/// JavaScript object with map-based property storage
#[derive(Debug, Clone)]
pub struct JSObject {
    /// Class tag and class payload
    pub class: ObjectClass,
    /// Own properties
    pub properties: HashMap<JsString, Value>,
    /// Array elements (for array-like objects)
    pub elements: Vec<Value>,
    /// `[[Prototype]]`
    pub prototype: Option<ObjectRef>,
    /// Installed `valueOf`
    pub value_of: Option<ConversionHook>,
    /// Installed `toString`
    pub to_string: Option<ConversionHook>,
    /// Retains taken through the memory manager
    pub(crate) refcount: u32,
}

impl JSObject {
    /// Create an object of `class` with no properties
    pub fn new(class: ObjectClass) -> Self {
        JSObject {
            class,
            properties: HashMap::new(),
            elements: Vec::new(),
            prototype: None,
            value_of: None,
            to_string: None,
            refcount: 0,
        }
    }

    /// Get an own property value by name
    pub fn get_property(&self, name: &JsString) -> Option<Value> {
        self.properties.get(name).copied()
    }

    /// Set an own property value by name, returning the previous value
    pub fn set_property(&mut self, name: JsString, value: Value) -> Option<Value> {
        self.properties.insert(name, value)
    }

    /// Whether `name` is an own property
    pub fn has_own_property(&self, name: &JsString) -> bool {
        self.properties.contains_key(name)
    }

    /// Current retain count
    pub fn refcount(&self) -> u32 {
        self.refcount
    }
}
