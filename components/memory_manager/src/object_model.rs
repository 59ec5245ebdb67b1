//! Reference object model.
//!
//! Implements the object operations the coercion layer delegates to:
//! `[[DefaultValue]]` with the `valueOf` / `toString` ordering of the hint,
//! `[[HasProperty]]` along the prototype chain, `[[HasInstance]]` through the
//! function's `prototype` property, Date strings, and wrapper construction.
//! The builders at the bottom are how embedders and tests populate the heap.

use chrono::DateTime;
use tracing::debug;

use core_types::{
    equals_builtin, format_double, format_int32, BuiltinString, EntryPoint, FunctionRecord,
    Host, JsError, JsResult, JsString, MemoryManager, ObjectClass, ObjectModel, ObjectRef,
    PreferredType, SemanticsConfig, StringRef, Value, ValueKind,
};

use crate::heap::{class_of, Heap};
use crate::object::{ConversionHook, JSObject};

/// Longest prototype chain walked before giving up.
const MAX_PROTOTYPE_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    ValueOf,
    ToString,
}

impl Heap {
    fn find_hook(&self, obj: ObjectRef, method: Method) -> JsResult<Option<ConversionHook>> {
        let mut current = Some(obj);
        let mut depth = 0;
        while let Some(o) = current {
            let object = self.object(o)?;
            let hook = match method {
                Method::ValueOf => &object.value_of,
                Method::ToString => &object.to_string,
            };
            if let Some(hook) = hook {
                return Ok(Some(hook.clone()));
            }
            depth += 1;
            if depth > MAX_PROTOTYPE_DEPTH {
                return Err(JsError::internal("prototype chain too long"));
            }
            current = object.prototype;
        }
        Ok(None)
    }

    fn run_hook(&mut self, obj: ObjectRef, hook: ConversionHook) -> JsResult<Value> {
        match hook {
            ConversionHook::Return(v) => Ok(v),
            ConversionHook::AllocString(text) => Ok(Value::string(self.alloc_str(&text))),
            ConversionHook::ReturnThis => Ok(Value::object(obj)),
            ConversionHook::Throw(message) => Err(JsError::type_error(message)),
        }
    }

    /// The intrinsic `valueOf` of the object's class.
    fn intrinsic_value_of(&mut self, obj: ObjectRef) -> JsResult<Value> {
        Ok(match class_of(self, obj)? {
            ObjectClass::Number(n) => n,
            ObjectClass::Boolean(b) => Value::boolean(b),
            ObjectClass::String(s) => Value::string(s),
            ObjectClass::Date(t) => Value::double(t),
            ObjectClass::Object | ObjectClass::Array | ObjectClass::Function(_) => {
                Value::object(obj)
            }
        })
    }

    /// The intrinsic `toString` of the object's class.
    ///
    /// Number wrappers hand back their number; turning it into text is the
    /// caller's ToString.
    fn intrinsic_to_string(&mut self, obj: ObjectRef) -> JsResult<Value> {
        let class = class_of(self, obj)?;
        Ok(match class {
            ObjectClass::Number(n) => n,
            ObjectClass::Boolean(true) => Value::string(BuiltinString::True.into()),
            ObjectClass::Boolean(false) => Value::string(BuiltinString::False.into()),
            ObjectClass::String(s) => Value::string(s),
            ObjectClass::Date(_) => Value::string(self.date_to_string(obj)?),
            ObjectClass::Object => Value::string(self.alloc_str("[object Object]")),
            ObjectClass::Function(_) => {
                Value::string(self.alloc_str("function () { [native code] }"))
            }
            ObjectClass::Array => {
                let text = self.join_elements(obj)?;
                Value::string(self.alloc_string(text))
            }
        })
    }

    /// `Array.prototype.join` over primitive elements.
    ///
    /// Numbers print exactly as ToString prints them. Only primitive elements
    /// are supported: an object element joins as `"[object Object]"` without
    /// running its own valueOf or toString.
    fn join_elements(&self, obj: ObjectRef) -> JsResult<JsString> {
        let elements = &self.object(obj)?.elements;
        let mut out = JsString::empty();
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                out = out.append_char(u16::from(b','));
            }
            let piece = match element.kind() {
                ValueKind::Undefined | ValueKind::Null | ValueKind::None => JsString::empty(),
                ValueKind::String(s) => self.string(s)?.clone(),
                ValueKind::Int32(n) => JsString::from_str(&format_int32(n)),
                ValueKind::Double(d) => JsString::from_str(&format_double(d)),
                ValueKind::Boolean(b) => JsString::from_str(if b { "true" } else { "false" }),
                ValueKind::NaN => JsString::from_str("NaN"),
                ValueKind::Infinity(sign) => JsString::from_str(match sign {
                    core_types::Sign::Positive => "Infinity",
                    core_types::Sign::Negative => "-Infinity",
                }),
                _ => JsString::from_str("[object Object]"),
            };
            out = JsString::concat2(&out, &piece);
        }
        Ok(out)
    }

    fn call_method(&mut self, obj: ObjectRef, method: Method) -> JsResult<Value> {
        match self.find_hook(obj, method)? {
            Some(hook) => self.run_hook(obj, hook),
            None => match method {
                Method::ValueOf => self.intrinsic_value_of(obj),
                Method::ToString => self.intrinsic_to_string(obj),
            },
        }
    }

    /// Objects and hints passed to `default_value`, oldest first.
    pub fn conversion_log(&self) -> &[(ObjectRef, PreferredType)] {
        &self.conversion_log
    }

    /// Forget the conversion log.
    pub fn clear_conversion_log(&mut self) {
        self.conversion_log.clear();
    }

    fn property_in_chain(&self, obj: ObjectRef, key: &JsString) -> JsResult<Option<Value>> {
        let mut current = Some(obj);
        let mut depth = 0;
        while let Some(o) = current {
            let object = self.object(o)?;
            if let Some(v) = object.get_property(key) {
                return Ok(Some(v));
            }
            depth += 1;
            if depth > MAX_PROTOTYPE_DEPTH {
                return Err(JsError::internal("prototype chain too long"));
            }
            current = object.prototype;
        }
        Ok(None)
    }

    fn has_intrinsic_property(&self, obj: ObjectRef, key: &JsString) -> JsResult<bool> {
        let object = self.object(obj)?;
        Ok(match object.class {
            ObjectClass::String(s) => {
                let len = self.string(s)?.len();
                equals_builtin(key, BuiltinString::Length)
                    || array_index(key).is_some_and(|i| i < len)
            }
            ObjectClass::Array => {
                equals_builtin(key, BuiltinString::Length)
                    || array_index(key).is_some_and(|i| (i as usize) < object.elements.len())
            }
            ObjectClass::Function(_) => equals_builtin(key, BuiltinString::Length),
            _ => false,
        })
    }

    // Builders

    /// New generic object.
    pub fn new_object(&mut self) -> ObjectRef {
        self.alloc_object(JSObject::new(ObjectClass::Object))
    }

    /// New array holding `elements`; each element is retained.
    pub fn new_array(&mut self, elements: Vec<Value>) -> ObjectRef {
        for &element in &elements {
            self.inc_ref(element);
        }
        let mut object = JSObject::new(ObjectClass::Array);
        object.elements = elements;
        self.alloc_object(object)
    }

    /// New ordinary function with its own `prototype` object.
    pub fn new_function(&mut self, entry: EntryPoint) -> JsResult<ObjectRef> {
        let prototype = self.new_object();
        let function =
            self.alloc_object(JSObject::new(ObjectClass::Function(FunctionRecord::Ordinary {
                entry,
            })));
        self.set_property(
            function,
            JsString::from_str("prototype"),
            Value::object(prototype),
        )?;
        Ok(function)
    }

    /// New bound function wrapping `target`.
    pub fn new_bound_function(&mut self, target: ObjectRef) -> ObjectRef {
        self.alloc_object(JSObject::new(ObjectClass::Function(FunctionRecord::Bound {
            target,
        })))
    }

    /// New Date with a time value in milliseconds since the epoch.
    pub fn new_date(&mut self, time_ms: f64) -> ObjectRef {
        self.alloc_object(JSObject::new(ObjectClass::Date(time_ms)))
    }

    /// Set an own property. The new value is retained, the old released.
    pub fn set_property(&mut self, obj: ObjectRef, key: JsString, value: Value) -> JsResult<()> {
        self.inc_ref(value);
        let previous = self.object_mut(obj)?.set_property(key, value);
        if let Some(old) = previous {
            self.dec_ref(old);
        }
        Ok(())
    }

    /// Set `[[Prototype]]`.
    pub fn set_prototype(&mut self, obj: ObjectRef, prototype: Option<ObjectRef>) -> JsResult<()> {
        self.object_mut(obj)?.prototype = prototype;
        Ok(())
    }

    /// Install a `valueOf` hook.
    pub fn set_value_of(&mut self, obj: ObjectRef, hook: ConversionHook) -> JsResult<()> {
        self.object_mut(obj)?.value_of = Some(hook);
        Ok(())
    }

    /// Install a `toString` hook.
    pub fn set_to_string(&mut self, obj: ObjectRef, hook: ConversionHook) -> JsResult<()> {
        self.object_mut(obj)?.to_string = Some(hook);
        Ok(())
    }
}

/// Canonical array index of `key` ("0", "1", ... without leading zeros).
fn array_index(key: &JsString) -> Option<u32> {
    let text = key.to_string();
    if text.is_empty() || (text.len() > 1 && text.starts_with('0')) {
        return None;
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

/// `Date.prototype.toString` text in UTC, or `None` for an invalid time.
fn format_date(time_ms: f64) -> Option<String> {
    if !time_ms.is_finite() {
        return None;
    }
    let secs = (time_ms / 1000.0).floor() as i64;
    let nsecs = (time_ms.rem_euclid(1000.0) * 1_000_000.0) as u32;
    let dt = DateTime::from_timestamp(secs, nsecs)?;
    Some(dt.format("%a %b %d %Y %H:%M:%S GMT+0000").to_string())
}

impl ObjectModel for Heap {
    fn object_class(&self, obj: ObjectRef) -> JsResult<ObjectClass> {
        class_of(self, obj)
    }

    fn default_value(&mut self, obj: ObjectRef, hint: PreferredType) -> JsResult<Value> {
        debug!(target: "memory_manager::object_model", object = obj.index(), ?hint, "default value");
        self.conversion_log.push((obj, hint));
        let order = match hint {
            PreferredType::String => [Method::ToString, Method::ValueOf],
            PreferredType::Number | PreferredType::Default => [Method::ValueOf, Method::ToString],
        };
        for method in order {
            let result = self.call_method(obj, method)?;
            if result.is_primitive() {
                return Ok(result);
            }
        }
        Err(JsError::type_error("Cannot convert object to primitive value"))
    }

    fn has_property(&mut self, obj: ObjectRef, key: StringRef) -> JsResult<bool> {
        let key = self.string(key)?.clone();
        if self.property_in_chain(obj, &key)?.is_some() {
            return Ok(true);
        }
        self.has_intrinsic_property(obj, &key)
    }

    fn has_instance(&mut self, function: ObjectRef, value: Value) -> JsResult<bool> {
        let Some(instance) = value.as_object() else {
            return Ok(false);
        };
        let key = JsString::from_str("prototype");
        let prototype = match self
            .property_in_chain(function, &key)?
            .and_then(Value::as_object)
        {
            Some(p) => p,
            None => {
                return Err(JsError::type_error(
                    "Function has non-object prototype in instanceof check",
                ))
            }
        };
        let mut current = self.object(instance)?.prototype;
        let mut depth = 0;
        while let Some(o) = current {
            if o == prototype {
                return Ok(true);
            }
            depth += 1;
            if depth > MAX_PROTOTYPE_DEPTH {
                return Err(JsError::internal("prototype chain too long"));
            }
            current = self.object(o)?.prototype;
        }
        Ok(false)
    }

    fn date_to_string(&mut self, obj: ObjectRef) -> JsResult<StringRef> {
        let ObjectClass::Date(time_ms) = class_of(self, obj)? else {
            return Err(JsError::internal("date_to_string on a non-Date object"));
        };
        Ok(match format_date(time_ms) {
            Some(text) => self.alloc_str(&text),
            None => StringRef::Builtin(BuiltinString::InvalidDate),
        })
    }

    fn new_number_object(&mut self, number: Value) -> JsResult<ObjectRef> {
        if !number.is_numeric() {
            return Err(JsError::internal("Number wrapper around a non-number"));
        }
        Ok(self.alloc_object(JSObject::new(ObjectClass::Number(number))))
    }

    fn new_boolean_object(&mut self, b: bool) -> JsResult<ObjectRef> {
        Ok(self.alloc_object(JSObject::new(ObjectClass::Boolean(b))))
    }

    fn new_string_object(&mut self, s: StringRef) -> JsResult<ObjectRef> {
        self.inc_ref(Value::string(s));
        Ok(self.alloc_object(JSObject::new(ObjectClass::String(s))))
    }
}

impl Host for Heap {
    fn semantics(&self) -> SemanticsConfig {
        self.config().semantics
    }
}
