//! JavaScript value representation using NaN-boxing.
//!
//! This module provides the core `Value` type that represents every runtime
//! value in a single 64-bit word.
//!
//! # Encoding
//!
//! Doubles are stored as their IEEE 754 bits. Every other kind lives in the
//! negative quiet-NaN space (top 16 bits `0xFFF9..=0xFFFF`). No stored double
//! can occupy that space because NaN has its own tag and is never stored as a
//! double payload, so the kind is always decodable from the word alone.
//!
//! The layout is private. Values are built through the constructors on
//! [`Value`] and inspected through the predicates or [`Value::kind`].
//!
//! # Examples
//!
//! ```
//! use core_types::{Value, ValueKind};
//!
//! let n = Value::number(42);
//! assert!(n.is_int32());
//! assert_eq!(n.kind(), ValueKind::Int32(42));
//!
//! let z = Value::double(-0.0);
//! assert!(z.is_negative_zero());
//! assert!(!z.is_positive_zero());
//! ```

use std::fmt;

use crate::builtin_strings::BuiltinString;

const TAG_SHIFT: u32 = 48;
const PAYLOAD_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// First tag value; any word whose top 16 bits are below this is a double.
const TAG_FIRST: u64 = 0xFFF9;
const TAG_SPECIAL: u64 = 0xFFF9;
const TAG_INFINITY: u64 = 0xFFFA;
const TAG_BOOLEAN: u64 = 0xFFFB;
const TAG_INT32: u64 = 0xFFFC;
const TAG_STRING: u64 = 0xFFFD;
const TAG_OBJECT: u64 = 0xFFFE;
const TAG_ADDRESS: u64 = 0xFFFF;

const SPECIAL_UNDEFINED: u64 = 0;
const SPECIAL_NULL: u64 = 1;
const SPECIAL_NONE: u64 = 2;
const SPECIAL_NAN: u64 = 3;

const STRING_BUILTIN_BIT: u64 = 1 << 32;
const ADDRESS_FUNCTION_BIT: u64 = 1 << 47;

/// Largest raw address an environment or function value can carry.
pub const ADDRESS_MASK: u64 = ADDRESS_FUNCTION_BIT - 1;

const POSITIVE_ZERO_BITS: u64 = 0;
const NEGATIVE_ZERO_BITS: u64 = 0x8000_0000_0000_0000;

#[inline]
const fn tagged(tag: u64, payload: u64) -> u64 {
    (tag << TAG_SHIFT) | (payload & PAYLOAD_MASK)
}

/// Sign of an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `+Infinity`
    Positive,
    /// `-Infinity`
    Negative,
}

impl Sign {
    /// The opposite sign.
    pub fn flip(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    /// Sign of a finite or infinite double (`-0.0` is negative).
    pub fn of(d: f64) -> Sign {
        if d.is_sign_negative() {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}

/// Reference to a string: either an interned built-in or a heap string owned
/// by the memory manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringRef {
    /// Entry of the process-wide built-in string table
    Builtin(BuiltinString),
    /// Reference-counted heap string, by slot index
    Heap(u32),
}

impl StringRef {
    /// Whether the memory manager tracks a reference count for this string.
    pub fn is_heap(self) -> bool {
        matches!(self, StringRef::Heap(_))
    }

    fn to_payload(self) -> u64 {
        match self {
            StringRef::Builtin(id) => STRING_BUILTIN_BIT | u64::from(id.id()),
            StringRef::Heap(slot) => u64::from(slot),
        }
    }

    fn from_payload(payload: u64) -> StringRef {
        if payload & STRING_BUILTIN_BIT != 0 {
            // Only constructed from valid ids, see `to_payload`.
            match BuiltinString::from_id((payload & 0xFFFF) as u16) {
                Some(id) => StringRef::Builtin(id),
                None => StringRef::Builtin(BuiltinString::Empty),
            }
        } else {
            StringRef::Heap(payload as u32)
        }
    }
}

impl From<BuiltinString> for StringRef {
    fn from(id: BuiltinString) -> Self {
        StringRef::Builtin(id)
    }
}

/// Reference to a heap object, by slot index in the object model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(u32);

impl ObjectRef {
    /// Wrap a slot index.
    pub const fn new(index: u32) -> Self {
        ObjectRef(index)
    }

    /// The slot index.
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Raw address of an interpreter environment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvRef(u64);

impl EnvRef {
    /// Wrap an address; bits above [`ADDRESS_MASK`] are dropped.
    pub const fn new(address: u64) -> Self {
        EnvRef(address & ADDRESS_MASK)
    }

    /// The raw address.
    pub const fn address(self) -> u64 {
        self.0
    }
}

/// Native code entry address of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint(u64);

impl EntryPoint {
    /// Wrap an address; bits above [`ADDRESS_MASK`] are dropped.
    pub const fn new(address: u64) -> Self {
        EntryPoint(address & ADDRESS_MASK)
    }

    /// The raw address.
    pub const fn address(self) -> u64 {
        self.0
    }
}

/// Decoded view of a [`Value`], for exhaustive matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// JavaScript `undefined`
    Undefined,
    /// JavaScript `null`
    Null,
    /// Engine-internal "no value" (holes, absent arguments)
    None,
    /// Not-a-number
    NaN,
    /// Signed infinity
    Infinity(Sign),
    /// `true` / `false`
    Boolean(bool),
    /// Number in its 32-bit integer representation
    Int32(i32),
    /// Number in its double representation (never NaN or infinite)
    Double(f64),
    /// String reference
    String(StringRef),
    /// Object reference
    Object(ObjectRef),
    /// Interpreter environment address
    Environment(EnvRef),
    /// Raw native function entry
    Function(EntryPoint),
}

/// Internal type tag, as decoded directly from the encoding.
///
/// Unlike the `typeof` operator this distinguishes the number sub-kinds,
/// which is what the equality algorithms compare on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsType {
    /// No value
    None,
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Boolean,
    /// Int32 number
    Int32,
    /// Double number
    Double,
    /// String
    String,
    /// Object
    Object,
    /// NaN
    NaN,
    /// ±Infinity
    Infinity,
    /// Environment
    Environment,
    /// Raw function
    Function,
}

impl JsType {
    /// Whether this tag is one of the four number representations.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            JsType::Int32 | JsType::Double | JsType::NaN | JsType::Infinity
        )
    }
}

/// A JavaScript value in its fixed-width tagged encoding.
///
/// `Value` is `Copy`; only string and object payloads carry ownership, and
/// that ownership is managed by the memory manager, never by the value.
///
/// Equality (`==` in Rust) is identity of the raw encoding. JavaScript
/// equality lives in the operator layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Value {
    /// `undefined`
    pub const fn undefined() -> Value {
        Value(tagged(TAG_SPECIAL, SPECIAL_UNDEFINED))
    }

    /// `null`
    pub const fn null() -> Value {
        Value(tagged(TAG_SPECIAL, SPECIAL_NULL))
    }

    /// Engine-internal "no value".
    pub const fn none() -> Value {
        Value(tagged(TAG_SPECIAL, SPECIAL_NONE))
    }

    /// `NaN`
    pub const fn nan() -> Value {
        Value(tagged(TAG_SPECIAL, SPECIAL_NAN))
    }

    /// Signed infinity.
    pub const fn infinity(sign: Sign) -> Value {
        match sign {
            Sign::Positive => Value(tagged(TAG_INFINITY, 0)),
            Sign::Negative => Value(tagged(TAG_INFINITY, 1)),
        }
    }

    /// Boolean.
    pub const fn boolean(b: bool) -> Value {
        Value(tagged(TAG_BOOLEAN, b as u64))
    }

    /// Int32 number.
    pub const fn number(n: i32) -> Value {
        Value(tagged(TAG_INT32, n as u32 as u64))
    }

    /// Canonical `+0` double.
    pub const fn positive_zero() -> Value {
        Value(POSITIVE_ZERO_BITS)
    }

    /// `-0` double.
    pub const fn negative_zero() -> Value {
        Value(NEGATIVE_ZERO_BITS)
    }

    /// Double number.
    ///
    /// NaN becomes the NaN value and infinities become signed Infinity
    /// values, so a stored double is always finite. An exact `+0.0` maps to
    /// the canonical positive zero; `-0.0` keeps its own encoding.
    ///
    /// ```
    /// use core_types::{Sign, Value};
    ///
    /// assert!(Value::double(f64::NAN).is_nan());
    /// assert_eq!(Value::double(f64::NEG_INFINITY), Value::infinity(Sign::Negative));
    /// assert!(Value::double(0.0).is_positive_zero());
    /// ```
    pub fn double(d: f64) -> Value {
        if d.is_nan() {
            return Value::nan();
        }
        if d.is_infinite() {
            return Value::infinity(Sign::of(d));
        }
        let bits = d.to_bits();
        if bits == POSITIVE_ZERO_BITS {
            return Value::positive_zero();
        }
        Value(bits)
    }

    /// String value.
    pub fn string(s: StringRef) -> Value {
        Value(tagged(TAG_STRING, s.to_payload()))
    }

    /// Object value.
    pub const fn object(obj: ObjectRef) -> Value {
        Value(tagged(TAG_OBJECT, obj.0 as u64))
    }

    /// String value from a possibly-null payload; `None` yields `undefined`.
    pub fn from_string(s: Option<StringRef>) -> Value {
        s.map_or_else(Value::undefined, Value::string)
    }

    /// Object value from a possibly-null payload; `None` yields `undefined`.
    pub fn from_object(obj: Option<ObjectRef>) -> Value {
        obj.map_or_else(Value::undefined, Value::object)
    }

    /// Environment address.
    pub const fn environment(env: EnvRef) -> Value {
        Value(tagged(TAG_ADDRESS, env.0))
    }

    /// Raw native function entry.
    pub const fn function(entry: EntryPoint) -> Value {
        Value(tagged(TAG_ADDRESS, entry.0 | ADDRESS_FUNCTION_BIT))
    }

    #[inline]
    fn tag(self) -> u64 {
        self.0 >> TAG_SHIFT
    }

    #[inline]
    fn payload(self) -> u64 {
        self.0 & PAYLOAD_MASK
    }

    #[inline]
    fn is_special(self, which: u64) -> bool {
        self.0 == tagged(TAG_SPECIAL, which)
    }

    /// Decode the value for matching.
    pub fn kind(self) -> ValueKind {
        match self.tag() {
            t if t < TAG_FIRST => ValueKind::Double(f64::from_bits(self.0)),
            TAG_SPECIAL => match self.payload() {
                SPECIAL_UNDEFINED => ValueKind::Undefined,
                SPECIAL_NULL => ValueKind::Null,
                SPECIAL_NONE => ValueKind::None,
                _ => ValueKind::NaN,
            },
            TAG_INFINITY => ValueKind::Infinity(if self.payload() == 0 {
                Sign::Positive
            } else {
                Sign::Negative
            }),
            TAG_BOOLEAN => ValueKind::Boolean(self.payload() != 0),
            TAG_INT32 => ValueKind::Int32(self.payload() as u32 as i32),
            TAG_STRING => ValueKind::String(StringRef::from_payload(self.payload())),
            TAG_OBJECT => ValueKind::Object(ObjectRef(self.payload() as u32)),
            _ => {
                let payload = self.payload();
                if payload & ADDRESS_FUNCTION_BIT != 0 {
                    ValueKind::Function(EntryPoint(payload & ADDRESS_MASK))
                } else {
                    ValueKind::Environment(EnvRef(payload))
                }
            }
        }
    }

    /// Internal type tag.
    pub fn type_of(self) -> JsType {
        match self.kind() {
            ValueKind::Undefined => JsType::Undefined,
            ValueKind::Null => JsType::Null,
            ValueKind::None => JsType::None,
            ValueKind::NaN => JsType::NaN,
            ValueKind::Infinity(_) => JsType::Infinity,
            ValueKind::Boolean(_) => JsType::Boolean,
            ValueKind::Int32(_) => JsType::Int32,
            ValueKind::Double(_) => JsType::Double,
            ValueKind::String(_) => JsType::String,
            ValueKind::Object(_) => JsType::Object,
            ValueKind::Environment(_) => JsType::Environment,
            ValueKind::Function(_) => JsType::Function,
        }
    }

    /// Int32 number representation.
    #[inline]
    pub fn is_int32(self) -> bool {
        self.tag() == TAG_INT32
    }

    /// Double number representation.
    #[inline]
    pub fn is_double(self) -> bool {
        self.tag() < TAG_FIRST
    }

    /// Any number: Int32, Double, NaN or Infinity.
    #[inline]
    pub fn is_numeric(self) -> bool {
        self.is_int32() || self.is_double() || self.is_nan() || self.is_infinity()
    }

    /// String.
    #[inline]
    pub fn is_string(self) -> bool {
        self.tag() == TAG_STRING
    }

    /// Object.
    #[inline]
    pub fn is_object(self) -> bool {
        self.tag() == TAG_OBJECT
    }

    /// NaN.
    #[inline]
    pub fn is_nan(self) -> bool {
        self.is_special(SPECIAL_NAN)
    }

    /// Either infinity.
    #[inline]
    pub fn is_infinity(self) -> bool {
        self.tag() == TAG_INFINITY
    }

    /// `+Infinity`.
    #[inline]
    pub fn is_positive_infinity(self) -> bool {
        self.0 == tagged(TAG_INFINITY, 0)
    }

    /// `-Infinity`.
    #[inline]
    pub fn is_negative_infinity(self) -> bool {
        self.0 == tagged(TAG_INFINITY, 1)
    }

    /// `+0` double.
    #[inline]
    pub fn is_positive_zero(self) -> bool {
        self.0 == POSITIVE_ZERO_BITS
    }

    /// `-0` double.
    #[inline]
    pub fn is_negative_zero(self) -> bool {
        self.0 == NEGATIVE_ZERO_BITS
    }

    /// Boolean.
    #[inline]
    pub fn is_boolean(self) -> bool {
        self.tag() == TAG_BOOLEAN
    }

    /// `null`.
    #[inline]
    pub fn is_null(self) -> bool {
        self.is_special(SPECIAL_NULL)
    }

    /// `undefined`.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.is_special(SPECIAL_UNDEFINED)
    }

    /// Engine "no value".
    #[inline]
    pub fn is_none(self) -> bool {
        self.is_special(SPECIAL_NONE)
    }

    /// `null`, `undefined` or none.
    #[inline]
    pub fn is_nullish(self) -> bool {
        self.is_null() || self.is_undefined() || self.is_none()
    }

    /// Environment address.
    #[inline]
    pub fn is_environment(self) -> bool {
        self.tag() == TAG_ADDRESS && self.payload() & ADDRESS_FUNCTION_BIT == 0
    }

    /// Raw function entry.
    #[inline]
    pub fn is_function(self) -> bool {
        self.tag() == TAG_ADDRESS && self.payload() & ADDRESS_FUNCTION_BIT != 0
    }

    /// Language primitive: anything but objects and engine addresses.
    #[inline]
    pub fn is_primitive(self) -> bool {
        !self.is_object() && self.tag() != TAG_ADDRESS
    }

    /// Whether the payload is shared with the memory manager (heap strings
    /// and objects).
    pub fn needs_refcount(self) -> bool {
        match self.kind() {
            ValueKind::String(s) => s.is_heap(),
            ValueKind::Object(_) => true,
            _ => false,
        }
    }

    /// Int32 payload.
    pub fn as_int32(self) -> Option<i32> {
        match self.kind() {
            ValueKind::Int32(n) => Some(n),
            _ => None,
        }
    }

    /// Double payload.
    pub fn as_double(self) -> Option<f64> {
        match self.kind() {
            ValueKind::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Boolean payload.
    pub fn as_boolean(self) -> Option<bool> {
        match self.kind() {
            ValueKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// String payload.
    pub fn as_string(self) -> Option<StringRef> {
        match self.kind() {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Object payload.
    pub fn as_object(self) -> Option<ObjectRef> {
        match self.kind() {
            ValueKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Numeric value as `f64` for any of the four number kinds.
    pub fn as_f64(self) -> Option<f64> {
        match self.kind() {
            ValueKind::Int32(n) => Some(f64::from(n)),
            ValueKind::Double(d) => Some(d),
            ValueKind::NaN => Some(f64::NAN),
            ValueKind::Infinity(Sign::Positive) => Some(f64::INFINITY),
            ValueKind::Infinity(Sign::Negative) => Some(f64::NEG_INFINITY),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::undefined()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Undefined => write!(f, "Undefined"),
            ValueKind::Null => write!(f, "Null"),
            ValueKind::None => write!(f, "None"),
            ValueKind::NaN => write!(f, "NaN"),
            ValueKind::Infinity(Sign::Positive) => write!(f, "Infinity"),
            ValueKind::Infinity(Sign::Negative) => write!(f, "-Infinity"),
            ValueKind::Boolean(b) => f.debug_tuple("Boolean").field(&b).finish(),
            ValueKind::Int32(n) => f.debug_tuple("Int32").field(&n).finish(),
            ValueKind::Double(d) => f.debug_tuple("Double").field(&d).finish(),
            ValueKind::String(s) => f.debug_tuple("String").field(&s).finish(),
            ValueKind::Object(o) => f.debug_tuple("Object").field(&o.0).finish(),
            ValueKind::Environment(e) => write!(f, "Environment({:#x})", e.0),
            ValueKind::Function(e) => write!(f, "Function({:#x})", e.0),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::boolean(b)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::double(d)
    }
}

impl From<StringRef> for Value {
    fn from(s: StringRef) -> Self {
        Value::string(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::object(obj)
    }
}
