//! ECMAScript conversions and operators over tagged values
//!
//! This crate provides:
//! - Type conversions: ToPrimitive, ToBoolean, ToNumber, ToString, ToObject,
//!   ToLength and the integer conversions
//! - Additive and multiplicative operators
//! - Relational and equality comparisons, including SameValue
//! - `instanceof`, `in` and `typeof`
//!
//! Every operation is generic over a [`core_types::Host`], which owns the
//! strings and objects. Operations never leak scratch strings and keep the
//! host's reference counts balanced on every exit path.
//!
//! # Example
//!
//! ```
//! use core_types::{MemoryManager, Value};
//! use ecma_ops::{add, strict_equality};
//! use memory_manager::Heap;
//!
//! let mut heap = Heap::new();
//! let two = Value::string(heap.alloc_str("2"));
//! heap.inc_ref(two);
//!
//! let joined = add(&mut heap, Value::number(1), two).unwrap();
//! assert_eq!(heap.string_text(joined.as_string().unwrap()).unwrap(), "12");
//!
//! assert!(strict_equality(&heap, Value::positive_zero(), Value::negative_zero()).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod arithmetic;
pub mod coercion;
pub mod comparison;
pub mod guard;
pub mod membership;
pub mod typeof_operator;

pub use arithmetic::{add, div, mul, rem, sub};
pub use coercion::{
    check_object_coercible, is_callable, number_from_f64, to_boolean, to_f64, to_int32,
    to_integer, to_length, to_number, to_number64, to_number_value, to_object, to_primitive,
    to_primitive_unboxed, to_string, to_string_value, to_uint16, to_uint32, with_primitive,
    NumberConversion, MAX_SAFE_LENGTH,
};
pub use comparison::{
    abstract_equality, abstract_relational_comparison, greater_equal, greater_than, less_equal,
    less_than, loose_equals, loose_not_equals, same_value, strict_equality, strict_equals,
    strict_not_equals, Relation,
};
pub use guard::{scoped, with_transient, Scratch};
pub use membership::{in_operator, instanceof};
pub use core_types::{format_double, format_int32};
pub use typeof_operator::type_of;
