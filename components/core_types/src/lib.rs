//! Core JavaScript value types and error handling.
//!
//! This crate provides the foundational types for the value and coercion
//! core: the tagged value encoding, the interned built-in strings, the
//! string representation, numeric-string parsing, error types, semantics
//! configuration, and the collaborator traits the operator layer consumes.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`BuiltinString`] - Process-wide interned strings
//! - [`JsString`] - ASCII/UTF-16 string representation
//! - [`format_double`] - Number-to-text conversion used by ToString
//! - [`JsError`] - JavaScript errors
//! - [`Host`] - Memory manager and object model seen by the operators
//!
//! # Examples
//!
//! ```
//! use core_types::{lookup_builtin, BuiltinString, ErrorKind, JsError, Value};
//!
//! let num = Value::number(42);
//! assert!(num.is_int32());
//!
//! let name = lookup_builtin(BuiltinString::Undefined);
//! assert_eq!(name.to_string(), "undefined");
//!
//! let error = JsError::type_error("undefined is not a function");
//! assert_eq!(error.kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod builtin_strings;
mod config;
mod error;
mod host;
mod js_string;
mod number_format;
mod number_parse;
mod value;

pub use builtin_strings::{equals_builtin, lookup_builtin, BuiltinString};
pub use config::{ConfigError, SemanticsConfig, NUMBER_MIN_VALUE};
pub use error::{ErrorKind, JsError, JsResult};
pub use host::{FunctionRecord, Host, MemoryManager, ObjectClass, ObjectModel, PreferredType};
pub use js_string::{JsString, StringKind};
pub use number_format::{format_double, format_int32};
pub use number_parse::{is_js_whitespace, is_numeric_string, str_to_double, str_to_number_base};
pub use value::{EntryPoint, EnvRef, JsType, ObjectRef, Sign, StringRef, Value, ValueKind, ADDRESS_MASK};
