//! Memory Manager - reference heap and object model
//!
//! This component provides:
//! - Reference-counted heap strings with scratch recall
//! - Object storage with class payloads, properties and prototype links
//! - The object operations the coercion layer delegates to
//! - Traffic counters for checking refcount discipline in tests

pub mod heap;
pub mod object;
pub mod object_model;

// Re-export main types
pub use heap::{Heap, HeapConfig, RefStats};
pub use object::{ConversionHook, JSObject};
