//! Refcount brackets and scratch-string release.
//!
//! Two disciplines keep the memory manager's counts exact while a coercion
//! runs:
//!
//! - A primitive produced by `ToPrimitive` is retained for the duration of
//!   any further coercion on it ([`with_transient`]).
//! - A heap string allocated only to satisfy an algorithm step is recalled
//!   before the operation returns ([`scoped`]).
//!
//! Both release on every exit path, including `?` returns inside the
//! closure.

use tracing::trace;

use core_types::{JsResult, MemoryManager, StringRef, Value};

/// Run `f` with `value` retained; release it afterwards whatever `f`
/// returned.
pub fn with_transient<H, T, F>(host: &mut H, value: Value, f: F) -> JsResult<T>
where
    H: MemoryManager + ?Sized,
    F: FnOnce(&mut H) -> JsResult<T>,
{
    host.inc_ref(value);
    let result = f(host);
    host.dec_ref(value);
    result
}

/// Heap strings to recall when the enclosing [`scoped`] call ends.
#[derive(Debug, Default)]
pub struct Scratch {
    strings: Vec<StringRef>,
}

impl Scratch {
    /// Empty scratch list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recall `s` at scope exit. Built-ins are ignored.
    pub fn track(&mut self, s: StringRef) {
        if s.is_heap() && !self.strings.contains(&s) {
            self.strings.push(s);
        }
    }

    /// Recall the string payload of `v`, if any, at scope exit.
    pub fn track_value(&mut self, v: Value) {
        if let Some(s) = v.as_string() {
            self.track(s);
        }
    }

    /// Stop tracking `s`; it is being handed to the caller.
    pub fn keep(&mut self, s: StringRef) {
        self.strings.retain(|&tracked| tracked != s);
    }

    /// Number of strings awaiting recall.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether nothing awaits recall.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn release<H: MemoryManager + ?Sized>(self, host: &mut H) {
        for s in self.strings {
            trace!(target: "ecma_ops::guard", ?s, "recall scratch string");
            host.recall(s);
        }
    }
}

/// Run `f` with a fresh [`Scratch`] list and recall everything still on it
/// when `f` returns, successfully or not.
pub fn scoped<H, T, F>(host: &mut H, f: F) -> JsResult<T>
where
    H: MemoryManager + ?Sized,
    F: FnOnce(&mut H, &mut Scratch) -> JsResult<T>,
{
    let mut scratch = Scratch::new();
    let result = f(host, &mut scratch);
    scratch.release(host);
    result
}
