//! Reference-counted heap for strings and objects.
//!
//! This module implements the memory-manager side of the core contract:
//! - Heap strings live in slots with a reference count that starts at zero
//! - `dec_ref` frees a string when its count reaches zero
//! - `recall` frees a string only if nothing ever retained it
//! - Objects are retained and released but never freed here; reclaiming
//!   them is the tracing collector's business
//!
//! Every call is counted in [`RefStats`] so tests can assert that an
//! operation left the heap exactly as it found it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use core_types::{
    JsError, JsResult, JsString, MemoryManager, ObjectClass, ObjectRef, SemanticsConfig,
    StringRef, Value, ValueKind,
};

use crate::object::JSObject;

/// Heap construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// String slots reserved up front
    pub initial_string_capacity: usize,
    /// Object slots reserved up front
    pub initial_object_capacity: usize,
    /// Semantics handed to the operators through `Host::semantics`
    pub semantics: SemanticsConfig,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            initial_string_capacity: 64,
            initial_object_capacity: 16,
            semantics: SemanticsConfig::default(),
        }
    }
}

/// Counters of memory-manager traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefStats {
    /// `inc_ref` calls on refcounted values
    pub inc_calls: u64,
    /// `dec_ref` calls on refcounted values
    pub dec_calls: u64,
    /// `recall` calls on heap strings
    pub recall_calls: u64,
    /// Heap strings allocated
    pub strings_allocated: u64,
    /// Heap strings freed
    pub strings_freed: u64,
}

impl RefStats {
    /// Every retain was matched by a release.
    pub fn is_balanced(&self) -> bool {
        self.inc_calls == self.dec_calls
    }

    /// Heap strings allocated but not yet freed within the counting window.
    ///
    /// Frees of strings allocated before the last reset are not matched by
    /// an allocation here, so the count floors at zero.
    pub fn strings_outstanding(&self) -> u64 {
        self.strings_allocated.saturating_sub(self.strings_freed)
    }
}

#[derive(Debug)]
struct StringSlot {
    text: JsString,
    refcount: u32,
}

/// The reference heap.
#[derive(Debug)]
pub struct Heap {
    strings: Vec<Option<StringSlot>>,
    free_slots: Vec<u32>,
    pub(crate) objects: Vec<JSObject>,
    pub(crate) conversion_log: Vec<(ObjectRef, core_types::PreferredType)>,
    stats: RefStats,
    config: HeapConfig,
}

impl Heap {
    /// Creates a new heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates a heap with explicit parameters.
    pub fn with_config(config: HeapConfig) -> Self {
        Heap {
            strings: Vec::with_capacity(config.initial_string_capacity),
            free_slots: Vec::new(),
            objects: Vec::with_capacity(config.initial_object_capacity),
            conversion_log: Vec::new(),
            stats: RefStats::default(),
            config,
        }
    }

    /// Heap parameters.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Replace the semantics used by the operators.
    pub fn set_semantics(&mut self, semantics: SemanticsConfig) {
        self.config.semantics = semantics;
    }

    /// Traffic counters since creation or the last [`Heap::reset_stats`].
    pub fn stats(&self) -> RefStats {
        self.stats
    }

    /// Zero the traffic counters.
    pub fn reset_stats(&mut self) {
        self.stats = RefStats::default();
    }

    /// Allocate a heap string from Rust text.
    pub fn alloc_str(&mut self, text: &str) -> StringRef {
        self.alloc_string(JsString::from_str(text))
    }

    /// Whether `s` refers to a live string. Built-ins are always live.
    pub fn is_live(&self, s: StringRef) -> bool {
        match s {
            StringRef::Builtin(_) => true,
            StringRef::Heap(slot) => self.heap_string(slot).is_some(),
        }
    }

    /// Reference count of a live heap string.
    pub fn string_refcount(&self, s: StringRef) -> Option<u32> {
        match s {
            StringRef::Builtin(_) => None,
            StringRef::Heap(slot) => self
                .strings
                .get(slot as usize)
                .and_then(Option::as_ref)
                .map(|entry| entry.refcount),
        }
    }

    /// Text of a live string.
    pub fn string_text(&self, s: StringRef) -> Option<String> {
        self.string(s).ok().map(|text| text.to_string())
    }

    /// Number of live heap strings.
    pub fn live_string_count(&self) -> usize {
        self.strings.iter().filter(|slot| slot.is_some()).count()
    }

    /// Store an object and return its handle.
    pub fn alloc_object(&mut self, object: JSObject) -> ObjectRef {
        self.objects.push(object);
        ObjectRef::new(self.objects.len() as u32 - 1)
    }

    /// Borrow an object.
    pub fn object(&self, obj: ObjectRef) -> JsResult<&JSObject> {
        self.objects
            .get(obj.index() as usize)
            .ok_or_else(|| JsError::internal(format!("dangling object handle {}", obj.index())))
    }

    /// Borrow an object mutably.
    pub fn object_mut(&mut self, obj: ObjectRef) -> JsResult<&mut JSObject> {
        self.objects
            .get_mut(obj.index() as usize)
            .ok_or_else(|| JsError::internal(format!("dangling object handle {}", obj.index())))
    }

    /// Number of objects ever allocated.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Retain count of an object.
    pub fn object_refcount(&self, obj: ObjectRef) -> Option<u32> {
        self.objects.get(obj.index() as usize).map(JSObject::refcount)
    }

    fn free_string(&mut self, slot: u32) {
        if let Some(entry) = self.strings.get_mut(slot as usize) {
            if let Some(freed) = entry.take() {
                trace!(target: "memory_manager::heap", slot, text = %freed.text, "free string");
                self.free_slots.push(slot);
                self.stats.strings_freed += 1;
            }
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryManager for Heap {
    fn alloc_string(&mut self, s: JsString) -> StringRef {
        self.stats.strings_allocated += 1;
        let entry = Some(StringSlot {
            text: s,
            refcount: 0,
        });
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.strings[slot as usize] = entry;
                slot
            }
            None => {
                self.strings.push(entry);
                self.strings.len() as u32 - 1
            }
        };
        trace!(target: "memory_manager::heap", slot, "alloc string");
        StringRef::Heap(slot)
    }

    fn heap_string(&self, slot: u32) -> Option<&JsString> {
        self.strings
            .get(slot as usize)
            .and_then(Option::as_ref)
            .map(|entry| &entry.text)
    }

    fn inc_ref(&mut self, v: Value) {
        match v.kind() {
            ValueKind::String(StringRef::Heap(slot)) => {
                self.stats.inc_calls += 1;
                if let Some(Some(entry)) = self.strings.get_mut(slot as usize) {
                    entry.refcount += 1;
                }
            }
            ValueKind::Object(obj) => {
                self.stats.inc_calls += 1;
                if let Some(object) = self.objects.get_mut(obj.index() as usize) {
                    object.refcount += 1;
                }
            }
            _ => {}
        }
    }

    fn dec_ref(&mut self, v: Value) {
        match v.kind() {
            ValueKind::String(StringRef::Heap(slot)) => {
                self.stats.dec_calls += 1;
                let now_unreferenced = match self.strings.get_mut(slot as usize) {
                    Some(Some(entry)) => {
                        entry.refcount = entry.refcount.saturating_sub(1);
                        entry.refcount == 0
                    }
                    _ => false,
                };
                if now_unreferenced {
                    self.free_string(slot);
                }
            }
            ValueKind::Object(obj) => {
                self.stats.dec_calls += 1;
                if let Some(object) = self.objects.get_mut(obj.index() as usize) {
                    object.refcount = object.refcount.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn recall(&mut self, s: StringRef) {
        if let StringRef::Heap(slot) = s {
            self.stats.recall_calls += 1;
            if self.string_refcount(s) == Some(0) {
                self.free_string(slot);
            }
        }
    }
}

/// Shorthand for the class of a stored object.
pub(crate) fn class_of(heap: &Heap, obj: ObjectRef) -> JsResult<ObjectClass> {
    Ok(heap.object(obj)?.class)
}
