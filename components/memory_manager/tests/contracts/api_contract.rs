//! Contract tests verifying the memory_manager API matches what the operator
//! layer expects from its host.

use core_types::{
    BuiltinString, EntryPoint, Host, JsString, MemoryManager, ObjectClass, ObjectModel,
    PreferredType, SemanticsConfig, StringRef, Value,
};
use memory_manager::{ConversionHook, Heap, HeapConfig, RefStats};

/// Test Heap contract: new() -> Self
#[test]
fn contract_heap_new() {
    let heap = Heap::new();
    assert_eq!(heap.stats(), RefStats::default());
}

/// Test Heap contract: the heap is a Host
#[test]
fn contract_heap_is_host() {
    fn assert_host<H: Host>(_: &H) {}
    let heap = Heap::new();
    assert_host(&heap);
}

/// Test Heap contract: semantics come from the config
#[test]
fn contract_heap_semantics_from_config() {
    let heap = Heap::with_config(HeapConfig {
        semantics: SemanticsConfig::exact(),
        ..HeapConfig::default()
    });
    assert!(!heap.semantics().approximate_number_equality);
}

/// Test MemoryManager contract: alloc_string starts unretained
#[test]
fn contract_alloc_string_unretained() {
    let mut heap = Heap::new();
    let s = heap.alloc_string(JsString::from_str("x"));
    assert!(s.is_heap());
    assert_eq!(heap.string_refcount(s), Some(0));
    assert_eq!(heap.stats().strings_allocated, 1);
}

/// Test MemoryManager contract: string() resolves builtins and heap strings
#[test]
fn contract_string_lookup() {
    let mut heap = Heap::new();
    let s = heap.alloc_str("heap");
    assert_eq!(heap.string(s).unwrap().to_string(), "heap");
    assert_eq!(
        heap.string(StringRef::Builtin(BuiltinString::Function))
            .unwrap()
            .to_string(),
        "function"
    );
}

/// Test ObjectModel contract: object_class reports the payload
#[test]
fn contract_object_class() {
    let mut heap = Heap::new();
    let d = heap.new_date(1.0);
    assert_eq!(heap.object_class(d).unwrap(), ObjectClass::Date(1.0));
    let f = heap.new_function(EntryPoint::new(0x20)).unwrap();
    assert_eq!(heap.object_class(f).unwrap().name(), "Function");
}

/// Test ObjectModel contract: default_value yields a primitive or TypeError
#[test]
fn contract_default_value() {
    let mut heap = Heap::new();
    let obj = heap.new_object();
    heap.set_value_of(obj, ConversionHook::Throw("nope".to_string()))
        .unwrap();
    let err = heap.default_value(obj, PreferredType::Number).unwrap_err();
    assert_eq!(err.message, "nope");
    assert!(!err.is_fatal());

    let plain = heap.new_object();
    let v = heap.default_value(plain, PreferredType::String).unwrap();
    assert!(v.is_primitive());
}

/// Test ObjectModel contract: has_instance rejects non-object prototypes
#[test]
fn contract_has_instance_needs_object_prototype() {
    let mut heap = Heap::new();
    let f = heap.new_function(EntryPoint::new(0x30)).unwrap();
    heap.set_property(f, JsString::from_str("prototype"), Value::number(1))
        .unwrap();
    let obj = heap.new_object();
    assert!(heap.has_instance(f, Value::object(obj)).is_err());
}
