//! Refcount discipline across whole expression sequences.
//!
//! The stack machine retains what it holds, so once a program's stack is
//! cleared every heap string it created must be gone and every retain must
//! have been matched.

use core_types::{MemoryManager, ObjectModel, PreferredType, Value};
use integration_tests::{BinaryOp, Machine};
use memory_manager::ConversionHook;

fn assert_clean(m: &Machine, baseline: usize) {
    let stats = m.heap.stats();
    assert!(stats.is_balanced(), "unbalanced {:?}", stats);
    assert_eq!(m.heap.live_string_count(), baseline);
}

#[test]
fn test_long_concatenation_releases_intermediates() {
    let mut m = Machine::new();
    m.heap.reset_stats();
    m.push_str("a");
    for i in 0..100 {
        m.push(Value::number(i));
        m.binary(BinaryOp::Add).unwrap();
        // Only the running result stays live.
        assert_eq!(m.heap.live_string_count(), 1);
    }
    let text = m.top_text().unwrap();
    assert!(text.starts_with("a0123456789101112"));
    assert!(text.ends_with("979899"));
    m.clear();
    assert_clean(&m, 0);
    assert_eq!(m.heap.stats().strings_outstanding(), 0);
}

#[test]
fn test_hooked_objects_across_operators() {
    let mut m = Machine::new();
    let seven = m.heap.new_object();
    m.heap
        .set_value_of(seven, ConversionHook::AllocString("7".to_string()))
        .unwrap();
    m.heap.reset_stats();

    let program = [
        (BinaryOp::Mul, 49.0),
        (BinaryOp::Sub, 0.0),
        (BinaryOp::Div, 1.0),
        (BinaryOp::Rem, 0.0),
    ];
    for (op, expected) in program {
        m.push(Value::object(seven));
        m.push(Value::object(seven));
        m.binary(op).unwrap();
        assert_eq!(m.top().and_then(Value::as_f64), Some(expected), "{:?}", op);
        m.clear();
    }

    for (op, expected) in [
        (BinaryOp::Less, false),
        (BinaryOp::LessEqual, true),
        (BinaryOp::LooseEquals, true),
    ] {
        m.push(Value::object(seven));
        m.push(Value::number(7));
        m.binary(op).unwrap();
        assert_eq!(m.top().and_then(Value::as_boolean), Some(expected), "{:?}", op);
        m.clear();
    }

    m.push(Value::object(seven));
    m.push_str("!");
    m.binary(BinaryOp::Add).unwrap();
    assert_eq!(m.top_text().as_deref(), Some("7!"));
    m.clear();

    assert_clean(&m, 0);
}

#[test]
fn test_thrown_conversion_leaves_heap_clean() {
    let mut m = Machine::new();
    let bad = m.heap.new_object();
    m.heap
        .set_value_of(bad, ConversionHook::Throw("nope".to_string()))
        .unwrap();
    let text_first = m.heap.new_object();
    m.heap
        .set_value_of(text_first, ConversionHook::AllocString("left".to_string()))
        .unwrap();
    m.heap.reset_stats();

    for op in [BinaryOp::Add, BinaryOp::Less, BinaryOp::Mul] {
        m.push(Value::object(text_first));
        m.push(Value::object(bad));
        assert!(m.binary(op).is_err(), "{:?}", op);
        assert_eq!(m.depth(), 0);
    }
    assert_clean(&m, 0);
}

#[test]
fn test_string_wrapper_keeps_its_payload() {
    let mut m = Machine::new();
    let ab = m.heap.alloc_str("ab");
    let wrapper = m.heap.new_string_object(ab).unwrap();
    assert_eq!(m.heap.string_refcount(ab), Some(1));
    m.heap.reset_stats();

    m.push(Value::object(wrapper));
    m.push(Value::number(3));
    m.binary(BinaryOp::Add).unwrap();
    assert_eq!(m.top_text().as_deref(), Some("ab3"));
    m.clear();

    m.push(Value::object(wrapper));
    m.push_str("ab");
    m.binary(BinaryOp::LooseEquals).unwrap();
    assert_eq!(m.top().and_then(Value::as_boolean), Some(true));
    m.clear();

    assert_clean(&m, 1);
    assert_eq!(m.heap.string_refcount(ab), Some(1));
}

#[test]
fn test_conversion_hints_follow_the_operator() {
    let mut m = Machine::new();
    let a = m.heap.new_object();
    let b = m.heap.new_object();
    for obj in [a, b] {
        m.heap
            .set_value_of(obj, ConversionHook::Return(Value::number(1)))
            .unwrap();
    }

    m.push(Value::object(a));
    m.push(Value::object(b));
    m.binary(BinaryOp::Less).unwrap();
    m.clear();
    assert_eq!(
        m.heap.conversion_log(),
        &[(a, PreferredType::Number), (b, PreferredType::Number)]
    );
    m.heap.clear_conversion_log();

    m.push(Value::object(a));
    m.push(Value::object(b));
    m.binary(BinaryOp::Add).unwrap();
    m.clear();
    assert_eq!(
        m.heap.conversion_log(),
        &[(a, PreferredType::Default), (b, PreferredType::Default)]
    );
    m.heap.clear_conversion_log();

    m.push(Value::object(a));
    m.push(Value::number(1));
    m.binary(BinaryOp::LooseEquals).unwrap();
    assert_eq!(m.top().and_then(Value::as_boolean), Some(true));
    m.clear();
    assert_eq!(m.heap.conversion_log(), &[(a, PreferredType::Default)]);
}
