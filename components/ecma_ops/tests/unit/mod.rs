//! Unit tests for conversions and operators working together

use core_types::{BuiltinString, MemoryManager, ObjectModel, Sign, StringRef, Value};
use ecma_ops::{
    add, div, format_double, greater_than, less_than, loose_equals, same_value, strict_equality,
    to_length, to_number_value, to_string, type_of, MAX_SAFE_LENGTH,
};
use memory_manager::{ConversionHook, Heap};

fn retained(heap: &mut Heap, text: &str) -> Value {
    let v = Value::string(heap.alloc_str(text));
    heap.inc_ref(v);
    v
}

fn text_of(heap: &Heap, v: Value) -> String {
    heap.string_text(v.as_string().expect("string value"))
        .expect("live string")
}

// ============================================================================
// ToString / ToNumber
// ============================================================================

#[test]
fn test_int32_string_round_trip() {
    let mut heap = Heap::new();
    for n in [
        i32::MIN,
        i32::MIN + 1,
        -1_000_000,
        -42,
        -1,
        0,
        1,
        9,
        10,
        65_535,
        1 << 30,
        i32::MAX - 1,
        i32::MAX,
    ] {
        let s = to_string(&mut heap, Value::number(n)).unwrap();
        let back = to_number_value(&mut heap, Value::string(s)).unwrap();
        assert_eq!(back.value, Value::number(n), "round trip of {}", n);
        assert!(back.convertible);
        heap.recall(s);
    }
    assert_eq!(heap.live_string_count(), 0);
}

#[test]
fn test_double_to_string_regimes() {
    let mut heap = Heap::new();
    let s = to_string(&mut heap, Value::double(1e17)).unwrap();
    assert_eq!(heap.string_text(s).unwrap(), "100000000000000000");
    let s = to_string(&mut heap, Value::double(0.00005)).unwrap();
    assert_eq!(heap.string_text(s).unwrap(), "0.00005");
    let s = to_string(&mut heap, Value::double(-1.25e-9)).unwrap();
    assert_eq!(heap.string_text(s).unwrap(), "-1.25e-9");
    assert_eq!(format_double(123456789.5), "123456789.5");
}

#[test]
fn test_to_string_negative_zero_is_builtin_zero() {
    let mut heap = Heap::new();
    assert_eq!(
        to_string(&mut heap, Value::negative_zero()).unwrap(),
        StringRef::Builtin(BuiltinString::Digit0)
    );
}

// ============================================================================
// ToLength
// ============================================================================

#[test]
fn test_to_length_clamps() {
    let mut heap = Heap::new();
    assert_eq!(to_length(&mut heap, Value::number(-5)).unwrap(), 0);
    assert_eq!(
        to_length(&mut heap, Value::infinity(Sign::Positive)).unwrap(),
        MAX_SAFE_LENGTH
    );
    let s = retained(&mut heap, "3.7");
    assert_eq!(to_length(&mut heap, s).unwrap(), 3);
    assert_eq!(
        to_length(&mut heap, Value::double(9007199254740993.0)).unwrap(),
        MAX_SAFE_LENGTH
    );
}

// ============================================================================
// Addition
// ============================================================================

#[test]
fn test_add_scenarios() {
    let mut heap = Heap::new();
    let two = retained(&mut heap, "2");
    let x = retained(&mut heap, "x");
    let bang = retained(&mut heap, "!");

    let r = add(&mut heap, Value::number(1), two).unwrap();
    assert_eq!(text_of(&heap, r), "12");
    let r = add(&mut heap, Value::nan(), x).unwrap();
    assert_eq!(text_of(&heap, r), "NaNx");
    let r = add(&mut heap, Value::infinity(Sign::Positive), bang).unwrap();
    assert_eq!(text_of(&heap, r), "Infinity!");
}

#[test]
fn test_add_string_order_and_objects() {
    let mut heap = Heap::new();
    let a = heap.new_array(vec![Value::number(1), Value::number(2)]);
    let suffix = retained(&mut heap, "!");
    let r = add(&mut heap, Value::object(a), suffix).unwrap();
    assert_eq!(text_of(&heap, r), "1,2!");
    let r = add(&mut heap, Value::boolean(true), suffix).unwrap();
    assert_eq!(text_of(&heap, r), "true!");
    let r = add(&mut heap, Value::null(), suffix).unwrap();
    assert_eq!(text_of(&heap, r), "null!");
}

#[test]
fn test_add_string_wrapper_concatenates() {
    let mut heap = Heap::new();
    let inner = heap.alloc_str("ab");
    let wrapper = heap.new_string_object(inner).unwrap();
    let r = add(&mut heap, Value::object(wrapper), Value::number(3)).unwrap();
    assert_eq!(text_of(&heap, r), "ab3");
    // The wrapper still holds its string.
    assert_eq!(heap.string_refcount(inner), Some(1));
}

// ============================================================================
// Division
// ============================================================================

#[test]
fn test_divide_by_zero_scenarios() {
    let mut heap = Heap::new();
    assert_eq!(
        div(&mut heap, Value::number(1), Value::number(0)).unwrap(),
        Value::infinity(Sign::Positive)
    );
    assert_eq!(
        div(&mut heap, Value::number(-1), Value::number(0)).unwrap(),
        Value::infinity(Sign::Negative)
    );
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_signed_zero_disagreement() {
    let heap = Heap::new();
    assert!(strict_equality(&heap, Value::positive_zero(), Value::negative_zero()).unwrap());
    assert!(!same_value(&heap, Value::positive_zero(), Value::negative_zero()).unwrap());
}

#[test]
fn test_null_undefined_equality() {
    let mut heap = Heap::new();
    assert!(loose_equals(&mut heap, Value::null(), Value::undefined()).unwrap());
    assert!(!strict_equality(&heap, Value::null(), Value::undefined()).unwrap());
}

#[test]
fn test_strict_equality_tracks_epsilon_for_finite_doubles() {
    let heap = Heap::new();
    let samples: [f64; 8] = [0.0, 1.0, -1.0, 0.1, 1e-300, 5e-324, 1e300, -2.5];
    for &a in &samples {
        for &b in &samples {
            let expected = (a - b).abs() < core_types::NUMBER_MIN_VALUE;
            assert_eq!(
                strict_equality(&heap, Value::double(a), Value::double(b)).unwrap(),
                expected,
                "{} === {}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_loose_equality_with_user_value_of() {
    let mut heap = Heap::new();
    let obj = heap.new_object();
    heap.set_value_of(obj, ConversionHook::Return(Value::number(42)))
        .unwrap();
    let text = retained(&mut heap, "42");
    assert!(loose_equals(&mut heap, Value::object(obj), Value::number(42)).unwrap());
    assert!(loose_equals(&mut heap, text, Value::object(obj)).unwrap());
    assert!(!loose_equals(&mut heap, Value::object(obj), Value::null()).unwrap());
}

// ============================================================================
// Relational
// ============================================================================

#[test]
fn test_relational_with_dates_compares_strings() {
    let mut heap = Heap::new();
    let early = heap.new_date(0.0);
    let late = heap.new_date(86_400_000.0);
    // Date objects convert through their date strings; "Thu" < "Fri" is false.
    assert!(!less_than(&mut heap, Value::object(early), Value::object(late)).unwrap());
    assert!(greater_than(&mut heap, Value::object(early), Value::object(late)).unwrap());
    assert_eq!(heap.live_string_count(), 0);
}

// ============================================================================
// typeof
// ============================================================================

#[test]
fn test_typeof_returns_builtins() {
    let mut heap = Heap::new();
    let f = heap.new_function(core_types::EntryPoint::new(0x10)).unwrap();
    assert_eq!(
        type_of(&heap, Value::object(f)).unwrap(),
        StringRef::Builtin(BuiltinString::Function)
    );
    assert_eq!(
        type_of(&heap, Value::null()).unwrap(),
        StringRef::Builtin(BuiltinString::Object)
    );
    assert_eq!(heap.stats().strings_allocated, 0);
}

#[test]
fn test_array_text_matches_element_to_string() {
    let mut heap = Heap::new();
    let empty = retained(&mut heap, "");
    for d in [-0.0, 0.1 + 0.2, 1e21, 1e17, 0.00005, -1.25e-9] {
        let element = Value::double(d);
        let expected = to_string(&mut heap, element).unwrap();
        let expected_text = heap.string_text(expected).unwrap();
        heap.recall(expected);

        let arr = heap.new_array(vec![element]);
        let joined = add(&mut heap, Value::object(arr), empty).unwrap();
        assert_eq!(text_of(&heap, joined), expected_text, "[{}] + \"\"", d);
        heap.recall(joined.as_string().unwrap());

        let same = Value::string(heap.alloc_str(&expected_text));
        heap.inc_ref(same);
        assert!(loose_equals(&mut heap, Value::object(arr), same).unwrap());
        heap.dec_ref(same);
    }
}
