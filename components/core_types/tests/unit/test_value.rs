//! Unit tests for the tagged Value

use core_types::{
    BuiltinString, EntryPoint, EnvRef, JsType, ObjectRef, Sign, StringRef, Value, ValueKind,
};

#[cfg(test)]
mod value_creation_tests {
    use super::*;

    #[test]
    fn test_value_undefined() {
        let val = Value::undefined();
        assert!(val.is_undefined());
        assert_eq!(val.type_of(), JsType::Undefined);
    }

    #[test]
    fn test_value_default_is_undefined() {
        assert!(Value::default().is_undefined());
    }

    #[test]
    fn test_value_boolean() {
        assert_eq!(Value::boolean(true).as_boolean(), Some(true));
        assert_eq!(Value::from(false).kind(), ValueKind::Boolean(false));
    }

    #[test]
    fn test_value_int32_range() {
        for n in [0, 1, -1, 42, -100, i32::MAX, i32::MIN] {
            assert_eq!(Value::number(n).kind(), ValueKind::Int32(n));
        }
    }

    #[test]
    fn test_value_double() {
        let v = Value::double(3.25);
        assert!(v.is_double());
        assert!(!v.is_int32());
        assert_eq!(v.as_double(), Some(3.25));
    }

    #[test]
    fn test_make_double_normalizes_specials() {
        assert!(Value::double(f64::NAN).is_nan());
        assert!(Value::double(f64::INFINITY).is_positive_infinity());
        assert!(Value::double(f64::NEG_INFINITY).is_negative_infinity());
        assert!(Value::double(0.0).is_positive_zero());
        assert!(Value::double(-0.0).is_negative_zero());
    }

    #[test]
    fn test_infinity_sign() {
        assert_eq!(
            Value::infinity(Sign::Negative).kind(),
            ValueKind::Infinity(Sign::Negative)
        );
        assert_eq!(Sign::Negative.flip(), Sign::Positive);
        assert_eq!(Sign::of(-0.0), Sign::Negative);
    }
}

#[cfg(test)]
mod value_predicate_tests {
    use super::*;

    #[test]
    fn test_numeric_family() {
        assert!(Value::number(1).is_numeric());
        assert!(Value::double(1.5).is_numeric());
        assert!(Value::nan().is_numeric());
        assert!(Value::infinity(Sign::Positive).is_numeric());
        assert!(!Value::boolean(true).is_numeric());
        assert!(JsType::NaN.is_numeric());
        assert!(!JsType::String.is_numeric());
    }

    #[test]
    fn test_int_and_double_are_distinct() {
        let i = Value::number(1);
        let d = Value::double(1.0);
        assert_ne!(i, d);
        assert_eq!(i.type_of(), JsType::Int32);
        assert_eq!(d.type_of(), JsType::Double);
        assert_eq!(i.as_f64(), d.as_f64());
    }

    #[test]
    fn test_nullish() {
        assert!(Value::null().is_nullish());
        assert!(Value::undefined().is_nullish());
        assert!(Value::none().is_nullish());
        assert!(!Value::number(0).is_nullish());
    }

    #[test]
    fn test_strings_and_objects() {
        let s = Value::string(StringRef::Builtin(BuiltinString::Empty));
        assert!(s.is_string());
        assert!(s.is_primitive());
        let o = Value::object(ObjectRef::new(9));
        assert!(o.is_object());
        assert!(!o.is_primitive());
        assert_eq!(o.as_object().map(ObjectRef::index), Some(9));
        assert!(o.needs_refcount());
    }

    #[test]
    fn test_environment_is_not_primitive() {
        let env = Value::environment(EnvRef::new(0x1000));
        assert!(!env.is_primitive());
        assert_eq!(env.type_of(), JsType::Environment);
        assert!(!env.needs_refcount());
    }

    #[test]
    fn test_function_entry_round_trip() {
        let f = Value::function(EntryPoint::new(0xdead_beef));
        assert_eq!(f.type_of(), JsType::Function);
        assert_eq!(
            f.kind(),
            ValueKind::Function(EntryPoint::new(0xdead_beef))
        );
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Value::number(7)), "Int32(7)");
        assert_eq!(format!("{:?}", Value::infinity(Sign::Negative)), "-Infinity");
    }
}
