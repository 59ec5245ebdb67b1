//! Unit tests for JsError, ErrorKind and configuration errors

use core_types::{ConfigError, ErrorKind, JsError, SemanticsConfig};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_names() {
        let all = [
            (ErrorKind::SyntaxError, "SyntaxError"),
            (ErrorKind::TypeError, "TypeError"),
            (ErrorKind::ReferenceError, "ReferenceError"),
            (ErrorKind::RangeError, "RangeError"),
            (ErrorKind::EvalError, "EvalError"),
            (ErrorKind::URIError, "URIError"),
            (ErrorKind::InternalError, "InternalError"),
        ];
        for (kind, name) in all {
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::TypeError, ErrorKind::TypeError);
        assert_ne!(ErrorKind::TypeError, ErrorKind::RangeError);
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_js_error_display() {
        let error = JsError::type_error("Cannot use 'in' operator");
        assert_eq!(error.to_string(), "TypeError: Cannot use 'in' operator");
    }

    #[test]
    fn test_js_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&JsError::internal("x"));
    }

    #[test]
    fn test_only_internal_is_fatal() {
        assert!(JsError::internal("unexpected tag").is_fatal());
        assert!(!JsError::type_error("not callable").is_fatal());
        assert!(!JsError::new(ErrorKind::SyntaxError, "x").is_fatal());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> core_types::JsResult<i32> {
            Err(JsError::type_error("boom"))
        }
        fn outer() -> core_types::JsResult<i32> {
            let n = inner()?;
            Ok(n + 1)
        }
        assert_eq!(outer().unwrap_err().kind, ErrorKind::TypeError);
    }
}

#[cfg(test)]
mod config_error_tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = SemanticsConfig::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = SemanticsConfig::from_json(r#"{"number_equality_epsilon": 0.0}"#).unwrap_err();
        assert!(err.to_string().contains("number_equality_epsilon"));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = SemanticsConfig::exact();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(SemanticsConfig::from_json(&text).unwrap(), config);
    }
}
