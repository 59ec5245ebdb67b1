//! Process-wide table of interned built-in strings.
//!
//! Built-in strings are property names, literal constants and error names the
//! engine refers to by a small integer id. They are created once, on first
//! lookup, and live for the rest of the process; they are never reference
//! counted, recalled or freed.

use std::sync::LazyLock;

use crate::js_string::JsString;

macro_rules! builtin_strings {
    ($($variant:ident => $text:expr,)*) => {
        /// Identifier of an interned built-in string.
        ///
        /// The discriminant is the table index.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum BuiltinString {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl BuiltinString {
            /// Every built-in, in id order.
            pub const ALL: &'static [BuiltinString] = &[$(BuiltinString::$variant,)*];

            /// Text of the built-in.
            pub const fn text(self) -> &'static str {
                match self {
                    $(BuiltinString::$variant => $text,)*
                }
            }
        }
    };
}

builtin_strings! {
    Empty => "",
    Arguments => "arguments",
    Eval => "eval",
    Prototype => "prototype",
    Constructor => "constructor",
    Caller => "caller",
    Callee => "callee",
    Undefined => "undefined",
    Null => "null",
    False => "false",
    True => "true",
    Boolean => "boolean",
    Number => "number",
    String => "string",
    Object => "object",
    Function => "function",
    Length => "length",
    Source => "source",
    Global => "global",
    IgnoreCase => "ignoreCase",
    Multiline => "multiline",
    Index => "index",
    Input => "input",
    LastIndex => "lastIndex",
    NaN => "NaN",
    Infinity => "Infinity",
    NegInfinity => "-Infinity",
    UndefinedUpper => "Undefined",
    NullUpper => "Null",
    ObjectUpper => "Object",
    FunctionUpper => "Function",
    ArrayUpper => "Array",
    ArgumentsUpper => "Arguments",
    StringUpper => "String",
    BooleanUpper => "Boolean",
    NumberUpper => "Number",
    DateUpper => "Date",
    RegExpUpper => "RegExp",
    Error => "Error",
    EvalError => "EvalError",
    RangeError => "RangeError",
    ReferenceError => "ReferenceError",
    SyntaxError => "SyntaxError",
    TypeError => "TypeError",
    UriError => "URIError",
    Math => "Math",
    Json => "JSON",
    Value => "value",
    Writable => "writable",
    Enumerable => "enumerable",
    Configurable => "configurable",
    Get => "get",
    Set => "set",
    ToString => "toString",
    ValueOf => "valueOf",
    ToLocaleString => "toLocaleString",
    HasOwnProperty => "hasOwnProperty",
    IsPrototypeOf => "isPrototypeOf",
    PropertyIsEnumerable => "propertyIsEnumerable",
    Apply => "apply",
    Call => "call",
    Bind => "bind",
    Name => "name",
    Message => "message",
    ToJson => "toJSON",
    MaxValue => "MAX_VALUE",
    MinValue => "MIN_VALUE",
    PositiveInfinity => "POSITIVE_INFINITY",
    NegativeInfinity => "NEGATIVE_INFINITY",
    InvalidDate => "Invalid Date",
    ObjectObject => "[object Object]",
    LeftBracket => "[",
    RightBracket => "]",
    LeftBrace => "{",
    RightBrace => "}",
    Minus => "-",
    Plus => "+",
    Colon => ":",
    Comma => ",",
    Dot => ".",
    Space => " ",
    Newline => "\n",
    Digit0 => "0",
    Digit1 => "1",
    Digit2 => "2",
    Digit3 => "3",
    Digit4 => "4",
    Digit5 => "5",
    Digit6 => "6",
    Digit7 => "7",
    Digit8 => "8",
    Digit9 => "9",
}

static TABLE: LazyLock<Vec<JsString>> = LazyLock::new(|| {
    BuiltinString::ALL
        .iter()
        .map(|&id| JsString::builtin(id, id.text()))
        .collect()
});

impl BuiltinString {
    /// Small integer id (the table index).
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Id back to a built-in, if in range.
    pub fn from_id(id: u16) -> Option<BuiltinString> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// The built-in whose text equals `text`, if any.
    pub fn find(text: &str) -> Option<BuiltinString> {
        Self::ALL.iter().copied().find(|id| id.text() == text)
    }

    /// The interned single-digit string for `0..=9`.
    pub fn digit(d: u8) -> Option<BuiltinString> {
        match d {
            0..=9 => BuiltinString::from_id(BuiltinString::Digit0.id() + u16::from(d)),
            _ => None,
        }
    }
}

/// Interned string for `id`. O(1); always succeeds.
pub fn lookup_builtin(id: BuiltinString) -> &'static JsString {
    // Every variant has a table entry: TABLE is built from `ALL`.
    &TABLE[usize::from(id.id())]
}

/// Whether `s` has the same contents as the built-in `id`, without
/// allocating.
pub fn equals_builtin(s: &JsString, id: BuiltinString) -> bool {
    if s.builtin_id() == Some(id) {
        return true;
    }
    s.equals(lookup_builtin(id))
}
