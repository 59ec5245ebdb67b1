//! String representation.
//!
//! A `JsString` is a header (kind flags, built-in id, length) plus inline
//! code units stored either 8 bits wide (ASCII) or 16 bits wide (UTF-16). The
//! length is always the number of code units, whatever the storage width.
//!
//! All operations here are pure: they build a fresh `JsString`. Putting the
//! result on the heap (and reference counting it) is the memory manager's
//! job.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::builtin_strings::BuiltinString;

/// Kind flags of a string header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringKind(u8);

impl StringKind {
    /// Code units are stored 16 bits wide.
    pub const UNICODE: u8 = 0x1;
    /// Produced at run time (concatenation, slicing, coercion).
    pub const GENERATED: u8 = 0x2;
    /// Entry of the built-in table.
    pub const BUILTIN: u8 = 0x4;

    /// Raw flag bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// 16-bit storage.
    pub fn is_unicode(self) -> bool {
        self.0 & Self::UNICODE != 0
    }

    /// Created at run time.
    pub fn is_generated(self) -> bool {
        self.0 & Self::GENERATED != 0
    }

    /// Interned built-in.
    pub fn is_builtin(self) -> bool {
        self.0 & Self::BUILTIN != 0
    }
}

#[derive(Clone)]
enum CodeUnits {
    Ascii(Box<[u8]>),
    Utf16(Box<[u16]>),
}

/// An immutable JavaScript string.
#[derive(Clone)]
pub struct JsString {
    kind: StringKind,
    builtin: Option<BuiltinString>,
    units: CodeUnits,
}

impl JsString {
    fn from_units(units: Vec<u16>, kind: u8) -> JsString {
        if units.iter().all(|&u| u < 0x80) {
            let bytes: Vec<u8> = units.into_iter().map(|u| u as u8).collect();
            JsString {
                kind: StringKind(kind & !StringKind::UNICODE),
                builtin: None,
                units: CodeUnits::Ascii(bytes.into_boxed_slice()),
            }
        } else {
            JsString {
                kind: StringKind(kind | StringKind::UNICODE),
                builtin: None,
                units: CodeUnits::Utf16(units.into_boxed_slice()),
            }
        }
    }

    fn generated(units: Vec<u16>) -> JsString {
        Self::from_units(units, StringKind::GENERATED)
    }

    pub(crate) fn builtin(id: BuiltinString, text: &str) -> JsString {
        let mut s = Self::from_units(text.encode_utf16().collect(), StringKind::BUILTIN);
        s.builtin = Some(id);
        s
    }

    /// The empty string.
    pub fn empty() -> JsString {
        Self::generated(Vec::new())
    }

    /// String from raw 8-bit code units.
    ///
    /// Bytes are taken as code units `0..=255`; anything outside ASCII
    /// switches the string to 16-bit storage.
    pub fn new_from_bytes(bytes: &[u8]) -> JsString {
        Self::generated(bytes.iter().map(|&b| u16::from(b)).collect())
    }

    /// String from Rust text (encoded to UTF-16 code units).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> JsString {
        Self::generated(text.encode_utf16().collect())
    }

    /// String from UTF-16 code units.
    pub fn new_from_utf16(units: &[u16]) -> JsString {
        Self::generated(units.to_vec())
    }

    /// Header kind flags.
    pub fn kind(&self) -> StringKind {
        self.kind
    }

    /// Built-in id, or `None` for run-time strings.
    pub fn builtin_id(&self) -> Option<BuiltinString> {
        self.builtin
    }

    /// Whether this is an interned built-in.
    pub fn is_builtin(&self) -> bool {
        self.kind.is_builtin()
    }

    /// Whether storage is 8 bits wide.
    pub fn is_ascii(&self) -> bool {
        matches!(self.units, CodeUnits::Ascii(_))
    }

    /// Length in code units.
    pub fn len(&self) -> u32 {
        match &self.units {
            CodeUnits::Ascii(b) => b.len() as u32,
            CodeUnits::Utf16(u) => u.len() as u32,
        }
    }

    /// Whether the string has no code units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes used by the character data plus the 4-byte header.
    pub fn byte_size(&self) -> usize {
        let data = match &self.units {
            CodeUnits::Ascii(b) => b.len(),
            CodeUnits::Utf16(u) => u.len() * 2,
        };
        4 + data
    }

    /// Code unit at `index`.
    pub fn code_unit_at(&self, index: u32) -> Option<u16> {
        let i = index as usize;
        match &self.units {
            CodeUnits::Ascii(b) => b.get(i).map(|&c| u16::from(c)),
            CodeUnits::Utf16(u) => u.get(i).copied(),
        }
    }

    /// Iterator over code units.
    pub fn code_units(&self) -> impl Iterator<Item = u16> + '_ {
        let (ascii, wide): (&[u8], &[u16]) = match &self.units {
            CodeUnits::Ascii(b) => (b, &[]),
            CodeUnits::Utf16(u) => (&[], u),
        };
        ascii
            .iter()
            .map(|&c| u16::from(c))
            .chain(wide.iter().copied())
    }

    fn to_units(&self) -> Vec<u16> {
        self.code_units().collect()
    }

    /// New string with `ch` appended.
    pub fn append_char(&self, ch: u16) -> JsString {
        let mut units = self.to_units();
        units.push(ch);
        Self::generated(units)
    }

    /// `left + right`.
    pub fn concat2(left: &JsString, right: &JsString) -> JsString {
        let mut units = Vec::with_capacity((left.len() + right.len()) as usize);
        units.extend(left.code_units());
        units.extend(right.code_units());
        Self::generated(units)
    }

    /// `first + second + third`.
    pub fn concat3(first: &JsString, second: &JsString, third: &JsString) -> JsString {
        let mut units =
            Vec::with_capacity((first.len() + second.len() + third.len()) as usize);
        units.extend(first.code_units());
        units.extend(second.code_units());
        units.extend(third.code_units());
        Self::generated(units)
    }

    /// Substring of `length` code units starting at `index`, clamped to the
    /// bounds of `from`.
    pub fn extract(from: &JsString, index: u32, length: u32) -> JsString {
        let start = index.min(from.len());
        let end = start.saturating_add(length).min(from.len());
        Self::generated(
            from.code_units()
                .skip(start as usize)
                .take((end - start) as usize)
                .collect(),
        )
    }

    /// Ordinal comparison by code unit.
    pub fn compare(lhs: &JsString, rhs: &JsString) -> Ordering {
        lhs.code_units().cmp(rhs.code_units())
    }

    /// Content equality.
    pub fn equals(&self, other: &JsString) -> bool {
        self.len() == other.len() && self.code_units().eq(other.code_units())
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for JsString {}

impl Hash for JsString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for unit in self.code_units() {
            unit.hash(state);
        }
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.units {
            CodeUnits::Ascii(b) => {
                for &c in b.iter() {
                    write!(f, "{}", c as char)?;
                }
                Ok(())
            }
            CodeUnits::Utf16(u) => write!(f, "{}", String::from_utf16_lossy(u)),
        }
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsString({:?})", self.to_string())
    }
}
