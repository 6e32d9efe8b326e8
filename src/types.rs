//! Core identifier types.

use std::fmt;

/// A tradable symbol, stored inline (no heap allocation).
///
/// Holds up to [`Symbol::MAX_LEN`] bytes, enough for equity tickers and
/// dash-separated crypto pairs ("BTC-USD"). Unused bytes are zero so the
/// derived ordering and hashing see a canonical representation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    bytes: [u8; Symbol::MAX_LEN],
    len: u8,
}

impl Symbol {
    /// Maximum symbol length in bytes.
    pub const MAX_LEN: usize = 16;

    /// Create a symbol from a string slice.
    ///
    /// Panics if the string is empty or longer than [`Symbol::MAX_LEN`]
    /// bytes; use [`Symbol::try_new`] for fallible construction.
    pub fn new(s: &str) -> Self {
        Self::try_new(s).unwrap_or_else(|| panic!("invalid symbol: {s:?}"))
    }

    /// Create a symbol, returning `None` if the string is empty or too long.
    pub fn try_new(s: &str) -> Option<Self> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return None;
        }
        let mut bytes = [0u8; Self::MAX_LEN];
        bytes[..s.len()].copy_from_slice(s.as_bytes());
        Some(Self {
            bytes,
            len: s.len() as u8,
        })
    }

    /// The symbol as a string slice.
    pub fn as_str(&self) -> &str {
        // Constructed from &str, so the bytes are valid UTF-8
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SymbolVisitor;

        impl serde::de::Visitor<'_> for SymbolVisitor {
            type Value = Symbol;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a symbol string of 1..={} bytes", Symbol::MAX_LEN)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Symbol, E> {
                Symbol::try_new(v).ok_or_else(|| E::custom(format!("invalid symbol: {v:?}")))
            }
        }

        deserializer.deserialize_str(SymbolVisitor)
    }
}
