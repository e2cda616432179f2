//! Builtin error-kind vocabulary.
//!
//! Every raised error carries an [`ErrorKind`]. Kinds form a tree rooted at [`ErrorKind::Exception`]; a kind is a
//! *refinement* of each of its ancestors, so an `exception()` check expecting `LookupError` accepts a raised
//! `KeyError`.
//!
//! The canonical text form of a raised error is `Kind: message`. Runtime helpers panic with exactly this text so the
//! harness can recover the kind from a panic payload.

use core::fmt;

/// A builtin error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    Exception,
    ArithmeticError,
    ZeroDivisionError,
    OverflowError,
    LookupError,
    IndexError,
    KeyError,
    ValueError,
    TypeError,
    RuntimeError,
    NotImplementedError,
    AssertionError,
}

/// Metadata for a builtin error kind.
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub id: ErrorKind,
    pub canonical: &'static str,
    pub parent: Option<ErrorKind>,
}

/// Registry of builtin error kinds.
pub const KINDS: &[KindInfo] = &[
    info(ErrorKind::Exception, "Exception", None),
    info(ErrorKind::ArithmeticError, "ArithmeticError", Some(ErrorKind::Exception)),
    info(ErrorKind::ZeroDivisionError, "ZeroDivisionError", Some(ErrorKind::ArithmeticError)),
    info(ErrorKind::OverflowError, "OverflowError", Some(ErrorKind::ArithmeticError)),
    info(ErrorKind::LookupError, "LookupError", Some(ErrorKind::Exception)),
    info(ErrorKind::IndexError, "IndexError", Some(ErrorKind::LookupError)),
    info(ErrorKind::KeyError, "KeyError", Some(ErrorKind::LookupError)),
    info(ErrorKind::ValueError, "ValueError", Some(ErrorKind::Exception)),
    info(ErrorKind::TypeError, "TypeError", Some(ErrorKind::Exception)),
    info(ErrorKind::RuntimeError, "RuntimeError", Some(ErrorKind::Exception)),
    info(ErrorKind::NotImplementedError, "NotImplementedError", Some(ErrorKind::RuntimeError)),
    info(ErrorKind::AssertionError, "AssertionError", Some(ErrorKind::Exception)),
];

const fn info(id: ErrorKind, canonical: &'static str, parent: Option<ErrorKind>) -> KindInfo {
    KindInfo { id, canonical, parent }
}

impl ErrorKind {
    /// Return full metadata for this kind.
    pub fn info(self) -> &'static KindInfo {
        // Every variant has exactly one registry entry, in declaration order.
        &KINDS[self as usize]
    }

    /// Return the canonical spelling (e.g. `"ValueError"`).
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.info().canonical
    }

    /// Return the direct parent kind, or `None` for `Exception`.
    #[inline]
    pub fn parent(self) -> Option<ErrorKind> {
        self.info().parent
    }

    /// Resolve a spelling to a kind. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        KINDS.iter().find(|k| k.canonical == name).map(|k| k.id)
    }

    /// Iterate over this kind followed by each of its ancestors, ending at `Exception`.
    pub fn lineage(self) -> impl Iterator<Item = ErrorKind> {
        core::iter::successors(Some(self), |k| k.parent())
    }

    /// Check whether `self` is `expected` or a refinement of it.
    ///
    /// ## Examples
    /// ```rust
    /// use pairtest_core::ErrorKind;
    /// assert!(ErrorKind::KeyError.is_subkind_of(ErrorKind::LookupError));
    /// assert!(ErrorKind::KeyError.is_subkind_of(ErrorKind::Exception));
    /// assert!(!ErrorKind::ValueError.is_subkind_of(ErrorKind::TypeError));
    /// ```
    pub fn is_subkind_of(self, expected: ErrorKind) -> bool {
        self.lineage().any(|k| k == expected)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised error: a kind plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisedError {
    kind: ErrorKind,
    message: String,
}

impl RaisedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Recover a raised error from its canonical text form.
    ///
    /// `"ValueError: bad input"` yields a `ValueError`, a bare kind name yields that kind with an empty message, and
    /// any other text becomes a generic `Exception` carrying the whole text.
    pub fn parse(text: &str) -> Self {
        if let Some((name, message)) = text.split_once(": ") {
            if let Some(kind) = ErrorKind::from_name(name) {
                return Self::new(kind, message);
            }
        }
        match ErrorKind::from_name(text.trim()) {
            Some(kind) => Self::new(kind, ""),
            None => Self::new(ErrorKind::Exception, text),
        }
    }
}

impl fmt::Display for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for RaisedError {}

impl From<ErrorKind> for RaisedError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_declaration_order() {
        for (idx, entry) in KINDS.iter().enumerate() {
            assert_eq!(entry.id as usize, idx, "registry entry {} is out of order", entry.canonical);
        }
    }

    #[test]
    fn every_kind_reaches_exception() {
        for entry in KINDS {
            assert_eq!(entry.id.lineage().last(), Some(ErrorKind::Exception));
        }
    }

    #[test]
    fn refinement_is_reflexive_and_follows_parents() {
        assert!(ErrorKind::ValueError.is_subkind_of(ErrorKind::ValueError));
        assert!(ErrorKind::NotImplementedError.is_subkind_of(ErrorKind::RuntimeError));
        assert!(ErrorKind::ZeroDivisionError.is_subkind_of(ErrorKind::ArithmeticError));
        assert!(!ErrorKind::Exception.is_subkind_of(ErrorKind::ValueError));
        assert!(!ErrorKind::IndexError.is_subkind_of(ErrorKind::KeyError));
    }

    #[test]
    fn names_round_trip() {
        for entry in KINDS {
            assert_eq!(ErrorKind::from_name(entry.canonical), Some(entry.id));
        }
        assert_eq!(ErrorKind::from_name("valueerror"), None);
        assert_eq!(ErrorKind::from_name("JSONDecodeError"), None);
    }

    #[test]
    fn parse_canonical_text() {
        let err = RaisedError::parse("KeyError: 'b' not found in dict");
        assert_eq!(err.kind(), ErrorKind::KeyError);
        assert_eq!(err.message(), "'b' not found in dict");
        assert_eq!(err.to_string(), "KeyError: 'b' not found in dict");
    }

    #[test]
    fn parse_bare_kind_and_free_text() {
        assert_eq!(RaisedError::parse("TypeError"), RaisedError::new(ErrorKind::TypeError, ""));

        let err = RaisedError::parse("index out of bounds: the len is 3 but the index is 7");
        assert_eq!(err.kind(), ErrorKind::Exception);
        assert_eq!(err.message(), "index out of bounds: the len is 3 but the index is 7");
    }
}
