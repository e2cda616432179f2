//! Raise helpers for code under test.
//!
//! Raising is implemented as a panic whose message is the canonical `Kind: message` text, so
//! [`TestSession::exception`](crate::TestSession::exception) can recover the kind from the payload.

use core::any::Any;
use core::fmt::{self, Display};

use pairtest_core::{ErrorKind, RaisedError};

/// Raise an error (implemented as a panic) with canonical formatting.
#[cold]
#[track_caller]
pub fn raise(kind: ErrorKind, msg: impl Display) -> ! {
    panic!("{}", RaisedError::new(kind, msg.to_string()));
}

/// Raise a canonical `Kind: ...` error without allocating an intermediate `String`.
#[cold]
#[track_caller]
pub fn raise_kind_fmt(kind: ErrorKind, msg: fmt::Arguments<'_>) -> ! {
    panic!("{}: {}", kind, msg);
}

/// Raise a `ValueError` with a canonical `ValueError: ...` prefix.
#[cold]
#[track_caller]
pub fn raise_value_error(msg: &str) -> ! {
    raise(ErrorKind::ValueError, msg)
}

/// Raise a `TypeError` with a canonical `TypeError: ...` prefix.
#[cold]
#[track_caller]
pub fn raise_type_error(msg: &str) -> ! {
    raise(ErrorKind::TypeError, msg)
}

/// Raise an `IndexError` with a canonical `IndexError: ...` prefix.
#[cold]
#[track_caller]
pub fn raise_index_error(msg: &str) -> ! {
    raise(ErrorKind::IndexError, msg)
}

/// Raise a `KeyError` with a canonical `KeyError: ...` prefix.
#[cold]
#[track_caller]
pub fn raise_key_error(msg: &str) -> ! {
    raise(ErrorKind::KeyError, msg)
}

/// Raise a canonical `ZeroDivisionError: division by zero`.
#[cold]
#[track_caller]
pub fn raise_zero_division() -> ! {
    raise(ErrorKind::ZeroDivisionError, "division by zero")
}

/// Recover the raised error carried by a panic payload.
///
/// Handles `panic_any(RaisedError)`, `&str` and `String` payloads; other payload types count as a bare `Exception`.
pub fn from_panic_payload(payload: &(dyn Any + Send)) -> RaisedError {
    if let Some(raised) = payload.downcast_ref::<RaisedError>() {
        raised.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
        RaisedError::parse(text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        RaisedError::parse(text)
    } else {
        RaisedError::from(ErrorKind::Exception)
    }
}

/// Whether a panic payload was produced by [`raise`] or one of its helpers.
///
/// True for `RaisedError` payloads and for text starting with a known kind name; ordinary panics are false.
pub fn is_raised(payload: &(dyn Any + Send)) -> bool {
    if payload.is::<RaisedError>() {
        return true;
    }
    let text = match payload.downcast_ref::<&str>() {
        Some(text) => *text,
        None => match payload.downcast_ref::<String>() {
            Some(text) => text.as_str(),
            None => return false,
        },
    };
    let name = text.split_once(": ").map_or(text.trim(), |(name, _)| name);
    ErrorKind::from_name(name).is_some()
}
