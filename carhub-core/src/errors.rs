//! # Errors
//!
//! Collaborator traits (`ListingCollection`, the auth feed, ...) return
//! `anyhow::Result` so backends can bubble up whatever their SDK produces.
//! When a backend wants callers to branch on *what* went wrong it raises a
//! structured [`StoreError`] inside the `anyhow::Error`:
//!
//! - `into_anyhow()` to raise,
//! - `StoreError::from_anyhow(&err)` or `StoreError::kind_of(&err)` to inspect.

use std::fmt;

use anyhow::Error as AnyError;

/// A convenience result type for collaborator calls.
pub type StoreResult<T> = std::result::Result<T, AnyError>;

/// What kind of failure a backend reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    NotAuthenticated,
    Forbidden,
    NotFound,
    Conflict,
    /// A cursor was presented with a filter it was not produced under.
    InvalidCursor,
    Unavailable,
    GeneralError,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InvalidCursor => "InvalidCursor",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Kebab-cased name, handy for UI error codes.
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidCursor => "invalid-cursor",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured backend error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` for collaborator return values.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `StoreError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&StoreError> {
        err.downcast_ref::<StoreError>()
    }

    /// Kind of an arbitrary collaborator error; `GeneralError` when the
    /// backend did not raise a structured one.
    pub fn kind_of(err: &AnyError) -> ErrorKind {
        Self::from_anyhow(err)
            .map(|e| e.kind)
            .unwrap_or(ErrorKind::GeneralError)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn invalid_cursor(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCursor, msg)
    }
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message)
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_errors_survive_anyhow() {
        let err = StoreError::not_found("Listing not found: abc").into_anyhow();
        let store = StoreError::from_anyhow(&err).expect("must be StoreError");
        assert_eq!(store.kind, ErrorKind::NotFound);
        assert_eq!(store.to_string(), "NotFound: Listing not found: abc");
    }

    #[test]
    fn foreign_errors_are_general() {
        let err = anyhow::anyhow!("socket closed");
        assert!(StoreError::from_anyhow(&err).is_none());
        assert_eq!(StoreError::kind_of(&err), ErrorKind::GeneralError);

        let err = StoreError::unavailable("listener lost").into_anyhow();
        assert_eq!(StoreError::kind_of(&err), ErrorKind::Unavailable);
    }
}
