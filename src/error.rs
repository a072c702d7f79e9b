//! Error handling for salter.
//!
//! All fallible operations return [`Result`], pairing a coarse
//! [`ErrorKind`] with the boxed underlying cause. The kinds mirror the
//! failure surface of the NEPSE authorization scheme: sandbox lifecycle,
//! token fetching and decoding, and the usual client-side suspects.
//!
//! Errors bubble to the caller unchanged; nothing in this crate retries. A
//! failed token refresh in particular never discards a previously cached
//! credential.
//!
//! # Example
//!
//! ```rust
//! use salter::error::{Error, ErrorKind};
//!
//! let err = Error::empty_token("server returned a blank access token");
//! assert_eq!(err.kind, ErrorKind::EmptyToken);
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Main error type combining error kind and details.
#[derive(Debug)]
pub struct Error {
    /// Classification of the error
    pub kind: ErrorKind,

    /// Details of the underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

/// Standard result type for salter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for the NEPSE client.
///
/// The first five variants are the failure modes of the authorization
/// core; the rest cover the client layers around it.
#[expect(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorKind {
    /// WASM runtime or module construction failed. Fatal: the manager
    /// cannot produce tokens without its parser.
    #[error("sandbox initialization failed")]
    SandboxInit,

    /// A WASM call trapped, or the export was missing or mistyped.
    #[error("sandbox call failed")]
    SandboxCall,

    /// The HTTP collaborator failed to deliver a response.
    #[error("http fetch failed")]
    HttpFetch,

    /// The server responded with an empty access token.
    #[error("empty access token")]
    EmptyToken,

    /// The caller gave up, or an in-flight refresh was abandoned.
    #[error("operation was cancelled")]
    Cancelled,

    /// A response body could not be deserialized.
    #[error("response parsing failed")]
    Parse,

    /// A requested entity does not exist (e.g. unknown ticker symbol).
    #[error("not found")]
    NotFound,

    /// An argument or URL failed validation.
    #[error("invalid argument")]
    InvalidArgument,

    /// The client or manager was closed before the call.
    #[error("client is closed")]
    Closed,
}

impl Error {
    /// Creates a new error with the given kind and cause.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Attempts to downcast the underlying error to a concrete type.
    #[must_use]
    pub fn downcast<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    /// Creates a [`ErrorKind::SandboxInit`] error.
    pub fn sandbox_init<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::SandboxInit, error)
    }

    /// Creates a [`ErrorKind::SandboxCall`] error.
    pub fn sandbox_call<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::SandboxCall, error)
    }

    /// Creates a [`ErrorKind::HttpFetch`] error.
    pub fn http_fetch<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::HttpFetch, error)
    }

    /// Creates a [`ErrorKind::EmptyToken`] error.
    pub fn empty_token<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::EmptyToken, error)
    }

    /// Creates a [`ErrorKind::Cancelled`] error.
    pub fn cancelled<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Cancelled, error)
    }

    /// Creates a [`ErrorKind::Parse`] error.
    pub fn parse<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Parse, error)
    }

    /// Creates a [`ErrorKind::NotFound`] error.
    pub fn not_found<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::NotFound, error)
    }

    /// Creates a [`ErrorKind::InvalidArgument`] error.
    pub fn invalid_argument<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidArgument, error)
    }

    /// Creates a [`ErrorKind::Closed`] error.
    pub fn closed<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Closed, error)
    }

    /// Rebuilds an error from a shared reference, preserving the kind.
    ///
    /// Single-flight waiters all observe the one worker's error through an
    /// `Arc`; the boxed cause cannot be cloned, so it is flattened to its
    /// rendered message.
    #[must_use]
    pub(crate) fn from_shared(error: &Arc<Error>) -> Self {
        Self::new(error.kind, error.error.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// Formats the error as "{kind}: {details}".
impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}: ", self.kind)?;
        self.error.fmt(fmt)
    }
}

/// Maps HTTP client errors onto the taxonomy.
///
/// Decode failures surface as [`ErrorKind::Parse`]; everything else that
/// `reqwest` reports is a transport problem.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::parse(err);
        }

        Self::http_fetch(err)
    }
}

/// JSON deserialization failures are parse errors.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err)
    }
}

/// URL construction failures are caller mistakes.
impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_argument(err)
    }
}

/// A decoded token that does not form a valid header value.
impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::invalid_argument(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_cause() {
        let err = Error::empty_token("prove endpoint returned blank token");
        assert_eq!(
            err.to_string(),
            "empty access token: prove endpoint returned blank token"
        );
    }

    #[test]
    fn from_shared_preserves_kind() {
        let shared = Arc::new(Error::http_fetch("connection reset"));
        let local = Error::from_shared(&shared);
        assert_eq!(local.kind, ErrorKind::HttpFetch);
        assert!(local.to_string().contains("connection reset"));
    }
}
