//! Credential management for the NEPSE authorization scheme.
//!
//! A usable `Authorization` header cannot be taken from the wire: the
//! authenticate endpoint returns token material plus five salts, and the
//! real credential emerges only after deriving strip positions through a
//! server-shipped WASM module and deleting those characters from each
//! token.
//!
//! The pieces, leaves first:
//!
//! * [`sandbox`] — instantiates the bundled WASM module and exposes its
//!   five derivation functions.
//! * [`parser`] — turns salts into strip positions and performs the
//!   character removal.
//! * [`singleflight`] — keyed deduplication of concurrent refreshes.
//! * [`manager`] — the credential state machine: fetch, decode, cache
//!   with a 45-second TTL, refresh under single-flight, invalidate.
//!
//! The HTTP side is injected through [`TokenSource`], keeping transport
//! concerns (cookies, TLS, retries) out of the credential logic and
//! making the state machine testable against a mock.

pub mod manager;
pub mod parser;
pub mod sandbox;
pub mod singleflight;

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::auth::TokenResponse;

pub use manager::Manager;
pub use parser::{slice_skip_at, TokenIndices, TokenParser};

/// Source of raw token responses.
///
/// Implemented by the HTTP layer against the live authenticate endpoint;
/// tests substitute a mock. Implementations own all transport concerns,
/// including any retry policy — the manager itself never retries.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetches a raw token response from the server.
    ///
    /// # Errors
    ///
    /// Returns [`HttpFetch`](crate::error::ErrorKind::HttpFetch) if the
    /// transport fails, or a parse error for a malformed body.
    async fn token(&self) -> Result<TokenResponse>;
}
