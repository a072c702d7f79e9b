//! Token endpoint response types.
//!
//! The `/api/authenticate/prove` endpoint returns the raw material for a
//! credential: an access/refresh token pair whose usable form only emerges
//! after stripping characters at salt-derived positions, the five salts
//! themselves, and the server's clock reading.
//!
//! # Example response
//!
//! ```json
//! {
//!     "serverTime": 1721900000000,
//!     "accessToken": "raw_access_token",
//!     "refreshToken": "raw_refresh_token",
//!     "tokenType": "",
//!     "salt1": 12345,
//!     "salt2": 23456,
//!     "salt3": 34567,
//!     "salt4": 45678,
//!     "salt5": 56789
//! }
//! ```
//!
//! Both tokens are secrets; debug output redacts them.

use serde::Deserialize;
use veil::Redact;

/// Raw response of the token endpoint.
///
/// The tokens here are *not* usable as credentials: five characters must
/// be stripped from each at positions derived from the salts before the
/// `Authorization` header can be built.
#[derive(Clone, Deserialize, Redact)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Raw access token, still carrying its junk characters.
    #[redact]
    pub access_token: String,

    /// Raw refresh token, still carrying its junk characters.
    #[redact]
    #[serde(default)]
    pub refresh_token: String,

    /// Server clock in epoch milliseconds; `0` means the server did not
    /// report one and the local clock applies.
    #[serde(default)]
    pub server_time: i64,

    /// First obfuscation salt.
    pub salt1: i32,
    /// Second obfuscation salt.
    pub salt2: i32,
    /// Third obfuscation salt.
    pub salt3: i32,
    /// Fourth obfuscation salt.
    pub salt4: i32,
    /// Fifth obfuscation salt.
    pub salt5: i32,
}

impl TokenResponse {
    /// Returns the five salts in wire order.
    #[must_use]
    pub fn salts(&self) -> [i32; 5] {
        [self.salt1, self.salt2, self.salt3, self.salt4, self.salt5]
    }
}
