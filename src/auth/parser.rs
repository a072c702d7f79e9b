//! Token decoding: salt-derived strip positions and character removal.
//!
//! The raw tokens from the authenticate endpoint carry five junk
//! characters each. Their positions are not published; they come out of
//! the bundled WASM module (see [`Sandbox`](super::sandbox::Sandbox)),
//! which is called once per export and salt ordering. The module is
//! authoritative: the argument orderings below were captured from a live
//! token exchange and must not be rearranged without re-verifying against
//! one.
//!
//! Decoding itself is [`slice_skip_at`]: delete the byte at every derived
//! position, keep the rest in order. Positions outside the token are
//! ignored, which also absorbs the occasional nonsense index the module
//! produces for exotic salt values.

use super::sandbox::Sandbox;
use crate::error::Result;

/// Strip positions for one token pair.
///
/// Each array holds one position per module export, in call order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenIndices {
    /// Byte positions to remove from the access token.
    pub access: [i32; 5],

    /// Byte positions to remove from the refresh token.
    pub refresh: [i32; 5],
}

/// Derives strip positions from salts via the sandboxed module.
///
/// Thin facade over [`Sandbox`]: owns the instance, fixes the call order
/// and salt orderings, and hands back both position tuples.
pub struct TokenParser {
    sandbox: Sandbox,
}

impl TokenParser {
    /// Instantiates the sandbox for this parser.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxInit`](crate::error::ErrorKind::SandboxInit) if
    /// the module cannot be instantiated.
    pub fn new() -> Result<Self> {
        Ok(Self {
            sandbox: Sandbox::new()?,
        })
    }

    /// Computes access and refresh strip positions for the given salts.
    ///
    /// Calls `cdx`, `rdx`, `bdx`, `ndx`, `mdx` in this exact order, once
    /// per token, with the salt orderings the server's web client uses.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxCall`](crate::error::ErrorKind::SandboxCall) if
    /// any module call fails.
    pub fn indices_from_salts(&mut self, salts: [i32; 5]) -> Result<TokenIndices> {
        let [s1, s2, s3, s4, s5] = salts;

        let access = [
            self.sandbox.call("cdx", s1, s2, s3, s4, s5)?,
            self.sandbox.call("rdx", s1, s2, s4, s3, s5)?,
            self.sandbox.call("bdx", s1, s2, s4, s3, s5)?,
            self.sandbox.call("ndx", s1, s2, s4, s3, s5)?,
            self.sandbox.call("mdx", s1, s2, s4, s3, s5)?,
        ];

        let refresh = [
            self.sandbox.call("cdx", s2, s1, s3, s5, s4)?,
            self.sandbox.call("rdx", s2, s1, s3, s4, s5)?,
            self.sandbox.call("bdx", s2, s1, s4, s3, s5)?,
            self.sandbox.call("ndx", s2, s1, s4, s3, s5)?,
            self.sandbox.call("mdx", s2, s1, s4, s3, s5)?,
        ];

        Ok(TokenIndices { access, refresh })
    }

    /// Releases the sandbox. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.sandbox.close();
    }
}

/// Returns `s` with the bytes at the given positions deleted.
///
/// Positions are zero-based byte indices into `s`. Out-of-range positions
/// (including negative ones) are silently ignored, duplicates count once,
/// and surviving bytes keep their original order. The input slice is not
/// mutated.
///
/// Tokens are ASCII, so byte positions and character positions coincide;
/// should a position ever split a multi-byte sequence, the damaged
/// sequence is replaced rather than panicking.
#[must_use]
pub fn slice_skip_at(s: &str, positions: &[i32]) -> String {
    let kept: Vec<u8> = s
        .bytes()
        .enumerate()
        .filter(|&(index, _)| {
            !positions
                .iter()
                .any(|&position| usize::try_from(position) == Ok(index))
        })
        .map(|(_, byte)| byte)
        .collect();

    String::from_utf8_lossy(&kept).into_owned()
}
