//! A type-safe client for NEPSE (Nepal Stock Exchange) market data.
//!
//! The exchange's public API guards itself with a reverse-engineered
//! authorization scheme: the token endpoint hands out an access/refresh
//! token pair together with five integer salts, and the usable credential
//! only emerges after running the salts through a server-shipped
//! WebAssembly module and deleting five characters from each token at the
//! derived positions. Graph POST endpoints additionally want an obfuscated
//! integer `id` computed from the salts, a server ordinal, and the current
//! day in Kathmandu.
//!
//! This crate wraps all of that behind an ordinary async client:
//!
//! * [`auth`] — the credential state machine: WASM sandbox, token parser,
//!   TTL cache and single-flight refresh.
//! * [`payload`] — the obfuscated payload-ID arithmetic for graph POSTs.
//! * [`client`] — the public [`Client`](client::Client) with market,
//!   company and graph endpoint wrappers.
//! * [`http`] — the rate-limited HTTP transport.
//! * [`protocol`] — wire types for the API's JSON bodies.
//!
//! # Example
//!
//! ```no_run
//! use salter::{client::Client, config::Config, error::Result};
//!
//! # async fn run() -> Result<()> {
//! let client = Client::new(Config::default())?;
//! let summary = client.market_summary().await?;
//! println!("turnover: Rs. {:.2}", summary.total_turnover);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]

#[macro_use]
extern crate log;

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod payload;
pub mod protocol;
