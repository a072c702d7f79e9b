//! The public NEPSE API client.
//!
//! [`Client`] wires the transport, the credential manager, and the
//! endpoint wrappers together. Endpoint wrappers live in the submodules
//! and are all thin: build a URL from the [`Endpoints`](crate::config::Endpoints)
//! table, attach the `Authorization: Salter …` header from the auth
//! manager, parse the JSON body.
//!
//! The client never retries. A `401` invalidates the cached credential so
//! the *next* call starts from a fresh token exchange, but the failing
//! call itself reports the error.

mod company;
mod graphs;
mod market;

pub use graphs::IndexKind;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::{self, TokenSource};
use crate::config::Config;
use crate::error::Result;
use crate::http;
use crate::protocol::{self, auth::TokenResponse};

/// Asynchronous client for NEPSE market data.
///
/// Construction instantiates the WASM sandbox once; cloning is not
/// supported — share a client behind an `Arc` instead.
pub struct Client {
    http: Arc<http::Client>,
    auth: auth::Manager,
    config: Config,
}

/// Token source backed by the live authenticate endpoint.
struct AuthenticateEndpoint {
    http: Arc<http::Client>,
    url: Url,
}

#[async_trait]
impl TokenSource for AuthenticateEndpoint {
    async fn token(&self) -> Result<TokenResponse> {
        debug!("fetching token material from {}", self.url.path());
        let request = self.http.get(self.url.clone(), "");
        let response = self.http.execute(request).await?;
        let body = response.text().await?;
        protocol::json(&body, self.url.path())
    }
}

impl Client {
    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the token
    /// endpoint URL is invalid, or the WASM sandbox fails to instantiate.
    pub fn new(config: Config) -> Result<Self> {
        let http = Arc::new(http::Client::new(&config)?);
        let url = config.base_url.join(config.endpoints.authenticate)?;
        let auth = auth::Manager::new(Arc::new(AuthenticateEndpoint {
            http: Arc::clone(&http),
            url,
        }))?;

        Ok(Self { http, auth, config })
    }

    /// Returns the credential manager, e.g. to force a token refresh.
    #[must_use]
    pub fn auth(&self) -> &auth::Manager {
        &self.auth
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the credential manager and its WASM sandbox.
    ///
    /// Further requests fail; closing twice is a no-op.
    pub fn close(&self) {
        self.auth.close();
    }

    /// Fetches an endpoint's raw body without deserialization.
    ///
    /// Debugging aid for inspecting responses the typed wrappers do not
    /// cover (or do not cover yet).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn raw(&self, path: &str) -> Result<String> {
        let url = self.endpoint_url(path)?;
        let mut request = self.http.get(url, "");
        self.authorize(&mut request).await?;

        let response = self.http.execute(request).await?;
        let response = self.check_status(response)?;
        response.text().await.map_err(Into::into)
    }

    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.config.base_url.join(path).map_err(Into::into)
    }

    pub(crate) fn item_url(&self, path: &str, id: i32) -> Result<Url> {
        self.endpoint_url(&format!("{path}/{id}"))
    }

    /// Performs an authenticated GET and parses the JSON body.
    pub(crate) async fn api_get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned + Debug,
    {
        let mut request = self.http.get(url, "");
        self.authorize(&mut request).await?;
        self.dispatch(request).await
    }

    /// Performs an authenticated POST with a JSON body and parses the
    /// response.
    pub(crate) async fn api_post<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Debug,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.post(url, serde_json::to_string(body)?);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.authorize(&mut request).await?;
        self.dispatch(request).await
    }

    /// Attaches the `Authorization: Salter …` header.
    async fn authorize(&self, request: &mut reqwest::Request) -> Result<()> {
        let header = HeaderValue::from_str(&self.auth.authorization().await?)?;
        request.headers_mut().insert(AUTHORIZATION, header);
        Ok(())
    }

    async fn dispatch<T>(&self, request: reqwest::Request) -> Result<T>
    where
        T: DeserializeOwned + Debug,
    {
        let origin = request.url().path().to_owned();
        let response = self.http.execute(request).await?;
        let response = self.check_status(response)?;
        let body = response.text().await?;
        protocol::json(&body, &origin)
    }

    /// Turns non-success statuses into errors.
    ///
    /// A `401` additionally invalidates the cached credential so the next
    /// call re-authenticates; the failing call is not retried.
    fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!("server rejected credential, invalidating cache");
            self.auth.invalidate();
        }
        response.error_for_status().map_err(Into::into)
    }
}
