//! HTTP transport with rate limiting for the NEPSE API.
//!
//! This module provides a wrapper around `reqwest::Client` that adds:
//! * Browser-like default headers (the API refuses bare clients)
//! * A cookie jar for the session cookies the load balancer hands out
//! * Optional TLS verification bypass for the exchange's broken chains
//! * Request rate limiting so the client cannot hammer the exchange
//!
//! # Rate limiting
//!
//! The exchange publishes no quota, but aggressive polling gets source IPs
//! blocked. The client self-limits to 30 calls per 5-second window and
//! allows bursts up to the full window.

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    self,
    header::{HeaderValue, ACCEPT, REFERER},
    Body, Method, Url,
};

use crate::{config::Config, error::Result};

/// HTTP client with cookie management and rate limiting.
pub struct Client {
    /// Unlimited request client for special cases.
    ///
    /// Direct access to the underlying client without rate limiting.
    pub unlimited: reqwest::Client,

    /// Rate limiter protecting the exchange from this client.
    rate_limiter: DefaultDirectRateLimiter,

    /// Cookie store; the API sets load-balancer affinity cookies that must
    /// round-trip on subsequent requests.
    pub cookie_jar: Arc<reqwest::cookie::Jar>,
}

impl Client {
    /// Rolling window for the self-imposed rate limit.
    const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(5);

    /// Maximum calls per window.
    const RATE_LIMIT_CALLS_PER_INTERVAL: u8 = 30;

    /// Duration to keep idle connections alive.
    ///
    /// Prevents frequent reconnection overhead for subsequent requests.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Duration to wait for individual network reads.
    ///
    /// The exchange gets slow around market open; ten seconds keeps
    /// recovery from stalled connections bounded without tripping on
    /// ordinary latency.
    const READ_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if rate limit parameters are zero.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // The API checks the referer against its own web frontend.
        if let Ok(referer) = HeaderValue::from_str(config.base_url.as_str()) {
            headers.insert(REFERER, referer);
        }

        let cookie_jar = Arc::new(reqwest::cookie::Jar::default());

        let http_client = reqwest::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .read_timeout(Self::READ_TIMEOUT)
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .cookie_provider(Arc::clone(&cookie_jar))
            .danger_accept_invalid_certs(!config.tls_verification);

        // Rate limit own requests as to not DoS the NEPSE infrastructure.
        let replenish_interval =
            Self::RATE_LIMIT_INTERVAL / u32::from(Self::RATE_LIMIT_CALLS_PER_INTERVAL);
        let quota = Quota::with_period(replenish_interval)
            .expect("quota time interval is zero")
            .allow_burst(
                NonZeroU32::new(Self::RATE_LIMIT_CALLS_PER_INTERVAL.into())
                    .expect("calls per interval is zero"),
            );

        Ok(Self {
            unlimited: http_client.build()?,
            rate_limiter: governor::RateLimiter::direct(quota),
            cookie_jar,
        })
    }

    /// Builds a request with specified method, URL and body.
    ///
    /// Creates a raw request that can be executed with
    /// [`execute()`](Self::execute).
    #[inline]
    pub fn request<U, T>(&self, method: Method, url: U, body: T) -> reqwest::Request
    where
        U: Into<Url>,
        T: Into<Body>,
    {
        let mut request = reqwest::Request::new(method, url.into());
        let body_mut = request.body_mut();
        *body_mut = Some(body.into());

        request
    }

    /// Builds a POST request.
    #[inline]
    pub fn post<U, T>(&self, url: U, body: T) -> reqwest::Request
    where
        U: Into<Url>,
        T: Into<Body>,
    {
        self.request(Method::POST, url, body)
    }

    /// Builds a GET request.
    #[inline]
    pub fn get<U, T>(&self, url: U, body: T) -> reqwest::Request
    where
        U: Into<Url>,
        T: Into<Body>,
    {
        self.request(Method::GET, url, body)
    }

    /// Executes a request with rate limiting.
    ///
    /// Waits until the limiter admits the request, then performs it.
    ///
    /// # Errors
    ///
    /// Returns an error if request execution fails or a network error
    /// occurs.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        // No need to await with jitter because the level of concurrency is
        // low.
        self.rate_limiter.until_ready().await;
        self.unlimited.execute(request).await.map_err(Into::into)
    }
}
