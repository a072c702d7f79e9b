//! The credential state machine.
//!
//! [`Manager`] owns a token parser and a single cached credential, and
//! answers every query from that cache while it is fresh. A credential is
//! fresh for [`TOKEN_TTL`] after installation; the server-side lifetime
//! is about a minute, so 45 seconds leaves headroom against clock skew.
//!
//! When the cache misses — cold start, TTL expiry, explicit
//! [`invalidate`](Manager::invalidate) or
//! [`force_update`](Manager::force_update) — exactly one refresh runs no
//! matter how many callers pile up, coordinated by the single-flight
//! group under the `"token"` key. The refresh worker is detached from its
//! waiters: callers that give up do not abort it, and its result lands in
//! the cache regardless.
//!
//! A failed refresh never evicts a previously cached credential; if that
//! credential is still fresh, later queries keep using it. Eviction is
//! explicit, via `invalidate`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

use super::parser::{slice_skip_at, TokenParser};
use super::singleflight::Group;
use super::TokenSource;
use crate::error::{Error, Result};

/// How long an installed credential stays fresh.
///
/// The server expires tokens after roughly 60 seconds and sends no
/// explicit expiry; 45 seconds keeps headroom against clock skew.
pub const TOKEN_TTL: Duration = Duration::from_secs(45);

/// Authorization scheme name the API expects in place of `Bearer`.
pub const AUTH_SCHEME: &str = "Salter";

/// Single-flight key guarding the refresh; one cache, one key.
const REFRESH_KEY: &str = "token";

/// An immutable snapshot of decoded credentials.
///
/// Created only by the refresh worker and replaced wholesale; the one
/// in-place mutation is `invalidate` flipping `valid`.
#[derive(Clone, Debug)]
struct Credential {
    access: String,
    refresh: String,
    salts: [i32; 5],
    created_at: Instant,
    valid: bool,
}

impl Credential {
    fn is_fresh(&self) -> bool {
        self.valid && self.created_at.elapsed() < TOKEN_TTL
    }
}

/// Manages decoded NEPSE credentials behind a TTL cache.
///
/// Cheap to clone; clones share the same cache and parser.
#[derive(Clone)]
pub struct Manager {
    inner: Arc<Inner>,
}

struct Inner {
    /// Borrowed HTTP collaborator; performs the authenticate request.
    source: Arc<dyn TokenSource>,

    /// Exclusively owned parser. WASM instances are not safe for
    /// concurrent entry; every use goes through the single-flight worker,
    /// so this lock is never contended in practice.
    parser: Mutex<TokenParser>,

    /// The credential cell.
    state: Mutex<Option<Credential>>,

    /// Single-flight registry for refreshes.
    flights: Group<Credential>,

    closed: AtomicBool,
}

impl Manager {
    /// Creates a manager around the given token source.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxInit`](crate::error::ErrorKind::SandboxInit) if
    /// the WASM module cannot be instantiated; such a manager would never
    /// be able to decode a token.
    pub fn new(source: Arc<dyn TokenSource>) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Inner {
                source,
                parser: Mutex::new(TokenParser::new()?),
                state: Mutex::new(None),
                flights: Group::new(),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Returns the decoded access token, fetching a fresh credential if
    /// the cache misses.
    ///
    /// # Errors
    ///
    /// Propagates refresh failures; see [`force_update`](Self::force_update).
    pub async fn access_token(&self) -> Result<String> {
        self.current().await.map(|credential| credential.access)
    }

    /// Returns the decoded refresh token, fetching a fresh credential if
    /// the cache misses.
    ///
    /// # Errors
    ///
    /// Propagates refresh failures.
    pub async fn refresh_token(&self) -> Result<String> {
        self.current().await.map(|credential| credential.refresh)
    }

    /// Returns the salts backing the current credential, fetching one if
    /// none is cached.
    ///
    /// # Errors
    ///
    /// Propagates refresh failures.
    pub async fn salts(&self) -> Result<[i32; 5]> {
        self.current().await.map(|credential| credential.salts)
    }

    /// Returns the full `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Propagates refresh failures.
    pub async fn authorization(&self) -> Result<String> {
        let access = self.access_token().await?;
        Ok(format!("{AUTH_SCHEME} {access}"))
    }

    /// Unconditionally fetches a new credential, replacing the cached one
    /// even if it is still fresh.
    ///
    /// On success, any later query observes credentials strictly newer
    /// than those present before this call.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure. The previously cached credential, if
    /// any, stays available.
    pub async fn force_update(&self) -> Result<()> {
        self.ensure_open()?;
        self.refresh().await.map(drop)
    }

    /// Marks the cached credential stale without any I/O.
    ///
    /// The next query refetches. Safe to call concurrently with queries;
    /// a query that already cloned a fresh snapshot may still return it
    /// once.
    pub fn invalidate(&self) {
        let mut state = self.inner.state.lock().expect("credential cell poisoned");
        if let Some(credential) = state.as_mut() {
            credential.valid = false;
            debug!("credential invalidated");
        }
    }

    /// Returns whether a fresh credential is currently cached.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fresh().is_some()
    }

    /// Releases the token parser and drops the cached credential.
    ///
    /// Further queries fail with
    /// [`Closed`](crate::error::ErrorKind::Closed); closing twice is a
    /// no-op.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner
            .parser
            .lock()
            .expect("parser lock poisoned")
            .close();
        *self.inner.state.lock().expect("credential cell poisoned") = None;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(Error::closed("credential manager is closed"));
        }
        Ok(())
    }

    /// Clones the cached credential if it is still fresh.
    fn fresh(&self) -> Option<Credential> {
        self.inner
            .state
            .lock()
            .expect("credential cell poisoned")
            .as_ref()
            .filter(|credential| credential.is_fresh())
            .cloned()
    }

    async fn current(&self) -> Result<Credential> {
        self.ensure_open()?;
        if let Some(credential) = self.fresh() {
            return Ok(credential);
        }
        self.refresh().await
    }

    /// Runs one refresh through the single-flight section.
    async fn refresh(&self) -> Result<Credential> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .flights
            .run(REFRESH_KEY, move || Inner::refresh_worker(inner))
            .await
            .map_err(|err| Error::from_shared(&err))
    }
}

impl Inner {
    /// The refresh worker: fetch, decode, install.
    ///
    /// Runs detached from its waiters inside the single-flight group.
    async fn refresh_worker(inner: Arc<Self>) -> Result<Credential> {
        let response = inner.source.token().await?;

        if response.access_token.is_empty() {
            return Err(Error::empty_token(
                "authenticate endpoint returned an empty access token",
            ));
        }

        if response.server_time > 0 {
            let local_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(0));
            trace!(
                "server clock skew: {}ms",
                local_ms.saturating_sub(response.server_time)
            );
        }

        let salts = response.salts();
        let indices = {
            let mut parser = inner.parser.lock().expect("parser lock poisoned");
            parser.indices_from_salts(salts)?
        };

        let in_range = |position: &i32| {
            usize::try_from(*position).is_ok_and(|position| position < response.access_token.len())
        };
        if !indices.access.iter().any(in_range) {
            return Err(Error::parse(
                "every derived strip position fell outside the access token",
            ));
        }

        let credential = Credential {
            access: slice_skip_at(&response.access_token, &indices.access),
            refresh: slice_skip_at(&response.refresh_token, &indices.refresh),
            salts,
            created_at: Instant::now(),
            valid: true,
        };

        *inner.state.lock().expect("credential cell poisoned") = Some(credential.clone());
        debug!("installed fresh credential");

        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::auth::TokenResponse;

    /// Counting token source with scriptable per-call behavior.
    struct MockSource {
        calls: AtomicU32,
        delay: Duration,
        behavior: Box<dyn Fn(u32) -> Result<TokenResponse> + Send + Sync>,
    }

    impl MockSource {
        fn new(
            behavior: impl Fn(u32) -> Result<TokenResponse> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Self::with_delay(Duration::ZERO, behavior)
        }

        fn with_delay(
            delay: Duration,
            behavior: impl Fn(u32) -> Result<TokenResponse> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                delay,
                behavior: Box::new(behavior),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenSource for MockSource {
        async fn token(&self) -> Result<TokenResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.behavior)(call)
        }
    }

    fn response() -> TokenResponse {
        // Long enough that every derived strip position lands in range
        // for the reference salts.
        TokenResponse {
            access_token: "0123456789".repeat(13),
            refresh_token: "9876543210".repeat(13),
            server_time: 1_721_900_000_000,
            salt1: 1234,
            salt2: 5678,
            salt3: 9012,
            salt4: 3456,
            salt5: 7890,
        }
    }

    #[tokio::test]
    async fn caches_within_ttl() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let first = manager.access_token().await.expect("first query failed");
        assert!(!first.is_empty());
        assert_eq!(source.calls(), 1);

        let second = manager.access_token().await.expect("second query failed");
        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);

        manager.close();
    }

    #[tokio::test]
    async fn decodes_by_stripping_derived_positions() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source).expect("manager init failed");

        let access = manager.access_token().await.expect("query failed");
        let raw = response();
        // Five distinct in-range positions for these salts: five
        // characters gone from each token.
        assert_eq!(access.len(), raw.access_token.len() - 5);

        let refresh = manager.refresh_token().await.expect("query failed");
        assert_eq!(refresh.len(), raw.refresh_token.len() - 5);
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_after_ttl_expiry() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source.clone()).expect("manager init failed");

        manager.access_token().await.expect("first query failed");
        assert_eq!(source.calls(), 1);

        tokio::time::advance(TOKEN_TTL + Duration::from_secs(1)).await;
        assert!(!manager.is_valid());

        manager.access_token().await.expect("second query failed");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_cold_queries_fetch_once() {
        let source = MockSource::with_delay(Duration::from_millis(50), |_| Ok(response()));
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let mut handles = Vec::new();
        for _ in 0..50 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move { manager.access_token().await }));
        }

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.expect("join failed").expect("query failed"));
        }

        assert!(tokens.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn force_update_always_fetches() {
        let source = MockSource::new(|call| {
            let mut response = response();
            response.access_token = format!("{call:02}{}", "0123456789".repeat(13));
            #[expect(clippy::cast_possible_wrap)]
            let offset = call as i32 * 100;
            response.salt1 += offset;
            response.salt2 += offset;
            Ok(response)
        });
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let first = manager.access_token().await.expect("first query failed");
        assert_eq!(source.calls(), 1);

        manager.force_update().await.expect("force update failed");
        assert_eq!(source.calls(), 2);

        let second = manager.access_token().await.expect("second query failed");
        assert_eq!(source.calls(), 2, "fresh forced credential must be cached");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn invalidate_marks_stale_and_triggers_refetch() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source.clone()).expect("manager init failed");

        manager.access_token().await.expect("first query failed");
        assert!(manager.is_valid());

        manager.invalidate();
        assert!(!manager.is_valid());

        manager.access_token().await.expect("second query failed");
        assert_eq!(source.calls(), 2);
        assert!(manager.is_valid());
    }

    #[tokio::test]
    async fn http_failure_propagates_with_cause() {
        let source = MockSource::new(|_| Err(Error::http_fetch("network failure")));
        let manager = Manager::new(source).expect("manager init failed");

        let err = manager
            .access_token()
            .await
            .expect_err("expected propagation");
        assert_eq!(err.kind, ErrorKind::HttpFetch);
        assert!(err.to_string().contains("network failure"));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_credential() {
        let source = MockSource::new(|call| {
            if call == 1 {
                Ok(response())
            } else {
                Err(Error::http_fetch("connection reset"))
            }
        });
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let first = manager.access_token().await.expect("first query failed");

        let err = manager
            .force_update()
            .await
            .expect_err("expected forced refresh to fail");
        assert_eq!(err.kind, ErrorKind::HttpFetch);

        // The old credential is still fresh and still served.
        let second = manager.access_token().await.expect("cached query failed");
        assert_eq!(first, second);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn empty_access_token_is_rejected_and_not_cached() {
        let source = MockSource::new(|_| {
            let mut response = response();
            response.access_token = String::new();
            Ok(response)
        });
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let err = manager.access_token().await.expect_err("expected rejection");
        assert_eq!(err.kind, ErrorKind::EmptyToken);
        assert!(!manager.is_valid());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_waiter_leaves_refresh_running() {
        let source = MockSource::with_delay(Duration::from_millis(100), |_| Ok(response()));
        let manager = Manager::new(source.clone()).expect("manager init failed");

        let waiter = tokio::spawn({
            let manager = manager.clone();
            async move { manager.access_token().await }
        });
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        waiter.abort();
        let join = waiter.await;
        assert!(join.is_err_and(|err| err.is_cancelled()));

        // The detached worker still completes and installs the credential.
        let token = manager.access_token().await.expect("query failed");
        assert!(!token.is_empty());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn authorization_header_uses_salter_scheme() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source).expect("manager init failed");

        let header = manager.authorization().await.expect("query failed");
        let access = manager.access_token().await.expect("query failed");
        assert_eq!(header, format!("Salter {access}"));
    }

    #[tokio::test]
    async fn zero_server_time_is_accepted() {
        let source = MockSource::new(|_| {
            let mut response = response();
            response.server_time = 0;
            Ok(response)
        });
        let manager = Manager::new(source).expect("manager init failed");

        let token = manager.access_token().await.expect("query failed");
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn salts_reflect_latest_response() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source).expect("manager init failed");

        assert_eq!(
            manager.salts().await.expect("query failed"),
            [1234, 5678, 9012, 3456, 7890],
        );
    }

    #[tokio::test]
    async fn close_is_idempotent_and_fails_later_queries() {
        let source = MockSource::new(|_| Ok(response()));
        let manager = Manager::new(source).expect("manager init failed");

        manager.access_token().await.expect("query failed");
        manager.close();
        manager.close();

        let err = manager.access_token().await.expect_err("expected closure");
        assert_eq!(err.kind, ErrorKind::Closed);
        assert!(!manager.is_valid());
    }
}
