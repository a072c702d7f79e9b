//! Keyed single-flight execution.
//!
//! Concurrent callers asking for the same key share one execution of the
//! underlying work: the first caller becomes the leader and spawns the
//! work as a detached task, everyone else subscribes to its result. The
//! detachment matters — a waiter that gives up and drops its future must
//! not abort the work, because other waiters (and the cache the work
//! feeds) still want the result.
//!
//! Results fan out over a broadcast channel, so the value must be `Clone`.
//! Errors are shared behind an `Arc` since the boxed cause is not.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::error::{Error, Result};

/// Result type observed by every waiter of a flight.
pub type SharedResult<T> = std::result::Result<T, Arc<Error>>;

/// A group of keyed in-flight operations.
pub struct Group<T> {
    flights: Arc<Mutex<HashMap<String, broadcast::Sender<SharedResult<T>>>>>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Group<T> {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> Group<T>
where
    T: Clone + Send + 'static,
{
    /// Runs `work` under `key`, or joins the execution already in flight.
    ///
    /// Exactly one execution of `work` happens per key at a time,
    /// regardless of caller fan-out. The work runs on a detached task and
    /// completes even if every waiter drops out; its result is delivered
    /// to all waiters that were subscribed when it finished.
    ///
    /// The key is retired before the result is published, so a caller
    /// arriving after completion starts a fresh flight rather than
    /// observing a stale one.
    ///
    /// # Errors
    ///
    /// Returns the work's error (shared across waiters), or
    /// [`Cancelled`](crate::error::ErrorKind::Cancelled) if the flight
    /// died without publishing a result.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> SharedResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut receiver = {
            let mut flights = self.flights.lock().expect("flight registry poisoned");

            if let Some(sender) = flights.get(key) {
                sender.subscribe()
            } else {
                let (sender, receiver) = broadcast::channel(1);
                flights.insert(key.to_owned(), sender.clone());

                let registry = Arc::clone(&self.flights);
                let key = key.to_owned();
                let future = work();
                tokio::spawn(async move {
                    let result = future.await.map_err(Arc::new);
                    registry
                        .lock()
                        .expect("flight registry poisoned")
                        .remove(&key);
                    // Waiters may all be gone; that is fine.
                    let _ = sender.send(result);
                });

                receiver
            }
        };

        match receiver.recv().await {
            Ok(result) => result,
            Err(_) => Err(Arc::new(Error::cancelled("in-flight operation abandoned"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_execution() {
        let group = Arc::new(Group::<u32>::new());
        let executions = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let group = Arc::clone(&group);
            let executions = Arc::clone(&executions);
            handles.push(tokio::spawn(async move {
                group
                    .run("token", move || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(executions.fetch_add(1, Ordering::SeqCst) + 1)
                    })
                    .await
            }));
        }

        for handle in handles {
            let value = handle.await.expect("join failed").expect("run failed");
            assert_eq!(value, 1);
        }
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_calls_execute_separately() {
        let group = Group::<u32>::new();
        let executions = Arc::new(AtomicU32::new(0));

        for round in 1..=3 {
            let executions = Arc::clone(&executions);
            let value = group
                .run("token", move || async move {
                    Ok(executions.fetch_add(1, Ordering::SeqCst) + 1)
                })
                .await
                .expect("run failed");
            assert_eq!(value, round);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn error_is_shared_across_waiters() {
        let group = Arc::new(Group::<u32>::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let group = Arc::clone(&group);
            handles.push(tokio::spawn(async move {
                group
                    .run("token", || async {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Err(Error::http_fetch("connection reset"))
                    })
                    .await
            }));
        }

        for handle in handles {
            let err = handle
                .await
                .expect("join failed")
                .expect_err("expected shared failure");
            assert_eq!(err.kind, crate::error::ErrorKind::HttpFetch);
        }
    }

    #[tokio::test]
    async fn distinct_keys_run_independently() {
        let group = Group::<&'static str>::new();

        let first = group.run("a", || async { Ok("a") }).await.expect("run failed");
        let second = group.run("b", || async { Ok("b") }).await.expect("run failed");
        assert_eq!((first, second), ("a", "b"));
    }
}
