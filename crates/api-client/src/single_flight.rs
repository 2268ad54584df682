//! Single-flight coordination
//!
//! Concurrent callers asking for the same key share one in-flight future
//! instead of each starting their own. The entry is dropped as soon as that
//! future settles, so the next caller after completion starts fresh.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Call<T> {
    id: u64,
    future: Shared<BoxFuture<'static, T>>,
}

struct State<K, T> {
    next_id: u64,
    calls: HashMap<K, Call<T>>,
}

/// Start-or-join coordinator keyed by `K`, yielding a cloneable `T`
pub struct SingleFlight<K, T> {
    state: Arc<Mutex<State<K, T>>>,
}

impl<K, T> Default for SingleFlight<K, T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 0,
                calls: HashMap::new(),
            })),
        }
    }
}

impl<K, T> std::fmt::Debug for SingleFlight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &lock(&self.state).calls.len())
            .finish()
    }
}

fn lock<K, T>(state: &Mutex<State<K, T>>) -> MutexGuard<'_, State<K, T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty coordinator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `start` for `key` unless a call for `key` is already in flight,
    /// in which case wait for that call instead. `start` is only invoked by
    /// the caller that opens a new flight.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let future = {
            let mut state = lock(&self.state);
            if let Some(call) = state.calls.get(&key) {
                call.future.clone()
            } else {
                let id = state.next_id;
                state.next_id += 1;

                let shared_state = Arc::clone(&self.state);
                let cleanup_key = key.clone();
                let work = start();
                let future = async move {
                    let output = work.await;
                    let mut state = lock(&shared_state);
                    if state.calls.get(&cleanup_key).is_some_and(|c| c.id == id) {
                        state.calls.remove(&cleanup_key);
                    }
                    output
                }
                .boxed()
                .shared();

                state.calls.insert(
                    key,
                    Call {
                        id,
                        future: future.clone(),
                    },
                );
                future
            }
        };

        future.await
    }

    /// Whether a call for `key` is currently in flight
    pub fn is_in_flight(&self, key: &K) -> bool {
        lock(&self.state).calls.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_call() {
        let flight = Arc::new(SingleFlight::<&'static str, bool>::new());
        let starts = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let flight = Arc::clone(&flight);
                let starts = Arc::clone(&starts);
                tokio::spawn(async move {
                    flight
                        .run("refresh", move || {
                            starts.fetch_add(1, Ordering::SeqCst);
                            async {
                                tokio::time::sleep(Duration::from_millis(50)).await;
                                true
                            }
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert!(!flight.is_in_flight(&"refresh"));
    }

    #[tokio::test]
    async fn test_settled_call_is_not_reused() {
        let flight = SingleFlight::<u8, usize>::new();

        let first = flight.run(1, || async { 10 }).await;
        assert!(!flight.is_in_flight(&1));
        let second = flight.run(1, || async { 20 }).await;

        assert_eq!((first, second), (10, 20));
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let flight = SingleFlight::<&'static str, &'static str>::new();
        let (a, b) = tokio::join!(
            flight.run("a", || async { "left" }),
            flight.run("b", || async { "right" })
        );
        assert_eq!((a, b), ("left", "right"));
    }
}
