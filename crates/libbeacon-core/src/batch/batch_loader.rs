use crate::resolve::ResolveError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

type Result<T> = std::result::Result<T, ResolveError>;

/// How many times a load yields before dispatching. Each yield gives every
/// sibling resolution running in the same sweep a chance to enqueue its
/// own key first.
const SWEEP_YIELDS: usize = 3;

/// Loads many keys with one round-trip.
#[async_trait::async_trait]
pub trait BatchLoad: Send + Sync {
    /// Returns the value for each key, keyed by [`key_id()`]. Keys missing
    /// from the map resolve to `null`.
    async fn load(&self, keys: &[serde_json::Value]) -> Result<HashMap<String, serde_json::Value>>;
}

/// The identity of a key: `1` and `"1"` are the same key.
pub fn key_id(key: &serde_json::Value) -> String {
    match key {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Default)]
struct LoaderState {
    dispatches: usize,
    pending: IndexMap<String, serde_json::Value>,
    results: HashMap<String, Result<serde_json::Value>>,
}

/// Coalesces the loads issued during one resolution sweep into a single
/// [`BatchLoad::load()`] call and caches every result for the rest of the
/// request.
///
/// No call is made for a loader nobody awaits.
pub struct BatchLoader {
    loader: Box<dyn BatchLoad>,
    state: futures::lock::Mutex<LoaderState>,
}
impl BatchLoader {
    pub fn new(loader: impl BatchLoad + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            state: futures::lock::Mutex::new(LoaderState::default()),
        }
    }

    /// Number of batches sent to the underlying [`BatchLoad`] so far.
    pub async fn dispatch_count(&self) -> usize {
        self.state.lock().await.dispatches
    }

    pub async fn load(&self, key: serde_json::Value) -> Result<serde_json::Value> {
        let id = key_id(&key);
        {
            let mut state = self.state.lock().await;
            if let Some(result) = state.results.get(&id) {
                return result.clone();
            }
            state.pending.entry(id.clone()).or_insert(key);
        }

        for _ in 0..SWEEP_YIELDS {
            YieldNow::default().await;
        }

        let mut state = self.state.lock().await;
        if !state.results.contains_key(&id) {
            self.dispatch(&mut state).await;
        }
        state.results.get(&id)
            .cloned()
            .unwrap_or(Ok(serde_json::Value::Null))
    }

    async fn dispatch(&self, state: &mut LoaderState) {
        let pending = std::mem::take(&mut state.pending);
        let keys: Vec<serde_json::Value> = pending.values().cloned().collect();
        state.dispatches += 1;
        tracing::debug!("Dispatching batch #{} with {} key(s)", state.dispatches, keys.len());

        match self.loader.load(&keys).await {
            Ok(mut values) => {
                for id in pending.into_keys() {
                    let value = values.remove(&id).unwrap_or(serde_json::Value::Null);
                    state.results.insert(id, Ok(value));
                }
            },
            Err(err) => {
                for id in pending.into_keys() {
                    state.results.insert(id, Err(err.clone()));
                }
            },
        }
    }
}
impl std::fmt::Debug for BatchLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader").finish_non_exhaustive()
    }
}

/// Returns `Pending` once after waking itself, so the executor moves on to
/// the other futures of the current sweep before coming back.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}
impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
