use crate::auth::Gate;
use crate::auth::Principal;
use crate::auth::StaticGate;
use crate::batch::BatchLoaderRegistry;
use crate::execution::ErrorPool;
use crate::execution::RateLimiter;
use crate::store::DataStore;
use std::sync::Arc;
use std::sync::Mutex;

/// Per-request state handed to every resolver of one operation.
///
/// The batch loaders and the error pool live and die with the request;
/// the store, gate and rate limiter are shared with other requests.
pub struct RequestContext {
    authenticated: Mutex<Option<Principal>>,
    batch_loaders: BatchLoaderRegistry,
    default_guards: Vec<String>,
    error_pool: ErrorPool,
    gate: Arc<dyn Gate>,
    rate_limiter: Arc<RateLimiter>,
    store: Arc<dyn DataStore>,
    values: serde_json::Map<String, serde_json::Value>,
}
impl RequestContext {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            authenticated: Mutex::new(None),
            batch_loaders: BatchLoaderRegistry::new(),
            default_guards: vec!["api".to_string()],
            error_pool: ErrorPool::new(),
            gate: Arc::new(StaticGate::new()),
            rate_limiter: Arc::new(RateLimiter::new()),
            store,
            values: serde_json::Map::new(),
        }
    }

    pub fn with_default_guards(mut self, guards: Vec<String>) -> Self {
        self.default_guards = guards;
        self
    }

    pub fn with_gate(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Adds a value readable through [`RequestContext::context_value()`].
    pub fn with_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn batch_loaders(&self) -> &BatchLoaderRegistry {
        &self.batch_loaders
    }

    /// Reads a dotted path such as `user.id`. The `user` root is the
    /// current user; other roots are the values added with
    /// [`RequestContext::with_value()`].
    pub fn context_value(&self, path: &str) -> Option<serde_json::Value> {
        let mut segments = path.split('.');
        let root = match segments.next()? {
            "user" => self.user()?.to_json(),
            name => self.values.get(name)?.clone(),
        };
        segments.try_fold(root, |value, segment| match value {
            serde_json::Value::Object(mut fields) => fields.remove(segment),
            serde_json::Value::Array(mut items) => {
                let idx: usize = segment.parse().ok()?;
                (idx < items.len()).then(|| items.swap_remove(idx))
            },
            _ => None,
        })
    }

    pub fn error_pool(&self) -> &ErrorPool {
        &self.error_pool
    }

    pub fn gate(&self) -> &dyn Gate {
        self.gate.as_ref()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Records the user a guard authenticated, making it the request's
    /// current user.
    pub fn set_user(&self, user: Principal) {
        if let Ok(mut authenticated) = self.authenticated.lock() {
            *authenticated = Some(user);
        }
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// The user authenticated by a guard during this request, or else the
    /// user of the first default guard that has one.
    pub fn user(&self) -> Option<Principal> {
        let authenticated = self.authenticated.lock().ok()
            .and_then(|user| user.clone());
        authenticated.or_else(|| {
            self.default_guards.iter()
                .find_map(|guard| self.gate.current_user(guard))
        })
    }
}
impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("default_guards", &self.default_guards)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
