use crate::batch::BatchLoader;
use crate::resolve::ResolveError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

/// Identifies a loader within one request.
///
/// `path` is the response path without list indices, so every item of a
/// list shares a loader, and `arguments` carries whatever changes the
/// query (scopes, filters).
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct BatchKey {
    pub arguments: String,
    pub name: String,
    pub path: String,
}
impl BatchKey {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        arguments: &serde_json::Value,
    ) -> Self {
        Self {
            arguments: arguments.to_string(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The loaders of one request, created on first use.
#[derive(Debug, Default)]
pub struct BatchLoaderRegistry {
    loaders: Mutex<HashMap<BatchKey, Arc<BatchLoader>>>,
}
impl BatchLoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The loader registered under `key`, built with `factory` the first
    /// time the key is seen.
    pub fn instance<F>(&self, key: BatchKey, factory: F) -> Result<Arc<BatchLoader>, ResolveError>
    where
        F: FnOnce() -> BatchLoader,
    {
        let mut loaders = self.loaders.lock()
            .map_err(|_| ResolveError::internal("batch loader registry lock poisoned"))?;
        Ok(loaders.entry(key).or_insert_with(|| Arc::new(factory())).clone())
    }

    pub fn len(&self) -> usize {
        self.loaders.lock().map(|loaders| loaders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
