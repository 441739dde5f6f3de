use crate::batch::key_id;
use crate::batch::BatchKey;
use crate::batch::BatchLoad;
use crate::batch::BatchLoader;
use crate::batch::BatchLoaderRegistry;
use crate::resolve::ResolveError;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

type Result<T> = std::result::Result<T, ResolveError>;

/// Doubles every numeric key and records the batches it was asked for.
#[derive(Clone, Default)]
struct Doubler {
    batches: Arc<Mutex<Vec<Vec<serde_json::Value>>>>,
}
#[async_trait::async_trait]
impl BatchLoad for Doubler {
    async fn load(&self, keys: &[serde_json::Value]) -> Result<HashMap<String, serde_json::Value>> {
        self.batches.lock().unwrap().push(keys.to_vec());
        Ok(keys.iter()
            .filter_map(|key| key.as_i64().map(|n| (key_id(key), json!(n * 2))))
            .collect())
    }
}

struct Failing;
#[async_trait::async_trait]
impl BatchLoad for Failing {
    async fn load(&self, _keys: &[serde_json::Value]) -> Result<HashMap<String, serde_json::Value>> {
        Err(ResolveError::User("backend is down".to_string()))
    }
}

#[tokio::test]
async fn concurrent_loads_share_one_dispatch() -> Result<()> {
    let doubler = Doubler::default();
    let loader = BatchLoader::new(doubler.clone());

    let values = futures::future::try_join_all(
        (1..=5).map(|n| loader.load(json!(n))),
    ).await?;

    assert_eq!(values, vec![json!(2), json!(4), json!(6), json!(8), json!(10)]);
    assert_eq!(loader.dispatch_count().await, 1);
    assert_eq!(doubler.batches.lock().unwrap()[0].len(), 5);
    Ok(())
}

#[tokio::test]
async fn duplicate_keys_are_loaded_once() -> Result<()> {
    let doubler = Doubler::default();
    let loader = BatchLoader::new(doubler.clone());

    let (a, b) = futures::join!(loader.load(json!(7)), loader.load(json!("7")));
    assert_eq!(a?, json!(14));
    assert_eq!(b?, json!(14));
    assert_eq!(doubler.batches.lock().unwrap()[0].len(), 1);
    Ok(())
}

#[tokio::test]
async fn results_are_cached_for_later_loads() -> Result<()> {
    let loader = BatchLoader::new(Doubler::default());
    loader.load(json!(1)).await?;
    loader.load(json!(1)).await?;
    assert_eq!(loader.dispatch_count().await, 1);

    loader.load(json!(2)).await?;
    assert_eq!(loader.dispatch_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn keys_missing_from_the_batch_resolve_to_null() -> Result<()> {
    let loader = BatchLoader::new(Doubler::default());
    assert_eq!(loader.load(json!("not a number")).await?, serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn batch_errors_reach_every_waiter() {
    let loader = BatchLoader::new(Failing);
    let (a, b) = futures::join!(loader.load(json!(1)), loader.load(json!(2)));
    assert_eq!(a, Err(ResolveError::User("backend is down".to_string())));
    assert_eq!(b, Err(ResolveError::User("backend is down".to_string())));
    assert_eq!(loader.dispatch_count().await, 1);
}

#[tokio::test]
async fn registry_reuses_loaders_per_key() -> Result<()> {
    let registry = BatchLoaderRegistry::new();
    let key = BatchKey::new("users.posts", "posts:Many", &json!({}));

    let first = registry.instance(key.clone(), || BatchLoader::new(Doubler::default()))?;
    let second = registry.instance(key, || BatchLoader::new(Failing))?;
    assert!(Arc::ptr_eq(&first, &second));

    let other = BatchKey::new("users.posts", "posts:Many", &json!({"scopes": ["published"]}));
    registry.instance(other, || BatchLoader::new(Doubler::default()))?;
    assert_eq!(registry.len(), 2);
    Ok(())
}
