use crate::auth::Principal;
use crate::auth::StaticGate;
use crate::execution::ErrorPool;
use crate::execution::GraphQLError;
use crate::execution::RateLimitError;
use crate::execution::RateLimiter;
use crate::store::InMemoryStore;
use crate::test::context;
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn context_values_are_read_by_path() {
    let ctx = context(&InMemoryStore::new())
        .with_value("tenant", json!({"ids": [10, 20]}))
        .with_gate(Arc::new(StaticGate::new().with_user("api", Principal::new(7))));

    assert_eq!(ctx.context_value("tenant.ids.1"), Some(json!(20)));
    assert_eq!(ctx.context_value("tenant.ids.5"), None);
    assert_eq!(ctx.context_value("user.id"), Some(json!(7)));
    assert_eq!(ctx.context_value("missing"), None);
}

#[test]
fn authenticated_user_wins_over_default_guards() {
    let ctx = context(&InMemoryStore::new())
        .with_gate(Arc::new(StaticGate::new().with_user("api", Principal::new(7))));
    ctx.set_user(Principal::new(8));
    assert_eq!(ctx.user().map(|user| user.id().clone()), Some(json!(8)));

    let ctx = context(&InMemoryStore::new())
        .with_default_guards(vec!["web".to_string()])
        .with_gate(Arc::new(StaticGate::new().with_user("api", Principal::new(7))));
    assert_eq!(ctx.user(), None);
}

#[test]
fn error_pool_drains_once() {
    let pool = ErrorPool::new();
    assert!(pool.is_empty());
    pool.record(GraphQLError::new("first"));
    pool.record(GraphQLError::new("second"));

    let drained = pool.drain();
    assert_eq!(drained.iter().map(|err| err.message.as_str()).collect::<Vec<_>>(), vec!["first", "second"]);
    assert!(pool.is_empty());
    assert!(pool.drain().is_empty());
}

#[test]
fn error_pool_survives_a_poisoned_lock() {
    let pool = Arc::new(ErrorPool::new());
    pool.record(GraphQLError::new("before"));
    let poisoner = pool.clone();
    let joined = std::thread::spawn(move || {
        let _guard = poisoner.errors.lock();
        panic!("resolver panicked");
    }).join();
    assert!(joined.is_err());
    assert!(pool.errors.is_poisoned());

    pool.record(GraphQLError::new("after"));
    assert!(!pool.is_empty());
    let messages: Vec<_> = pool.drain().into_iter().map(|err| err.message).collect();
    assert_eq!(messages, vec!["before", "after"]);
}

#[test]
fn rate_limiter_buckets_are_per_key() {
    let limiter = RateLimiter::new();
    let two = NonZeroU32::new(2).unwrap();
    let minute = Duration::from_secs(60);
    assert_eq!(limiter.hit("a", two, minute), Ok(()));
    assert_eq!(limiter.hit("a", two, minute), Ok(()));
    assert!(matches!(
        limiter.hit("a", two, minute),
        Err(RateLimitError::Exceeded { retry_after_secs }) if (1..=30).contains(&retry_after_secs),
    ));
    assert_eq!(limiter.hit("b", two, minute), Ok(()));
}

#[test]
fn quotas_with_different_limits_do_not_share_buckets() {
    let limiter = RateLimiter::new();
    let minute = Duration::from_secs(60);
    assert_eq!(limiter.hit("a", NonZeroU32::MIN, minute), Ok(()));
    assert!(limiter.hit("a", NonZeroU32::MIN, minute).is_err());
    assert_eq!(limiter.hit("a", NonZeroU32::new(5).unwrap(), minute), Ok(()));
}

#[test]
fn zero_decay_never_limits() {
    let limiter = RateLimiter::new();
    assert_eq!(limiter.hit("a", NonZeroU32::MIN, Duration::ZERO), Ok(()));
    assert_eq!(limiter.hit("a", NonZeroU32::MIN, Duration::ZERO), Ok(()));
}
