use crate::auth::Principal;
use crate::auth::StaticGate;
use crate::directives::CallableRegistry;
use crate::execution::RateLimiter;
use crate::test::blog_store;
use crate::test::compile_with;
use crate::test::context;
use crate::test::run;
use crate::BeaconConfig;
use serde_json::json;
use std::sync::Arc;

const AUTH_SDL: &str = r#"
type Query {
  secret: String @guard @field(resolver: "secret")
  whoami: String @guard(with: ["admin", "api"]) @field(resolver: "whoami")
  post(id: ID! @eq): Post @can(ability: "view", find: "id") @find
  users: [User!]! @can(ability: "listUsers") @all
  search: String @throttle(maxAttempts: 1, prefix: "s:") @field(resolver: "secret")
}

type Admin @guard {
  name: String
}

type User {
  id: ID!
  name: String!
}

type Post {
  id: ID!
  title: String!
}
"#;

fn callables() -> CallableRegistry {
    let mut callables = CallableRegistry::new();
    callables
        .register_sync_resolver("secret", |_| Ok(json!("s3cret")))
        .register_sync_resolver("whoami", |params| {
            Ok(params.ctx.context_value("user.name").unwrap_or(serde_json::Value::Null))
        });
    callables
}

fn schema() -> Arc<crate::resolve::CompiledSchema> {
    compile_with(AUTH_SDL, BeaconConfig::default(), callables())
}

fn gate() -> StaticGate {
    StaticGate::new()
        .with_user("api", Principal::new(1).with_attribute("name", "Ada"))
        .define("view", |user, args| {
            let owner = args.first().and_then(|post| post.get("user_id")).cloned();
            user.is_some_and(|user| owner.as_ref() == Some(user.id()))
        })
}

mod guards {
    use super::*;

    #[tokio::test]
    async fn unauthenticated_requests_are_rejected_per_field() {
        let store = blog_store();
        let response = run(&schema(), &context(&store), "{ secret search }").await;

        assert_eq!(response.data, Some(json!({"secret": null, "search": "s3cret"})));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Unauthenticated.");
        assert_eq!(response.errors[0].extensions["guards"], json!(["api"]));
    }

    #[tokio::test]
    async fn the_first_guard_with_a_user_wins() {
        let store = blog_store();
        let ctx = context(&store).with_gate(Arc::new(gate()));
        let response = run(&schema(), &ctx, "{ secret whoami }").await;
        assert_eq!(response.data, Some(json!({"secret": "s3cret", "whoami": "Ada"})));
    }

    #[test]
    fn type_guards_are_copied_onto_fields() {
        let schema = schema();
        let field = schema.field("Admin", "name").unwrap();
        assert!(field.definition().directive("guard").is_some());
    }
}

mod abilities {
    use super::*;

    #[tokio::test]
    async fn found_rows_are_checked_against_the_policy() {
        let store = blog_store();
        let ctx = context(&store).with_gate(Arc::new(gate()));
        let response = run(&schema(), &ctx, "{ own: post(id: 1) { title } other: post(id: 3) { title } }").await;

        assert_eq!(response.data, Some(json!({"own": {"title": "Engines"}, "other": null})));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "This action is unauthorized.");
        assert_eq!(response.errors[0].extensions["category"], json!("authorization"));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = blog_store();
        let ctx = context(&store).with_gate(Arc::new(gate()));
        let response = run(&schema(), &ctx, "{ post(id: 9) { title } }").await;
        assert_eq!(response.errors[0].extensions["category"], json!("not-found"));
    }

    #[tokio::test]
    async fn abilities_without_policy_are_denied() {
        let store = blog_store();
        let ctx = context(&store).with_gate(Arc::new(gate()));
        let response = run(&schema(), &ctx, "{ users { name } }").await;
        // `users` is non-null, so the denial nulls the whole result.
        assert_eq!(response.data, Some(serde_json::Value::Null));

        let ctx = context(&store).with_gate(Arc::new(gate().allow("listUsers")));
        let response = run(&schema(), &ctx, "{ users { name } }").await;
        assert_eq!(response.errors, vec![]);
    }
}

#[tokio::test]
async fn throttle_counts_hits_per_user() {
    let store = blog_store();
    let schema = schema();
    let limiter = Arc::new(RateLimiter::new());

    let guest = context(&store).with_rate_limiter(limiter.clone());
    let response = run(&schema, &guest, "{ a: search b: search }").await;
    let data = response.data.unwrap();
    let served = [&data["a"], &data["b"]].iter().filter(|value| !value.is_null()).count();
    assert_eq!(served, 1);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.starts_with("Rate limit for s:Query.search:guest exceeded."));
    assert_eq!(response.errors[0].extensions["category"], json!("rate-limited"));

    // A signed-in user has a bucket of their own.
    let user = context(&store)
        .with_rate_limiter(limiter)
        .with_gate(Arc::new(gate()));
    let response = run(&schema, &user, "{ search }").await;
    assert_eq!(response.data, Some(json!({"search": "s3cret"})));
}
