//! Fixtures shared by the unit tests of every module.

mod config_tests;

use crate::directives::CallableRegistry;
use crate::directives::DirectiveRegistry;
use crate::document::DocumentAst;
use crate::execution::Executor;
use crate::execution::GraphQLRequest;
use crate::execution::GraphQLResponse;
use crate::execution::RequestContext;
use crate::resolve::CompiledSchema;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::store::InMemoryStore;
use crate::store::Relation;
use crate::BeaconConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// A fresh, empty directory under the system temp dir, unique to this
/// test process and `name`.
pub(crate) fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("libbeacon-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub(crate) fn builtins() -> Arc<DirectiveRegistry> {
    Arc::new(DirectiveRegistry::with_builtins().unwrap())
}

/// Builds `sdl` with every built-in directive registered.
pub(crate) fn build(sdl: &str) -> Result<DocumentAst, SchemaBuildError> {
    SchemaBuilder::new(builtins())
        .load_str(None, sdl)
        .build()
}

pub(crate) fn compile(sdl: &str) -> Arc<CompiledSchema> {
    compile_with(sdl, BeaconConfig::default(), CallableRegistry::new())
}

pub(crate) fn compile_with(
    sdl: &str,
    config: BeaconConfig,
    callables: CallableRegistry,
) -> Arc<CompiledSchema> {
    let schema = SchemaBuilder::new(builtins())
        .with_config(Arc::new(config))
        .load_str(None, sdl)
        .compile(Arc::new(callables))
        .unwrap();
    Arc::new(schema)
}

pub(crate) async fn run(
    schema: &Arc<CompiledSchema>,
    ctx: &RequestContext,
    query: &str,
) -> GraphQLResponse {
    Executor::new(schema.clone())
        .execute(GraphQLRequest::new(query), ctx)
        .await
}

pub(crate) fn context(store: &InMemoryStore) -> RequestContext {
    RequestContext::new(Arc::new(store.clone()))
}

/// `User`s 1 to 3 and their `Post`s: users 1 and 2 have two posts each,
/// user 3 has none.
pub(crate) fn blog_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed("User", vec![
        serde_json::json!({"id": 1, "name": "Ada", "email": "ada@example.com"}),
        serde_json::json!({"id": 2, "name": "Grace", "email": "grace@example.com"}),
        serde_json::json!({"id": 3, "name": "Linus", "email": "linus@example.com"}),
    ]).unwrap();
    store.seed("Post", vec![
        serde_json::json!({"id": 1, "title": "Engines", "user_id": 1}),
        serde_json::json!({"id": 2, "title": "Notes", "user_id": 1}),
        serde_json::json!({"id": 3, "title": "Compilers", "user_id": 2}),
        serde_json::json!({"id": 4, "title": "COBOL", "user_id": 2}),
    ]).unwrap();
    store.define_relation("User", "posts", Relation::has_many("Post", "user_id")).unwrap();
    store.define_relation("Post", "author", Relation::belongs_to("User", "user_id")).unwrap();
    store
}

pub(crate) const BLOG_SDL: &str = r#"
type Query {
  user(id: ID @eq): User @find
  users: [User!]! @all
  postsByTitle(title: String! @like(template: "%{}%")): [Post!]! @all
}

type User {
  id: ID!
  name: String!
  email: String!
  posts: [Post!]! @hasMany
  postCount: Int! @count(relation: "posts")
}

type Post {
  id: ID!
  title: String!
  author: User! @belongsTo
}
"#;
