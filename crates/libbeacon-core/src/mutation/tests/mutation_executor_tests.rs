use crate::arguments::ArgumentValue;
use crate::directives::CallableRegistry;
use crate::execution::PathSegment;
use crate::mutation::key_list;
use crate::mutation::nested_sets;
use crate::store::InMemoryStore;
use crate::test::blog_store;
use crate::test::compile;
use crate::test::compile_with;
use crate::test::context;
use crate::test::run;
use crate::BeaconConfig;
use serde_json::json;

const MUTATION_SDL: &str = r#"
type Query {
  user(id: ID @eq): User @find
}

type Mutation {
  createUser(input: CreateUserInput! @spread): User! @create
  createPost(input: CreatePostInput! @spread): Post! @create
  updateUsers(inputs: [UpdateUserInput!]!): [User] @updateMany
  upsertUser(id: ID, name: String!): User! @upsert
  deleteUser(id: ID!): User @delete
}

input CreateUserInput {
  name: String!
  posts: CreatePostsRelation
}

input CreatePostsRelation {
  create: [PostInput!]
}

input PostInput {
  title: String!
}

input CreatePostInput {
  title: String!
  author: AuthorRelation
}

input AuthorRelation {
  connect: ID
  create: AuthorInput
}

input AuthorInput {
  name: String!
}

input UpdateUserInput {
  id: ID!
  name: String
}

type User {
  id: ID!
  name: String!
  posts: [Post!]! @hasMany
}

type Post {
  id: ID!
  title: String!
  author: User! @belongsTo
}
"#;

fn names(store: &InMemoryStore) -> Vec<serde_json::Value> {
    store.rows("User").unwrap()
        .into_iter()
        .map(|row| row["name"].clone())
        .collect()
}

mod nested {
    use super::*;

    #[tokio::test]
    async fn has_many_children_are_created_after_the_parent() {
        let store = blog_store();
        let schema = compile(MUTATION_SDL);
        let response = run(&schema, &context(&store), r#"
            mutation {
              createUser(input: {name: "Barbara", posts: {create: [{title: "Liskov"}, {title: "CLU"}]}}) {
                id
                name
                posts { title }
              }
            }
        "#).await;

        assert_eq!(response.errors, vec![]);
        assert_eq!(response.data, Some(json!({
            "createUser": {
                "id": 4,
                "name": "Barbara",
                "posts": [{"title": "Liskov"}, {"title": "CLU"}],
            },
        })));
        let new_posts: Vec<_> = store.rows("Post").unwrap()
            .into_iter()
            .filter(|row| row["user_id"] == json!(4))
            .collect();
        assert_eq!(new_posts.len(), 2);
    }

    #[tokio::test]
    async fn belongs_to_parents_are_created_first() {
        let store = blog_store();
        let schema = compile(MUTATION_SDL);
        let response = run(&schema, &context(&store), r#"
            mutation {
              createPost(input: {title: "Types", author: {create: {name: "Robin"}}}) {
                id
                author { id name }
              }
            }
        "#).await;

        assert_eq!(response.errors, vec![]);
        assert_eq!(response.data, Some(json!({
            "createPost": {"id": 5, "author": {"id": 4, "name": "Robin"}},
        })));
        let post = store.rows("Post").unwrap().pop().unwrap();
        assert_eq!(post.get("author"), None);
        assert_eq!(post["user_id"], json!(4));
    }

    #[tokio::test]
    async fn belongs_to_connect_sets_the_foreign_key() {
        let store = blog_store();
        let schema = compile(MUTATION_SDL);
        let response = run(&schema, &context(&store), r#"
            mutation {
              createPost(input: {title: "Queues", author: {connect: 3}}) { author { name } }
            }
        "#).await;
        assert_eq!(response.data, Some(json!({"createPost": {"author": {"name": "Linus"}}})));
    }
}

mod many {
    use super::*;

    const UPDATE_TWO: &str = r#"
        mutation {
          updateUsers(inputs: [{id: 1, name: "Ada L."}, {id: 99, name: "Ghost"}]) { id name }
        }
    "#;

    #[tokio::test]
    async fn transactional_batches_roll_back_entirely() {
        let store = blog_store();
        let schema = compile(MUTATION_SDL);
        let response = run(&schema, &context(&store), UPDATE_TWO).await;

        assert_eq!(response.data, Some(json!({"updateUsers": null})));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "No query results for model [User] 99");
        assert_eq!(response.errors[0].extensions["category"], json!("not-found"));
        assert_eq!(names(&store)[0], json!("Ada"));
    }

    #[tokio::test]
    async fn without_transactions_failed_items_become_null() {
        let store = blog_store();
        let config = BeaconConfig {
            transactional_mutations: false,
            ..BeaconConfig::default()
        };
        let schema = compile_with(MUTATION_SDL, config, CallableRegistry::new());
        let response = run(&schema, &context(&store), UPDATE_TWO).await;

        assert_eq!(response.data, Some(json!({
            "updateUsers": [{"id": 1, "name": "Ada L."}, null],
        })));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].path, Some(vec![
            PathSegment::Key("updateUsers".to_string()),
            PathSegment::Index(1),
        ]));
        assert_eq!(names(&store)[0], json!("Ada L."));
    }
}

#[tokio::test]
async fn upsert_inserts_unknown_keys() {
    let store = blog_store();
    let schema = compile(MUTATION_SDL);
    let response = run(&schema, &context(&store), r#"
        mutation {
          a: upsertUser(id: 2, name: "Grace H.") { id name }
          b: upsertUser(id: 10, name: "Edsger") { id name }
        }
    "#).await;

    assert_eq!(response.errors, vec![]);
    assert_eq!(response.data, Some(json!({
        "a": {"id": 2, "name": "Grace H."},
        "b": {"id": 10, "name": "Edsger"},
    })));
    assert_eq!(store.rows("User").unwrap().len(), 4);
}

#[tokio::test]
async fn delete_returns_the_deleted_row() {
    let store = blog_store();
    let schema = compile(MUTATION_SDL);
    let response = run(&schema, &context(&store), "mutation { deleteUser(id: 3) { name } }").await;

    assert_eq!(response.data, Some(json!({"deleteUser": {"name": "Linus"}})));
    assert_eq!(names(&store), vec![json!("Ada"), json!("Grace")]);
}

#[test]
fn nested_sets_flatten_lists() {
    let value = ArgumentValue::from_json(json!([{"a": 1}, [{"b": 2}], "skip"]));
    let sets = nested_sets(value);
    assert_eq!(sets.len(), 2);
    assert!(sets[1].contains("b"));
}

#[test]
fn key_list_accepts_one_or_many() {
    assert_eq!(key_list(json!(3)), vec![json!(3)]);
    assert_eq!(key_list(json!([1, 2])), vec![json!(1), json!(2)]);
    assert!(key_list(serde_json::Value::Null).is_empty());
}
