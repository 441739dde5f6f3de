use crate::directives::CallableRegistry;
use crate::test::blog_store;
use crate::test::compile_with;
use crate::test::context;
use crate::test::run;
use crate::test::BLOG_SDL;
use crate::BeaconConfig;
use serde_json::json;

fn limited(max_depth: Option<usize>, max_complexity: Option<usize>) -> BeaconConfig {
    let mut config = BeaconConfig::default();
    config.security.max_query_depth = max_depth;
    config.security.max_query_complexity = max_complexity;
    config
}

#[tokio::test]
async fn deep_queries_are_rejected_before_running() {
    let store = blog_store();
    let schema = compile_with(BLOG_SDL, limited(Some(2), None), CallableRegistry::new());
    store.reset_select_count().unwrap();

    let response = run(&schema, &context(&store), "{ users { posts { title } } }").await;
    assert_eq!(response.data, None);
    assert_eq!(response.errors[0].message, "Max query depth should be 2 but got 3.");
    assert_eq!(store.select_count().unwrap(), 0);

    let response = run(&schema, &context(&store), "{ users { name } }").await;
    assert_eq!(response.errors, vec![]);
}

#[tokio::test]
async fn zero_disables_a_limit() {
    let store = blog_store();
    let schema = compile_with(BLOG_SDL, limited(Some(0), Some(0)), CallableRegistry::new());
    let response = run(&schema, &context(&store), "{ users { posts { author { name } } } }").await;
    assert_eq!(response.errors, vec![]);
}

#[tokio::test]
async fn paginated_fields_multiply_their_children() {
    let sdl = "
        type Query { users: [User!]! @paginate }
        type User { id: ID! name: String! }
    ";
    let store = blog_store();
    let schema = compile_with(sdl, limited(None, Some(30)), CallableRegistry::new());

    // 1 + (1 + 2) * 10
    let response = run(&schema, &context(&store), "{ users(first: 10) { data { id name } } }").await;
    assert_eq!(response.errors[0].message, "Max query complexity should be 30 but got 31.");

    let response = run(&schema, &context(&store), "{ users(first: 9) { data { id name } } }").await;
    assert_eq!(response.errors, vec![]);
}

#[tokio::test]
async fn complexity_callables_decide_the_cost() {
    let sdl = r#"
        type Query { users: [User!]! @all @complexity(resolver: "perUser") }
        type User { id: ID! name: String! }
    "#;
    let mut callables = CallableRegistry::new();
    callables.register_complexity("perUser", |child, _| child * 100);
    let store = blog_store();
    let schema = compile_with(sdl, limited(None, Some(150)), callables);

    let response = run(&schema, &context(&store), "{ users { id } }").await;
    assert!(response.errors.is_empty());
    let response = run(&schema, &context(&store), "{ users { id name } }").await;
    assert_eq!(response.errors[0].message, "Max query complexity should be 150 but got 200.");
    assert_eq!(response.data, None);
    assert_eq!(response.to_json()["errors"][0]["extensions"], json!({"category": "graphql"}));
}

#[tokio::test]
async fn huge_page_sizes_saturate_instead_of_wrapping() {
    let sdl = "
        type Query { users: [User!]! @paginate }
        type User { id: ID! name: String! }
    ";
    let store = blog_store();
    let schema = compile_with(sdl, limited(None, Some(30)), CallableRegistry::new());
    let expected = format!("Max query complexity should be 30 but got {}.", usize::MAX);

    let response = run(&schema, &context(&store), "
        { users(first: 9223372036854775807) { data { id name } } }
    ").await;
    assert_eq!(response.data, None);
    assert_eq!(response.errors[0].message, expected);

    let response = run(&schema, &context(&store), "
        {
          a: users(first: 9223372036854775807) { data { id name } }
          b: users(first: 9223372036854775807) { data { id name } }
        }
    ").await;
    assert_eq!(response.errors[0].message, expected);
}

#[tokio::test]
async fn complexity_directive_saturates_on_huge_first() {
    let sdl = "
        type Query { users(first: Int): [User!]! @all @complexity }
        type User { id: ID! name: String! }
    ";
    let store = blog_store();
    let schema = compile_with(sdl, limited(None, Some(100)), CallableRegistry::new());

    let response = run(&schema, &context(&store), "
        { users(first: 9223372036854775807) { id name } }
    ").await;
    assert_eq!(
        response.errors[0].message,
        format!("Max query complexity should be 100 but got {}.", usize::MAX),
    );

    // 1 + 2 * 3
    let response = run(&schema, &context(&store), "{ users(first: 3) { id name } }").await;
    assert_eq!(response.errors, vec![]);
}
