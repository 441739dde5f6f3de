use crate::test::blog_store;
use crate::test::compile;
use crate::test::context;
use crate::test::run;
use serde_json::json;

const PAGINATED_SDL: &str = r#"
type Query {
  users: [User!]! @paginate(defaultCount: 2)
  feed: [Post!]! @paginate(type: "CONNECTION", maxCount: 3)
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

#[tokio::test]
async fn paginator_reports_page_info() {
    let store = blog_store();
    let response = run(&compile(PAGINATED_SDL), &context(&store), "
        {
          users(page: 2) {
            data { name }
            paginatorInfo { count currentPage firstItem lastItem lastPage hasMorePages total }
          }
        }
    ").await;

    assert_eq!(response.errors, vec![]);
    assert_eq!(response.data, Some(json!({
        "users": {
            "data": [{"name": "Linus"}],
            "paginatorInfo": {
                "count": 1,
                "currentPage": 2,
                "firstItem": 3,
                "lastItem": 3,
                "lastPage": 2,
                "hasMorePages": false,
                "total": 3,
            },
        },
    })));
}

#[tokio::test]
async fn connection_continues_after_the_cursor() {
    let store = blog_store();
    let schema = compile(PAGINATED_SDL);

    let first = run(&schema, &context(&store), "
        { feed(first: 2) { edges { cursor } pageInfo { hasNextPage endCursor } } }
    ").await;
    assert_eq!(first.data, Some(json!({
        "feed": {
            "edges": [{"cursor": "MQ=="}, {"cursor": "Mg=="}],
            "pageInfo": {"hasNextPage": true, "endCursor": "Mg=="},
        },
    })));

    let second = run(&schema, &context(&store), r#"
        {
          feed(first: 2, after: "Mg==") {
            edges { cursor node { title } }
            pageInfo { hasNextPage hasPreviousPage startCursor }
          }
        }
    "#).await;
    assert_eq!(second.data, Some(json!({
        "feed": {
            "edges": [
                {"cursor": "Mw==", "node": {"title": "Compilers"}},
                {"cursor": "NA==", "node": {"title": "COBOL"}},
            ],
            "pageInfo": {"hasNextPage": false, "hasPreviousPage": true, "startCursor": "Mw=="},
        },
    })));
}

#[tokio::test]
async fn max_count_is_enforced() {
    let store = blog_store();
    let response = run(&compile(PAGINATED_SDL), &context(&store), "
        { feed(first: 5) { edges { cursor } } }
    ").await;
    assert_eq!(response.data, Some(serde_json::Value::Null));
    assert_eq!(
        response.errors[0].message,
        "Maximum number of 3 requested items exceeded, got 5. Fetch smaller chunks.",
    );
}

#[tokio::test]
async fn zero_items_still_counts_the_total() {
    let store = blog_store();
    let response = run(&compile(PAGINATED_SDL), &context(&store), "
        { users(first: 0) { data { id } paginatorInfo { total count } } }
    ").await;
    assert_eq!(response.data, Some(json!({
        "users": {"data": [], "paginatorInfo": {"total": 3, "count": 0}},
    })));
}

#[tokio::test]
async fn cursor_past_the_last_offset_is_rejected() {
    let store = blog_store();
    // base64 of u64::MAX
    let response = run(&compile(PAGINATED_SDL), &context(&store), r#"
        { feed(first: 2, after: "MTg0NDY3NDQwNzM3MDk1NTE2MTU=") { edges { cursor } } }
    "#).await;
    assert_eq!(response.data, Some(serde_json::Value::Null));
    assert_eq!(
        response.errors[0].message,
        "Invalid cursor `MTg0NDY3NDQwNzM3MDk1NTE2MTU=`.",
    );
}

#[tokio::test]
async fn page_past_the_addressable_range_is_rejected() {
    let store = blog_store();
    let response = run(&compile(PAGINATED_SDL), &context(&store), "
        { users(first: 3, page: 9223372036854775807) { data { id } } }
    ").await;
    assert_eq!(response.data, Some(serde_json::Value::Null));
    assert_eq!(
        response.errors[0].message,
        "Requested page 9223372036854775807 is out of range.",
    );
}
