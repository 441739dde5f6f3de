use crate::execution::Executor;
use crate::execution::GraphQLRequest;
use crate::execution::PathSegment;
use crate::test::blog_store;
use crate::test::compile;
use crate::test::context;
use crate::test::run;
use crate::test::BLOG_SDL;
use serde_json::json;

mod queries {
    use super::*;

    #[tokio::test]
    async fn find_by_argument() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user(id: 2) { name postCount } }").await;
        assert_eq!(response.errors, vec![]);
        assert_eq!(response.data, Some(json!({"user": {"name": "Grace", "postCount": 2}})));
    }

    #[tokio::test]
    async fn find_without_match_is_null() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user(id: 42) { name } }").await;
        assert_eq!(response.errors, vec![]);
        assert_eq!(response.data, Some(json!({"user": null})));
    }

    #[tokio::test]
    async fn find_with_many_matches_fails_the_field() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user { name } }").await;
        assert_eq!(response.data, Some(json!({"user": null})));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "The query for `User` returned more than one result.");
        assert_eq!(response.errors[0].path, Some(vec![PathSegment::Key("user".to_string())]));
    }

    #[tokio::test]
    async fn like_template_wraps_the_value() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), r#"{ postsByTitle(title: "o") { title } }"#).await;
        assert_eq!(response.data, Some(json!({
            "postsByTitle": [{"title": "Notes"}, {"title": "Compilers"}, {"title": "COBOL"}],
        })));
    }

    #[tokio::test]
    async fn aliases_resolve_independently() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "
            { a: user(id: 1) { name } b: user(id: 3) { name posts { title } } }
        ").await;
        assert_eq!(response.data, Some(json!({
            "a": {"name": "Ada"},
            "b": {"name": "Linus", "posts": []},
        })));
    }
}

mod variables {
    use super::*;

    const FIND_QUERY: &str = "
        query Find($id: ID!, $withPosts: Boolean = false) {
          user(id: $id) { ...UserParts posts @include(if: $withPosts) { title } }
        }
        fragment UserParts on User { __typename name }
    ";

    #[tokio::test]
    async fn variables_fragments_and_conditions() {
        let store = blog_store();
        let executor = Executor::new(compile(BLOG_SDL));

        let request = GraphQLRequest::new(FIND_QUERY).with_variables(json!({"id": 1}));
        let response = executor.execute(request, &context(&store)).await;
        assert_eq!(response.data, Some(json!({"user": {"__typename": "User", "name": "Ada"}})));

        let request = GraphQLRequest::new(FIND_QUERY)
            .with_variables(json!({"id": 1, "withPosts": true}));
        let response = executor.execute(request, &context(&store)).await;
        assert_eq!(response.data, Some(json!({
            "user": {
                "__typename": "User",
                "name": "Ada",
                "posts": [{"title": "Engines"}, {"title": "Notes"}],
            },
        })));
    }

    #[tokio::test]
    async fn missing_required_variables_reject_the_request() {
        let store = blog_store();
        let response = Executor::new(compile(BLOG_SDL))
            .execute(GraphQLRequest::new(FIND_QUERY), &context(&store))
            .await;
        assert_eq!(response.data, None);
        assert!(response.errors[0].message.starts_with("Variable \"$id\""));
        assert_eq!(response.errors[0].extensions["category"], json!("graphql"));
    }

    #[tokio::test]
    async fn operations_are_picked_by_name() {
        let store = blog_store();
        let executor = Executor::new(compile(BLOG_SDL));
        let query = "query A { user(id: 1) { name } } query B { user(id: 2) { name } }";

        let response = executor.execute(GraphQLRequest::new(query), &context(&store)).await;
        assert_eq!(
            response.errors[0].message,
            "Must provide operation name if query contains multiple operations.",
        );

        let request = GraphQLRequest::new(query).with_operation_name("B");
        let response = executor.execute(request, &context(&store)).await;
        assert_eq!(response.data, Some(json!({"user": {"name": "Grace"}})));
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn syntax_errors_have_no_data() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user(id: 1) { name }").await;
        assert_eq!(response.data, None);
        assert!(response.errors[0].message.starts_with("Syntax Error"));
    }

    #[tokio::test]
    async fn unknown_fields_are_reported_with_location() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user(id: 1) { name\n nope } }").await;
        assert_eq!(response.data, Some(json!({"user": {"name": "Ada", "nope": null}})));
        assert_eq!(response.errors[0].message, "Cannot query field \"nope\" on type \"User\".");
        assert_eq!(response.errors[0].locations[0].line, 2);
    }

    #[tokio::test]
    async fn missing_root_operation_type() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "mutation { user { id } }").await;
        assert_eq!(response.data, None);
        assert_eq!(response.errors[0].message, "Schema is not configured for mutation operations.");
    }

    #[tokio::test]
    async fn null_in_non_null_position_bubbles_up() {
        let store = blog_store();
        store.seed("Post", vec![json!({"id": 5, "title": "Orphan", "user_id": 99})]).unwrap();
        let response = run(&compile(BLOG_SDL), &context(&store), r#"
            { postsByTitle(title: "Orphan") { title author { name } } }
        "#).await;

        // Every position from `author` up to the root is non-null.
        assert_eq!(response.data, Some(serde_json::Value::Null));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Cannot return null for non-nullable field \"author\".");
        assert_eq!(response.errors[0].path, Some(vec![
            PathSegment::Key("postsByTitle".to_string()),
            PathSegment::Index(0),
            PathSegment::Key("author".to_string()),
        ]));
    }

    #[tokio::test]
    async fn response_serializes_without_empty_errors() {
        let store = blog_store();
        let response = run(&compile(BLOG_SDL), &context(&store), "{ user(id: 3) { name } }").await;
        assert_eq!(response.to_json(), json!({"data": {"user": {"name": "Linus"}}}));
    }
}
