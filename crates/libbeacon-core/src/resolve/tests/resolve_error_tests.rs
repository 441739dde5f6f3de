use crate::execution::PathSegment;
use crate::resolve::ResolveError;
use crate::store::StoreError;
use indexmap::IndexMap;
use serde_json::json;

#[test]
fn internal_details_stay_private() {
    let err = ResolveError::internal("connection refused on 10.0.0.3");
    let error = err.to_graphql_error(None);
    assert_eq!(error.message, "Internal server error");
    assert_eq!(error.extensions["category"], json!("internal"));
}

#[test]
fn store_errors_are_internal() {
    let err: ResolveError = StoreError::UnknownModel("Ghost".to_string()).into();
    assert_eq!(err.category(), "internal");
}

#[test]
fn extensions_carry_the_details() {
    let mut errors = IndexMap::new();
    errors.insert("input.email".to_string(), vec!["This field must be a valid email address.".to_string()]);
    let validation = ResolveError::Validation {
        errors,
        field: "signup".to_string(),
    }.to_graphql_error(Some(vec![PathSegment::Key("signup".to_string())]));
    assert_eq!(validation.message, "Validation failed for the field [signup].");
    assert_eq!(
        validation.extensions["validation"],
        json!({"input.email": ["This field must be a valid email address."]}),
    );
    assert_eq!(validation.path, Some(vec![PathSegment::Key("signup".to_string())]));

    let limited = ResolveError::RateLimited {
        key: "Query.search:guest".to_string(),
        retry_after_secs: 30,
    }.to_graphql_error(None);
    assert_eq!(limited.extensions["retryAfter"], json!(30));
    assert_eq!(limited.extensions["category"], json!("rate-limited"));

    let unauthenticated = ResolveError::Authentication {
        guards: vec!["api".to_string()],
    }.to_graphql_error(None);
    assert_eq!(unauthenticated.message, "Unauthenticated.");
    assert_eq!(unauthenticated.extensions["guards"], json!(["api"]));
}
