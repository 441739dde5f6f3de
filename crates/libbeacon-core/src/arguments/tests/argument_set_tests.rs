use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentSetFactory;
use crate::arguments::ArgumentValue;
use crate::test::build;
use serde_json::json;

#[test]
fn add_value_creates_nested_sets() {
    let mut set = ArgumentSet::new();
    set.add_value("input.user.id", json!(7));
    set.add_value("input.name", json!("Ada"));

    assert_eq!(
        serde_json::Value::Object(set.to_json()),
        json!({"input": {"user": {"id": 7}, "name": "Ada"}}),
    );
}

#[test]
fn add_value_replaces_a_scalar_on_the_way() {
    let mut set = ArgumentSet::new();
    set.add_value("input", json!("flat"));
    set.add_value("input.id", json!(1));
    assert_eq!(set.json("input"), Some(json!({"id": 1})));
}

#[test]
fn from_json_wraps_objects_as_nested_sets() {
    let value = ArgumentValue::from_json(json!([{"id": 1}, null, "x"]));
    let items = value.as_list().unwrap();
    assert!(items[0].as_nested().is_some_and(|set| set.contains("id")));
    assert!(items[1].is_null());
    assert_eq!(items[2].as_str(), Some("x"));
}

#[test]
fn factory_shapes_values_after_input_types() {
    let doc = build("
        type Query { search(filter: Filter, ids: [ID!], limit: Int = 10, term: String): String }
        input Filter { name: String tags: [String!] }
    ").unwrap();
    let field = doc.field("Query", "search").unwrap();
    let raw = json!({"filter": {"name": "rust"}, "ids": 4}).as_object().cloned().unwrap();

    let set = ArgumentSetFactory::new(&doc).from_field_arguments(field, &raw);

    let filter = set.value("filter").and_then(|value| value.as_nested()).unwrap();
    assert_eq!(filter.json("name"), Some(json!("rust")));
    assert!(filter.is_undefined("tags"));

    // A single value given for a list is coerced into a list of one.
    assert_eq!(set.json("ids"), Some(json!([4])));
    assert_eq!(set.json("limit"), Some(json!(10)));
    assert!(set.is_undefined("term"));
    assert!(!set.contains("term"));
}

#[test]
fn explicit_null_is_not_undefined() {
    let doc = build("type Query { search(term: String): String }").unwrap();
    let field = doc.field("Query", "search").unwrap();
    let raw = json!({"term": null}).as_object().cloned().unwrap();

    let set = ArgumentSetFactory::new(&doc).from_field_arguments(field, &raw);
    assert!(set.contains("term"));
    assert!(!set.is_undefined("term"));
    assert!(set.value("term").is_some_and(|value| value.is_null()));
}
