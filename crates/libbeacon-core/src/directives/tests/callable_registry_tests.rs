use crate::directives::CallableRegistry;
use serde_json::json;

fn namespaces(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn registry() -> CallableRegistry {
    let mut callables = CallableRegistry::new();
    callables
        .register_complexity("flat", |_, _| 1)
        .register_complexity("app::flat", |_, _| 2)
        .register_complexity("app::scaled", |child, args| {
            child * args.get("first").and_then(|first| first.as_u64()).unwrap_or(1) as usize
        })
        .register_builder("app::recent", |_, _| Ok(()));
    callables
}

#[test]
fn namespaced_names_win_over_bare_ones() {
    let callables = registry();
    let flat = callables.complexity("flat", &namespaces(&["app"])).unwrap();
    assert_eq!(flat(10, &serde_json::Map::new()), 2);

    let bare = callables.complexity("flat", &[]).unwrap();
    assert_eq!(bare(10, &serde_json::Map::new()), 1);
}

#[test]
fn namespaces_are_tried_in_order() {
    let callables = registry();
    let scaled = callables.complexity("scaled", &namespaces(&["other", "app"])).unwrap();
    let args = json!({"first": 5}).as_object().cloned().unwrap();
    assert_eq!(scaled(3, &args), 15);
}

#[test]
fn missing_callables_are_none() {
    let callables = registry();
    assert!(callables.builder("recent", &[]).is_none());
    assert!(callables.builder("recent", &namespaces(&["app"])).is_some());
    assert!(callables.resolver("anything", &namespaces(&["app"])).is_none());
}
