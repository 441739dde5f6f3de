use crate::document::ast_helpers;
use crate::document::extend_type_definition;
use crate::document::merge_unique_node_list;
use crate::document::FieldDefinition;
use crate::document::Node;
use crate::document::TypeAnnotation;
use crate::schema::SchemaBuildError;
use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn field(name: &str, type_name: &str) -> FieldDefinition {
    FieldDefinition::new(name, TypeAnnotation::named(type_name, true))
}

fn fields(names: &[&str]) -> IndexMap<String, FieldDefinition> {
    names.iter().map(|name| (name.to_string(), field(name, "Int"))).collect()
}

#[test]
fn merging_an_empty_list_is_a_noop() -> Result<()> {
    let mut original = fields(&["a", "b"]);
    merge_unique_node_list("T", &mut original, vec![], false)?;
    assert_eq!(original, fields(&["a", "b"]));
    Ok(())
}

#[test]
fn collision_without_overwrite_fails() {
    let mut original = fields(&["a"]);
    let result = merge_unique_node_list("T", &mut original, vec![field("a", "String")], false);
    assert!(matches!(
        result,
        Err(SchemaBuildError::DuplicateNodeDefinition { node_name, parent_name, .. })
            if node_name == "a" && parent_name == "T",
    ));
}

#[test]
fn overwrite_replaces_in_place() -> Result<()> {
    let mut original = fields(&["a", "b", "c"]);
    merge_unique_node_list("T", &mut original, vec![field("b", "String")], true)?;
    let names: Vec<&str> = original.keys().map(|name| name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(original["b"].type_annotation().innermost_type_name(), "String");
    Ok(())
}

#[test]
fn extending_with_another_kind_fails() -> Result<()> {
    let mut base = ast_helpers::parse_type_definition("type User { id: ID }")?;
    let ext = ast_helpers::parse_type_definition("input User { id: ID }")?;
    let result = extend_type_definition(&mut base, ext);
    assert!(matches!(result, Err(SchemaBuildError::InvalidExtensionType { .. })));
    Ok(())
}

#[test]
fn extending_a_union_adds_new_members_once() -> Result<()> {
    let mut base = ast_helpers::parse_type_definition("union Result = A | B")?;
    let ext = ast_helpers::parse_type_definition("union Result = B | C")?;
    extend_type_definition(&mut base, ext)?;
    assert_eq!(
        base.as_union().map(|def| def.members().clone()),
        Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
    );
    Ok(())
}

fn name_set() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[a-z]{1,6}", 0..8)
}

proptest! {
    #[test]
    fn disjoint_merges_keep_every_name_in_order(
        left in name_set(),
        right in name_set(),
    ) {
        let right: Vec<String> = right.difference(&left).cloned().collect();
        let left: Vec<&str> = left.iter().map(|name| name.as_str()).collect();

        let mut merged = fields(&left);
        let additions = right.iter().map(|name| field(name, "Int"));
        prop_assert!(merge_unique_node_list("T", &mut merged, additions, false).is_ok());

        let expected: Vec<&str> = left.iter()
            .copied()
            .chain(right.iter().map(|name| name.as_str()))
            .collect();
        let actual: Vec<&str> = merged.values().map(|field| field.name()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn any_overlap_without_overwrite_is_rejected(
        left in name_set(),
        extra in "[a-z]{1,6}",
    ) {
        let mut names: Vec<&str> = left.iter().map(|name| name.as_str()).collect();
        names.push(extra.as_str());
        let mut original = fields(&names);
        let result = merge_unique_node_list("T", &mut original, vec![field(&extra, "Int")], false);
        prop_assert!(result.is_err());
    }
}
