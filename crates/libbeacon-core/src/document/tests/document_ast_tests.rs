use crate::document::content_hash;
use crate::document::DocumentAst;
use crate::document::Node;
use crate::document::TypeKind;
use crate::schema::SchemaBuildError;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const SDL: &str = r#"
interface Node { id: ID! }
type User implements Node { id: ID! name: String }
type Team implements Node { id: ID! }
union SearchResult = User | Team
enum Role { ADMIN EDITOR }
input UserInput { name: String }
extend type User { role: Role }
"#;

#[test]
fn definitions_keep_declaration_order() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    let names: Vec<&str> = doc.types().keys().map(|name| name.as_str()).collect();
    assert_eq!(names, vec!["Node", "User", "Team", "SearchResult", "Role", "UserInput"]);
    Ok(())
}

#[test]
fn extensions_are_kept_apart_until_built() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    assert_eq!(doc.type_extensions()["User"].len(), 1);
    assert!(doc.field("User", "role").is_none());
    Ok(())
}

#[test]
fn possible_types_of_abstract_types() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    assert_eq!(doc.possible_type_names("SearchResult"), vec!["User", "Team"]);
    assert_eq!(doc.possible_type_names("Node"), vec!["User", "Team"]);
    assert_eq!(doc.possible_type_names("User"), vec!["User"]);
    assert!(doc.possible_type_names("Missing").is_empty());
    Ok(())
}

#[test]
fn leaf_and_input_types() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    assert!(doc.is_leaf_type("Role"));
    assert!(doc.is_leaf_type("Int"));
    assert!(!doc.is_leaf_type("User"));
    assert!(doc.is_input_object_type("UserInput"));
    assert!(doc.has_type("Boolean"));
    Ok(())
}

#[test]
fn duplicate_type_definitions_are_rejected() {
    let result = DocumentAst::from_source("scalar Date scalar Date", None);
    assert!(matches!(
        result,
        Err(SchemaBuildError::DuplicateTypeDefinition { type_name, .. }) if type_name == "Date",
    ));
}

#[test]
fn parse_errors_carry_the_file() {
    let file = Path::new("schema/broken.graphql");
    match DocumentAst::from_source("type {", Some(file)) {
        Err(SchemaBuildError::ParseError { file: Some(path), .. }) => assert_eq!(path, file),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn root_types_follow_the_schema_block() -> Result<()> {
    let doc = DocumentAst::from_source(
        "schema { query: Root } type Root { ok: Boolean } type Query { ignored: Int }",
        None,
    )?;
    assert_eq!(doc.query_type_name(), Some("Root"));
    assert_eq!(doc.mutation_type_name(), None);
    Ok(())
}

#[test]
fn model_names_come_from_registered_classes() -> Result<()> {
    let mut doc = DocumentAst::from_source(SDL, None)?;
    assert_eq!(doc.model_name_for_type("User"), "User");
    doc.register_class_name("Account", "User");
    doc.register_class_name("Account", "User");
    assert_eq!(doc.model_name_for_type("User"), "Account");
    assert_eq!(doc.class_name_to_type_names()["Account"], vec!["User".to_string()]);
    Ok(())
}

#[test]
fn bytes_round_trip_preserves_the_document() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    let restored = DocumentAst::from_bytes(&doc.to_bytes()?)?;
    assert_eq!(restored, doc);
    assert_eq!(restored.content_hash(), content_hash(SDL));
    assert_eq!(restored.type_definition("Role").map(|def| def.kind()), Some(TypeKind::Enum));
    Ok(())
}

#[test]
fn removing_a_type_keeps_the_others_in_order() -> Result<()> {
    let mut doc = DocumentAst::from_source(SDL, None)?;
    let removed = doc.remove_type_definition("Team");
    assert_eq!(removed.as_ref().map(|def| def.name()), Some("Team"));
    let names: Vec<&str> = doc.types().keys().map(|name| name.as_str()).collect();
    assert_eq!(names, vec!["Node", "User", "SearchResult", "Role", "UserInput"]);
    Ok(())
}
