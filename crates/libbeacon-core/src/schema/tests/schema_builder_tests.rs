use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::document::DirectiveLocation;
use crate::document::DocumentAst;
use crate::document::Node;
use crate::document::TypeKind;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaPlugin;
use crate::test::build;
use crate::test::builtins;
use std::sync::Arc;

type Result<T> = std::result::Result<T, SchemaBuildError>;

mod passes {
    use super::*;

    #[test]
    fn extensions_merge_into_their_base_type() -> Result<()> {
        let doc = build("
            type Query { user: User }
            type User { id: ID! }
            extend type User { name: String }
        ")?;
        let fields: Vec<&str> = doc.type_definition("User")
            .and_then(|def| def.as_object())
            .map(|obj| obj.fields().keys().map(|name| name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(fields, vec!["id", "name"]);
        assert!(doc.type_extensions().is_empty());
        Ok(())
    }

    #[test]
    fn root_types_may_be_extended_without_a_definition() -> Result<()> {
        let doc = build("
            type Query { ping: Boolean }
            extend type Mutation { reset: Boolean }
        ")?;
        assert_eq!(doc.mutation_type_name(), Some("Mutation"));
        assert!(doc.field("Mutation", "reset").is_some());
        Ok(())
    }

    #[test]
    fn other_types_must_be_defined_before_extension() {
        let result = build("
            type Query { ping: Boolean }
            extend type User { name: String }
        ");
        assert!(matches!(
            result,
            Err(SchemaBuildError::ExtensionOfUndefinedType { type_name, .. }) if type_name == "User",
        ));
    }

    #[test]
    fn model_directive_registers_class_names() -> Result<()> {
        let doc = build(r#"
            type Query { me: Person }
            type Person @model(class: "User") { id: ID! }
        "#)?;
        assert_eq!(doc.model_name_for_type("Person"), "User");
        Ok(())
    }

    #[test]
    fn type_level_guard_is_copied_onto_each_field() -> Result<()> {
        let doc = build(r#"
            type Query @guard(with: ["web"]) {
              me: String
              other: String @guard(with: ["api"])
            }
        "#)?;
        let guard_of = |field: &str| doc.field("Query", field)
            .and_then(|field| field.directive("guard"))
            .and_then(|usage| usage.string_list_arg("with").ok().flatten());
        assert_eq!(guard_of("me"), Some(vec!["web".to_string()]));
        assert_eq!(guard_of("other"), Some(vec!["api".to_string()]));
        Ok(())
    }

    #[test]
    fn paginate_rewrites_the_field() -> Result<()> {
        let doc = build("
            type Query { users: [User!]! @paginate }
            type User { id: ID! }
        ")?;
        let field = doc.field("Query", "users").unwrap();
        assert_eq!(field.type_annotation().to_string(), "UserPaginator!");
        assert!(field.argument("first").is_some());
        assert!(field.argument("page").is_some());
        assert_eq!(
            doc.type_definition("UserPaginator").map(|def| def.kind()),
            Some(TypeKind::Object),
        );
        assert!(doc.has_type("PaginatorInfo"));
        Ok(())
    }
}

mod validation {
    use super::*;

    #[test]
    fn a_query_type_is_required() {
        assert_eq!(
            build("type User { id: ID! }"),
            Err(SchemaBuildError::NoQueryOperationTypeDefined),
        );
    }

    #[test]
    fn undefined_type_references_are_rejected() {
        let result = build("type Query { user: User }");
        assert!(matches!(
            result,
            Err(SchemaBuildError::UndefinedTypeReference { type_name, referenced_by, .. })
                if type_name == "User" && referenced_by == "Query.user",
        ));
    }

    #[test]
    fn input_objects_are_not_output_types() {
        let result = build("
            type Query { user: UserInput }
            input UserInput { id: ID }
        ");
        assert!(matches!(result, Err(SchemaBuildError::WrongTypeKind { .. })));
    }

    #[test]
    fn union_members_must_be_objects() {
        let result = build("
            type Query { result: Result }
            union Result = Role
            enum Role { ADMIN }
        ");
        assert!(matches!(
            result,
            Err(SchemaBuildError::WrongTypeKind { expected: "a union member", .. }),
        ));
    }

    #[test]
    fn unknown_directives_are_rejected() {
        let result = build("type Query { ping: Boolean @nope }");
        assert!(matches!(
            result,
            Err(SchemaBuildError::Directive(DirectiveError::UnknownDirective { directive_name, .. }))
                if directive_name == "nope",
        ));
    }

    #[test]
    fn directives_are_checked_against_their_locations() {
        let result = build("type Query @all { ping: Boolean }");
        assert!(matches!(
            result,
            Err(SchemaBuildError::Directive(DirectiveError::InvalidLocation {
                location_kind: DirectiveLocation::Object,
                ..
            })),
        ));
    }

    #[test]
    fn non_repeatable_directives_are_used_once() {
        let result = build("type Query { users: [String] @all @all }");
        assert!(matches!(
            result,
            Err(SchemaBuildError::Directive(DirectiveError::NotRepeatable { .. })),
        ));
    }

    #[test]
    fn unknown_and_missing_arguments_are_rejected() {
        let unknown = build(r#"type Query { users: [String] @all(table: "users") }"#);
        assert!(matches!(
            unknown,
            Err(SchemaBuildError::Directive(DirectiveError::UnknownArgument { argument_name, .. }))
                if argument_name == "table",
        ));

        let missing = build("type Query { name: String @field }");
        assert!(matches!(
            missing,
            Err(SchemaBuildError::Directive(DirectiveError::MissingRequiredArgument { argument_name, .. }))
                if argument_name == "resolver",
        ));
    }

    #[test]
    fn directive_specific_validation_runs() {
        let result = build(r#"
            type Query { n: Int @count(relation: "posts", model: "Post") }
        "#);
        assert!(matches!(
            result,
            Err(SchemaBuildError::Directive(DirectiveError::InvalidArgument { .. })),
        ));
    }

    #[test]
    fn many_mutations_need_a_list_of_input_objects() {
        let result = build("
            type Query { ping: Boolean }
            type Mutation { createUsers(input: UserInput): [User!]! @createMany }
            type User { id: ID! }
            input UserInput { name: String }
        ");
        assert!(matches!(
            result,
            Err(SchemaBuildError::Directive(DirectiveError::InvalidManyMutation { .. })),
        ));
    }
}

struct AuditPlugin;
impl SchemaPlugin for AuditPlugin {
    fn name(&self) -> &str {
        "audit"
    }

    fn additional_sdl(&self) -> Option<String> {
        Some("type AuditEntry { message: String! }".to_string())
    }

    fn manipulate(&self, doc: &mut DocumentAst) -> Result<()> {
        if !doc.has_type("AuditEntry") {
            return Err(SchemaBuildError::PluginError {
                message: "AuditEntry missing".to_string(),
                plugin: self.name().to_string(),
            });
        }
        doc.register_class_name("Audit", "AuditEntry");
        Ok(())
    }
}

#[test]
fn plugins_add_sdl_and_manipulate_the_document() -> Result<()> {
    let doc = SchemaBuilder::new(builtins())
        .with_plugin(AuditPlugin)
        .load_str(None, "type Query { ping: Boolean }")
        .build()?;
    assert!(doc.has_type("AuditEntry"));
    assert_eq!(doc.model_name_for_type("AuditEntry"), "Audit");
    Ok(())
}

#[test]
fn content_hash_covers_every_source() {
    let one = SchemaBuilder::new(builtins()).load_str(None, "type Query { a: Int }");
    let same = SchemaBuilder::new(builtins()).load_str(None, "type Query { a: Int }");
    let other = SchemaBuilder::new(builtins())
        .load_str(None, "type Query { a: Int }")
        .load_str(None, "extend type Query { b: Int }");
    assert_eq!(one.content_hash(), same.content_hash());
    assert_ne!(one.content_hash(), other.content_hash());
}

#[test]
fn bare_registry_knows_no_directives() {
    let result = SchemaBuilder::new(Arc::new(DirectiveRegistry::new()))
        .load_str(None, "type Query { users: [String] @all }")
        .build();
    assert!(matches!(
        result,
        Err(SchemaBuildError::Directive(DirectiveError::UnknownDirective { .. })),
    ));
}
