use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::directives::FieldResolverDirective;
use crate::document::ast_helpers;
use crate::document::DirectiveUsage;
use crate::schema::SchemaBuildError;

type Result<T> = std::result::Result<T, DirectiveError>;

/// Claims a capability it never hands out.
struct Broken;
impl Directive for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn definition(&self) -> &str {
        "directive @broken on FIELD_DEFINITION"
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldResolver]
    }
}

/// Declares a different name in its SDL than it reports.
struct Misnamed;
impl Directive for Misnamed {
    fn name(&self) -> &str {
        "upper"
    }

    fn definition(&self) -> &str {
        "directive @lower on FIELD_DEFINITION"
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[]
    }
}

/// A replacement for the built-in `@all`.
struct CustomAll;
impl Directive for CustomAll {
    fn name(&self) -> &str {
        "all"
    }

    fn definition(&self) -> &str {
        "directive @all(source: String) on FIELD_DEFINITION"
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[]
    }
}

fn usages(sdl: &str) -> Vec<DirectiveUsage> {
    sdl.split_whitespace()
        .map(|usage| ast_helpers::parse_directive_usage(usage).unwrap())
        .collect()
}

#[test]
fn builtins_cover_the_directive_library() -> Result<()> {
    let registry = DirectiveRegistry::with_builtins()?;
    for name in [
        "all", "belongsTo", "belongsToMany", "builder", "can", "complexity",
        "convertEmptyStringsToNull", "count", "create", "createMany", "delete",
        "drop", "eq", "field", "find", "first", "globalId", "guard", "hasMany",
        "hasOne", "hash", "in", "inject", "like", "limit", "model", "namespace",
        "neq", "nest", "notIn", "orderBy", "paginate", "rename", "rules", "scope",
        "spread", "throttle", "trim", "update", "updateMany", "upsert",
        "upsertMany", "where", "whereBetween", "with",
    ] {
        assert!(registry.contains(name), "missing @{name}");
    }
    Ok(())
}

#[test]
fn graphql_builtins_are_known_but_not_registered() {
    let registry = DirectiveRegistry::new();
    assert!(registry.is_graphql_builtin("deprecated"));
    assert!(registry.definition("deprecated").is_some());
    assert!(!registry.contains("deprecated"));
    assert_eq!(registry.names().count(), 0);
}

#[test]
fn capabilities_must_be_provided() {
    let mut registry = DirectiveRegistry::new();
    assert_eq!(
        registry.register(Broken),
        Err(DirectiveError::CapabilityNotProvided {
            capability: DirectiveCapability::FieldResolver,
            directive_name: "broken".to_string(),
        }),
    );
}

#[test]
fn definition_must_declare_the_directive() {
    let mut registry = DirectiveRegistry::new();
    assert!(matches!(
        registry.register(Misnamed),
        Err(DirectiveError::InvalidDefinition { directive_name, .. }) if directive_name == "upper",
    ));
}

#[test]
fn registering_again_replaces_the_builtin() -> Result<()> {
    let mut registry = DirectiveRegistry::with_builtins()?;
    registry.register(CustomAll)?;
    let def = registry.definition("all").unwrap();
    assert!(def.arguments().contains_key("source"));
    assert!(registry.resolve("all").unwrap().directive().as_field_resolver().is_none());
    Ok(())
}

#[test]
fn associated_of_type_keeps_source_order() -> Result<()> {
    let registry = DirectiveRegistry::with_builtins()?;
    let bound = registry.associated_of_type(
        &usages("@trim @deprecated @rules(apply:[\"required\"]) @convertEmptyStringsToNull"),
        DirectiveCapability::ArgSanitizer,
    )?;
    let names: Vec<&str> = bound.iter().map(|b| b.usage().name()).collect();
    assert_eq!(names, vec!["trim", "convertEmptyStringsToNull"]);
    Ok(())
}

#[test]
fn unknown_usages_are_errors() -> Result<()> {
    let registry = DirectiveRegistry::with_builtins()?;
    let result = registry.associated_of_type(&usages("@mystery"), DirectiveCapability::FieldResolver);
    assert!(matches!(result, Err(DirectiveError::UnknownDirective { .. })));
    Ok(())
}

#[test]
fn exclusive_of_type_rejects_two_resolvers() -> Result<()> {
    let registry = DirectiveRegistry::with_builtins()?;
    let result = registry.exclusive_of_type(
        &usages("@all @first"),
        DirectiveCapability::FieldResolver,
        "Query.users",
    );
    assert!(matches!(
        result,
        Err(DirectiveError::ExclusiveCapabilityViolation { directive_names, .. })
            if directive_names == vec!["all".to_string(), "first".to_string()],
    ));

    let single = registry.exclusive_of_type(
        &usages("@all @guard"),
        DirectiveCapability::FieldResolver,
        "Query.users",
    )?;
    assert_eq!(single.map(|b| b.usage().name().to_string()), Some("all".to_string()));
    Ok(())
}

#[test]
fn usage_validation_reaches_the_directive() -> std::result::Result<(), SchemaBuildError> {
    let registry = DirectiveRegistry::with_builtins()?;
    let usage = ast_helpers::parse_directive_usage(r#"@rules(apply: ["required", "shiny"])"#)?;
    let rules = registry.resolve("rules").unwrap().directive();
    assert!(matches!(
        rules.validate_usage(&usage),
        Err(DirectiveError::InvalidArgument { message, .. }) if message == "unknown rule `shiny`",
    ));

    let throttle = ast_helpers::parse_directive_usage("@throttle(maxAttempts: 0)")?;
    assert!(registry.resolve("throttle").unwrap().directive().validate_usage(&throttle).is_err());
    let throttle = ast_helpers::parse_directive_usage("@throttle(maxAttempts: 5000000000)")?;
    assert!(registry.resolve("throttle").unwrap().directive().validate_usage(&throttle).is_err());
    Ok(())
}

#[test]
fn field_resolver_directives_expose_their_role() -> Result<()> {
    let registry = DirectiveRegistry::with_builtins()?;
    let find = registry.resolve("find").unwrap().directive();
    let resolver: Option<&dyn FieldResolverDirective> = find.as_field_resolver();
    assert!(resolver.is_some());
    Ok(())
}
