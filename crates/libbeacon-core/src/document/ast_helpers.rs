//! Helpers for building document nodes out of small SDL snippets, for use
//! by schema manipulators.

use crate::document::DirectiveDefinition;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::InputValueDefinition;
use crate::document::TypeAnnotation;
use crate::document::TypeDefinition;
use crate::loc;
use crate::schema::SchemaBuildError;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn invalid_snippet(snippet: &str, message: &str) -> SchemaBuildError {
    SchemaBuildError::InvalidSnippet {
        message: message.to_string(),
        snippet: snippet.to_string(),
    }
}

fn parse_wrapped(snippet: &str, wrapped: &str) -> Result<DocumentAst> {
    DocumentAst::from_source(wrapped, None).map_err(|err| match err {
        SchemaBuildError::ParseError { err, .. } => invalid_snippet(snippet, &err),
        err => err,
    })
}

/// Parses a single type definition, e.g. `type User { id: ID! }`.
pub fn parse_type_definition(sdl: &str) -> Result<TypeDefinition> {
    let mut doc = parse_wrapped(sdl, sdl)?;
    if doc.types.len() != 1 || !doc.type_extensions.is_empty() {
        return Err(invalid_snippet(sdl, "expected exactly one type definition"));
    }
    let (_, mut def) = doc.types.pop()
        .ok_or_else(|| invalid_snippet(sdl, "expected exactly one type definition"))?;
    match &mut def {
        TypeDefinition::Enum(def) => def.location = loc::SourceLocation::Synthesized,
        TypeDefinition::InputObject(def) => def.location = loc::SourceLocation::Synthesized,
        TypeDefinition::Interface(def) | TypeDefinition::Object(def) =>
            def.location = loc::SourceLocation::Synthesized,
        TypeDefinition::Scalar(def) => def.location = loc::SourceLocation::Synthesized,
        TypeDefinition::Union(def) => def.location = loc::SourceLocation::Synthesized,
    }
    Ok(def)
}

/// Parses a single field definition, e.g. `posts(first: Int!): [Post!]!`.
pub fn parse_field_definition(sdl: &str) -> Result<FieldDefinition> {
    let doc = parse_wrapped(sdl, &format!("type Snippet {{ {sdl} }}"))?;
    let fields = doc.types.get("Snippet")
        .and_then(|def| def.as_object_like())
        .map(|obj| obj.fields.clone())
        .unwrap_or_default();
    if fields.len() != 1 {
        return Err(invalid_snippet(sdl, "expected exactly one field definition"));
    }
    let (_, mut field) = fields.into_iter().next()
        .ok_or_else(|| invalid_snippet(sdl, "expected exactly one field definition"))?;
    field.location = loc::SourceLocation::Synthesized;
    Ok(field)
}

/// Parses a single argument or input field definition, e.g.
/// `first: Int! = 15`.
pub fn parse_input_value_definition(sdl: &str) -> Result<InputValueDefinition> {
    let doc = parse_wrapped(sdl, &format!("input Snippet {{ {sdl} }}"))?;
    let fields = doc.types.get("Snippet")
        .and_then(|def| def.as_input_object())
        .map(|input| input.fields.clone())
        .unwrap_or_default();
    if fields.len() != 1 {
        return Err(invalid_snippet(sdl, "expected exactly one input value definition"));
    }
    let (_, mut input) = fields.into_iter().next()
        .ok_or_else(|| invalid_snippet(sdl, "expected exactly one input value definition"))?;
    input.location = loc::SourceLocation::Synthesized;
    Ok(input)
}

/// Parses a type reference, e.g. `[User!]!`.
pub fn parse_type_annotation(sdl: &str) -> Result<TypeAnnotation> {
    Ok(parse_field_definition(&format!("snippet: {sdl}"))?.type_annotation)
}

/// Parses a single directive usage, e.g. `@paginate(type: CONNECTION)`.
pub fn parse_directive_usage(sdl: &str) -> Result<DirectiveUsage> {
    let def = parse_type_definition(&format!("scalar Snippet {sdl}"))?;
    let mut directives = match def {
        TypeDefinition::Scalar(def) => def.directives,
        _ => vec![],
    };
    if directives.len() != 1 {
        return Err(invalid_snippet(sdl, "expected exactly one directive"));
    }
    let mut usage = directives.remove(0);
    usage.location = loc::SourceLocation::Synthesized;
    Ok(usage)
}

/// Parses a single directive definition, e.g.
/// `directive @upper on FIELD_DEFINITION`.
pub fn parse_directive_definition(sdl: &str) -> Result<DirectiveDefinition> {
    let mut doc = parse_wrapped(sdl, sdl)?;
    match doc.directive_definitions.pop() {
        Some((_, def)) if doc.directive_definitions.is_empty() => Ok(def),
        _ => Err(invalid_snippet(sdl, "expected exactly one directive definition")),
    }
}
