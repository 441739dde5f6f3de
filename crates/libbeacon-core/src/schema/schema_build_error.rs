use crate::directives::DirectiveError;
use crate::document::TypeKind;
use crate::file_reader::ReadContentError;
use crate::loc;
use crate::schema::SchemaCacheError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SchemaBuildError {
    #[error(transparent)]
    Cache(#[from] SchemaCacheError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("The `@{directive_name}` directive was given the `{argument_name}` argument more than once")]
    DuplicateDirectiveArgument {
        argument_name: String,
        directive_name: String,
        location: loc::SourceLocation,
    },

    #[error("Multiple directives were defined with the name `@{directive_name}`")]
    DuplicateDirectiveDefinition {
        directive_name: String,
        location1: loc::SourceLocation,
        location2: loc::SourceLocation,
    },

    #[error("`{parent_name}` defines `{node_name}` more than once")]
    DuplicateNodeDefinition {
        def1: loc::SourceLocation,
        def2: loc::SourceLocation,
        node_name: String,
        parent_name: String,
    },

    #[error("Multiple GraphQL types with the name `{type_name}` were defined")]
    DuplicateTypeDefinition {
        def1: loc::SourceLocation,
        def2: loc::SourceLocation,
        type_name: String,
    },

    #[error("Attempted to extend `{type_name}`, a type that is not defined elsewhere")]
    ExtensionOfUndefinedType {
        extension_type_loc: loc::SourceLocation,
        type_name: String,
    },

    #[error("Unable to resolve `#import {pattern}` in `{importing_file}`: {message}")]
    ImportResolutionError {
        importing_file: PathBuf,
        message: String,
        pattern: String,
    },

    #[error("Field names must not start with `__`: `{type_name}.{field_name}`")]
    InvalidDunderPrefixedFieldName {
        field_name: String,
        location: loc::SourceLocation,
        type_name: String,
    },

    #[error("Type names must not start with `__`: `{type_name}`")]
    InvalidDunderPrefixedTypeName {
        location: loc::SourceLocation,
        type_name: String,
    },

    #[error(
        "Attempted to extend the {type_kind} `{type_name}` with an \
        extension of a different kind ({extension_kind})"
    )]
    InvalidExtensionType {
        extension_kind: TypeKind,
        extension_loc: loc::SourceLocation,
        type_kind: TypeKind,
        type_name: String,
    },

    #[error("Unable to parse SDL snippet `{snippet}`: {message}")]
    InvalidSnippet {
        message: String,
        snippet: String,
    },

    #[error("No Query type was defined")]
    NoQueryOperationTypeDefined,

    #[error("Error parsing schema {file:?}: {err}")]
    ParseError {
        err: String,
        file: Option<PathBuf>,
    },

    #[error("Schema plugin `{plugin}` failed: {message}")]
    PluginError {
        message: String,
        plugin: String,
    },

    #[error(transparent)]
    SchemaFileReadError(Box<ReadContentError>),

    #[error("`{referenced_by}` references `{type_name}`, which is not defined")]
    UndefinedTypeReference {
        location: loc::SourceLocation,
        referenced_by: String,
        type_name: String,
    },

    #[error("`{type_name}` is used as {expected} by `{referenced_by}`, but it is a {actual}")]
    WrongTypeKind {
        actual: TypeKind,
        expected: &'static str,
        referenced_by: String,
        type_name: String,
    },
}
impl std::convert::From<ReadContentError> for SchemaBuildError {
    fn from(value: ReadContentError) -> Self {
        Self::SchemaFileReadError(Box::new(value))
    }
}
