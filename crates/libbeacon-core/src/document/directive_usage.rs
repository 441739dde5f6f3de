use crate::ast;
use crate::directives::DirectiveError;
use crate::loc;
use crate::schema::SchemaBuildError;
use crate::Value;
use indexmap::IndexMap;
use std::path::Path;

/// A single `@name(arg: value)` annotation attached to a node.
///
/// Argument values are kept exactly as written; defaults declared on the
/// directive's definition are not filled in.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DirectiveUsage {
    pub(crate) arguments: IndexMap<String, Value>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
}
impl DirectiveUsage {
    /// Creates a synthesized usage with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            arguments: IndexMap::new(),
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        ast_directive: &ast::schema::Directive,
    ) -> Result<Self, SchemaBuildError> {
        let location = loc::SourceLocation::from_schema_ast_position(
            file,
            &ast_directive.position,
        );
        let mut arguments = IndexMap::new();
        for (arg_name, arg_value) in ast_directive.arguments.iter() {
            if arguments.insert(arg_name.clone(), Value::from_ast(arg_value)).is_some() {
                return Err(SchemaBuildError::DuplicateDirectiveArgument {
                    argument_name: arg_name.clone(),
                    directive_name: ast_directive.name.clone(),
                    location,
                });
            }
        }

        Ok(Self {
            arguments,
            location,
            name: ast_directive.name.clone(),
        })
    }

    pub(crate) fn list_from_ast(
        file: Option<&Path>,
        ast_directives: &[ast::schema::Directive],
    ) -> Result<Vec<Self>, SchemaBuildError> {
        ast_directives.iter()
            .map(|ast_directive| Self::from_ast(file, ast_directive))
            .collect()
    }

    pub fn location(&self) -> &loc::SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    fn invalid_argument(&self, argument_name: &str, expected: &str) -> DirectiveError {
        DirectiveError::InvalidArgument {
            argument_name: argument_name.to_string(),
            directive_name: self.name.clone(),
            message: format!("expected {expected}"),
        }
    }

    pub fn bool_arg(&self, name: &str) -> Result<Option<bool>, DirectiveError> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_bool()
                .map(Some)
                .ok_or_else(|| self.invalid_argument(name, "a Boolean")),
        }
    }

    pub fn float_arg(&self, name: &str) -> Result<Option<f64>, DirectiveError> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid_argument(name, "a Float")),
        }
    }

    pub fn int_arg(&self, name: &str) -> Result<Option<i64>, DirectiveError> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid_argument(name, "an Int")),
        }
    }

    pub fn string_arg(&self, name: &str) -> Result<Option<&str>, DirectiveError> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_str()
                .map(Some)
                .ok_or_else(|| self.invalid_argument(name, "a String")),
        }
    }

    pub fn required_string_arg(&self, name: &str) -> Result<&str, DirectiveError> {
        self.string_arg(name)?.ok_or_else(|| DirectiveError::MissingRequiredArgument {
            argument_name: name.to_string(),
            directive_name: self.name.clone(),
            location: self.location.clone(),
        })
    }

    /// Reads a `[String!]` argument. A lone string is coerced into a list
    /// of one, per GraphQL input coercion.
    pub fn string_list_arg(&self, name: &str) -> Result<Option<Vec<String>>, DirectiveError> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::List(items)) => items.iter()
                .map(|item| item.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| self.invalid_argument(name, "a list of Strings")))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(value) => value.as_str()
                .map(|s| Some(vec![s.to_string()]))
                .ok_or_else(|| self.invalid_argument(name, "a list of Strings")),
        }
    }
}
