use crate::ast;
use crate::document::node::find_directive;
use crate::document::DirectiveUsage;
use crate::document::Node;
use crate::document::TypeAnnotation;
use crate::loc;
use crate::schema::SchemaBuildError;
use crate::Value;
use indexmap::IndexMap;
use inherent::inherent;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// An argument of a field or directive, or a field of an input object type.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct InputValueDefinition {
    pub(crate) default_value: Option<Value>,
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
    pub(crate) type_annotation: TypeAnnotation,
}
impl InputValueDefinition {
    pub fn new(name: impl Into<String>, type_annotation: TypeAnnotation) -> Self {
        Self {
            default_value: None,
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
            type_annotation,
        }
    }

    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_directive(mut self, usage: DirectiveUsage) -> Self {
        self.directives.push(usage);
        self
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        ast_input: &ast::schema::InputValue,
    ) -> Result<Self> {
        Ok(Self {
            default_value: ast_input.default_value.as_ref().map(Value::from_ast),
            description: ast_input.description.clone(),
            directives: DirectiveUsage::list_from_ast(file, &ast_input.directives)?,
            location: loc::SourceLocation::from_schema_ast_position(
                file,
                &ast_input.position,
            ),
            name: ast_input.name.clone(),
            type_annotation: TypeAnnotation::from_ast_type(&ast_input.value_type),
        })
    }

    /// Converts a list of AST input values into an ordered map, rejecting
    /// duplicated names.
    pub(crate) fn map_from_ast(
        file: Option<&Path>,
        parent_name: &str,
        ast_inputs: &[ast::schema::InputValue],
    ) -> Result<IndexMap<String, Self>> {
        let mut inputs = IndexMap::<String, Self>::new();
        for ast_input in ast_inputs {
            let input = Self::from_ast(file, ast_input)?;
            if let Some(existing) = inputs.get(&input.name) {
                return Err(SchemaBuildError::DuplicateNodeDefinition {
                    def1: existing.location.clone(),
                    def2: input.location,
                    node_name: input.name,
                    parent_name: parent_name.to_string(),
                });
            }
            inputs.insert(input.name.clone(), input);
        }
        Ok(inputs)
    }

    pub fn set_type_annotation(&mut self, type_annotation: TypeAnnotation) {
        self.type_annotation = type_annotation;
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}
#[inherent]
impl Node for InputValueDefinition {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveUsage> {
        find_directive(&self.directives, name)
    }

    pub fn directives(&self) -> &Vec<DirectiveUsage> {
        &self.directives
    }

    pub fn directives_mut(&mut self) -> &mut Vec<DirectiveUsage> {
        &mut self.directives
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    pub fn location(&self) -> &loc::SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
