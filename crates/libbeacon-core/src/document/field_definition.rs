use crate::ast;
use crate::document::node::find_directive;
use crate::document::DirectiveUsage;
use crate::document::InputValueDefinition;
use crate::document::Node;
use crate::document::TypeAnnotation;
use crate::loc;
use crate::schema::SchemaBuildError;
use indexmap::IndexMap;
use inherent::inherent;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// A field of an object or interface type.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FieldDefinition {
    pub(crate) arguments: IndexMap<String, InputValueDefinition>,
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
    pub(crate) type_annotation: TypeAnnotation,
}
impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_annotation: TypeAnnotation) -> Self {
        Self {
            arguments: IndexMap::new(),
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
            type_annotation,
        }
    }

    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn with_directive(mut self, usage: DirectiveUsage) -> Self {
        self.directives.push(usage);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.get(name)
    }

    pub fn argument_mut(&mut self, name: &str) -> Option<&mut InputValueDefinition> {
        self.arguments.get_mut(name)
    }

    /// The field's arguments, in the order they were declared.
    pub fn arguments(&self) -> &IndexMap<String, InputValueDefinition> {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut IndexMap<String, InputValueDefinition> {
        &mut self.arguments
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        type_name: &str,
        ast_field: &ast::schema::Field,
    ) -> Result<Self> {
        let location = loc::SourceLocation::from_schema_ast_position(
            file,
            &ast_field.position,
        );
        if ast_field.name.starts_with("__") {
            return Err(SchemaBuildError::InvalidDunderPrefixedFieldName {
                field_name: ast_field.name.clone(),
                location,
                type_name: type_name.to_string(),
            });
        }

        Ok(Self {
            arguments: InputValueDefinition::map_from_ast(
                file,
                &format!("{type_name}.{}", ast_field.name),
                &ast_field.arguments,
            )?,
            description: ast_field.description.clone(),
            directives: DirectiveUsage::list_from_ast(file, &ast_field.directives)?,
            location,
            name: ast_field.name.clone(),
            type_annotation: TypeAnnotation::from_ast_type(&ast_field.field_type),
        })
    }

    pub fn set_type_annotation(&mut self, type_annotation: TypeAnnotation) {
        self.type_annotation = type_annotation;
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}
#[inherent]
impl Node for FieldDefinition {
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
