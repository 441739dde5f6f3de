use crate::ast;
use crate::document::node::find_directive;
use crate::document::DirectiveUsage;
use crate::document::Node;
use crate::loc;
use crate::schema::SchemaBuildError;
use inherent::inherent;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EnumValueDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
}
impl EnumValueDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
        }
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        ast_value: &ast::schema::EnumValue,
    ) -> Result<Self, SchemaBuildError> {
        Ok(Self {
            description: ast_value.description.clone(),
            directives: DirectiveUsage::list_from_ast(file, &ast_value.directives)?,
            location: loc::SourceLocation::from_schema_ast_position(
                file,
                &ast_value.position,
            ),
            name: ast_value.name.clone(),
        })
    }
}
#[inherent]
impl Node for EnumValueDefinition {
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
