use crate::ast;
use crate::document::InputValueDefinition;
use crate::loc;
use crate::schema::SchemaBuildError;
use indexmap::IndexMap;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// The places in a GraphQL document where a directive may be written.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum DirectiveLocation {
    ArgumentDefinition,
    Enum,
    EnumValue,
    Field,
    FieldDefinition,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    InputFieldDefinition,
    InputObject,
    Interface,
    Mutation,
    Object,
    Query,
    Scalar,
    Schema,
    Subscription,
    Union,
    VariableDefinition,
}
impl DirectiveLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::Field => "FIELD",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
            Self::InputObject => "INPUT_OBJECT",
            Self::Interface => "INTERFACE",
            Self::Mutation => "MUTATION",
            Self::Object => "OBJECT",
            Self::Query => "QUERY",
            Self::Scalar => "SCALAR",
            Self::Schema => "SCHEMA",
            Self::Subscription => "SUBSCRIPTION",
            Self::Union => "UNION",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "ARGUMENT_DEFINITION" => Self::ArgumentDefinition,
            "ENUM" => Self::Enum,
            "ENUM_VALUE" => Self::EnumValue,
            "FIELD" => Self::Field,
            "FIELD_DEFINITION" => Self::FieldDefinition,
            "FRAGMENT_DEFINITION" => Self::FragmentDefinition,
            "FRAGMENT_SPREAD" => Self::FragmentSpread,
            "INLINE_FRAGMENT" => Self::InlineFragment,
            "INPUT_FIELD_DEFINITION" => Self::InputFieldDefinition,
            "INPUT_OBJECT" => Self::InputObject,
            "INTERFACE" => Self::Interface,
            "MUTATION" => Self::Mutation,
            "OBJECT" => Self::Object,
            "QUERY" => Self::Query,
            "SCALAR" => Self::Scalar,
            "SCHEMA" => Self::Schema,
            "SUBSCRIPTION" => Self::Subscription,
            "UNION" => Self::Union,
            "VARIABLE_DEFINITION" => Self::VariableDefinition,
            _ => return None,
        })
    }
}
impl std::fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `directive @name(...) on ...` declaration.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DirectiveDefinition {
    pub(crate) arguments: IndexMap<String, InputValueDefinition>,
    pub(crate) description: Option<String>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) locations: Vec<DirectiveLocation>,
    pub(crate) name: String,
    pub(crate) repeatable: bool,
}
impl DirectiveDefinition {
    pub fn arguments(&self) -> &IndexMap<String, InputValueDefinition> {
        &self.arguments
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        def: &ast::schema::DirectiveDefinition,
    ) -> Result<Self> {
        let location = loc::SourceLocation::from_schema_ast_position(
            file,
            &def.position,
        );
        let arguments = InputValueDefinition::map_from_ast(
            file,
            &format!("@{}", def.name),
            &def.arguments,
        )?;
        let locations = def.locations.iter().filter_map(|ast_loc| {
            DirectiveLocation::parse(ast_loc.as_str())
        }).collect();

        Ok(Self {
            arguments,
            description: def.description.clone(),
            location,
            locations,
            name: def.name.clone(),
            repeatable: def.repeatable,
        })
    }

    pub fn is_valid_location(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }

    pub fn location(&self) -> &loc::SourceLocation {
        &self.location
    }

    pub fn locations(&self) -> &Vec<DirectiveLocation> {
        &self.locations
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn repeatable(&self) -> bool {
        self.repeatable
    }
}
