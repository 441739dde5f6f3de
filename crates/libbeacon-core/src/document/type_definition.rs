use crate::ast;
use crate::document::node::find_directive;
use crate::document::DirectiveUsage;
use crate::document::EnumValueDefinition;
use crate::document::FieldDefinition;
use crate::document::InputValueDefinition;
use crate::document::Node;
use crate::loc;
use crate::schema::SchemaBuildError;
use indexmap::IndexMap;
use inherent::inherent;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// The kind of a [`TypeDefinition`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum TypeKind {
    Enum,
    InputObject,
    Interface,
    Object,
    Scalar,
    Union,
}
impl TypeKind {
    /// The SDL keyword that introduces a definition of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::InputObject => "input",
            Self::Interface => "interface",
            Self::Object => "type",
            Self::Scalar => "scalar",
            Self::Union => "union",
        }
    }
}
impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A named type of the document, or the payload of a type extension.
///
/// Extensions are represented with the same shape as the definition they
/// extend so they can be manipulated with the same code and then merged.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum TypeDefinition {
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Interface(ObjectOrInterfaceTypeDefinition),
    Object(ObjectOrInterfaceTypeDefinition),
    Scalar(ScalarTypeDefinition),
    Union(UnionTypeDefinition),
}
impl TypeDefinition {
    pub fn as_enum(&self) -> Option<&EnumTypeDefinition> {
        if let Self::Enum(def) = self { Some(def) } else { None }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumTypeDefinition> {
        if let Self::Enum(def) = self { Some(def) } else { None }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectTypeDefinition> {
        if let Self::InputObject(def) = self { Some(def) } else { None }
    }

    pub fn as_input_object_mut(&mut self) -> Option<&mut InputObjectTypeDefinition> {
        if let Self::InputObject(def) = self { Some(def) } else { None }
    }

    pub fn as_object(&self) -> Option<&ObjectOrInterfaceTypeDefinition> {
        if let Self::Object(def) = self { Some(def) } else { None }
    }

    /// Either an object or an interface type; both carry output fields.
    pub fn as_object_like(&self) -> Option<&ObjectOrInterfaceTypeDefinition> {
        match self {
            Self::Interface(def) | Self::Object(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_object_like_mut(&mut self) -> Option<&mut ObjectOrInterfaceTypeDefinition> {
        match self {
            Self::Interface(def) | Self::Object(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionTypeDefinition> {
        if let Self::Union(def) = self { Some(def) } else { None }
    }

    pub fn as_union_mut(&mut self) -> Option<&mut UnionTypeDefinition> {
        if let Self::Union(def) = self { Some(def) } else { None }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
            Self::Interface(_) => TypeKind::Interface,
            Self::Object(_) => TypeKind::Object,
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Union(_) => TypeKind::Union,
        }
    }

    fn check_type_name(
        name: &str,
        file: Option<&Path>,
        pos: &graphql_parser::Pos,
    ) -> Result<()> {
        if name.starts_with("__") {
            return Err(SchemaBuildError::InvalidDunderPrefixedTypeName {
                location: loc::SourceLocation::from_schema_ast_position(file, pos),
                type_name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn from_ast(
        file: Option<&Path>,
        ast_def: &ast::schema::TypeDefinition,
    ) -> Result<Self> {
        use graphql_parser::schema::TypeDefinition as AstDef;
        Ok(match ast_def {
            AstDef::Enum(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::Enum(EnumTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    name: def.name.clone(),
                    values: enum_values_from_ast(file, &def.name, &def.values)?,
                })
            },

            AstDef::InputObject(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::InputObject(InputObjectTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    fields: InputValueDefinition::map_from_ast(file, &def.name, &def.fields)?,
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    name: def.name.clone(),
                })
            },

            AstDef::Interface(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::Interface(ObjectOrInterfaceTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    fields: fields_from_ast(file, &def.name, &def.fields)?,
                    interfaces: def.implements_interfaces.clone(),
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    name: def.name.clone(),
                })
            },

            AstDef::Object(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::Object(ObjectOrInterfaceTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    fields: fields_from_ast(file, &def.name, &def.fields)?,
                    interfaces: def.implements_interfaces.clone(),
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    name: def.name.clone(),
                })
            },

            AstDef::Scalar(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::Scalar(ScalarTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    name: def.name.clone(),
                })
            },

            AstDef::Union(def) => {
                Self::check_type_name(&def.name, file, &def.position)?;
                Self::Union(UnionTypeDefinition {
                    description: def.description.clone(),
                    directives: DirectiveUsage::list_from_ast(file, &def.directives)?,
                    location: loc::SourceLocation::from_schema_ast_position(file, &def.position),
                    members: union_members_from_ast(file, &def.name, &def.position, &def.types)?,
                    name: def.name.clone(),
                })
            },
        })
    }

    pub(crate) fn from_ast_extension(
        file: Option<&Path>,
        ast_ext: &ast::schema::TypeExtension,
    ) -> Result<Self> {
        use graphql_parser::schema::TypeExtension as AstExt;
        Ok(match ast_ext {
            AstExt::Enum(ext) => Self::Enum(EnumTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                name: ext.name.clone(),
                values: enum_values_from_ast(file, &ext.name, &ext.values)?,
            }),

            AstExt::InputObject(ext) => Self::InputObject(InputObjectTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                fields: InputValueDefinition::map_from_ast(file, &ext.name, &ext.fields)?,
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                name: ext.name.clone(),
            }),

            AstExt::Interface(ext) => Self::Interface(ObjectOrInterfaceTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                fields: fields_from_ast(file, &ext.name, &ext.fields)?,
                interfaces: vec![],
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                name: ext.name.clone(),
            }),

            AstExt::Object(ext) => Self::Object(ObjectOrInterfaceTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                fields: fields_from_ast(file, &ext.name, &ext.fields)?,
                interfaces: ext.implements_interfaces.clone(),
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                name: ext.name.clone(),
            }),

            AstExt::Scalar(ext) => Self::Scalar(ScalarTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                name: ext.name.clone(),
            }),

            AstExt::Union(ext) => Self::Union(UnionTypeDefinition {
                description: None,
                directives: DirectiveUsage::list_from_ast(file, &ext.directives)?,
                location: loc::SourceLocation::from_schema_ast_position(file, &ext.position),
                members: union_members_from_ast(file, &ext.name, &ext.position, &ext.types)?,
                name: ext.name.clone(),
            }),
        })
    }
}
#[inherent]
impl Node for TypeDefinition {
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Enum(def) => def.description(),
            Self::InputObject(def) => def.description(),
            Self::Interface(def) | Self::Object(def) => def.description(),
            Self::Scalar(def) => def.description(),
            Self::Union(def) => def.description(),
        }
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveUsage> {
        find_directive(self.directives(), name)
    }

    pub fn directives(&self) -> &Vec<DirectiveUsage> {
        match self {
            Self::Enum(def) => &def.directives,
            Self::InputObject(def) => &def.directives,
            Self::Interface(def) | Self::Object(def) => &def.directives,
            Self::Scalar(def) => &def.directives,
            Self::Union(def) => &def.directives,
        }
    }

    pub fn directives_mut(&mut self) -> &mut Vec<DirectiveUsage> {
        match self {
            Self::Enum(def) => &mut def.directives,
            Self::InputObject(def) => &mut def.directives,
            Self::Interface(def) | Self::Object(def) => &mut def.directives,
            Self::Scalar(def) => &mut def.directives,
            Self::Union(def) => &mut def.directives,
        }
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    pub fn location(&self) -> &loc::SourceLocation {
        match self {
            Self::Enum(def) => &def.location,
            Self::InputObject(def) => &def.location,
            Self::Interface(def) | Self::Object(def) => &def.location,
            Self::Scalar(def) => &def.location,
            Self::Union(def) => &def.location,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
            Self::Interface(def) | Self::Object(def) => &def.name,
            Self::Scalar(def) => &def.name,
            Self::Union(def) => &def.name,
        }
    }
}

fn fields_from_ast(
    file: Option<&Path>,
    type_name: &str,
    ast_fields: &[ast::schema::Field],
) -> Result<IndexMap<String, FieldDefinition>> {
    let mut fields = IndexMap::<String, FieldDefinition>::new();
    for ast_field in ast_fields {
        let field = FieldDefinition::from_ast(file, type_name, ast_field)?;
        if let Some(existing) = fields.get(&field.name) {
            return Err(SchemaBuildError::DuplicateNodeDefinition {
                def1: existing.location.clone(),
                def2: field.location,
                node_name: field.name,
                parent_name: type_name.to_string(),
            });
        }
        fields.insert(field.name.clone(), field);
    }
    Ok(fields)
}

fn enum_values_from_ast(
    file: Option<&Path>,
    type_name: &str,
    ast_values: &[ast::schema::EnumValue],
) -> Result<IndexMap<String, EnumValueDefinition>> {
    let mut values = IndexMap::<String, EnumValueDefinition>::new();
    for ast_value in ast_values {
        let value = EnumValueDefinition::from_ast(file, ast_value)?;
        if let Some(existing) = values.get(&value.name) {
            return Err(SchemaBuildError::DuplicateNodeDefinition {
                def1: existing.location.clone(),
                def2: value.location,
                node_name: value.name,
                parent_name: type_name.to_string(),
            });
        }
        values.insert(value.name.clone(), value);
    }
    Ok(values)
}

fn union_members_from_ast(
    file: Option<&Path>,
    type_name: &str,
    pos: &graphql_parser::Pos,
    ast_members: &[String],
) -> Result<Vec<String>> {
    let mut members: Vec<String> = vec![];
    for member in ast_members {
        if members.contains(member) {
            let location = loc::SourceLocation::from_schema_ast_position(file, pos);
            return Err(SchemaBuildError::DuplicateNodeDefinition {
                def1: location.clone(),
                def2: location,
                node_name: member.clone(),
                parent_name: type_name.to_string(),
            });
        }
        members.push(member.clone());
    }
    Ok(members)
}

macro_rules! impl_node_for_type_definition {
    ($type:ty) => {
        #[inherent]
        impl Node for $type {
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
    };
}

/// Object and interface types share a shape: named output fields plus the
/// interfaces they implement.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ObjectOrInterfaceTypeDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) fields: IndexMap<String, FieldDefinition>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
}
impl ObjectOrInterfaceTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            fields: IndexMap::new(),
            interfaces: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldDefinition> {
        self.fields.get_mut(name)
    }

    /// Fields in declaration order, followed by fields added through
    /// extensions in the order the extensions were merged.
    pub fn fields(&self) -> &IndexMap<String, FieldDefinition> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut IndexMap<String, FieldDefinition> {
        &mut self.fields
    }

    pub fn interfaces(&self) -> &Vec<String> {
        &self.interfaces
    }
}
impl_node_for_type_definition!(ObjectOrInterfaceTypeDefinition);

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct InputObjectTypeDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) fields: IndexMap<String, InputValueDefinition>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
}
impl InputObjectTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            fields: IndexMap::new(),
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
        }
    }

    pub fn with_field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut InputValueDefinition> {
        self.fields.get_mut(name)
    }

    pub fn fields(&self) -> &IndexMap<String, InputValueDefinition> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut IndexMap<String, InputValueDefinition> {
        &mut self.fields
    }
}
impl_node_for_type_definition!(InputObjectTypeDefinition);

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EnumTypeDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
    pub(crate) values: IndexMap<String, EnumValueDefinition>,
}
impl EnumTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, value: EnumValueDefinition) -> Self {
        self.values.insert(value.name.clone(), value);
        self
    }

    pub fn values(&self) -> &IndexMap<String, EnumValueDefinition> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut IndexMap<String, EnumValueDefinition> {
        &mut self.values
    }
}
impl_node_for_type_definition!(EnumTypeDefinition);

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UnionTypeDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) members: Vec<String>,
    pub(crate) name: String,
}
impl UnionTypeDefinition {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            members,
            name: name.into(),
        }
    }

    pub fn members(&self) -> &Vec<String> {
        &self.members
    }
}
impl_node_for_type_definition!(UnionTypeDefinition);

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ScalarTypeDefinition {
    pub(crate) description: Option<String>,
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) name: String,
}
impl ScalarTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            description: None,
            directives: vec![],
            location: loc::SourceLocation::Synthesized,
            name: name.into(),
        }
    }
}
impl_node_for_type_definition!(ScalarTypeDefinition);
