use crate::ast;
use crate::document::DirectiveDefinition;
use crate::document::DirectiveUsage;
use crate::document::FieldDefinition;
use crate::document::Node;
use crate::document::TypeDefinition;
use crate::document::TypeKind;
use crate::loc;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaCacheError;
use indexmap::IndexMap;
use sha2::Digest;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// Scalars every GraphQL schema has without declaring them.
pub const BUILTIN_SCALAR_NAMES: [&str; 5] = [
    "Boolean",
    "Float",
    "ID",
    "Int",
    "String",
];

/// A `schema { query: ... }` block.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SchemaExtension {
    pub(crate) directives: Vec<DirectiveUsage>,
    pub(crate) location: loc::SourceLocation,
    pub(crate) mutation: Option<String>,
    pub(crate) query: Option<String>,
    pub(crate) subscription: Option<String>,
}
impl SchemaExtension {
    pub fn directives(&self) -> &Vec<DirectiveUsage> {
        &self.directives
    }

    pub fn location(&self) -> &loc::SourceLocation {
        &self.location
    }

    pub fn mutation(&self) -> Option<&str> {
        self.mutation.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn subscription(&self) -> Option<&str> {
        self.subscription.as_deref()
    }
}

/// A mutable, serializable representation of an SDL schema.
///
/// While building, type extensions are kept apart from the definitions
/// they extend. Once [`SchemaBuilder::build()`](crate::schema::SchemaBuilder::build)
/// returns, every extension has been merged into its base type and
/// [`DocumentAst::type_extensions()`] is empty.
///
/// Types, fields, arguments, and directive definitions are all stored in
/// ordered maps: iteration yields them in the order they were first
/// declared (followed by anything merged or synthesized later).
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DocumentAst {
    pub(crate) class_name_to_type_names: IndexMap<String, Vec<String>>,
    pub(crate) content_hash: String,
    pub(crate) directive_definitions: IndexMap<String, DirectiveDefinition>,
    pub(crate) schema_extensions: Vec<SchemaExtension>,
    pub(crate) type_extensions: IndexMap<String, Vec<TypeDefinition>>,
    pub(crate) types: IndexMap<String, TypeDefinition>,
}
impl DocumentAst {
    /// Parses SDL into a fresh document. The document's content hash is
    /// the SHA-256 of `sdl`.
    pub fn from_source(sdl: &str, file: Option<&Path>) -> Result<Self> {
        let mut doc = Self::default();
        doc.add_source(sdl, file)?;
        doc.content_hash = content_hash(sdl);
        Ok(doc)
    }

    /// Parses SDL and adds its definitions to this document. Definitions
    /// go into the types map, extensions are bucketed by the name of the
    /// type they extend.
    pub fn add_source(&mut self, sdl: &str, file: Option<&Path>) -> Result<()> {
        let ast_doc = ast::schema::parse(sdl)
            .map_err(|err| SchemaBuildError::ParseError {
                err: err.to_string(),
                file: file.map(|f| f.to_path_buf()),
            })?;

        use graphql_parser::schema::Definition;
        for def in ast_doc.definitions.iter() {
            match def {
                Definition::DirectiveDefinition(ast_def) => {
                    let def = DirectiveDefinition::from_ast(file, ast_def)?;
                    self.add_directive_definition(def)?;
                },

                Definition::SchemaDefinition(ast_def) =>
                    self.schema_extensions.push(SchemaExtension {
                        directives: DirectiveUsage::list_from_ast(file, &ast_def.directives)?,
                        location: loc::SourceLocation::from_schema_ast_position(
                            file,
                            &ast_def.position,
                        ),
                        mutation: ast_def.mutation.clone(),
                        query: ast_def.query.clone(),
                        subscription: ast_def.subscription.clone(),
                    }),

                Definition::TypeDefinition(ast_def) => {
                    let def = TypeDefinition::from_ast(file, ast_def)?;
                    self.add_type_definition(def)?;
                },

                Definition::TypeExtension(ast_ext) => {
                    let ext = TypeDefinition::from_ast_extension(file, ast_ext)?;
                    self.type_extensions
                        .entry(ext.name().to_string())
                        .or_default()
                        .push(ext);
                },
            }
        }

        Ok(())
    }

    /// Adds a directive definition, rejecting a second definition with the
    /// same name.
    pub fn add_directive_definition(&mut self, def: DirectiveDefinition) -> Result<()> {
        if let Some(existing) = self.directive_definitions.get(def.name()) {
            return Err(SchemaBuildError::DuplicateDirectiveDefinition {
                directive_name: def.name.clone(),
                location1: existing.location.clone(),
                location2: def.location,
            });
        }
        self.directive_definitions.insert(def.name.clone(), def);
        Ok(())
    }

    /// Adds a type definition, rejecting a second definition with the same
    /// name. Use [`DocumentAst::set_type_definition()`] to replace.
    pub fn add_type_definition(&mut self, def: TypeDefinition) -> Result<()> {
        if let Some(existing) = self.types.get(def.name()) {
            return Err(SchemaBuildError::DuplicateTypeDefinition {
                def1: existing.location().clone(),
                def2: def.location().clone(),
                type_name: def.name().to_string(),
            });
        }
        self.types.insert(def.name().to_string(), def);
        Ok(())
    }

    /// Maps model class names to the object type names that represent them
    /// (populated by `@model`).
    pub fn class_name_to_type_names(&self) -> &IndexMap<String, Vec<String>> {
        &self.class_name_to_type_names
    }

    pub fn content_hash(&self) -> &str {
        self.content_hash.as_str()
    }

    pub fn directive_definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directive_definitions.get(name)
    }

    pub fn directive_definitions(&self) -> &IndexMap<String, DirectiveDefinition> {
        &self.directive_definitions
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.types.get(type_name)?.as_object_like()?.field(field_name)
    }

    pub fn field_mut(&mut self, type_name: &str, field_name: &str) -> Option<&mut FieldDefinition> {
        self.types.get_mut(type_name)?.as_object_like_mut()?.field_mut(field_name)
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, SchemaCacheError> {
        bincode::serde::decode_from_slice::<Self, _>(bytes, bincode::config::standard())
            .map(|(doc, _)| doc)
            .map_err(|err| SchemaCacheError::Decode(err.to_string()))
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name) || BUILTIN_SCALAR_NAMES.contains(&name)
    }

    pub fn is_builtin_scalar(name: &str) -> bool {
        BUILTIN_SCALAR_NAMES.contains(&name)
    }

    /// Enum types, scalar types, and the builtin scalars.
    pub fn is_leaf_type(&self, name: &str) -> bool {
        match self.types.get(name) {
            Some(def) => matches!(def.kind(), TypeKind::Enum | TypeKind::Scalar),
            None => Self::is_builtin_scalar(name),
        }
    }

    pub fn is_input_object_type(&self, name: &str) -> bool {
        self.types.get(name).is_some_and(|def| def.kind() == TypeKind::InputObject)
    }

    /// The model class a type represents: the class named by its `@model`
    /// registration, or the type's own name.
    pub fn model_name_for_type(&self, type_name: &str) -> String {
        self.class_name_to_type_names.iter()
            .find(|(_, type_names)| type_names.iter().any(|name| name == type_name))
            .map(|(class, _)| class.clone())
            .unwrap_or_else(|| type_name.to_string())
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.root_type_name("Mutation", |ext| ext.mutation())
    }

    /// The object types a value of `type_name` may concretely be: the
    /// members of a union, the implementors of an interface, or the type
    /// itself.
    pub fn possible_type_names(&self, type_name: &str) -> Vec<&str> {
        match self.types.get(type_name) {
            Some(TypeDefinition::Union(def)) =>
                def.members().iter().map(|name| name.as_str()).collect(),
            Some(TypeDefinition::Interface(_)) =>
                self.types.values()
                    .filter_map(|def| def.as_object())
                    .filter(|obj| obj.interfaces().iter().any(|iface| iface == type_name))
                    .map(|obj| obj.name())
                    .collect(),
            Some(def) => vec![def.name()],
            None => vec![],
        }
    }

    pub fn query_type_name(&self) -> Option<&str> {
        self.root_type_name("Query", |ext| ext.query())
    }

    /// Associates an object type with a model class.
    pub fn register_class_name(&mut self, class_name: &str, type_name: &str) {
        let type_names = self.class_name_to_type_names
            .entry(class_name.to_string())
            .or_default();
        if !type_names.iter().any(|name| name == type_name) {
            type_names.push(type_name.to_string());
        }
    }

    pub fn remove_type_definition(&mut self, name: &str) -> Option<TypeDefinition> {
        self.types.shift_remove(name)
    }

    fn root_type_name<'a>(
        &'a self,
        default_name: &'a str,
        from_schema: impl Fn(&'a SchemaExtension) -> Option<&'a str>,
    ) -> Option<&'a str> {
        match self.schema_extensions.iter().find_map(from_schema) {
            Some(name) => Some(name),
            None if self.types.contains_key(default_name) => Some(default_name),
            None => None,
        }
    }

    pub fn schema_extensions(&self) -> &Vec<SchemaExtension> {
        &self.schema_extensions
    }

    pub(crate) fn set_content_hash(&mut self, hash: String) {
        self.content_hash = hash;
    }

    /// Inserts `def`, replacing any existing type with the same name while
    /// keeping its position in the types map.
    pub fn set_type_definition(&mut self, def: TypeDefinition) {
        self.types.insert(def.name().to_string(), def);
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.root_type_name("Subscription", |ext| ext.subscription())
    }

    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, SchemaCacheError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|err| SchemaCacheError::Encode(err.to_string()))
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn type_definition_mut(&mut self, name: &str) -> Option<&mut TypeDefinition> {
        self.types.get_mut(name)
    }

    /// Extensions not yet merged into their base types, keyed by the name of
    /// the type they extend.
    pub fn type_extensions(&self) -> &IndexMap<String, Vec<TypeDefinition>> {
        &self.type_extensions
    }

    pub fn types(&self) -> &IndexMap<String, TypeDefinition> {
        &self.types
    }
}

/// Hex-encoded SHA-256 of some SDL text.
pub fn content_hash(sdl: &str) -> String {
    hex::encode(sha2::Sha256::digest(sdl.as_bytes()))
}
