use crate::directives::CallableRegistry;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::directives::DirectiveValidator;
use crate::directives::Manipulation;
use crate::document;
use crate::document::DocumentAst;
use crate::document::Node;
use crate::document::ObjectOrInterfaceTypeDefinition;
use crate::document::TypeAnnotation;
use crate::document::TypeDefinition;
use crate::document::TypeKind;
use crate::resolve::CompiledSchema;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaCache;
use crate::schema::SchemaPlugin;
use crate::schema::SchemaSource;
use crate::BeaconConfig;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// Root operation types that may be extended without being defined.
const ROOT_TYPE_NAMES: [&str; 3] = ["Mutation", "Query", "Subscription"];

/// Utility for building a [`DocumentAst`] out of one or more SDL sources.
///
/// [`SchemaBuilder::build()`] runs these passes, in order:
///
/// 1. Parse every source (and every plugin's additional SDL).
/// 2. Type manipulators, on each type definition.
/// 3. Type extension manipulators, on each extension, each extension being
///    merged into its base type right after its manipulators ran.
/// 4. Field manipulators, on each field of each object and interface type.
/// 5. Argument manipulators, on each field argument.
/// 6. Input field manipulators, on each field of each input object type.
/// 7. Plugin manipulation hooks.
/// 8. Validation of every directive usage and type reference.
///
/// Each pass iterates over a snapshot of the node names that existed when
/// the pass began: nodes a manipulator adds are not visited by the pass
/// that added them, and nodes a manipulator removes are skipped.
pub struct SchemaBuilder {
    config: Arc<BeaconConfig>,
    plugins: Vec<Arc<dyn SchemaPlugin>>,
    registry: Arc<DirectiveRegistry>,
    sources: Vec<(Option<PathBuf>, String)>,
    str_load_counter: u16,
}
impl SchemaBuilder {
    pub fn new(registry: Arc<DirectiveRegistry>) -> Self {
        Self {
            config: Arc::new(BeaconConfig::default()),
            plugins: vec![],
            registry,
            sources: vec![],
            str_load_counter: 0,
        }
    }

    pub fn with_config(mut self, config: Arc<BeaconConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_plugin<P: SchemaPlugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    pub fn build(self) -> Result<DocumentAst> {
        let mut doc = DocumentAst::default();
        for (file_path, content) in self.sources.iter() {
            doc.add_source(content, file_path.as_deref())?;
        }
        for plugin in self.plugins.iter() {
            if let Some(sdl) = plugin.additional_sdl() {
                let plugin_path = PathBuf::from(format!("plugin://{}", plugin.name()));
                doc.add_source(&sdl, Some(&plugin_path))?;
            }
        }
        doc.set_content_hash(self.content_hash());

        self.apply_type_manipulators(&mut doc)?;
        self.apply_type_extension_manipulators(&mut doc)?;
        self.apply_field_manipulators(&mut doc)?;
        self.apply_arg_manipulators(&mut doc)?;
        self.apply_input_field_manipulators(&mut doc)?;

        for plugin in self.plugins.iter() {
            tracing::trace!("Running schema plugin `{}`", plugin.name());
            plugin.manipulate(&mut doc)?;
        }

        DirectiveValidator::new(&doc, &self.registry).validate()?;
        validate_type_references(&doc)?;
        if doc.query_type_name().is_none() {
            return Err(SchemaBuildError::NoQueryOperationTypeDefined);
        }

        tracing::debug!(
            "Built schema document with {} types ({})",
            doc.types().len(),
            doc.content_hash(),
        );
        Ok(doc)
    }

    /// Like [`SchemaBuilder::build()`], but reuses the document stored in
    /// `cache` when it was built from identical SDL, and stores the result
    /// otherwise.
    pub fn build_cached(self, cache: &SchemaCache) -> Result<DocumentAst> {
        let content_hash = self.content_hash();
        match cache.load(&content_hash) {
            Ok(Some(doc)) => {
                tracing::debug!("Loaded schema from cache at {}", cache.path().display());
                return Ok(doc);
            },
            Ok(None) => (),
            Err(err) => tracing::warn!("Ignoring unreadable schema cache: {err}"),
        }

        let doc = self.build()?;
        cache.store(&doc)?;
        Ok(doc)
    }

    /// Builds the document (through the schema cache, if the config
    /// enables it) and composes every field's resolver.
    pub fn compile(self, callables: Arc<CallableRegistry>) -> Result<CompiledSchema> {
        let config = self.config.clone();
        let registry = self.registry.clone();
        let doc = if config.schema.cache.enable {
            let cache = SchemaCache::new(&config.schema.cache.path);
            self.build_cached(&cache)?
        } else {
            self.build()?
        };
        CompiledSchema::compile(doc, registry, callables, config)
    }

    /// SHA-256 over every source (and plugin SDL) in load order.
    pub fn content_hash(&self) -> String {
        let mut all_sdl = String::new();
        for (_, content) in self.sources.iter() {
            all_sdl.push_str(content);
            all_sdl.push('\n');
        }
        for plugin in self.plugins.iter() {
            if let Some(sdl) = plugin.additional_sdl() {
                all_sdl.push_str(&sdl);
                all_sdl.push('\n');
            }
        }
        document::content_hash(&all_sdl)
    }

    /// Loads a schema file, expanding its `#import` lines.
    pub fn load_file<P: AsRef<Path>>(self, file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        let content = SchemaSource::new(file_path).read()?;
        Ok(self.load_str(Some(file_path), content.as_str()))
    }

    pub fn load_files<P: AsRef<Path>>(self, file_paths: Vec<P>) -> Result<Self> {
        let mut this = self;
        for file_path in file_paths {
            this = this.load_file(file_path)?;
        }
        Ok(this)
    }

    pub fn load_str(mut self, file_path: Option<&Path>, content: &str) -> Self {
        let file_path = match file_path {
            Some(file_path) => file_path.to_path_buf(),
            None => {
                let ctr = self.str_load_counter;
                self.str_load_counter += 1;
                PathBuf::from(format!("str://{ctr}"))
            },
        };
        self.sources.push((Some(file_path), content.to_string()));
        self
    }

    fn apply_type_manipulators(&self, doc: &mut DocumentAst) -> Result<()> {
        let type_names: Vec<String> = doc.types().keys().cloned().collect();
        for type_name in type_names {
            let usages = match doc.type_definition(&type_name) {
                Some(def) => def.directives().clone(),
                None => continue,
            };
            let bound = self.registry.associated_of_type(
                &usages,
                DirectiveCapability::TypeManipulator,
            )?;
            for b in bound {
                let manipulator = b.directive.as_type_manipulator()
                    .ok_or_else(|| not_provided(&b.usage, DirectiveCapability::TypeManipulator))?;
                manipulator.manipulate_type_definition(
                    Manipulation {
                        config: &self.config,
                        doc: &mut *doc,
                        usage: &b.usage,
                    },
                    &type_name,
                )?;
            }
        }
        Ok(())
    }

    fn apply_type_extension_manipulators(&self, doc: &mut DocumentAst) -> Result<()> {
        let extensions = std::mem::take(&mut doc.type_extensions);
        for (type_name, exts) in extensions {
            for mut ext in exts {
                let usages = ext.directives().clone();
                let bound = self.registry.associated_of_type(
                    &usages,
                    DirectiveCapability::TypeExtensionManipulator,
                )?;
                for b in bound {
                    let manipulator = b.directive.as_type_extension_manipulator()
                        .ok_or_else(|| not_provided(
                            &b.usage,
                            DirectiveCapability::TypeExtensionManipulator,
                        ))?;
                    manipulator.manipulate_type_extension(
                        Manipulation {
                            config: &self.config,
                            doc: &mut *doc,
                            usage: &b.usage,
                        },
                        &mut ext,
                    )?;
                }

                if doc.type_definition(&type_name).is_none() {
                    if ROOT_TYPE_NAMES.contains(&type_name.as_str())
                        && ext.kind() == TypeKind::Object {
                        doc.add_type_definition(TypeDefinition::Object(
                            ObjectOrInterfaceTypeDefinition::new(type_name.as_str()),
                        ))?;
                    } else {
                        return Err(SchemaBuildError::ExtensionOfUndefinedType {
                            extension_type_loc: ext.location().clone(),
                            type_name,
                        });
                    }
                }

                if let Some(base) = doc.type_definition_mut(&type_name) {
                    document::extend_type_definition(base, ext)?;
                }
            }
        }
        Ok(())
    }

    fn apply_field_manipulators(&self, doc: &mut DocumentAst) -> Result<()> {
        let targets: Vec<(String, String)> = doc.types().values()
            .filter_map(|def| def.as_object_like())
            .flat_map(|def| def.fields().keys().map(|field_name| {
                (def.name().to_string(), field_name.clone())
            }))
            .collect();

        for (type_name, field_name) in targets {
            let usages = match doc.field(&type_name, &field_name) {
                Some(field) => field.directives().clone(),
                None => continue,
            };
            let bound = self.registry.associated_of_type(
                &usages,
                DirectiveCapability::FieldManipulator,
            )?;
            for b in bound {
                let manipulator = b.directive.as_field_manipulator()
                    .ok_or_else(|| not_provided(&b.usage, DirectiveCapability::FieldManipulator))?;
                manipulator.manipulate_field_definition(
                    Manipulation {
                        config: &self.config,
                        doc: &mut *doc,
                        usage: &b.usage,
                    },
                    &type_name,
                    &field_name,
                )?;
            }
        }
        Ok(())
    }

    fn apply_arg_manipulators(&self, doc: &mut DocumentAst) -> Result<()> {
        let targets: Vec<(String, String, String)> = doc.types().values()
            .filter_map(|def| def.as_object_like())
            .flat_map(|def| def.fields().values().flat_map(move |field| {
                field.arguments().keys().map(move |arg_name| (
                    def.name().to_string(),
                    field.name().to_string(),
                    arg_name.clone(),
                ))
            }))
            .collect();

        for (type_name, field_name, arg_name) in targets {
            let usages = match doc.field(&type_name, &field_name)
                .and_then(|field| field.argument(&arg_name)) {
                Some(arg) => arg.directives().clone(),
                None => continue,
            };
            let bound = self.registry.associated_of_type(
                &usages,
                DirectiveCapability::ArgManipulator,
            )?;
            for b in bound {
                let manipulator = b.directive.as_arg_manipulator()
                    .ok_or_else(|| not_provided(&b.usage, DirectiveCapability::ArgManipulator))?;
                manipulator.manipulate_arg_definition(
                    Manipulation {
                        config: &self.config,
                        doc: &mut *doc,
                        usage: &b.usage,
                    },
                    &type_name,
                    &field_name,
                    &arg_name,
                )?;
            }
        }
        Ok(())
    }

    fn apply_input_field_manipulators(&self, doc: &mut DocumentAst) -> Result<()> {
        let targets: Vec<(String, String)> = doc.types().values()
            .filter_map(|def| def.as_input_object())
            .flat_map(|def| def.fields().keys().map(|field_name| {
                (def.name().to_string(), field_name.clone())
            }))
            .collect();

        for (type_name, field_name) in targets {
            let usages = match doc.type_definition(&type_name)
                .and_then(|def| def.as_input_object())
                .and_then(|def| def.field(&field_name)) {
                Some(field) => field.directives().clone(),
                None => continue,
            };
            let bound = self.registry.associated_of_type(
                &usages,
                DirectiveCapability::InputFieldManipulator,
            )?;
            for b in bound {
                let manipulator = b.directive.as_input_field_manipulator()
                    .ok_or_else(|| not_provided(
                        &b.usage,
                        DirectiveCapability::InputFieldManipulator,
                    ))?;
                manipulator.manipulate_input_field_definition(
                    Manipulation {
                        config: &self.config,
                        doc: &mut *doc,
                        usage: &b.usage,
                    },
                    &type_name,
                    &field_name,
                )?;
            }
        }
        Ok(())
    }
}

fn not_provided(
    usage: &crate::document::DirectiveUsage,
    capability: DirectiveCapability,
) -> DirectiveError {
    DirectiveError::CapabilityNotProvided {
        capability,
        directive_name: usage.name().to_string(),
    }
}

fn check_reference(
    doc: &DocumentAst,
    annotation: &TypeAnnotation,
    referenced_by: String,
    location: &crate::loc::SourceLocation,
    input: bool,
) -> Result<()> {
    let type_name = annotation.innermost_type_name();
    if !doc.has_type(type_name) {
        return Err(SchemaBuildError::UndefinedTypeReference {
            location: location.clone(),
            referenced_by,
            type_name: type_name.to_string(),
        });
    }
    if let Some(def) = doc.type_definition(type_name) {
        let kind = def.kind();
        let is_input_kind = matches!(kind, TypeKind::Enum | TypeKind::InputObject | TypeKind::Scalar);
        let is_output_kind = kind != TypeKind::InputObject;
        if input && !is_input_kind {
            return Err(SchemaBuildError::WrongTypeKind {
                actual: kind,
                expected: "an input type",
                referenced_by,
                type_name: type_name.to_string(),
            });
        }
        if !input && !is_output_kind {
            return Err(SchemaBuildError::WrongTypeKind {
                actual: kind,
                expected: "an output type",
                referenced_by,
                type_name: type_name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_named_kind(
    doc: &DocumentAst,
    type_name: &str,
    expected_kind: TypeKind,
    expected: &'static str,
    referenced_by: &str,
    location: &crate::loc::SourceLocation,
) -> Result<()> {
    match doc.type_definition(type_name) {
        None => Err(SchemaBuildError::UndefinedTypeReference {
            location: location.clone(),
            referenced_by: referenced_by.to_string(),
            type_name: type_name.to_string(),
        }),
        Some(def) if def.kind() != expected_kind => Err(SchemaBuildError::WrongTypeKind {
            actual: def.kind(),
            expected,
            referenced_by: referenced_by.to_string(),
            type_name: type_name.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Every named type a definition refers to must exist and be of a kind
/// that is allowed in that position.
fn validate_type_references(doc: &DocumentAst) -> Result<()> {
    for def in doc.directive_definitions().values() {
        for arg in def.arguments().values() {
            check_reference(
                doc,
                arg.type_annotation(),
                format!("@{}({})", def.name(), arg.name()),
                arg.location(),
                true,
            )?;
        }
    }

    for def in doc.types().values() {
        match def {
            TypeDefinition::InputObject(input_def) => {
                for field in input_def.fields().values() {
                    check_reference(
                        doc,
                        field.type_annotation(),
                        format!("{}.{}", def.name(), field.name()),
                        field.location(),
                        true,
                    )?;
                }
            },

            TypeDefinition::Interface(obj_def) | TypeDefinition::Object(obj_def) => {
                for iface in obj_def.interfaces() {
                    check_named_kind(
                        doc,
                        iface,
                        TypeKind::Interface,
                        "an interface",
                        def.name(),
                        def.location(),
                    )?;
                }
                for field in obj_def.fields().values() {
                    check_reference(
                        doc,
                        field.type_annotation(),
                        format!("{}.{}", def.name(), field.name()),
                        field.location(),
                        false,
                    )?;
                    for arg in field.arguments().values() {
                        check_reference(
                            doc,
                            arg.type_annotation(),
                            format!("{}.{}({})", def.name(), field.name(), arg.name()),
                            arg.location(),
                            true,
                        )?;
                    }
                }
            },

            TypeDefinition::Union(union_def) => {
                for member in union_def.members() {
                    check_named_kind(
                        doc,
                        member,
                        TypeKind::Object,
                        "a union member",
                        def.name(),
                        def.location(),
                    )?;
                }
            },

            TypeDefinition::Enum(_) | TypeDefinition::Scalar(_) => (),
        }
    }

    Ok(())
}
impl std::default::Default for SchemaBuilder {
    fn default() -> Self {
        Self::new(Arc::new(DirectiveRegistry::default()))
    }
}
