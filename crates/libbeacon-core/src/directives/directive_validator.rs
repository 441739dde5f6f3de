use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::document::DirectiveDefinition;
use crate::document::DirectiveLocation;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::Node;
use crate::document::TypeDefinition;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, DirectiveError>;

/// Checks every directive usage in a built document against its
/// declaration: the name must be known, the location allowed, a
/// non-repeatable directive used at most once per node, and the arguments
/// must match the declared ones.
pub(crate) struct DirectiveValidator<'a> {
    doc: &'a DocumentAst,
    registry: &'a DirectiveRegistry,
}
impl<'a> DirectiveValidator<'a> {
    pub(crate) fn new(doc: &'a DocumentAst, registry: &'a DirectiveRegistry) -> Self {
        Self {
            doc,
            registry,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for ext in self.doc.schema_extensions() {
            self.validate_usages(ext.directives(), DirectiveLocation::Schema)?;
        }

        for def in self.doc.directive_definitions().values() {
            for arg in def.arguments().values() {
                self.validate_usages(arg.directives(), DirectiveLocation::ArgumentDefinition)?;
            }
        }

        for def in self.doc.types().values() {
            match def {
                TypeDefinition::Enum(enum_def) => {
                    self.validate_usages(def.directives(), DirectiveLocation::Enum)?;
                    for value in enum_def.values().values() {
                        self.validate_usages(value.directives(), DirectiveLocation::EnumValue)?;
                    }
                },

                TypeDefinition::InputObject(input_def) => {
                    self.validate_usages(def.directives(), DirectiveLocation::InputObject)?;
                    for field in input_def.fields().values() {
                        self.validate_usages(
                            field.directives(),
                            DirectiveLocation::InputFieldDefinition,
                        )?;
                    }
                },

                TypeDefinition::Interface(obj_def) | TypeDefinition::Object(obj_def) => {
                    let location = if matches!(def, TypeDefinition::Object(_)) {
                        DirectiveLocation::Object
                    } else {
                        DirectiveLocation::Interface
                    };
                    self.validate_usages(def.directives(), location)?;
                    for field in obj_def.fields().values() {
                        self.validate_usages(field.directives(), DirectiveLocation::FieldDefinition)?;
                        for arg in field.arguments().values() {
                            self.validate_usages(
                                arg.directives(),
                                DirectiveLocation::ArgumentDefinition,
                            )?;
                        }
                    }
                },

                TypeDefinition::Scalar(_) =>
                    self.validate_usages(def.directives(), DirectiveLocation::Scalar)?,

                TypeDefinition::Union(_) =>
                    self.validate_usages(def.directives(), DirectiveLocation::Union)?,
            }
        }

        Ok(())
    }

    fn definition(&self, usage: &DirectiveUsage) -> Result<&'a DirectiveDefinition> {
        self.doc.directive_definition(usage.name())
            .or_else(|| self.registry.definition(usage.name()))
            .ok_or_else(|| DirectiveError::UnknownDirective {
                directive_name: usage.name().to_string(),
                location: usage.location().clone(),
            })
    }

    fn validate_usages(
        &self,
        usages: &[DirectiveUsage],
        location_kind: DirectiveLocation,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        for usage in usages {
            let def = self.definition(usage)?;

            if !def.is_valid_location(location_kind) {
                return Err(DirectiveError::InvalidLocation {
                    directive_name: usage.name().to_string(),
                    location: usage.location().clone(),
                    location_kind,
                });
            }

            if !seen.insert(usage.name()) && !def.repeatable() {
                return Err(DirectiveError::NotRepeatable {
                    directive_name: usage.name().to_string(),
                    location: usage.location().clone(),
                });
            }

            for arg_name in usage.arguments().keys() {
                if !def.arguments().contains_key(arg_name) {
                    return Err(DirectiveError::UnknownArgument {
                        argument_name: arg_name.clone(),
                        directive_name: usage.name().to_string(),
                        location: usage.location().clone(),
                    });
                }
            }

            for (arg_name, arg_def) in def.arguments() {
                let required = !arg_def.type_annotation().nullable()
                    && arg_def.default_value().is_none();
                let provided = usage.argument(arg_name).is_some_and(|v| !v.is_null());
                if required && !provided {
                    return Err(DirectiveError::MissingRequiredArgument {
                        argument_name: arg_name.clone(),
                        directive_name: usage.name().to_string(),
                        location: usage.location().clone(),
                    });
                }
            }

            if let Some(registered) = self.registry.resolve(usage.name()) {
                registered.directive().validate_usage(usage)?;
            }
        }
        Ok(())
    }
}
