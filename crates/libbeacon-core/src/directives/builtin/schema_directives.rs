use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::Manipulation;
use crate::directives::TypeExtensionManipulator;
use crate::directives::TypeManipulator;
use crate::document::DirectiveUsage;
use crate::document::TypeDefinition;
use crate::schema::SchemaBuildError;

/// `@model(class: "App::User")` maps a type to the model backing it.
pub struct ModelDirective;
impl Directive for ModelDirective {
    fn name(&self) -> &str {
        "model"
    }

    fn definition(&self) -> &str {
        r#"
"""
Map a type to the model (entity class) that backs it.
"""
directive @model(
  """
  The model's name, as known to the data store.
  """
  class: String!
) on OBJECT | INTERFACE | UNION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::TypeManipulator]
    }

    fn as_type_manipulator(&self) -> Option<&dyn TypeManipulator> {
        Some(self)
    }
}
impl TypeManipulator for ModelDirective {
    fn manipulate_type_definition(
        &self,
        manipulation: Manipulation<'_>,
        type_name: &str,
    ) -> Result<(), SchemaBuildError> {
        let class = manipulation.usage.required_string_arg("class")?;
        manipulation.doc.register_class_name(class, type_name);
        Ok(())
    }
}

/// `@namespace(field: "app::resolvers")` sets the namespaces a field's
/// directives look their named callables up in. On a type, it applies to
/// every field that has no `@namespace` of its own.
pub struct NamespaceDirective;
impl Directive for NamespaceDirective {
    fn name(&self) -> &str {
        "namespace"
    }

    fn definition(&self) -> &str {
        r#"
"""
Redefine the namespace used by directives that reference callables.
The argument names are the names of the directives they apply to.
"""
directive @namespace(
  builder: String
  complexity: String
  field: String
) on FIELD_DEFINITION | OBJECT
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::TypeExtensionManipulator,
            DirectiveCapability::TypeManipulator,
        ]
    }

    fn as_type_extension_manipulator(&self) -> Option<&dyn TypeExtensionManipulator> {
        Some(self)
    }

    fn as_type_manipulator(&self) -> Option<&dyn TypeManipulator> {
        Some(self)
    }
}
impl TypeManipulator for NamespaceDirective {
    fn manipulate_type_definition(
        &self,
        manipulation: Manipulation<'_>,
        type_name: &str,
    ) -> Result<(), SchemaBuildError> {
        if let Some(def) = manipulation.doc.type_definition_mut(type_name) {
            copy_onto_fields(def, manipulation.usage);
        }
        Ok(())
    }
}
impl TypeExtensionManipulator for NamespaceDirective {
    fn manipulate_type_extension(
        &self,
        manipulation: Manipulation<'_>,
        extension: &mut TypeDefinition,
    ) -> Result<(), SchemaBuildError> {
        copy_onto_fields(extension, manipulation.usage);
        Ok(())
    }
}

/// Adds `usage` to every field of an object or interface type that does
/// not already carry a directive of the same name.
pub(super) fn copy_onto_fields(def: &mut TypeDefinition, usage: &DirectiveUsage) {
    let Some(obj_def) = def.as_object_like_mut() else {
        return;
    };
    for field in obj_def.fields_mut().values_mut() {
        if !field.has_directive(usage.name()) {
            field.directives_mut().push(usage.clone());
        }
    }
}
