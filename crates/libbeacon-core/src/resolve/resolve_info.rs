use crate::arguments::ArgumentSet;
use crate::directives::BuilderContext;
use crate::directives::DirectiveCapability;
use crate::execution::PathSegment;
use crate::execution::RequestContext;
use crate::document::FieldDefinition;
use crate::document::TypeAnnotation;
use crate::resolve::CompiledSchema;
use crate::resolve::ComposedField;
use crate::resolve::ResolveError;
use crate::store::QueryBuilder;

/// Describes the field being resolved.
pub struct ResolveInfo<'a> {
    pub(crate) field: &'a ComposedField,
    pub(crate) path: Vec<PathSegment>,
    pub(crate) schema: &'a CompiledSchema,
}
impl<'a> ResolveInfo<'a> {
    pub fn new(
        schema: &'a CompiledSchema,
        field: &'a ComposedField,
        path: Vec<PathSegment>,
    ) -> Self {
        Self {
            field,
            path,
            schema,
        }
    }

    /// Applies, in order, the given model scopes, every argument builder
    /// directive among `args` (recursing into nested input objects), and
    /// the field's own builder directives.
    pub fn enhance_builder(
        &self,
        builder: &mut dyn QueryBuilder,
        scopes: &[String],
        args: &ArgumentSet,
        ctx: &RequestContext,
    ) -> Result<(), ResolveError> {
        let args_json = serde_json::Value::Object(args.to_json());
        for scope in scopes {
            builder.apply_scope(scope, &args_json)?;
        }

        let builder_ctx = BuilderContext {
            request: ctx,
            schema: self.schema,
        };
        args.enhance_builder(builder, &builder_ctx)?;

        for bound in self.field.builder_directives.iter() {
            let field_builder = bound.directive.as_field_builder()
                .ok_or_else(|| ResolveError::Directive(
                    crate::directives::DirectiveError::CapabilityNotProvided {
                        capability: DirectiveCapability::FieldBuilder,
                        directive_name: bound.usage.name().to_string(),
                    },
                ))?;
            field_builder.handle_field_builder(&bound.usage, builder, args, &builder_ctx)?;
        }
        Ok(())
    }

    pub fn field(&self) -> &'a ComposedField {
        self.field
    }

    pub fn field_definition(&self) -> &'a FieldDefinition {
        &self.field.definition
    }

    pub fn field_name(&self) -> &'a str {
        self.field.definition.name.as_str()
    }

    pub fn parent_type_name(&self) -> &'a str {
        self.field.parent_type.as_str()
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// The response path with list indices removed, e.g. `users.posts` for
    /// `users.3.posts`. Every item of a list shares it.
    pub fn path_without_indices(&self) -> String {
        self.path.iter()
            .filter_map(|segment| match segment {
                PathSegment::Index(_) => None,
                PathSegment::Key(key) => Some(key.as_str()),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn return_type(&self) -> &'a TypeAnnotation {
        &self.field.definition.type_annotation
    }

    pub fn schema(&self) -> &'a CompiledSchema {
        self.schema
    }
}
