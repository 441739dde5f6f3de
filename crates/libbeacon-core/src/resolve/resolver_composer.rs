use crate::directives::CallableRegistry;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::directives::FieldContext;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::Node;
use crate::resolve::ComposedField;
use crate::resolve::DefaultFieldResolver;
use crate::resolve::FieldResolverFn;
use crate::resolve::field_middleware::MiddlewareResolver;
use crate::BeaconConfig;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DirectiveError>;

/// Assembles each field's resolver out of its directives.
///
/// The base resolver comes from the field's (single) field resolver
/// directive, or is the default property resolver. Field middleware then
/// wrap it like an onion: the first middleware written on the field is the
/// outermost, so it runs first on the way in and last on the way out.
pub(crate) struct ResolverComposer<'a> {
    pub(crate) callables: &'a CallableRegistry,
    pub(crate) config: &'a BeaconConfig,
    pub(crate) doc: &'a DocumentAst,
    pub(crate) registry: &'a DirectiveRegistry,
}
impl ResolverComposer<'_> {
    pub(crate) fn compose_field(
        &self,
        parent_type: &str,
        field: &FieldDefinition,
    ) -> Result<ComposedField> {
        let field_ctx = FieldContext {
            callables: self.callables,
            config: self.config,
            doc: self.doc,
            field,
            parent_type,
        };
        let usages = field.directives();

        let resolvers = self.registry.associated_of_type(
            usages,
            DirectiveCapability::FieldResolver,
        )?;
        if resolvers.len() > 1 {
            return Err(DirectiveError::MultipleFieldResolvers {
                directive_names: resolvers.iter()
                    .map(|b| b.usage.name().to_string())
                    .collect(),
                field_name: field.name().to_string(),
                type_name: parent_type.to_string(),
            });
        }

        let mut resolver: Arc<dyn FieldResolverFn> = match resolvers.first() {
            Some(bound) => bound.directive.as_field_resolver()
                .ok_or_else(|| DirectiveError::CapabilityNotProvided {
                    capability: DirectiveCapability::FieldResolver,
                    directive_name: bound.usage.name().to_string(),
                })?
                .resolve_field(&bound.usage, &field_ctx)?,
            None => Arc::new(DefaultFieldResolver),
        };

        let middleware = self.registry.associated_of_type(
            usages,
            DirectiveCapability::FieldMiddleware,
        )?;
        for bound in middleware.iter().rev() {
            let layer = bound.directive.as_field_middleware()
                .ok_or_else(|| DirectiveError::CapabilityNotProvided {
                    capability: DirectiveCapability::FieldMiddleware,
                    directive_name: bound.usage.name().to_string(),
                })?
                .field_middleware(&bound.usage, &field_ctx)?;
            resolver = Arc::new(MiddlewareResolver {
                inner: resolver,
                middleware: layer,
            });
        }

        let builder_directives = self.registry.associated_of_type(
            usages,
            DirectiveCapability::FieldBuilder,
        )?;
        let complexity = self.registry.exclusive_of_type(
            usages,
            DirectiveCapability::ComplexityResolver,
            &format!("{parent_type}.{}", field.name()),
        )?;

        tracing::trace!(
            "Composed `{parent_type}.{}` with {} middleware",
            field.name(),
            middleware.len(),
        );
        Ok(ComposedField {
            builder_directives,
            complexity,
            definition: field.clone(),
            parent_type: parent_type.to_string(),
            resolver,
        })
    }
}
